//! Error types for task field validation and parsing.

use thiserror::Error;

/// Errors returned while validating raw task input.
///
/// Each variant identifies the offending field through [`Self::field`], which
/// the HTTP adapter surfaces to clients alongside the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// The title is empty or whitespace-only.
    #[error("title must not be empty or contain only whitespace")]
    InvalidTitle,

    /// The trimmed title exceeds the maximum length.
    #[error("title must be at most {max} characters, got {length}")]
    TitleTooLong {
        /// Length of the trimmed title in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The description exceeds the maximum length.
    #[error("description must be at most {max} characters, got {length}")]
    DescriptionTooLong {
        /// Length of the description in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The status value is not one of the supported literals.
    #[error("invalid status '{0}', expected one of CREATED, IN_PROGRESS, COMPLETED")]
    InvalidStatus(String),

    /// The pagination offset is negative.
    #[error("skip must be greater than or equal to 0, got {0}")]
    InvalidSkip(i64),

    /// The pagination limit is outside the accepted range.
    #[error("limit must be between {min} and {max}, got {value}")]
    InvalidLimit {
        /// Requested limit.
        value: i64,
        /// Smallest accepted limit.
        min: u64,
        /// Largest accepted limit.
        max: u64,
    },
}

impl TaskValidationError {
    /// Returns the name of the input field that failed validation.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidTitle | Self::TitleTooLong { .. } => "title",
            Self::DescriptionTooLong { .. } => "description",
            Self::InvalidStatus(_) => "status",
            Self::InvalidSkip(_) => "skip",
            Self::InvalidLimit { .. } => "limit",
        }
    }
}
