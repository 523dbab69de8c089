//! Identifier and validated scalar types for the task domain.

use super::TaskValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for TaskId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task title, trimmed and between 1 and [`TaskTitle::MAX_LENGTH`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Longest accepted title, counted in characters after trimming.
    pub const MAX_LENGTH: usize = 100;

    /// Creates a validated title from raw input.
    ///
    /// Leading and trailing whitespace is removed before the checks run.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError::InvalidTitle`] when the trimmed value
    /// is empty, or [`TaskValidationError::TitleTooLong`] when it is longer
    /// than [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, TaskValidationError> {
        let normalized = value.as_ref().trim();
        if normalized.is_empty() {
            return Err(TaskValidationError::InvalidTitle);
        }

        let length = normalized.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskValidationError::TitleTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskTitle {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskTitle> for String {
    fn from(value: TaskTitle) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form task description of at most [`TaskDescription::MAX_LENGTH`]
/// characters. Stored exactly as given; an empty string is a valid value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskDescription(String);

impl TaskDescription {
    /// Longest accepted description, counted in characters.
    pub const MAX_LENGTH: usize = 1000;

    /// Creates a validated description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskValidationError::DescriptionTooLong`] when the value is
    /// longer than [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskValidationError> {
        let raw = value.into();
        let length = raw.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskValidationError::DescriptionTooLong {
                length,
                max: Self::MAX_LENGTH,
            });
        }
        Ok(Self(raw))
    }

    /// Returns the description as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskDescription {
    type Error = TaskValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskDescription> for String {
    fn from(value: TaskDescription) -> Self {
        value.0
    }
}

impl AsRef<str> for TaskDescription {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
