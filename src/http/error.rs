//! Error responses for the HTTP adapter.

use crate::task::{domain::TaskId, domain::TaskValidationError, services::TaskServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message returned to clients when an unexpected failure occurs.
pub const INTERNAL_ERROR_MESSAGE: &str =
    "An unexpected error occurred while processing your request. Please try again later.";

/// JSON body sent with every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable description.
    pub message: String,
    /// Offending input field, for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Errors produced by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A task field or query parameter failed domain validation.
    #[error(transparent)]
    Validation(#[from] TaskValidationError),

    /// The request could not be parsed into the expected shape.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        /// Part of the request that was malformed.
        field: &'static str,
        /// Parser message.
        message: String,
    },

    /// The addressed task does not exist.
    #[error("task {0} not found")]
    NotFound(TaskId),

    /// Storage or another collaborator failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Builds an [`ApiError::InvalidInput`].
    #[must_use]
    pub fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::Validation(err) => ErrorBody {
                error: "validation_error".to_owned(),
                message: err.to_string(),
                field: Some(err.field().to_owned()),
            },
            Self::InvalidInput { field, message } => ErrorBody {
                error: "validation_error".to_owned(),
                message: message.clone(),
                field: Some((*field).to_owned()),
            },
            Self::NotFound(id) => ErrorBody {
                error: "not_found".to_owned(),
                message: format!("task {id} not found"),
                field: None,
            },
            Self::Internal(_) => ErrorBody {
                error: "internal_error".to_owned(),
                message: INTERNAL_ERROR_MESSAGE.to_owned(),
                field: None,
            },
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Validation(validation) => Self::Validation(validation),
            TaskServiceError::Repository(repository) => {
                tracing::error!(error = %repository, "task storage failure");
                Self::Internal(repository.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
