use std::fmt::{self, Debug};

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inner error type for routes that have no route specific failure modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Nothing {}

impl fmt::Display for Nothing {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl std::error::Error for Nothing {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{}", .error_messages.join(", "))]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl ValidationError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            error_messages: vec![message.into()],
        }
    }
}

/// Error type every route returns. `T` carries the route specific errors
/// declared in [`crate::api::response_errors`], each paired with its
/// status code there. Everything else collapses to a 500
#[derive(Debug, Error)]
pub enum ServerError<T: Debug> {
    #[error("{inner:?}")]
    Inner { code: StatusCode, inner: T },
    #[error("{inner}")]
    Validation { inner: ValidationError },
    #[error("{message}")]
    Database { message: String },
    #[error("{message}")]
    Other { message: String },
}

#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Other {
            message: format!($($arg)*),
        }
    };
}

impl<T: Debug> From<rusqlite::Error> for ServerError<T> {
    fn from(value: rusqlite::Error) -> Self {
        Self::Database {
            message: format!("rusqlite: {value:?}"),
        }
    }
}

impl<T: Debug> From<deadpool_sqlite::InteractError> for ServerError<T> {
    fn from(value: deadpool_sqlite::InteractError) -> Self {
        Self::Database {
            message: format!("interact: {value:?}"),
        }
    }
}

impl<T: Debug> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

impl<T: Debug> From<anyhow::Error> for ServerError<T> {
    fn from(value: anyhow::Error) -> Self {
        Self::Other {
            message: format!("{value:?}"),
        }
    }
}

impl<T: Debug + Serialize> IntoResponse for ServerError<T> {
    fn into_response(self) -> Response {
        use ServerError::*;
        match self {
            Inner { code, inner } => (code, Json(inner)).into_response(),
            Validation { inner } => (StatusCode::BAD_REQUEST, Json(inner)).into_response(),
            Database { message } | Other { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
            },
        }
    }
}
