use std::any::Any;

use axum::Json;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::token::TokenPurpose;
use crate::types::response::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("No credentials provided")]
    NoCredentials,
    #[error("Expired {0} token")]
    ExpiredToken(TokenPurpose),
    #[error("Invalid {0} token")]
    InvalidToken(TokenPurpose),
    #[error("Expected a {expected} token")]
    WrongTokenPurpose { expected: TokenPurpose },
    #[error("Unknown subject {0}")]
    UnknownSubject(String),
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("No route for {method} {path}")]
    NotFound { method: Method, path: String },
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Internal server error")]
    Internal,
}

impl Error {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials
            | Error::NoCredentials
            | Error::ExpiredToken(_)
            | Error::InvalidToken(_)
            | Error::WrongTokenPurpose { .. } => StatusCode::UNAUTHORIZED,
            Error::UnknownSubject(_) => StatusCode::NOT_FOUND,
            Error::MissingField(_) => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Jwt(_) | Error::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable code carried in the response envelope.
    pub(crate) fn code(&self) -> &'static str {
        match self {
            Error::InvalidCredentials => "1001",
            Error::NoCredentials => "1002",
            Error::UnknownSubject(_) => "1003",
            Error::ExpiredToken(TokenPurpose::Access) => "1004",
            Error::InvalidToken(TokenPurpose::Access)
            | Error::WrongTokenPurpose {
                expected: TokenPurpose::Access,
            } => "1005",
            Error::MissingField(_) => "1006",
            Error::ExpiredToken(TokenPurpose::Refresh) => "1007",
            Error::InvalidToken(TokenPurpose::Refresh)
            | Error::WrongTokenPurpose {
                expected: TokenPurpose::Refresh,
            } => "1008",
            Error::NotFound { .. } => "404",
            Error::Jwt(_) | Error::Internal => "9999",
        }
    }

    fn data(&self) -> Option<serde_json::Value> {
        match self {
            Error::NotFound { method, path } => Some(json!({
                "method": method.as_str(),
                "path": path,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{:?}", self);
        } else {
            tracing::warn!(code = self.code(), "{}", self);
        }

        let envelope = Envelope {
            code: self.code().to_owned(),
            msg: self.to_string(),
            data: self.data(),
        };

        (status, Json(envelope)).into_response()
    }
}

/// Turns a handler panic into the `Internal` envelope.
pub(crate) fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!("Handler panicked: {}", detail);

    Error::Internal.into_response()
}
