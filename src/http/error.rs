//! HTTP error mapping.
//!
//! Every failure leaves the API as `{"error": "<message>"}` with a status
//! code chosen by error kind.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::error::Error;

/// Error returned by HTTP handlers.
#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    Forbidden(String),
    NotFound(String),
    GatewayTimeout(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::GatewayTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn into_message(self) -> String {
        match self {
            Self::BadRequest(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::GatewayTimeout(m)
            | Self::Internal(m) => m,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.into_message();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        }
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(m) => Self::BadRequest(m),
            Error::NotFound(m) => Self::NotFound(m),
            Error::PathTraversal { .. } => Self::Forbidden(err.to_string()),
            Error::Timeout { .. } => Self::GatewayTimeout(err.to_string()),
            // Storage errors keep their source chain in the log, not the body.
            Error::StorageUnavailable { ref source, .. } => {
                error!(error = %err, cause = %source, "Storage failure");
                Self::Internal(err.to_string())
            },
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}
