//! Unified API error handling

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use uuid::Uuid;

pub const GENERIC_SERVER_ERROR: &str = "A server error occurred";

/// Standard error response format for the JSON API.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub request_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Payload is not in the expected structured format (400)
    #[error("{0}")]
    MalformedRequest(String),

    /// Unexpected fault while handling the request (500). The detail is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedRequest(_) => "malformed_request",
            ApiError::Internal(_) => "internal_error",
        }
    }

    /// Text that is safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::MalformedRequest(reason) => reason.clone(),
            ApiError::Internal(_) => GENERIC_SERVER_ERROR.to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            ApiError::MalformedRequest(reason) => {
                tracing::warn!(target: "http", error_type = self.kind(), %reason, "rejected request");
            }
            ApiError::Internal(detail) => {
                tracing::error!(target: "http", error_type = self.kind(), %detail, "request failed");
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.public_message(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

/// Runs one in-memory step of a handler, turning a panic into [`ApiError::Internal`].
pub fn guarded<T>(step: &'static str, f: impl FnOnce() -> T) -> Result<T, ApiError> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| ApiError::Internal(format!("{step} panicked: {}", panic_text(&*payload))))
}

fn panic_text(payload: &(dyn Any + Send)) -> &str {
    if let Some(text) = payload.downcast_ref::<&str>() {
        text
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.as_str()
    } else {
        "unknown panic"
    }
}
