//! API Error Type
//!
//! One error type for every JSON handler, mapped onto HTTP status codes
//! in `IntoResponse`. Domain errors convert in with their user-facing
//! message; internals are logged and replaced with a generic message so
//! nothing leaks to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use studio_content::ContentError;
use studio_leads::LeadError;
use studio_payments::PaymentError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Conflict(String),
    Unavailable(&'static str),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unavailable(_) => "UNAVAILABLE",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg.clone(),
            ApiError::Unauthorized => "Authentication required".into(),
            ApiError::Unavailable(what) => format!("{what} is not configured"),
            ApiError::Internal(_) => "An internal error occurred".into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "Internal error");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.message(),
            },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match &err {
            ContentError::NotFound(_) => ApiError::NotFound(err.user_message()),
            ContentError::Validation(_) => ApiError::BadRequest(err.user_message()),
            ContentError::RegistrationClosed(_)
            | ContentError::EventFull(_)
            | ContentError::AlreadyRegistered(_)
            | ContentError::DuplicateSlug(_) => ApiError::Conflict(err.user_message()),
            ContentError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<LeadError> for ApiError {
    fn from(err: LeadError) -> Self {
        match &err {
            LeadError::Validation(_) => ApiError::BadRequest(err.user_message()),
            LeadError::Mail(_) | LeadError::Storage(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match &err {
            PaymentError::LinkNotFound(_) => ApiError::NotFound(err.user_message().into()),
            PaymentError::WebhookSignature(_) | PaymentError::WebhookParse(_) => {
                ApiError::BadRequest("Invalid webhook payload".into())
            }
            PaymentError::DuplicateLink(_) => ApiError::Conflict(err.to_string()),
            PaymentError::InvalidAmount(_) => ApiError::BadRequest(err.user_message().into()),
            PaymentError::Config(_) => ApiError::Unavailable("Payments"),
            PaymentError::Gateway(_) | PaymentError::Storage(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
