use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::domain::invoice::{ErrorKind, InvoiceError};

use super::dtos::ErrorResponse;

const INVALID_DATA_MESSAGE: &str = "Data Provided Is Not Valid";

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Request rejected with a message safe to show (400 Bad Request)
  Validation(String),

  /// 404 Not Found
  NotFound,

  /// Invoice number collision (409 Conflict)
  Conflict,

  /// Storage unreachable (503 Service Unavailable)
  Unavailable,

  /// Storage refused the data (400 Bad Request)
  InvalidData,

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::NotFound => write!(f, "Invoice not found"),
      ApiError::Conflict => write!(f, "Invoice number already exists"),
      ApiError::Unavailable => write!(f, "Storage unavailable"),
      ApiError::InvalidData => write!(f, "{}", INVALID_DATA_MESSAGE),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound => StatusCode::NOT_FOUND,
      ApiError::Conflict => StatusCode::CONFLICT,
      ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::InvalidData => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let (error_type, message) = match self {
      ApiError::Validation(msg) => ("validation_error", msg.clone()),
      ApiError::NotFound => ("not_found", "Invoice not found".to_string()),
      ApiError::Conflict => (
        "conflict",
        "An invoice with this number already exists".to_string(),
      ),
      ApiError::Unavailable => (
        "unavailable",
        "Service temporarily unavailable, please retry".to_string(),
      ),
      ApiError::InvalidData => ("invalid_data", INVALID_DATA_MESSAGE.to_string()),
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
        )
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse {
        error: error_type.to_string(),
        message,
      })
  }
}

impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error.kind() {
      ErrorKind::Validation => match error.public_message() {
        Some(message) => ApiError::Validation(message),
        None => ApiError::Internal(error.to_string()),
      },
      ErrorKind::NotFound => ApiError::NotFound,
      ErrorKind::Conflict => ApiError::Conflict,
      ErrorKind::Unavailable => ApiError::Unavailable,
      ErrorKind::InvalidData => ApiError::InvalidData,
    }
  }
}

fn collect_messages(errors: &ValidationErrors, messages: &mut Vec<String>) {
  for (field, kind) in errors.errors() {
    match kind {
      ValidationErrorsKind::Field(field_errors) => {
        messages.extend(field_errors.iter().map(|error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", field))
        }));
      }
      ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
      ValidationErrorsKind::List(entries) => {
        for nested in entries.values() {
          collect_messages(nested, messages);
        }
      }
    }
  }
}

/// Convert validation errors from validator crate
impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self {
    let mut messages = Vec::new();
    collect_messages(&errors, &mut messages);
    messages.sort();
    messages.dedup();

    ApiError::Validation(messages.join(", "))
  }
}
