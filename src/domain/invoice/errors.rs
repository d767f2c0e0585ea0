use std::fmt;
use thiserror::Error;

/// Why an invoice was rejected before reaching storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationReason {
  NumberRequired,
  DateRequired,
  CurrencyRequired,
  EmailRequired,
  NameRequired,
  ItemsRequired,
  InvalidIdentity,
}

impl ValidationReason {
  pub fn as_str(&self) -> &'static str {
    match self {
      ValidationReason::NumberRequired => "Invoice number is required",
      ValidationReason::DateRequired => "Date is required",
      ValidationReason::CurrencyRequired => "currency is required",
      ValidationReason::EmailRequired => "Sender|Receiver email is required",
      ValidationReason::NameRequired => "Sender|Receiver name is required",
      ValidationReason::ItemsRequired => "Invoice item(s) is required",
      ValidationReason::InvalidIdentity => "ID provided is invalid",
    }
  }
}

impl fmt::Display for ValidationReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Coarse classification handed to transports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Validation,
  NotFound,
  Conflict,
  Unavailable,
  InvalidData,
}

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("data: {0}")]
  Validation(ValidationReason),

  #[error("data: resource not found")]
  NotFound,

  #[error("data: invoice number already exists")]
  Conflict,

  #[error("data: storage unavailable")]
  Unavailable,

  #[error("data: data provided is not valid")]
  InvalidData,
}

impl InvoiceError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      InvoiceError::Validation(_) => ErrorKind::Validation,
      InvoiceError::NotFound => ErrorKind::NotFound,
      InvoiceError::Conflict => ErrorKind::Conflict,
      InvoiceError::Unavailable => ErrorKind::Unavailable,
      InvoiceError::InvalidData => ErrorKind::InvalidData,
    }
  }

  pub fn reason(&self) -> Option<ValidationReason> {
    match self {
      InvoiceError::Validation(reason) => Some(*reason),
      _ => None,
    }
  }

  /// Message safe to show to API clients. Only validation failures have one.
  pub fn public_message(&self) -> Option<String> {
    match self {
      InvoiceError::Validation(reason) => Some(title_case(reason.as_str())),
      _ => None,
    }
  }
}

impl From<ValidationReason> for InvoiceError {
  fn from(reason: ValidationReason) -> Self {
    InvoiceError::Validation(reason)
  }
}

impl From<sqlx::Error> for InvoiceError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => InvoiceError::NotFound,
      sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
        tracing::warn!(
          constraint = db_err.constraint().unwrap_or_default(),
          "Unique constraint rejected write"
        );
        InvoiceError::Conflict
      }
      sqlx::Error::Database(db_err)
        if db_err.code().is_some_and(|code| is_unavailable_code(&code)) =>
      {
        tracing::error!(
          code = db_err.code().unwrap_or_default().as_ref(),
          "Storage unavailable: {}",
          db_err.message()
        );
        InvoiceError::Unavailable
      }
      sqlx::Error::Io(_)
      | sqlx::Error::Tls(_)
      | sqlx::Error::Protocol(_)
      | sqlx::Error::WorkerCrashed
      | sqlx::Error::PoolTimedOut
      | sqlx::Error::PoolClosed => {
        tracing::error!("Storage unavailable: {}", error);
        InvoiceError::Unavailable
      }
      other => {
        tracing::error!("Storage error: {}", other);
        InvoiceError::InvalidData
      }
    }
  }
}

// SQLSTATE class 08 (connection exception), too_many_connections, and the
// admin_shutdown / crash_shutdown / cannot_connect_now operator interventions
fn is_unavailable_code(code: &str) -> bool {
  code.starts_with("08") || matches!(code, "53300" | "57P01" | "57P02" | "57P03")
}

// Upper-cases the first letter of every word, lower-cases the rest.
// Words are separated by whitespace or '|'.
fn title_case(value: &str) -> String {
  let mut result = String::with_capacity(value.len());
  let mut word_start = true;
  for c in value.chars() {
    if word_start {
      result.extend(c.to_uppercase());
    } else {
      result.extend(c.to_lowercase());
    }
    word_start = c.is_whitespace() || c == '|';
  }
  result
}
