use std::sync::Arc;

use super::entities::Invoice;
use super::errors::{InvoiceError, ValidationReason};
use super::ports::InvoiceNumberGenerator;

/// Which mutation the invoice is being validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
  Create,
  Update,
}

/// A single invariant check. `AssignNumber` is the only one that mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceCheck {
  AssignNumber,
  Dates,
  Currency,
  Emails,
  Names,
  Items,
}

const CREATE_CHECKS: &[InvoiceCheck] = &[
  InvoiceCheck::AssignNumber,
  InvoiceCheck::Dates,
  InvoiceCheck::Currency,
  InvoiceCheck::Emails,
  InvoiceCheck::Names,
  InvoiceCheck::Items,
];

// The number is fixed once created
const UPDATE_CHECKS: &[InvoiceCheck] = &[
  InvoiceCheck::Dates,
  InvoiceCheck::Currency,
  InvoiceCheck::Emails,
  InvoiceCheck::Names,
  InvoiceCheck::Items,
];

impl ValidationMode {
  pub fn checks(&self) -> &'static [InvoiceCheck] {
    match self {
      ValidationMode::Create => CREATE_CHECKS,
      ValidationMode::Update => UPDATE_CHECKS,
    }
  }
}

/// Ordered invariant checks run before an invoice is written.
///
/// The first failing check wins and no later check runs. Holds no per-call
/// state, so one chain is shared by every request.
#[derive(Clone)]
pub struct ValidationChain {
  generator: Arc<dyn InvoiceNumberGenerator>,
}

impl ValidationChain {
  pub fn new(generator: Arc<dyn InvoiceNumberGenerator>) -> Self {
    Self { generator }
  }

  pub fn validate(&self, invoice: &mut Invoice, mode: ValidationMode) -> Result<(), InvoiceError> {
    for check in mode.checks() {
      self.run(*check, invoice)?;
    }
    Ok(())
  }

  /// Identity guard for delete
  pub fn validate_identity(&self, id: i64) -> Result<(), InvoiceError> {
    if id <= 0 {
      return Err(ValidationReason::InvalidIdentity.into());
    }
    Ok(())
  }

  fn run(&self, check: InvoiceCheck, invoice: &mut Invoice) -> Result<(), InvoiceError> {
    match check {
      InvoiceCheck::AssignNumber => {
        if invoice.invoice_number.is_empty() {
          return Err(ValidationReason::NumberRequired.into());
        }
        invoice.invoice_number = self.generator.generate();
      }
      InvoiceCheck::Dates => {
        if invoice.issue_date.is_none() || invoice.due_date.is_none() {
          return Err(ValidationReason::DateRequired.into());
        }
      }
      InvoiceCheck::Currency => {
        if invoice.billing_currency.is_empty() {
          return Err(ValidationReason::CurrencyRequired.into());
        }
      }
      InvoiceCheck::Emails => {
        if invoice.sender.email.is_empty() || invoice.customer.email.is_empty() {
          return Err(ValidationReason::EmailRequired.into());
        }
      }
      InvoiceCheck::Names => {
        if invoice.sender.name.is_empty() || invoice.customer.name.is_empty() {
          return Err(ValidationReason::NameRequired.into());
        }
      }
      InvoiceCheck::Items => {
        if invoice.items.is_empty() {
          return Err(ValidationReason::ItemsRequired.into());
        }
      }
    }
    Ok(())
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::domain::invoice::entities::{CustomerDetails, InvoiceItem, SenderDetails};
  use chrono::{TimeZone, Utc};
  use rust_decimal_macros::dec;
  use std::sync::atomic::{AtomicUsize, Ordering};

  /// Hands out zero-padded sequential numbers with the canonical shape
  pub(crate) struct SequenceGenerator(AtomicUsize);

  impl SequenceGenerator {
    pub(crate) fn new() -> Self {
      Self(AtomicUsize::new(0))
    }

    pub(crate) fn calls(&self) -> usize {
      self.0.load(Ordering::SeqCst)
    }
  }

  impl InvoiceNumberGenerator for SequenceGenerator {
    fn generate(&self) -> String {
      let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
      format!("Invoice-{:013}", n)
    }
  }

  pub(crate) fn valid_invoice() -> Invoice {
    Invoice::new(
      Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
      Utc.with_ymd_and_hms(2024, 2, 14, 9, 0, 0).unwrap(),
      "USD".to_string(),
      SenderDetails {
        name: "Acme Ltd".to_string(),
        email: "billing@acme.test".to_string(),
        address: "1 Main St".to_string(),
        phone: None,
      },
      CustomerDetails {
        name: "Globex".to_string(),
        email: "ap@globex.test".to_string(),
        address: "9 Side Rd".to_string(),
        phone: Some("+1 555 0100".to_string()),
      },
    )
    .with_item(InvoiceItem::new(
      "Design work".to_string(),
      "hour".to_string(),
      dec!(100),
      dec!(300),
    ))
  }

  fn chain() -> (ValidationChain, Arc<SequenceGenerator>) {
    let generator = Arc::new(SequenceGenerator::new());
    (ValidationChain::new(generator.clone()), generator)
  }

  fn reason(result: Result<(), InvoiceError>) -> ValidationReason {
    result
      .expect_err("expected validation to fail")
      .reason()
      .expect("expected a validation reason")
  }

  #[test]
  fn test_create_assigns_number() {
    let (chain, _) = chain();
    let mut invoice = valid_invoice();

    chain.validate(&mut invoice, ValidationMode::Create).unwrap();

    assert_eq!(invoice.invoice_number, "Invoice-0000000000001");
  }

  #[test]
  fn test_create_replaces_caller_supplied_number() {
    let (chain, _) = chain();
    let mut invoice = valid_invoice();
    invoice.invoice_number = "INV-2024-001".to_string();

    chain.validate(&mut invoice, ValidationMode::Create).unwrap();

    assert_eq!(invoice.invoice_number, "Invoice-0000000000001");
  }

  #[test]
  fn test_create_requires_number_marker() {
    let (chain, generator) = chain();
    let mut invoice = valid_invoice();
    invoice.invoice_number = String::new();

    let result = chain.validate(&mut invoice, ValidationMode::Create);

    assert_eq!(reason(result), ValidationReason::NumberRequired);
    assert_eq!(generator.calls(), 0);
  }

  #[test]
  fn test_uninitialized_invoice_fails_on_number_first() {
    let (chain, _) = chain();
    let mut invoice = Invoice::default();

    let result = chain.validate(&mut invoice, ValidationMode::Create);

    assert_eq!(reason(result), ValidationReason::NumberRequired);
  }

  #[test]
  fn test_missing_dates_fail_before_missing_currency() {
    let (chain, _) = chain();
    let mut invoice = valid_invoice();
    invoice.issue_date = None;
    invoice.due_date = None;
    invoice.billing_currency = String::new();

    let result = chain.validate(&mut invoice, ValidationMode::Create);

    assert_eq!(reason(result), ValidationReason::DateRequired);
  }

  #[test]
  fn test_single_missing_date_fails() {
    let (chain, _) = chain();
    let mut invoice = valid_invoice();
    invoice.due_date = None;

    let result = chain.validate(&mut invoice, ValidationMode::Update);

    assert_eq!(reason(result), ValidationReason::DateRequired);
  }

  #[test]
  fn test_check_order() {
    let (chain, _) = chain();

    let mut invoice = valid_invoice();
    invoice.billing_currency = String::new();
    invoice.sender.email = String::new();
    assert_eq!(
      reason(chain.validate(&mut invoice, ValidationMode::Create)),
      ValidationReason::CurrencyRequired
    );

    let mut invoice = valid_invoice();
    invoice.customer.email = String::new();
    invoice.customer.name = String::new();
    assert_eq!(
      reason(chain.validate(&mut invoice, ValidationMode::Create)),
      ValidationReason::EmailRequired
    );

    let mut invoice = valid_invoice();
    invoice.sender.name = String::new();
    invoice.items.clear();
    assert_eq!(
      reason(chain.validate(&mut invoice, ValidationMode::Create)),
      ValidationReason::NameRequired
    );

    let mut invoice = valid_invoice();
    invoice.items.clear();
    assert_eq!(
      reason(chain.validate(&mut invoice, ValidationMode::Create)),
      ValidationReason::ItemsRequired
    );
  }

  #[test]
  fn test_update_never_touches_number() {
    let (chain, generator) = chain();
    let mut invoice = valid_invoice();
    invoice.invoice_number = "Invoice-abcdef12-3456".to_string();

    chain.validate(&mut invoice, ValidationMode::Update).unwrap();

    assert_eq!(invoice.invoice_number, "Invoice-abcdef12-3456");
    assert_eq!(generator.calls(), 0);
  }

  #[test]
  fn test_update_accepts_empty_number() {
    let (chain, _) = chain();
    let mut invoice = valid_invoice();
    invoice.invoice_number = String::new();

    assert!(chain.validate(&mut invoice, ValidationMode::Update).is_ok());
  }

  #[test]
  fn test_validate_identity() {
    let (chain, _) = chain();

    assert_eq!(
      reason(chain.validate_identity(0)),
      ValidationReason::InvalidIdentity
    );
    assert_eq!(
      reason(chain.validate_identity(-5)),
      ValidationReason::InvalidIdentity
    );
    assert!(chain.validate_identity(1).is_ok());
  }

  #[test]
  fn test_mode_checks() {
    assert_eq!(ValidationMode::Create.checks()[0], InvoiceCheck::AssignNumber);
    assert!(
      !ValidationMode::Update
        .checks()
        .contains(&InvoiceCheck::AssignNumber)
    );
    assert_eq!(
      &ValidationMode::Create.checks()[1..],
      ValidationMode::Update.checks()
    );
  }
}
