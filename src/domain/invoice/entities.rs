use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Marker carried by a freshly built invoice until the validation chain
/// replaces it with a canonical number.
pub const PENDING_INVOICE_NUMBER: &str = "pending";

// Invoice - Aggregate root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
  /// Surrogate key, assigned by storage on first persist
  pub id: Option<i64>,
  pub invoice_number: String,
  pub issue_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  pub billing_currency: String,
  pub sender: SenderDetails,
  pub customer: CustomerDetails,
  pub items: Vec<InvoiceItem>,
  pub sub_total: Decimal,
  pub discount: Decimal,
  pub total: Decimal,
  pub payment_information: Option<PaymentInformation>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl Invoice {
  pub fn new(
    issue_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    billing_currency: String,
    sender: SenderDetails,
    customer: CustomerDetails,
  ) -> Self {
    Self {
      id: None,
      invoice_number: PENDING_INVOICE_NUMBER.to_string(),
      issue_date: Some(issue_date),
      due_date: Some(due_date),
      billing_currency,
      sender,
      customer,
      items: Vec::new(),
      sub_total: Decimal::ZERO,
      discount: Decimal::ZERO,
      total: Decimal::ZERO,
      payment_information: None,
      created_at: None,
      updated_at: None,
    }
  }

  #[cfg(test)]
  pub(crate) fn with_item(mut self, item: InvoiceItem) -> Self {
    self.items.push(item);
    self
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SenderDetails {
  pub name: String,
  pub email: String,
  pub address: String,
  pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDetails {
  pub name: String,
  pub email: String,
  pub address: String,
  pub phone: Option<String>,
}

// Invoice Item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
  pub id: Option<i64>,
  pub description: String,
  pub unit: String,
  pub price_per_unit: Decimal,
  pub total: Decimal,
}

impl InvoiceItem {
  pub fn new(description: String, unit: String, price_per_unit: Decimal, total: Decimal) -> Self {
    Self {
      id: None,
      description,
      unit,
      price_per_unit,
      total,
    }
  }
}

/// Bank details printed on the invoice. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInformation {
  pub account_name: Option<String>,
  pub account_no: Option<String>,
  pub routing_no: Option<String>,
  pub bank_name: Option<String>,
  pub address: Option<String>,
}
