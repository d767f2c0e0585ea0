use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::application::invoice::{
  CreateInvoiceCommand, InvoiceItemData, InvoicePartyData, UpdateInvoiceCommand,
};
use crate::domain::invoice::PaymentInformation;

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
  if *value < Decimal::ZERO {
    return Err(
      ValidationError::new("non_negative")
        .with_message(Cow::Borrowed("Amounts must not be negative")),
    );
  }
  Ok(())
}

/// Sender or customer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoicePartyRequest {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub address: String,
  pub phone: Option<String>,
}

impl From<InvoicePartyRequest> for InvoicePartyData {
  fn from(request: InvoicePartyRequest) -> Self {
    InvoicePartyData {
      name: request.name,
      email: request.email,
      address: request.address,
      phone: request.phone,
    }
  }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceItemRequest {
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub unit: String,
  #[validate(custom(function = "non_negative"))]
  pub price_per_unit: Decimal,
  #[validate(custom(function = "non_negative"))]
  pub total: Decimal,
}

impl From<InvoiceItemRequest> for InvoiceItemData {
  fn from(request: InvoiceItemRequest) -> Self {
    InvoiceItemData {
      description: request.description,
      unit: request.unit,
      price_per_unit: request.price_per_unit,
      total: request.total,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentInformationRequest {
  pub account_name: Option<String>,
  pub account_no: Option<String>,
  pub routing_no: Option<String>,
  pub bank_name: Option<String>,
  pub address: Option<String>,
}

impl From<PaymentInformationRequest> for PaymentInformation {
  fn from(request: PaymentInformationRequest) -> Self {
    PaymentInformation {
      account_name: request.account_name,
      account_no: request.account_no,
      routing_no: request.routing_no,
      bank_name: request.bank_name,
      address: request.address,
    }
  }
}

/// Body of `POST /api/v1/invoices`.
///
/// Missing text fields deserialize as empty so the domain can report which
/// one is required.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
  pub issue_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub billing_currency: String,
  #[serde(default)]
  #[validate(custom(function = "non_negative"))]
  pub sub_total: Decimal,
  #[serde(default)]
  #[validate(custom(function = "non_negative"))]
  pub discount: Decimal,
  #[serde(default)]
  #[validate(custom(function = "non_negative"))]
  pub total: Decimal,
  #[serde(default)]
  pub sender: InvoicePartyRequest,
  #[serde(default)]
  pub customer: InvoicePartyRequest,
  #[serde(default)]
  #[validate(nested)]
  pub items: Vec<InvoiceItemRequest>,
  pub payment_information: Option<PaymentInformationRequest>,
}

impl From<CreateInvoiceRequest> for CreateInvoiceCommand {
  fn from(request: CreateInvoiceRequest) -> Self {
    CreateInvoiceCommand {
      issue_date: request.issue_date,
      due_date: request.due_date,
      billing_currency: request.billing_currency,
      sub_total: request.sub_total,
      discount: request.discount,
      total: request.total,
      sender: request.sender.into(),
      customer: request.customer.into(),
      items: request.items.into_iter().map(InvoiceItemData::from).collect(),
      payment_information: request.payment_information.map(PaymentInformation::from),
    }
  }
}

/// Body of `PUT /api/v1/invoices/{id}`. Omitted sub-records are left as stored.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
  pub issue_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  #[serde(default)]
  pub billing_currency: String,
  #[serde(default)]
  #[validate(custom(function = "non_negative"))]
  pub discount: Decimal,
  #[validate(custom(function = "non_negative"))]
  pub sub_total: Option<Decimal>,
  #[validate(custom(function = "non_negative"))]
  pub total: Option<Decimal>,
  pub sender: Option<InvoicePartyRequest>,
  pub customer: Option<InvoicePartyRequest>,
  #[validate(nested)]
  pub items: Option<Vec<InvoiceItemRequest>>,
  pub payment_information: Option<PaymentInformationRequest>,
}

impl UpdateInvoiceRequest {
  pub fn into_command(self, invoice_id: i64) -> UpdateInvoiceCommand {
    UpdateInvoiceCommand {
      invoice_id,
      issue_date: self.issue_date,
      due_date: self.due_date,
      billing_currency: self.billing_currency,
      discount: self.discount,
      sub_total: self.sub_total,
      total: self.total,
      sender: self.sender.map(InvoicePartyData::from),
      customer: self.customer.map(InvoicePartyData::from),
      items: self
        .items
        .map(|items| items.into_iter().map(InvoiceItemData::from).collect()),
      payment_information: self.payment_information.map(PaymentInformation::from),
    }
  }
}

/// Success response for mutations without a body of their own
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,
}
