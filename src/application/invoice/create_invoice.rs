use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{
  CustomerDetails, Invoice, InvoiceError, InvoiceItem, InvoiceRepository, PENDING_INVOICE_NUMBER,
  PaymentInformation, SenderDetails,
};

/// Sender or customer as supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct InvoicePartyData {
  pub name: String,
  pub email: String,
  pub address: String,
  pub phone: Option<String>,
}

impl From<InvoicePartyData> for SenderDetails {
  fn from(data: InvoicePartyData) -> Self {
    SenderDetails {
      name: data.name,
      email: data.email,
      address: data.address,
      phone: data.phone,
    }
  }
}

impl From<InvoicePartyData> for CustomerDetails {
  fn from(data: InvoicePartyData) -> Self {
    CustomerDetails {
      name: data.name,
      email: data.email,
      address: data.address,
      phone: data.phone,
    }
  }
}

#[derive(Debug, Clone)]
pub struct InvoiceItemData {
  pub description: String,
  pub unit: String,
  pub price_per_unit: Decimal,
  pub total: Decimal,
}

impl From<InvoiceItemData> for InvoiceItem {
  fn from(data: InvoiceItemData) -> Self {
    InvoiceItem::new(data.description, data.unit, data.price_per_unit, data.total)
  }
}

#[derive(Debug)]
pub struct CreateInvoiceCommand {
  pub issue_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  pub billing_currency: String,
  pub sub_total: Decimal,
  pub discount: Decimal,
  pub total: Decimal,
  pub sender: InvoicePartyData,
  pub customer: InvoicePartyData,
  pub items: Vec<InvoiceItemData>,
  pub payment_information: Option<PaymentInformation>,
}

#[derive(Debug, Serialize)]
pub struct CreateInvoiceResponse {
  pub invoice_id: i64,
  pub invoice_number: String,
  pub created_at: Option<DateTime<Utc>>,
}

pub struct CreateInvoiceUseCase {
  invoices: Arc<dyn InvoiceRepository>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoices }
  }

  pub async fn execute(
    &self,
    command: CreateInvoiceCommand,
  ) -> Result<CreateInvoiceResponse, InvoiceError> {
    // The number is a placeholder; the repository assigns the real one
    let invoice = Invoice {
      invoice_number: PENDING_INVOICE_NUMBER.to_string(),
      issue_date: command.issue_date,
      due_date: command.due_date,
      billing_currency: command.billing_currency,
      sender: command.sender.into(),
      customer: command.customer.into(),
      items: command.items.into_iter().map(InvoiceItem::from).collect(),
      sub_total: command.sub_total,
      discount: command.discount,
      total: command.total,
      payment_information: command.payment_information,
      ..Invoice::default()
    };

    let created = self.invoices.create(invoice).await?;
    let invoice_id = created.id.ok_or(InvoiceError::InvalidData)?;

    Ok(CreateInvoiceResponse {
      invoice_id,
      invoice_number: created.invoice_number,
      created_at: created.created_at,
    })
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::application::invoice::tests::validated_repository;
  use crate::domain::invoice::ValidationReason;
  use chrono::TimeZone;
  use rust_decimal_macros::dec;

  pub(crate) fn create_command() -> CreateInvoiceCommand {
    CreateInvoiceCommand {
      issue_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
      due_date: Some(Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()),
      billing_currency: "EUR".to_string(),
      sub_total: dec!(250),
      discount: dec!(0),
      total: dec!(250),
      sender: InvoicePartyData {
        name: "Initech".to_string(),
        email: "accounts@initech.test".to_string(),
        address: "1 Office Park".to_string(),
        phone: None,
      },
      customer: InvoicePartyData {
        name: "Umbrella".to_string(),
        email: "payables@umbrella.test".to_string(),
        address: "9 Lab Road".to_string(),
        phone: Some("+44 20 7946 0000".to_string()),
      },
      items: vec![InvoiceItemData {
        description: "Consulting".to_string(),
        unit: "day".to_string(),
        price_per_unit: dec!(125),
        total: dec!(250),
      }],
      payment_information: None,
    }
  }

  #[tokio::test]
  async fn test_create_assigns_number_and_id() {
    let (invoices, _inner) = validated_repository();
    let use_case = CreateInvoiceUseCase::new(invoices.clone());

    let response = use_case.execute(create_command()).await.unwrap();

    assert_eq!(response.invoice_id, 1);
    assert_ne!(response.invoice_number, PENDING_INVOICE_NUMBER);
    assert!(response.invoice_number.starts_with("Invoice-"));

    let stored = invoices.find_by_id(response.invoice_id).await.unwrap();
    assert_eq!(stored.billing_currency, "EUR");
    assert_eq!(stored.customer.phone.as_deref(), Some("+44 20 7946 0000"));
    assert_eq!(stored.items[0].price_per_unit, dec!(125));
  }

  #[tokio::test]
  async fn test_create_without_items_is_rejected() {
    let (invoices, inner) = validated_repository();
    let use_case = CreateInvoiceUseCase::new(invoices);
    let mut command = create_command();
    command.items.clear();

    let err = use_case.execute(command).await.unwrap_err();

    assert_eq!(err.reason(), Some(ValidationReason::ItemsRequired));
    assert!(inner.calls().is_empty());
  }

  #[tokio::test]
  async fn test_create_reports_first_failure_only() {
    let (invoices, _inner) = validated_repository();
    let use_case = CreateInvoiceUseCase::new(invoices);
    let mut command = create_command();
    command.due_date = None;
    command.billing_currency = String::new();
    command.sender.email = String::new();

    let err = use_case.execute(command).await.unwrap_err();

    assert_eq!(err.reason(), Some(ValidationReason::DateRequired));
  }
}
