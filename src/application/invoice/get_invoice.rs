use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{
  CustomerDetails, Invoice, InvoiceError, InvoiceItem, InvoiceRepository, PaymentInformation,
  SenderDetails,
};

/// Point lookup, by surrogate key or by invoice number
#[derive(Debug)]
pub enum GetInvoiceQuery {
  ById(i64),
  ByInvoiceNumber(String),
}

#[derive(Debug, Serialize)]
pub struct InvoicePartyDto {
  pub name: String,
  pub email: String,
  pub address: String,
  pub phone: Option<String>,
}

impl From<SenderDetails> for InvoicePartyDto {
  fn from(party: SenderDetails) -> Self {
    Self {
      name: party.name,
      email: party.email,
      address: party.address,
      phone: party.phone,
    }
  }
}

impl From<CustomerDetails> for InvoicePartyDto {
  fn from(party: CustomerDetails) -> Self {
    Self {
      name: party.name,
      email: party.email,
      address: party.address,
      phone: party.phone,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct InvoiceItemDto {
  pub id: Option<i64>,
  pub description: String,
  pub unit: String,
  pub price_per_unit: Decimal,
  pub total: Decimal,
}

impl From<InvoiceItem> for InvoiceItemDto {
  fn from(item: InvoiceItem) -> Self {
    Self {
      id: item.id,
      description: item.description,
      unit: item.unit,
      price_per_unit: item.price_per_unit,
      total: item.total,
    }
  }
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetailsResponse {
  pub id: Option<i64>,
  pub invoice_number: String,
  pub issue_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  pub billing_currency: String,
  pub sender: InvoicePartyDto,
  pub customer: InvoicePartyDto,
  pub items: Vec<InvoiceItemDto>,
  pub sub_total: Decimal,
  pub discount: Decimal,
  pub total: Decimal,
  pub payment_information: Option<PaymentInformation>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl From<Invoice> for InvoiceDetailsResponse {
  fn from(invoice: Invoice) -> Self {
    Self {
      id: invoice.id,
      invoice_number: invoice.invoice_number,
      issue_date: invoice.issue_date,
      due_date: invoice.due_date,
      billing_currency: invoice.billing_currency,
      sender: invoice.sender.into(),
      customer: invoice.customer.into(),
      items: invoice.items.into_iter().map(InvoiceItemDto::from).collect(),
      sub_total: invoice.sub_total,
      discount: invoice.discount,
      total: invoice.total,
      payment_information: invoice.payment_information,
      created_at: invoice.created_at,
      updated_at: invoice.updated_at,
    }
  }
}

pub struct GetInvoiceUseCase {
  invoices: Arc<dyn InvoiceRepository>,
}

impl GetInvoiceUseCase {
  pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoices }
  }

  pub async fn execute(&self, query: GetInvoiceQuery) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let invoice = match query {
      GetInvoiceQuery::ById(id) => self.invoices.find_by_id(id).await?,
      GetInvoiceQuery::ByInvoiceNumber(number) => {
        self.invoices.find_by_invoice_number(&number).await?
      }
    };

    Ok(invoice.into())
  }
}
