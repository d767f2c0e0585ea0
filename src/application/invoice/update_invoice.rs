use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::invoice::{
  InvoiceError, InvoiceItem, InvoiceRepository, PaymentInformation,
};

use super::create_invoice::{InvoiceItemData, InvoicePartyData};
use super::get_invoice::InvoiceDetailsResponse;

/// Header fields are always applied. Sub-records are only replaced when given.
#[derive(Debug)]
pub struct UpdateInvoiceCommand {
  pub invoice_id: i64,
  pub issue_date: Option<DateTime<Utc>>,
  pub due_date: Option<DateTime<Utc>>,
  pub billing_currency: String,
  pub discount: Decimal,
  pub sub_total: Option<Decimal>,
  pub total: Option<Decimal>,
  pub sender: Option<InvoicePartyData>,
  pub customer: Option<InvoicePartyData>,
  pub items: Option<Vec<InvoiceItemData>>,
  pub payment_information: Option<PaymentInformation>,
}

pub struct UpdateInvoiceUseCase {
  invoices: Arc<dyn InvoiceRepository>,
}

impl UpdateInvoiceUseCase {
  pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoices }
  }

  pub async fn execute(
    &self,
    command: UpdateInvoiceCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    let mut invoice = self.invoices.find_by_id(command.invoice_id).await?;

    invoice.issue_date = command.issue_date;
    invoice.due_date = command.due_date;
    invoice.billing_currency = command.billing_currency;
    invoice.discount = command.discount;

    if let Some(sub_total) = command.sub_total {
      invoice.sub_total = sub_total;
    }
    if let Some(total) = command.total {
      invoice.total = total;
    }
    if let Some(sender) = command.sender {
      invoice.sender = sender.into();
    }
    if let Some(customer) = command.customer {
      invoice.customer = customer.into();
    }
    if let Some(items) = command.items {
      invoice.items = items.into_iter().map(InvoiceItem::from).collect();
    }
    if let Some(payment) = command.payment_information {
      invoice.payment_information = Some(payment);
    }

    let updated = self.invoices.update(invoice).await?;
    Ok(updated.into())
  }
}
