use async_trait::async_trait;
use std::sync::Arc;

use super::entities::Invoice;
use super::errors::InvoiceError;
use super::ports::{InvoiceNumberGenerator, InvoiceRepository};
use super::validation::{ValidationChain, ValidationMode};

/// Invoice repository that validates every mutation before delegating.
///
/// This is the only repository handed out to the rest of the application.
/// Reads go straight to the inner repository.
pub struct ValidatedInvoiceRepository {
  chain: ValidationChain,
  inner: Arc<dyn InvoiceRepository>,
}

impl ValidatedInvoiceRepository {
  pub fn new(inner: Arc<dyn InvoiceRepository>, generator: Arc<dyn InvoiceNumberGenerator>) -> Self {
    Self {
      chain: ValidationChain::new(generator),
      inner,
    }
  }
}

#[async_trait]
impl InvoiceRepository for ValidatedInvoiceRepository {
  async fn create(&self, mut invoice: Invoice) -> Result<Invoice, InvoiceError> {
    if let Err(e) = self.chain.validate(&mut invoice, ValidationMode::Create) {
      tracing::debug!("Rejected invoice create: {}", e);
      return Err(e);
    }

    let created = self.inner.create(invoice).await?;
    tracing::info!(
      invoice_id = created.id,
      invoice_number = %created.invoice_number,
      "Invoice created"
    );
    Ok(created)
  }

  async fn update(&self, mut invoice: Invoice) -> Result<Invoice, InvoiceError> {
    if let Err(e) = self.chain.validate(&mut invoice, ValidationMode::Update) {
      tracing::debug!(invoice_id = invoice.id, "Rejected invoice update: {}", e);
      return Err(e);
    }

    let updated = self.inner.update(invoice).await?;
    tracing::info!(invoice_id = updated.id, "Invoice updated");
    Ok(updated)
  }

  async fn delete(&self, id: i64) -> Result<(), InvoiceError> {
    self.chain.validate_identity(id)?;
    self.inner.delete(id).await?;
    tracing::info!(invoice_id = id, "Invoice deleted");
    Ok(())
  }

  async fn find_by_id(&self, id: i64) -> Result<Invoice, InvoiceError> {
    self.inner.find_by_id(id).await
  }

  async fn find_by_invoice_number(&self, invoice_number: &str) -> Result<Invoice, InvoiceError> {
    self.inner.find_by_invoice_number(invoice_number).await
  }
}
