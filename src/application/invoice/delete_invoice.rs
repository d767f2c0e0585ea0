use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceRepository};

#[derive(Debug)]
pub struct DeleteInvoiceCommand {
  pub invoice_id: i64,
}

pub struct DeleteInvoiceUseCase {
  invoices: Arc<dyn InvoiceRepository>,
}

impl DeleteInvoiceUseCase {
  pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
    Self { invoices }
  }

  pub async fn execute(&self, command: DeleteInvoiceCommand) -> Result<(), InvoiceError> {
    self.invoices.delete(command.invoice_id).await
  }
}
