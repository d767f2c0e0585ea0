use async_trait::async_trait;

use super::entities::Invoice;
use super::errors::InvoiceError;

/// Persistence contract for the invoice aggregate.
///
/// Implemented both by the storage adapter and by the validating decorator
/// that wraps it, so callers cannot tell which one they hold.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
  /// Inserts the aggregate and returns it with identity and timestamps filled in
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;

  /// Replaces the aggregate stored under `invoice.id`
  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError>;

  /// Permanently removes the aggregate and everything it owns
  async fn delete(&self, id: i64) -> Result<(), InvoiceError>;

  async fn find_by_id(&self, id: i64) -> Result<Invoice, InvoiceError>;

  async fn find_by_invoice_number(&self, invoice_number: &str) -> Result<Invoice, InvoiceError>;
}

/// Source of canonical invoice numbers.
///
/// Called concurrently from every request, so implementations must not
/// rely on shared counters.
pub trait InvoiceNumberGenerator: Send + Sync {
  fn generate(&self) -> String;
}
