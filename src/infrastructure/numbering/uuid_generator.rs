use uuid::Uuid;

use crate::domain::invoice::ports::InvoiceNumberGenerator;

/// Prefix shared by every canonical invoice number
pub const INVOICE_NUMBER_PREFIX: &str = "Invoice-";

/// Characters kept from the hyphenated UUID (`xxxxxxxx-xxxx`)
pub const INVOICE_NUMBER_SUFFIX_LEN: usize = 13;

/// Builds invoice numbers from a fresh random v4 UUID per call.
///
/// The number is `Invoice-` followed by the first 13 characters of the
/// hyphenated UUID, which keeps 48 random bits. Uniqueness is finally
/// enforced by the `invoices.invoice_number` unique constraint.
pub struct UuidInvoiceNumberGenerator;

impl UuidInvoiceNumberGenerator {
  pub fn new() -> Self {
    Self
  }
}

impl Default for UuidInvoiceNumberGenerator {
  fn default() -> Self {
    Self::new()
  }
}

impl InvoiceNumberGenerator for UuidInvoiceNumberGenerator {
  fn generate(&self) -> String {
    let id = Uuid::new_v4().hyphenated().to_string();
    format!(
      "{}{}",
      INVOICE_NUMBER_PREFIX,
      &id[..INVOICE_NUMBER_SUFFIX_LEN]
    )
  }
}
