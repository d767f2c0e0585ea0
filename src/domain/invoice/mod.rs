pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod validation;

pub use entities::{
  CustomerDetails, Invoice, InvoiceItem, PENDING_INVOICE_NUMBER, PaymentInformation, SenderDetails,
};
pub use errors::{ErrorKind, InvoiceError, ValidationReason};
pub use ports::{InvoiceNumberGenerator, InvoiceRepository};
pub use services::ValidatedInvoiceRepository;
pub use validation::{InvoiceCheck, ValidationChain, ValidationMode};
