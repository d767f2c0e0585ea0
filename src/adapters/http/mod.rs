pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod routes;

// Re-export commonly used types
pub use dtos::{CreateInvoiceRequest, ErrorResponse, SuccessResponse, UpdateInvoiceRequest};
pub use errors::ApiError;
pub use routes::{InvoiceRouteDependencies, configure_invoice_routes, health_check};
