pub mod create_invoice;
pub mod delete_invoice;
pub mod get_invoice;
pub mod update_invoice;

pub use create_invoice::{
  CreateInvoiceCommand, CreateInvoiceResponse, CreateInvoiceUseCase, InvoiceItemData,
  InvoicePartyData,
};
pub use delete_invoice::{DeleteInvoiceCommand, DeleteInvoiceUseCase};
pub use get_invoice::{
  GetInvoiceQuery, GetInvoiceUseCase, InvoiceDetailsResponse, InvoiceItemDto, InvoicePartyDto,
};
pub use update_invoice::{UpdateInvoiceCommand, UpdateInvoiceUseCase};
