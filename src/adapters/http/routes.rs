use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, UpdateInvoiceUseCase,
};

use super::errors::ApiError;
use super::handlers::invoices::{
  create_invoice_handler, delete_invoice_handler, get_invoice_by_number_handler,
  get_invoice_handler, update_invoice_handler,
};

/// Use cases served by the invoice routes
#[derive(Clone)]
pub struct InvoiceRouteDependencies {
  pub create: Arc<CreateInvoiceUseCase>,
  pub update: Arc<UpdateInvoiceUseCase>,
  pub delete: Arc<DeleteInvoiceUseCase>,
  pub get: Arc<GetInvoiceUseCase>,
}

/// Configure invoice routes
///
/// Mounts the invoice endpoints under the provided scope
/// (e.g., /api/v1/invoices).
///
/// # Routes
///
/// - POST / - Create an invoice; the number is assigned by the server
/// - GET /{id} - Fetch an invoice by id
/// - PUT /{id} - Update header fields and optionally replace sub-records
/// - DELETE /{id} - Delete an invoice and everything it owns
/// - GET /number/{invoice_number} - Fetch an invoice by number
pub fn configure_invoice_routes(cfg: &mut web::ServiceConfig, deps: InvoiceRouteDependencies) {
  // Malformed bodies get the same JSON error shape as domain failures
  let json_config = web::JsonConfig::default()
    .error_handler(|err, _req| ApiError::Validation(err.to_string()).into());

  cfg
    .app_data(json_config)
    .app_data(web::Data::new(deps.create))
    .app_data(web::Data::new(deps.update))
    .app_data(web::Data::new(deps.delete))
    .app_data(web::Data::new(deps.get))
    .route("", web::post().to(create_invoice_handler))
    .route("/", web::post().to(create_invoice_handler))
    .route("/number/{invoice_number}", web::get().to(get_invoice_by_number_handler))
    .route("/{id}", web::get().to(get_invoice_handler))
    .route("/{id}", web::put().to(update_invoice_handler))
    .route("/{id}", web::delete().to(delete_invoice_handler));
}

pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
