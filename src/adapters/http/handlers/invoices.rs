use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::{
  dtos::{CreateInvoiceRequest, SuccessResponse, UpdateInvoiceRequest},
  errors::ApiError,
};
use crate::application::invoice::{
  CreateInvoiceUseCase, DeleteInvoiceCommand, DeleteInvoiceUseCase, GetInvoiceQuery,
  GetInvoiceUseCase, UpdateInvoiceUseCase,
};

/// POST /api/v1/invoices
/// Body: CreateInvoiceRequest (JSON)
/// Response: CreateInvoiceResponse (JSON) with status 201
pub async fn create_invoice_handler(
  request: web::Json<CreateInvoiceRequest>,
  use_case: web::Data<Arc<CreateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let response = use_case.execute(request.into_inner().into()).await?;

  Ok(HttpResponse::Created().json(response))
}

/// GET /api/v1/invoices/{id}
pub async fn get_invoice_handler(
  path: web::Path<i64>,
  use_case: web::Data<Arc<GetInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(GetInvoiceQuery::ById(path.into_inner()))
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

/// GET /api/v1/invoices/number/{invoice_number}
pub async fn get_invoice_by_number_handler(
  path: web::Path<String>,
  use_case: web::Data<Arc<GetInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let response = use_case
    .execute(GetInvoiceQuery::ByInvoiceNumber(path.into_inner()))
    .await?;

  Ok(HttpResponse::Ok().json(response))
}

/// PUT /api/v1/invoices/{id}
/// Body: UpdateInvoiceRequest (JSON)
/// Response: InvoiceDetailsResponse (JSON)
pub async fn update_invoice_handler(
  path: web::Path<i64>,
  request: web::Json<UpdateInvoiceRequest>,
  use_case: web::Data<Arc<UpdateInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let command = request.into_inner().into_command(path.into_inner());
  let response = use_case.execute(command).await?;

  Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/v1/invoices/{id}
pub async fn delete_invoice_handler(
  path: web::Path<i64>,
  use_case: web::Data<Arc<DeleteInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteInvoiceCommand {
      invoice_id: path.into_inner(),
    })
    .await?;

  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Invoice deleted".to_string(),
  }))
}
