use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use numeris::{
  adapters::http::{InvoiceRouteDependencies, configure_invoice_routes, health_check},
  application::invoice::{
    CreateInvoiceUseCase, DeleteInvoiceUseCase, GetInvoiceUseCase, UpdateInvoiceUseCase,
  },
  infrastructure::{
    config::{Config, LogConfig},
    database::InvoiceService,
  },
};

/// RUST_LOG wins over the configured level. Logs go to the configured file,
/// or stderr when none is set.
fn init_tracing(log: &LogConfig) -> std::io::Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log.level.as_str().into());

  let (file_layer, stderr_layer) = match &log.file {
    Some(path) => {
      let file = OpenOptions::new().create(true).append(true).open(path)?;
      let layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file));
      (Some(layer), None)
    }
    None => (
      None,
      Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
    ),
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(file_layer)
    .with(stderr_layer)
    .init();
  Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  let config = Config::load().context("Failed to load configuration")?;

  init_tracing(&config.log).context("Failed to open log file")?;
  tracing::info!("Starting Numeris invoice service");

  let service = InvoiceService::connect(&config.database)
    .await
    .inspect_err(|e| tracing::error!("{}. Is PostgreSQL running?", e))
    .context("Failed to open database")?;

  if let Err(e) = service.migrate().await {
    tracing::error!("{}", e);
    service.close().await;
    return Err(e).context("Failed to run database migrations");
  }

  let invoices = service.invoices();
  let routes = InvoiceRouteDependencies {
    create: Arc::new(CreateInvoiceUseCase::new(invoices.clone())),
    update: Arc::new(UpdateInvoiceUseCase::new(invoices.clone())),
    delete: Arc::new(DeleteInvoiceUseCase::new(invoices.clone())),
    get: Arc::new(GetInvoiceUseCase::new(invoices)),
  };

  let server_host = config.server.host.clone();
  let server_port = config.server.port;
  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  let result = match HttpServer::new(move || {
    let routes = routes.clone();
    App::new()
      .wrap(Logger::default())
      .service(
        web::scope("/api/v1/invoices").configure(move |cfg| configure_invoice_routes(cfg, routes)),
      )
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))
  {
    Ok(server) => server.run().await,
    Err(e) => Err(e),
  };

  tracing::info!("Shutting down");
  service.close().await;
  result.context("HTTP server failed")
}
