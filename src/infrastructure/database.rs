use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::invoice::{InvoiceRepository, ValidatedInvoiceRepository};
use crate::infrastructure::config::DatabaseConfig;
use crate::infrastructure::numbering::UuidInvoiceNumberGenerator;
use crate::infrastructure::persistence::postgres::PostgresInvoiceRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

// Child tables first so the drop never trips over a foreign key
const MANAGED_TABLES: &[&str] = &[
  "payment_information",
  "invoice_items",
  "customer_details",
  "sender_details",
  "invoices",
  "_sqlx_migrations",
];

/// Errors raised while opening, migrating or resetting the database
#[derive(Debug, Error)]
pub enum DatabaseError {
  #[error("Database connection timed out after {0} seconds")]
  ConnectTimeout(u64),

  #[error("Could not connect to database: {0}")]
  Connect(#[source] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migrate(#[from] MigrateError),

  #[error("Database error: {0}")]
  Query(#[from] sqlx::Error),
}

/// Owns the connection pool and hands out the validated invoice repository.
///
/// The storage adapter is never exposed on its own, so every mutation goes
/// through the validation chain.
pub struct InvoiceService {
  pool: PgPool,
  invoices: Arc<dyn InvoiceRepository>,
}

impl InvoiceService {
  /// Opens a pool against the configured database
  pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
    tracing::info!("Connecting to database: {}", config.display_target());

    let pool = tokio::time::timeout(
      Duration::from_secs(config.connect_timeout_seconds),
      PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .connect_with(config.connect_options()),
    )
    .await
    .map_err(|_| DatabaseError::ConnectTimeout(config.connect_timeout_seconds))?
    .map_err(DatabaseError::Connect)?;

    tracing::info!("Database connection pool created");
    Ok(Self::from_pool(pool))
  }

  pub fn from_pool(pool: PgPool) -> Self {
    let storage = Arc::new(PostgresInvoiceRepository::new(pool.clone()));
    let invoices = Arc::new(ValidatedInvoiceRepository::new(
      storage,
      Arc::new(UuidInvoiceNumberGenerator::new()),
    ));

    Self { pool, invoices }
  }

  pub fn invoices(&self) -> Arc<dyn InvoiceRepository> {
    self.invoices.clone()
  }

  /// Brings the schema up to date. Safe to run on every startup.
  pub async fn migrate(&self) -> Result<(), DatabaseError> {
    tracing::info!("Running database migrations");
    MIGRATOR.run(&self.pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
  }

  /// Drops every managed table and rebuilds the schema. All data is lost.
  pub async fn destructive_reset(&self) -> Result<(), DatabaseError> {
    tracing::warn!("Dropping all invoice tables");

    let mut tx = self.pool.begin().await?;
    for table in MANAGED_TABLES {
      sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    self.migrate().await
  }

  /// Waits for checked-out connections to be returned, then closes the pool
  pub async fn close(&self) {
    self.pool.close().await;
    tracing::info!("Database connection pool closed");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{InvoiceError, ValidationReason};
  use crate::domain::invoice::validation::tests::valid_invoice;
  use crate::infrastructure::persistence::postgres::invoice_repository::tests::{
    count_rows, setup_test_db,
  };
  use regex::Regex;
  use rust_decimal_macros::dec;

  async fn total_invoices(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
      .fetch_one(pool)
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_migrate_is_idempotent() {
    let (pool, _container) = setup_test_db().await;
    let service = InvoiceService::from_pool(pool);

    service.migrate().await.unwrap();
    service.migrate().await.unwrap();
  }

  #[tokio::test]
  async fn test_create_without_dates_writes_nothing() {
    let (pool, _container) = setup_test_db().await;
    let service = InvoiceService::from_pool(pool.clone());

    let mut invoice = valid_invoice();
    invoice.issue_date = None;
    invoice.due_date = None;
    invoice.billing_currency = String::new();

    let err = service.invoices().create(invoice).await.unwrap_err();

    assert_eq!(err.reason(), Some(ValidationReason::DateRequired));
    assert_eq!(total_invoices(&pool).await, 0);
  }

  #[tokio::test]
  async fn test_create_update_lifecycle() {
    let (pool, _container) = setup_test_db().await;
    let service = InvoiceService::from_pool(pool);
    let invoices = service.invoices();
    let pattern = Regex::new(r"^Invoice-.{13}$").unwrap();

    let created = invoices.create(valid_invoice()).await.unwrap();
    assert!(pattern.is_match(&created.invoice_number));

    let id = created.id.unwrap();
    let found = invoices.find_by_id(id).await.unwrap();
    assert_eq!(found.invoice_number, created.invoice_number);
    assert_eq!(found.billing_currency, "USD");
    assert_eq!(found.items.len(), 1);

    let second = invoices.create(valid_invoice()).await.unwrap();
    assert_ne!(second.invoice_number, created.invoice_number);

    let mut changed = found.clone();
    changed.discount = dec!(10);
    changed.invoice_number = "Invoice-changed-by-me".to_string();
    invoices.update(changed).await.unwrap();

    let reloaded = invoices.find_by_id(id).await.unwrap();
    assert_eq!(reloaded.discount, dec!(10));
    assert_eq!(reloaded.invoice_number, created.invoice_number);
    assert_eq!(
      invoices
        .find_by_invoice_number(&created.invoice_number)
        .await
        .unwrap()
        .id,
      Some(id)
    );
  }

  #[tokio::test]
  async fn test_delete_guard_and_cascade() {
    let (pool, _container) = setup_test_db().await;
    let service = InvoiceService::from_pool(pool.clone());
    let invoices = service.invoices();

    let id = invoices.create(valid_invoice()).await.unwrap().id.unwrap();

    for bad_id in [0, -5] {
      let err = invoices.delete(bad_id).await.unwrap_err();
      assert_eq!(err.reason(), Some(ValidationReason::InvalidIdentity));
    }
    assert_eq!(total_invoices(&pool).await, 1);

    invoices.delete(id).await.unwrap();
    assert_eq!(count_rows(&pool, "invoice_items", id).await, 0);
    assert_eq!(count_rows(&pool, "sender_details", id).await, 0);
    assert!(matches!(
      invoices.find_by_id(id).await,
      Err(InvoiceError::NotFound)
    ));
    assert!(matches!(
      invoices.find_by_invoice_number("Invoice-nope").await,
      Err(InvoiceError::NotFound)
    ));
  }

  #[tokio::test]
  async fn test_destructive_reset_empties_tables() {
    let (pool, _container) = setup_test_db().await;
    let service = InvoiceService::from_pool(pool.clone());
    service.invoices().create(valid_invoice()).await.unwrap();

    service.destructive_reset().await.unwrap();

    assert_eq!(total_invoices(&pool).await, 0);
    service.invoices().create(valid_invoice()).await.unwrap();
    assert_eq!(total_invoices(&pool).await, 1);
  }

  #[tokio::test]
  async fn test_close_releases_pool() {
    let (pool, _container) = setup_test_db().await;
    let service = InvoiceService::from_pool(pool.clone());

    service.close().await;

    assert!(pool.is_closed());
    assert!(matches!(
      service.invoices().find_by_id(1).await,
      Err(InvoiceError::Unavailable)
    ));
  }
}
