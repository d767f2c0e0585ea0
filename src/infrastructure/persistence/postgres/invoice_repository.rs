use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::domain::invoice::{
  CustomerDetails, Invoice, InvoiceItem, PaymentInformation, SenderDetails, errors::InvoiceError,
  ports::InvoiceRepository,
};

const SENDER_TABLE: &str = "sender_details";
const CUSTOMER_TABLE: &str = "customer_details";

#[derive(Debug, FromRow)]
struct InvoiceRow {
  id: i64,
  invoice_number: String,
  issue_date: DateTime<Utc>,
  due_date: DateTime<Utc>,
  billing_currency: String,
  sub_total: Decimal,
  discount: Decimal,
  total: Decimal,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

/// Row shape shared by `sender_details` and `customer_details`
#[derive(Debug, FromRow)]
struct PartyRow {
  name: String,
  email: String,
  address: String,
  phone: Option<String>,
}

impl From<PartyRow> for SenderDetails {
  fn from(row: PartyRow) -> Self {
    SenderDetails {
      name: row.name,
      email: row.email,
      address: row.address,
      phone: row.phone,
    }
  }
}

impl From<PartyRow> for CustomerDetails {
  fn from(row: PartyRow) -> Self {
    CustomerDetails {
      name: row.name,
      email: row.email,
      address: row.address,
      phone: row.phone,
    }
  }
}

#[derive(Debug, FromRow)]
struct ItemRow {
  id: i64,
  description: String,
  unit: String,
  price_per_unit: Decimal,
  total: Decimal,
}

impl From<ItemRow> for InvoiceItem {
  fn from(row: ItemRow) -> Self {
    InvoiceItem {
      id: Some(row.id),
      description: row.description,
      unit: row.unit,
      price_per_unit: row.price_per_unit,
      total: row.total,
    }
  }
}

#[derive(Debug, FromRow)]
struct PaymentRow {
  account_name: Option<String>,
  account_no: Option<String>,
  routing_no: Option<String>,
  bank_name: Option<String>,
  address: Option<String>,
}

impl From<PaymentRow> for PaymentInformation {
  fn from(row: PaymentRow) -> Self {
    PaymentInformation {
      account_name: row.account_name,
      account_no: row.account_no,
      routing_no: row.routing_no,
      bank_name: row.bank_name,
      address: row.address,
    }
  }
}

/// PostgreSQL storage for the invoice aggregate.
///
/// Performs no validation. Every write runs in a single transaction, so an
/// invoice is stored with all of its owned rows or not at all.
pub struct PostgresInvoiceRepository {
  pool: PgPool,
}

impl PostgresInvoiceRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  async fn load(conn: &mut PgConnection, row: InvoiceRow) -> Result<Invoice, InvoiceError> {
    let sender = Self::load_party(conn, SENDER_TABLE, row.id).await?;
    let customer = Self::load_party(conn, CUSTOMER_TABLE, row.id).await?;

    let items = sqlx::query_as::<_, ItemRow>(
      r#"
      SELECT id, description, unit, price_per_unit, total
      FROM invoice_items
      WHERE invoice_id = $1
      ORDER BY id ASC
      "#,
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await?;

    let payment = sqlx::query_as::<_, PaymentRow>(
      r#"
      SELECT account_name, account_no, routing_no, bank_name, address
      FROM payment_information
      WHERE invoice_id = $1
      "#,
    )
    .bind(row.id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(Invoice {
      id: Some(row.id),
      invoice_number: row.invoice_number,
      issue_date: Some(row.issue_date),
      due_date: Some(row.due_date),
      billing_currency: row.billing_currency,
      sender: sender.into(),
      customer: customer.into(),
      items: items.into_iter().map(InvoiceItem::from).collect(),
      sub_total: row.sub_total,
      discount: row.discount,
      total: row.total,
      payment_information: payment.map(PaymentInformation::from),
      created_at: Some(row.created_at),
      updated_at: Some(row.updated_at),
    })
  }

  async fn load_party(
    conn: &mut PgConnection,
    table: &str,
    invoice_id: i64,
  ) -> Result<PartyRow, InvoiceError> {
    let row = sqlx::query_as::<_, PartyRow>(&format!(
      "SELECT name, email, address, phone FROM {} WHERE invoice_id = $1",
      table
    ))
    .bind(invoice_id)
    .fetch_optional(&mut *conn)
    .await?;

    // A header without its party row is a broken aggregate, not a missing one
    row.ok_or_else(|| {
      tracing::error!(invoice_id, table, "Invoice is missing an owned row");
      InvoiceError::InvalidData
    })
  }

  async fn insert_party(
    conn: &mut PgConnection,
    table: &str,
    invoice_id: i64,
    name: &str,
    email: &str,
    address: &str,
    phone: Option<&str>,
  ) -> Result<(), InvoiceError> {
    sqlx::query(&format!(
      "INSERT INTO {} (invoice_id, name, email, address, phone) VALUES ($1, $2, $3, $4, $5)",
      table
    ))
    .bind(invoice_id)
    .bind(name)
    .bind(email)
    .bind(address)
    .bind(phone)
    .execute(&mut *conn)
    .await?;

    Ok(())
  }

  async fn insert_owned(
    conn: &mut PgConnection,
    invoice_id: i64,
    invoice: &Invoice,
  ) -> Result<(), InvoiceError> {
    let sender = &invoice.sender;
    Self::insert_party(
      conn,
      SENDER_TABLE,
      invoice_id,
      &sender.name,
      &sender.email,
      &sender.address,
      sender.phone.as_deref(),
    )
    .await?;

    let customer = &invoice.customer;
    Self::insert_party(
      conn,
      CUSTOMER_TABLE,
      invoice_id,
      &customer.name,
      &customer.email,
      &customer.address,
      customer.phone.as_deref(),
    )
    .await?;

    for item in &invoice.items {
      sqlx::query(
        r#"
        INSERT INTO invoice_items (invoice_id, description, unit, price_per_unit, total)
        VALUES ($1, $2, $3, $4, $5)
        "#,
      )
      .bind(invoice_id)
      .bind(&item.description)
      .bind(&item.unit)
      .bind(item.price_per_unit)
      .bind(item.total)
      .execute(&mut *conn)
      .await?;
    }

    if let Some(payment) = &invoice.payment_information {
      sqlx::query(
        r#"
        INSERT INTO payment_information (
            invoice_id, account_name, account_no, routing_no, bank_name, address
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
      )
      .bind(invoice_id)
      .bind(&payment.account_name)
      .bind(&payment.account_no)
      .bind(&payment.routing_no)
      .bind(&payment.bank_name)
      .bind(&payment.address)
      .execute(&mut *conn)
      .await?;
    }

    Ok(())
  }

  async fn delete_owned(conn: &mut PgConnection, invoice_id: i64) -> Result<(), InvoiceError> {
    for table in [
      SENDER_TABLE,
      CUSTOMER_TABLE,
      "invoice_items",
      "payment_information",
    ] {
      sqlx::query(&format!("DELETE FROM {} WHERE invoice_id = $1", table))
        .bind(invoice_id)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
  }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
  async fn create(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let mut tx = self.pool.begin().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
      INSERT INTO invoices (
          invoice_number, issue_date, due_date, billing_currency,
          sub_total, discount, total
      )
      VALUES ($1, $2, $3, $4, $5, $6, $7)
      RETURNING id, invoice_number, issue_date, due_date, billing_currency,
                sub_total, discount, total, created_at, updated_at
      "#,
    )
    .bind(&invoice.invoice_number)
    .bind(invoice.issue_date)
    .bind(invoice.due_date)
    .bind(&invoice.billing_currency)
    .bind(invoice.sub_total)
    .bind(invoice.discount)
    .bind(invoice.total)
    .fetch_one(&mut *tx)
    .await?;

    Self::insert_owned(&mut *tx, row.id, &invoice).await?;

    // Read back on the same transaction so the result commits with the write
    let stored = Self::load(&mut *tx, row).await?;
    tx.commit().await?;

    Ok(stored)
  }

  async fn update(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    let id = invoice.id.ok_or(InvoiceError::NotFound)?;
    let mut tx = self.pool.begin().await?;

    // invoice_number is immutable once created
    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
      UPDATE invoices
      SET issue_date = $2, due_date = $3, billing_currency = $4,
          sub_total = $5, discount = $6, total = $7, updated_at = NOW()
      WHERE id = $1
      RETURNING id, invoice_number, issue_date, due_date, billing_currency,
                sub_total, discount, total, created_at, updated_at
      "#,
    )
    .bind(id)
    .bind(invoice.issue_date)
    .bind(invoice.due_date)
    .bind(&invoice.billing_currency)
    .bind(invoice.sub_total)
    .bind(invoice.discount)
    .bind(invoice.total)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(InvoiceError::NotFound)?;

    Self::delete_owned(&mut *tx, id).await?;
    Self::insert_owned(&mut *tx, id, &invoice).await?;

    let stored = Self::load(&mut *tx, row).await?;
    tx.commit().await?;

    Ok(stored)
  }

  async fn delete(&self, id: i64) -> Result<(), InvoiceError> {
    // Owned rows follow through ON DELETE CASCADE
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;

    if result.rows_affected() == 0 {
      return Err(InvoiceError::NotFound);
    }

    Ok(())
  }

  async fn find_by_id(&self, id: i64) -> Result<Invoice, InvoiceError> {
    let mut conn = self.pool.acquire().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
      SELECT id, invoice_number, issue_date, due_date, billing_currency,
             sub_total, discount, total, created_at, updated_at
      FROM invoices
      WHERE id = $1
      "#,
    )
    .bind(id)
    .fetch_one(&mut *conn)
    .await?;

    Self::load(&mut *conn, row).await
  }

  async fn find_by_invoice_number(&self, invoice_number: &str) -> Result<Invoice, InvoiceError> {
    let mut conn = self.pool.acquire().await?;

    let row = sqlx::query_as::<_, InvoiceRow>(
      r#"
      SELECT id, invoice_number, issue_date, due_date, billing_currency,
             sub_total, discount, total, created_at, updated_at
      FROM invoices
      WHERE invoice_number = $1
      "#,
    )
    .bind(invoice_number)
    .fetch_one(&mut *conn)
    .await?;

    Self::load(&mut *conn, row).await
  }
}
