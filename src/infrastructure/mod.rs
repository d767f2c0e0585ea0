//! Infrastructure layer
//!
//! Configuration, the PostgreSQL storage adapter, invoice numbering and the
//! service that owns the connection pool.

pub mod config;
pub mod database;
pub mod numbering;
pub mod persistence;
