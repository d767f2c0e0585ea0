//! Application layer
//!
//! Use cases that turn transport requests into invoice repository calls.

pub mod invoice;
