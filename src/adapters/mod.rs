//! Inbound transports. JSON over HTTP is the only one.

pub mod http;
