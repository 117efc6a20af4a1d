//! roomcast gateway library entry.
//!
//! This crate wires the transport, relay core, and speech service into a
//! cohesive relay stack. It is intended to be consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod relay;
pub mod router;
pub mod services;
pub mod transport;
