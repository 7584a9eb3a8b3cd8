//! Shared plumbing for FluxPOS services: tracing setup and env config
//! helpers. No domain logic lives here.

pub mod config;
pub mod tracing;
