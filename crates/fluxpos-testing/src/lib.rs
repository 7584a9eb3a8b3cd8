//! Test utilities for FluxPOS services.
//!
//! Fixture builders for outbox records and cached rows. Import in
//! `#[cfg(test)]` blocks and integration tests only — never in production
//! code.

pub mod fixture;
