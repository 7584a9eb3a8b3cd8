//! Domain types shared across FluxPOS crates.
//!
//! This crate contains only pure types with no framework dependencies;
//! anything that talks to a database or the network lives in the service
//! crates.

pub mod entity;
pub mod outbox;
pub mod retail;
