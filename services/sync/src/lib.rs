#![allow(async_fn_in_trait)]

pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod router;
pub mod state;
pub mod trigger;
pub mod usecase;
