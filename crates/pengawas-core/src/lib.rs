//! Core types and trait definitions for the Pengawas supervision portal.
//!
//! Holds the "komitmen perubahan" classification (levels and strategy), the
//! plan and directory types, the collaborator traits and the report
//! aggregator. This crate is free of HTTP and database dependencies; every
//! other crate depends on it.

// We intentionally use native `async fn` in trait impls.
#![allow(async_fn_in_trait)]

pub mod answer;
pub mod directory;
pub mod error;
pub mod level;
pub mod period;
pub mod plan;
pub mod report;
pub mod store;
pub mod strategy;

pub use error::{DomainError, Error, Result};
