//! Core types and trait definitions for the subscriptions service.
//!
//! This crate is free of HTTP and database dependencies; it only carries the
//! OpenAPI schemas of its JSON types. The store backend and the HTTP layer
//! both depend on it.

pub mod error;
pub mod month;
pub mod store;
pub mod subscription;

pub use error::{Error, Result};
pub use subscription::Subscription;
