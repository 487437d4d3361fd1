//! SQLite backend for the subscriptions store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. SQL text is produced by the [`query`]
//! module; caller input only ever reaches the database as bound parameters.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod query;

pub use error::{Error, Result};
pub use store::{SqliteStore, StoreConfig};
