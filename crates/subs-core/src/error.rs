//! Error types for `subs-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A `MM-YYYY` value did not parse. `field` is the JSON key that failed.
  #[error("invalid {field} format: {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("name must not be empty")]
  EmptyName,

  #[error("price must not be negative: {0}")]
  NegativePrice(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
