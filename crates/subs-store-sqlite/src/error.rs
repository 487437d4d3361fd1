//! Error type for `subs-store-sqlite`.

use std::time::Duration;

use subs_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Zero rows matched a targeted lookup, mutation or aggregate.
  #[error("no such row")]
  NoSuchRow,

  #[error("error {op}: {source}")]
  Database {
    op:     &'static str,
    #[source]
    source: tokio_rusqlite::Error,
  },

  #[error("error {op}: deadline of {after:?} exceeded")]
  Deadline { op: &'static str, after: Duration },

  /// A stored value could not be decoded into a domain type.
  #[error("error {op}: {detail}")]
  Corrupt { op: &'static str, detail: String },
}

impl StoreError for Error {
  fn is_no_such_row(&self) -> bool { matches!(self, Error::NoSuchRow) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
