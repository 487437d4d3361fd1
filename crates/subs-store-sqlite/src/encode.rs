//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! `created_at` is stored as `YYYY-MM-DD`, `expires` as RFC 3339 UTC keeping
//! whatever sub-second digits the value carries. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Row, types::Value};
use subs_core::Subscription;
use uuid::Uuid;

use crate::{Error, Result};

const DECODE_OP: &str = "converting rows";

fn corrupt(detail: String) -> Error { Error::Corrupt { op: DECODE_OP, detail } }

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Uuid::parse_str(s).map_err(|e| corrupt(format!("uid {s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| corrupt(format!("created_at {s:?}: {e}")))
}

pub fn encode_instant(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub fn decode_instant(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| corrupt(format!("expires {s:?}: {e}")))
}

/// `NULL` for `None`, otherwise the text.
pub fn nullable(s: Option<String>) -> Value {
  s.map_or(Value::Null, Value::Text)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read from a `subscriptions` row, in
/// [`COLUMNS`](crate::query::COLUMNS) order.
pub struct RawSubscription {
  pub id:         i64,
  pub name:       String,
  pub uid:        String,
  pub cost:       i64,
  pub created_at: String,
  pub expires:    Option<String>,
}

impl RawSubscription {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawSubscription {
      id:         row.get(0)?,
      name:       row.get(1)?,
      uid:        row.get(2)?,
      cost:       row.get(3)?,
      created_at: row.get(4)?,
      expires:    row.get(5)?,
    })
  }

  pub fn into_subscription(self) -> Result<Subscription> {
    Ok(Subscription {
      id:      self.id,
      uid:     decode_uuid(&self.uid)?,
      name:    self.name,
      price:   self.cost,
      start:   decode_date(&self.created_at)?,
      expires: self.expires.as_deref().map(decode_instant).transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn instants_use_utc_suffix() {
    let dt = NaiveDate::from_ymd_opt(2025, 8, 1)
      .unwrap()
      .and_hms_opt(0, 0, 0)
      .unwrap()
      .and_utc();
    assert_eq!(encode_instant(dt), "2025-08-01T00:00:00Z");
    assert_eq!(decode_instant("2025-08-01T00:00:00Z").unwrap(), dt);
  }

  #[test]
  fn instants_keep_fractional_seconds() {
    let dt = decode_instant("2025-08-01T12:34:56.789Z").unwrap();
    assert_eq!(encode_instant(dt), "2025-08-01T12:34:56.789Z");
  }

  #[test]
  fn bad_uuid_is_corrupt() {
    let raw = RawSubscription {
      id:         1,
      name:       "x".into(),
      uid:        "not-a-uuid".into(),
      cost:       1,
      created_at: "2025-07-01".into(),
      expires:    None,
    };
    assert!(matches!(raw.into_subscription(), Err(Error::Corrupt { .. })));
  }
}
