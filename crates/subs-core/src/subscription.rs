//! A user's recurring payment for a named service.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{Error, Result, month};

/// A subscription record.
///
/// The JSON form renders `start` as `start_date` and both dates as `MM-YYYY`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SubscriptionWire", into = "SubscriptionWire")]
pub struct Subscription {
  /// Store-assigned key; `0` until the record is persisted.
  pub id:      i64,
  pub uid:     Uuid,
  pub name:    String,
  /// Monthly cost in whole currency units.
  pub price:   i64,
  /// Always the first day of a month.
  pub start:   NaiveDate,
  /// `None` means the subscription is open-ended.
  pub expires: Option<DateTime<Utc>>,
}

impl Subscription {
  /// An unsaved, open-ended subscription. `start` is truncated to the first
  /// of its month.
  pub fn new(uid: Uuid, name: impl Into<String>, price: i64, start: NaiveDate) -> Self {
    Self {
      id: 0,
      uid,
      name: name.into(),
      price,
      start: month::first_of(start),
      expires: None,
    }
  }

  pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
    self.expires = Some(expires);
    self
  }

  /// Check the invariants that the JSON decoder enforces.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::EmptyName);
    }
    if self.price < 0 {
      return Err(Error::NegativePrice(self.price));
    }
    Ok(())
  }
}

// ─── Wire form ───────────────────────────────────────────────────────────────

/// The JSON shape of a [`Subscription`]; also its OpenAPI schema.
#[derive(Serialize, Deserialize, ToSchema)]
#[schema(as = Subscription)]
pub struct SubscriptionWire {
  /// Assigned by the store; ignored on create and update.
  #[serde(default, skip_serializing_if = "is_unsaved")]
  id:         i64,
  #[schema(example = "yandex")]
  name:       String,
  /// Monthly cost in whole currency units.
  #[schema(example = 400, minimum = 0)]
  price:      i64,
  uid:        Uuid,
  /// First month, `MM-YYYY`.
  #[schema(example = "07-2025")]
  start_date: String,
  /// Expiry month, `MM-YYYY`. Absent for open-ended subscriptions.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[schema(example = "08-2025")]
  expires:    Option<String>,
}

fn is_unsaved(id: &i64) -> bool { *id == 0 }

impl TryFrom<SubscriptionWire> for Subscription {
  type Error = Error;

  fn try_from(w: SubscriptionWire) -> Result<Self> {
    let start = month::parse("start_date", &w.start_date)?;
    let expires = w
      .expires
      .as_deref()
      .map(|e| month::parse_instant("expires", e))
      .transpose()?;

    let sub = Subscription {
      id: w.id,
      uid: w.uid,
      name: w.name,
      price: w.price,
      start,
      expires,
    };
    sub.validate()?;
    Ok(sub)
  }
}

impl From<Subscription> for SubscriptionWire {
  fn from(s: Subscription) -> Self {
    SubscriptionWire {
      id:         s.id,
      name:       s.name,
      price:      s.price,
      uid:        s.uid,
      start_date: month::format(s.start),
      expires:    s.expires.map(month::format_instant),
    }
  }
}
