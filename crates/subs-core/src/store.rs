//! The `SubscriptionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `subs-store-sqlite`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::subscription::Subscription;

// ─── Query types ─────────────────────────────────────────────────────────────

/// Exact-match constraints, applied as a conjunction. Unset fields do not
/// constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubFilter {
  pub id:   Option<i64>,
  pub uid:  Option<Uuid>,
  pub name: Option<String>,
}

impl SubFilter {
  pub fn is_empty(&self) -> bool {
    self.id.is_none() && self.uid.is_none() && self.name.is_none()
  }
}

/// The columns a listing may be sorted by (ascending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
  Id,
  Name,
  Uid,
  #[serde(alias = "cost")]
  Price,
  #[serde(rename = "start_date", alias = "created_at")]
  Start,
  Expires,
}

impl SortColumn {
  /// The column identifier in the `subscriptions` table.
  pub fn column(self) -> &'static str {
    match self {
      Self::Id => "id",
      Self::Name => "name",
      Self::Uid => "uid",
      Self::Price => "cost",
      Self::Start => "created_at",
      Self::Expires => "expires",
    }
  }
}

/// Parameters for [`SubscriptionStore::list_subs`].
#[derive(Debug, Clone, Default)]
pub struct ListOpts {
  /// Maximum rows to return; `0` means unlimited.
  pub limit:  u64,
  /// Rows to skip. Always applied.
  pub offset: u64,
  pub filter: Option<SubFilter>,
  /// Without an order the row order is whatever the store yields.
  pub order:  Option<SortColumn>,
}

/// Inclusive month bounds for [`SubscriptionStore::price_sum`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeOpts {
  pub start: Option<NaiveDate>,
  pub end:   Option<NaiveDate>,
}

impl RangeOpts {
  /// Both bounds, or `None` when either is unset. A half-open range does not
  /// filter at all.
  pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
    Some((self.start?, self.end?))
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Error contract for store backends.
///
/// The only condition callers may branch on is "no such row"; everything
/// else is a backend failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_no_such_row(&self) -> bool;
}

/// Abstraction over a subscription store backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait SubscriptionStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new subscription and return its generated id. `sub.id` is
  /// ignored.
  fn add_sub(
    &self,
    sub: Subscription,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Fetch a subscription by id. Fails with "no such row" when absent.
  fn get_sub(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Subscription, Self::Error>> + Send + '_;

  /// Replace every field of subscription `id` with those of `sub`.
  fn update_sub(
    &self,
    id: i64,
    sub: Subscription,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_sub(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// List subscriptions matching `opts`. An empty result is not an error.
  fn list_subs(
    &self,
    opts: ListOpts,
  ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send + '_;

  /// Sum of `price` over matching subscriptions. Fails with "no such row"
  /// when nothing matches, so an empty set is distinguishable from a zero
  /// total.
  fn price_sum(
    &self,
    filter: Option<SubFilter>,
    range: Option<RangeOpts>,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Deserialize)]
  struct Order {
    order: SortColumn,
  }

  fn order(s: &str) -> Option<SortColumn> {
    serde_json::from_value::<Order>(serde_json::json!({ "order": s }))
      .ok()
      .map(|o| o.order)
  }

  #[test]
  fn sort_column_accepts_known_names_only() {
    assert_eq!(order("id"), Some(SortColumn::Id));
    assert_eq!(order("price").map(SortColumn::column), Some("cost"));
    assert_eq!(order("cost"), Some(SortColumn::Price));
    assert_eq!(order("start_date").map(SortColumn::column), Some("created_at"));
    assert_eq!(order("created_at"), Some(SortColumn::Start));
    assert_eq!(order("id; DROP TABLE subscriptions"), None);
    assert_eq!(order(""), None);
  }

  #[test]
  fn half_open_range_has_no_bounds() {
    let d = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    assert_eq!(RangeOpts { start: Some(d), end: None }.bounds(), None);
    assert_eq!(RangeOpts { start: None, end: Some(d) }.bounds(), None);
    assert_eq!(RangeOpts { start: Some(d), end: Some(d) }.bounds(), Some((d, d)));
  }

  #[test]
  fn default_filter_is_empty() {
    assert!(SubFilter::default().is_empty());
    assert!(!SubFilter { id: Some(2), ..Default::default() }.is_empty());
  }
}
