//! Handlers for `GET /subs/list` and `GET /subs/sum`.
//!
//! `name` and `uid` narrow both endpoints by exact match. `order` accepts
//! only the column names [`SortColumn`] knows about.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use subs_core::{
  Subscription, month,
  store::{ListOpts, RangeOpts, SortColumn, SubFilter, SubscriptionStore},
  subscription::SubscriptionWire,
};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody};

/// `None` when neither field is given, so the store applies no predicate.
fn filter(name: Option<String>, uid: Option<Uuid>) -> Option<SubFilter> {
  let name = name.filter(|n| !n.is_empty());
  if name.is_none() && uid.is_none() {
    return None;
  }
  Some(SubFilter { id: None, uid, name })
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
  /// Exact service name.
  pub name:   Option<String>,
  /// Exact user id.
  pub uid:    Option<Uuid>,
  /// `0` or absent means unlimited.
  #[serde(default)]
  pub limit:  u64,
  /// Rows to skip.
  #[serde(default)]
  pub offset: u64,
  /// Ascending sort column.
  pub order:  Option<SortColumn>,
}

/// List subscriptions, optionally filtered, sorted and paginated.
#[utoipa::path(
  get,
  path = "/subs/list",
  tag = "subs",
  params(ListParams),
  responses(
    (status = 200, description = "Matching subscriptions", body = [SubscriptionWire]),
    (status = 400, description = "Invalid query", body = ErrorBody),
    (status = 500, description = "Store failure", body = ErrorBody),
  )
)]
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Subscription>>, ApiError>
where
  S: SubscriptionStore,
{
  let Query(params) = params?;
  let opts = ListOpts {
    limit:  params.limit,
    offset: params.offset,
    filter: filter(params.name, params.uid),
    order:  params.order,
  };

  let subs = store.list_subs(opts).await.map_err(ApiError::from_store)?;
  info!(count = subs.len(), "listed subscriptions");
  Ok(Json(subs))
}

// ─── Sum ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SumParams {
  /// Exact service name.
  pub name:  Option<String>,
  /// Exact user id.
  pub uid:   Option<Uuid>,
  /// First month of the period, `MM-YYYY`.
  pub start: Option<String>,
  /// Last month of the period, `MM-YYYY`.
  pub end:   Option<String>,
}

impl SumParams {
  /// Both bounds are validated when given, but the range only applies when
  /// both are present.
  fn range(&self) -> Result<Option<RangeOpts>, ApiError> {
    let parse = |field, value: &Option<String>| {
      value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| month::parse(field, v))
        .transpose()
    };
    let range = RangeOpts {
      start: parse("start", &self.start)?,
      end:   parse("end", &self.end)?,
    };
    Ok(range.bounds().map(|_| range))
  }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SumResponse {
  #[schema(example = 4500)]
  pub sum: i64,
}

/// Total monthly price of the matching subscriptions, optionally limited to
/// those active during `start..=end`.
#[utoipa::path(
  get,
  path = "/subs/sum",
  tag = "subs",
  params(SumParams),
  responses(
    (status = 200, description = "Price total", body = SumResponse),
    (status = 400, description = "Invalid query or period", body = ErrorBody),
    (status = 404, description = "No matching subscriptions", body = ErrorBody),
    (status = 500, description = "Store failure", body = ErrorBody),
  )
)]
pub async fn sum<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<SumParams>, QueryRejection>,
) -> Result<Json<SumResponse>, ApiError>
where
  S: SubscriptionStore,
{
  let Query(params) = params?;
  let range = params.range()?;

  let sum = store
    .price_sum(filter(params.name, params.uid), range)
    .await
    .map_err(ApiError::from_store)?;

  info!(sum, "summed subscription prices");
  Ok(Json(SumResponse { sum }))
}
