//! Handlers for single-subscription endpoints.
//!
//! | Method   | Path         | Notes |
//! |----------|--------------|-------|
//! | `POST`   | `/subs/add`  | Body: [`Subscription`]; returns 201 + generated id |
//! | `GET`    | `/subs/{id}` | 404 if not found |
//! | `PUT`    | `/subs/{id}` | Body: full replacement [`Subscription`] |
//! | `DELETE` | `/subs/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
};
use serde::{Deserialize, Serialize};
use subs_core::{Subscription, store::SubscriptionStore, subscription::SubscriptionWire};
use tracing::info;
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody};

/// Acknowledgement for a mutation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Message {
  #[schema(example = 200)]
  pub cod: u16,
  #[schema(example = "subscription updated")]
  pub msg: String,
}

impl Message {
  fn ok(msg: &str) -> Json<Self> {
    Json(Message { cod: StatusCode::OK.as_u16(), msg: msg.to_owned() })
  }
}

/// Response to `POST /subs/add`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Created {
  #[schema(example = 201)]
  pub cod: u16,
  #[schema(example = "sub added")]
  pub msg: String,
  /// The generated subscription id.
  pub id:  i64,
}

/// Subscription ids are positive integers.
fn sub_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  let Path(id) = path?;
  if id <= 0 {
    return Err(ApiError::BadRequest(format!("invalid id: {id}")));
  }
  Ok(id)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Add a subscription.
#[utoipa::path(
  post,
  path = "/subs/add",
  tag = "subs",
  request_body = SubscriptionWire,
  responses(
    (status = 201, description = "Subscription stored", body = Created),
    (status = 400, description = "Malformed body or dates", body = ErrorBody),
    (status = 500, description = "Store failure", body = ErrorBody),
  )
)]
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<Subscription>, JsonRejection>,
) -> Result<(StatusCode, Json<Created>), ApiError>
where
  S: SubscriptionStore,
{
  let Json(sub) = body?;
  let id = store.add_sub(sub).await.map_err(ApiError::from_store)?;

  info!(id, "added subscription");
  let status = StatusCode::CREATED;
  Ok((status, Json(Created { cod: status.as_u16(), msg: "sub added".to_owned(), id })))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// Fetch one subscription.
#[utoipa::path(
  get,
  path = "/subs/{id}",
  tag = "subs",
  params(("id" = i64, Path, description = "Subscription id")),
  responses(
    (status = 200, description = "The subscription", body = SubscriptionWire),
    (status = 400, description = "Invalid id", body = ErrorBody),
    (status = 404, description = "No such subscription", body = ErrorBody),
    (status = 500, description = "Store failure", body = ErrorBody),
  )
)]
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Subscription>, ApiError>
where
  S: SubscriptionStore,
{
  let id = sub_id(path)?;
  let sub = store.get_sub(id).await.map_err(ApiError::from_store)?;
  Ok(Json(sub))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Replace every field of a subscription.
#[utoipa::path(
  put,
  path = "/subs/{id}",
  tag = "subs",
  params(("id" = i64, Path, description = "Subscription id")),
  request_body = SubscriptionWire,
  responses(
    (status = 200, description = "Subscription replaced", body = Message),
    (status = 400, description = "Invalid id, body or dates", body = ErrorBody),
    (status = 404, description = "No such subscription", body = ErrorBody),
    (status = 500, description = "Store failure", body = ErrorBody),
  )
)]
pub async fn update<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<Subscription>, JsonRejection>,
) -> Result<Json<Message>, ApiError>
where
  S: SubscriptionStore,
{
  let id = sub_id(path)?;
  let Json(sub) = body?;
  store.update_sub(id, sub).await.map_err(ApiError::from_store)?;

  info!(id, "updated subscription");
  Ok(Message::ok("subscription updated"))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// Delete a subscription.
#[utoipa::path(
  delete,
  path = "/subs/{id}",
  tag = "subs",
  params(("id" = i64, Path, description = "Subscription id")),
  responses(
    (status = 200, description = "Subscription deleted", body = Message),
    (status = 400, description = "Invalid id", body = ErrorBody),
    (status = 404, description = "No such subscription", body = ErrorBody),
    (status = 500, description = "Store failure", body = ErrorBody),
  )
)]
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Message>, ApiError>
where
  S: SubscriptionStore,
{
  let id = sub_id(path)?;
  store.delete_sub(id).await.map_err(ApiError::from_store)?;

  info!(id, "deleted subscription");
  Ok(Message::ok("subscription deleted"))
}
