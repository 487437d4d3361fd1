//! JSON REST API for subscriptions.
//!
//! Exposes an axum [`Router`] backed by any
//! [`subs_core::store::SubscriptionStore`], and the matching OpenAPI document
//! ([`openapi()`]). TLS, CORS, tracing and serving the document are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = subs_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http());
//! ```

pub mod error;
pub mod list;
pub mod openapi;
pub mod subs;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use subs_core::store::SubscriptionStore;

pub use error::ApiError;
pub use openapi::openapi;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SubscriptionStore + 'static,
{
  Router::new()
    .route("/subs/add", post(subs::create::<S>))
    .route("/subs/list", get(list::list::<S>))
    .route("/subs/sum", get(list::sum::<S>))
    .route(
      "/subs/{id}",
      get(subs::get_one::<S>)
        .put(subs::update::<S>)
        .delete(subs::delete::<S>),
    )
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
