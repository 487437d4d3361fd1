//! HTTP server wiring for the subscriptions API.
//!
//! Loads [`ServerConfig`], wraps [`subs_api::api_router`] in the CORS,
//! tracing and request-id layers, serves the OpenAPI document with Swagger UI,
//! and provides the shutdown signal used by the binary.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use axum::{
  Router,
  body::Body,
  http::{Method, Request, header},
};
use serde::Deserialize;
use subs_store_sqlite::{SqliteStore, StoreConfig};
use tower_http::{
  cors::{Any, CorsLayer},
  request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
  trace::TraceLayer,
};
use tracing::Span;
use utoipa_swagger_ui::SwaggerUi;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SUBS_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Deadline for single-row operations.
  #[serde(default = "default_query_timeout")]
  pub query_timeout_secs: u64,
  /// Deadline for listing and summing.
  #[serde(default = "default_scan_timeout")]
  pub scan_timeout_secs:  u64,
}

fn default_host() -> String { "0.0.0.0".to_owned() }
fn default_port() -> u16 { 8080 }
fn default_store_path() -> PathBuf { PathBuf::from("subs.db") }
fn default_query_timeout() -> u64 { 10 }
fn default_scan_timeout() -> u64 { 15 }

impl ServerConfig {
  /// Layer the optional file at `path` under the `SUBS_` environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SUBS"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_config(&self) -> StoreConfig {
    StoreConfig {
      query_timeout: Duration::from_secs(self.query_timeout_secs),
      scan_timeout:  Duration::from_secs(self.scan_timeout_secs),
    }
  }

  /// `store_path` with a leading `~` expanded to the user's home directory.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Where Swagger UI is mounted.
pub const SWAGGER_PATH: &str = "/swagger";
/// Where the OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

const REQUEST_ID: &str = "x-request-id";

/// One span per request. Every event logged while handling the request
/// carries its `request_id`.
fn request_span(req: &Request<Body>) -> Span {
  let request_id = req
    .headers()
    .get(REQUEST_ID)
    .and_then(|v| v.to_str().ok())
    .unwrap_or("-");
  tracing::info_span!(
    "request",
    method = %req.method(),
    uri = %req.uri(),
    request_id = %request_id,
  )
}

/// The API router with Swagger UI, CORS, request tracing and `x-request-id`
/// applied. The request id is assigned before the trace span opens.
pub fn app(store: SqliteStore) -> Router {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([header::CONTENT_TYPE]);

  subs_api::api_router(Arc::new(store))
    .merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, subs_api::openapi()))
    .layer(cors)
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(TraceLayer::new_for_http().make_span_with(request_span))
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

// ─── Shutdown ─────────────────────────────────────────────────────────────────

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "failed to install Ctrl-C handler");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "failed to install SIGTERM handler");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
    _ = terminate => tracing::info!("received SIGTERM, shutting down"),
  }
}
