//! The SQLite implementation of [`SubscriptionStore`].

use std::{path::Path, time::Duration};

use rusqlite::{OptionalExtension as _, params_from_iter};
use subs_core::{
  Subscription,
  store::{ListOpts, RangeOpts, SubFilter, SubscriptionStore},
};
use tracing::debug;

use crate::{
  Error, Result,
  encode::RawSubscription,
  query::{self, Statement},
  schema::SCHEMA,
};

// ─── Config ──────────────────────────────────────────────────────────────────

/// Per-operation deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
  /// Single-row reads and mutations.
  pub query_timeout: Duration,
  /// Listing and aggregation.
  pub scan_timeout:  Duration,
}

impl Default for StoreConfig {
  fn default() -> Self {
    Self {
      query_timeout: Duration::from_secs(10),
      scan_timeout:  Duration::from_secs(15),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A subscription store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted, and its
/// background thread serialises access, so clones may be used concurrently.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  config: StoreConfig,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, initialise the schema and ping it.
  pub async fn open(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(|source| Error::Database { op: "opening store", source })?;
    Self::init_schema(&conn).await?;
    Self::with_connection(conn, config).await
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|source| Error::Database { op: "opening store", source })?;
    Self::init_schema(&conn).await?;
    Self::with_connection(conn, StoreConfig::default()).await
  }

  /// Wrap an already-open connection. The schema must already exist; the
  /// connection is pinged before the store is returned.
  pub async fn with_connection(
    conn: tokio_rusqlite::Connection,
    config: StoreConfig,
  ) -> Result<Self> {
    let store = Self { conn, config };
    store.ping().await?;
    Ok(store)
  }

  pub fn config(&self) -> StoreConfig { self.config }

  async fn init_schema(conn: &tokio_rusqlite::Connection) -> Result<()> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(|source| Error::Database { op: "initialising schema", source })
  }

  /// Round-trip a trivial query to prove the connection is alive.
  pub async fn ping(&self) -> Result<()> {
    self
      .run("pinging store", self.config.query_timeout, |conn| {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread under `deadline`.
  pub(crate) async fn run<T, F>(&self, op: &'static str, deadline: Duration, f: F) -> Result<T>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<T> + Send + 'static,
    T: Send + 'static,
  {
    match tokio::time::timeout(deadline, self.conn.call(f)).await {
      Ok(Ok(value)) => Ok(value),
      Ok(Err(source)) => Err(Error::Database { op, source }),
      Err(_) => Err(Error::Deadline { op, after: deadline }),
    }
  }

  /// Execute a statement and return the number of affected rows.
  async fn execute(&self, op: &'static str, st: Statement) -> Result<usize> {
    debug!(sql = %st.sql, params = st.params.len(), "{op}");
    self
      .run(op, self.config.query_timeout, move |conn| {
        Ok(conn.execute(&st.sql, params_from_iter(st.params.iter()))?)
      })
      .await
  }

  /// Execute a statement whose zero-row outcome means "no such row".
  async fn execute_targeted(&self, op: &'static str, st: Statement) -> Result<()> {
    match self.execute(op, st).await? {
      0 => Err(Error::NoSuchRow),
      _ => Ok(()),
    }
  }
}

// ─── SubscriptionStore impl ──────────────────────────────────────────────────

impl SubscriptionStore for SqliteStore {
  type Error = Error;

  async fn add_sub(&self, sub: Subscription) -> Result<i64> {
    let st = query::insert(&sub);
    debug!(sql = %st.sql, params = st.params.len(), "inserting sub");

    self
      .run("inserting sub", self.config.query_timeout, move |conn| {
        Ok(conn.query_row(&st.sql, params_from_iter(st.params.iter()), |row| row.get(0))?)
      })
      .await
  }

  async fn get_sub(&self, id: i64) -> Result<Subscription> {
    let st = query::select_by_id(id);
    debug!(sql = %st.sql, params = st.params.len(), "getting subscription");

    let raw = self
      .run("getting subscription", self.config.query_timeout, move |conn| {
        Ok(
          conn
            .query_row(
              &st.sql,
              params_from_iter(st.params.iter()),
              RawSubscription::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.ok_or(Error::NoSuchRow)?.into_subscription()
  }

  async fn update_sub(&self, id: i64, sub: Subscription) -> Result<()> {
    self.execute_targeted("updating subscription", query::update(id, &sub)).await
  }

  async fn delete_sub(&self, id: i64) -> Result<()> {
    self.execute_targeted("deleting sub", query::delete(id)).await
  }

  async fn list_subs(&self, opts: ListOpts) -> Result<Vec<Subscription>> {
    let st = query::select_list(&opts);
    debug!(sql = %st.sql, params = st.params.len(), "listing subs");

    let raws: Vec<RawSubscription> = self
      .run("getting subs list", self.config.scan_timeout, move |conn| {
        let mut stmt = conn.prepare(&st.sql)?;
        let rows = stmt
          .query_map(params_from_iter(st.params.iter()), RawSubscription::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubscription::into_subscription).collect()
  }

  async fn price_sum(
    &self,
    filter: Option<SubFilter>,
    range:  Option<RangeOpts>,
  ) -> Result<i64> {
    let st = query::select_sum(filter.as_ref(), range.as_ref());
    debug!(sql = %st.sql, params = st.params.len(), "summing subs");

    // SUM over zero rows is NULL rather than 0.
    let sum: Option<i64> = self
      .run("getting subs sum", self.config.scan_timeout, move |conn| {
        Ok(conn.query_row(&st.sql, params_from_iter(st.params.iter()), |row| row.get(0))?)
      })
      .await?;

    sum.ok_or(Error::NoSuchRow)
  }
}
