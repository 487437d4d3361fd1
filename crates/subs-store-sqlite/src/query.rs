//! SQL statement builders for the `subscriptions` table.
//!
//! Every builder returns a [`Statement`]: SQL text plus the values bound to
//! its `?N` placeholders, numbered in the order they were appended. Caller
//! values never appear in the SQL text; the only identifiers spliced in come
//! from the closed [`SortColumn`] set.

use rusqlite::types::Value;
use subs_core::{
  Subscription, month,
  store::{ListOpts, RangeOpts, SortColumn, SubFilter},
};

use crate::encode::{encode_date, encode_instant, encode_uuid, nullable};

pub const TABLE: &str = "subscriptions";

/// Column list shared by every row-returning statement.
pub const COLUMNS: &str = "id, name, uid, cost, created_at, expires";

/// A parameterised SQL statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
  pub sql:    String,
  pub params: Vec<Value>,
}

impl Statement {
  /// Bind `value` as the next parameter and return its placeholder.
  fn bind(&mut self, value: impl Into<Value>) -> String {
    self.params.push(value.into());
    format!("?{}", self.params.len())
  }
}

// ─── Single-row statements ───────────────────────────────────────────────────

/// Binds `uid, name, cost, created_at, expires` for insert and update.
fn bind_fields(st: &mut Statement, sub: &Subscription) -> [String; 5] {
  [
    st.bind(encode_uuid(sub.uid)),
    st.bind(sub.name.clone()),
    st.bind(sub.price),
    st.bind(encode_date(month::first_of(sub.start))),
    st.bind(nullable(sub.expires.map(encode_instant))),
  ]
}

/// `INSERT … RETURNING id`. `sub.id` is ignored.
pub fn insert(sub: &Subscription) -> Statement {
  let mut st = Statement::default();
  let values = bind_fields(&mut st, sub).join(", ");
  st.sql = format!(
    "INSERT INTO {TABLE} (uid, name, cost, created_at, expires) VALUES ({values}) RETURNING id"
  );
  st
}

pub fn select_by_id(id: i64) -> Statement {
  let mut st = Statement::default();
  let p = st.bind(id);
  st.sql = format!("SELECT {COLUMNS} FROM {TABLE} WHERE id = {p}");
  st
}

pub fn update(id: i64, sub: &Subscription) -> Statement {
  let mut st = Statement::default();
  let [uid, name, cost, created_at, expires] = bind_fields(&mut st, sub);
  let p = st.bind(id);
  st.sql = format!(
    "UPDATE {TABLE} SET uid = {uid}, name = {name}, cost = {cost}, \
     created_at = {created_at}, expires = {expires} WHERE id = {p}"
  );
  st
}

pub fn delete(id: i64) -> Statement {
  let mut st = Statement::default();
  let p = st.bind(id);
  st.sql = format!("DELETE FROM {TABLE} WHERE id = {p}");
  st
}

// ─── Listing and aggregation ─────────────────────────────────────────────────

/// One equality predicate per present filter field.
fn filter_predicates(st: &mut Statement, filter: Option<&SubFilter>) -> Vec<String> {
  let mut preds = Vec::new();
  let Some(f) = filter else { return preds };

  if let Some(id) = f.id {
    preds.push(format!("id = {}", st.bind(id)));
  }
  if let Some(uid) = f.uid {
    preds.push(format!("uid = {}", st.bind(encode_uuid(uid))));
  }
  if let Some(name) = &f.name {
    preds.push(format!("name = {}", st.bind(name.clone())));
  }
  preds
}

fn push_where(sql: &mut String, preds: &[String]) {
  if !preds.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(&preds.join(" AND "));
  }
}

fn order_by(sql: &mut String, order: Option<SortColumn>) {
  if let Some(col) = order {
    sql.push_str(" ORDER BY ");
    sql.push_str(col.column());
    sql.push_str(" ASC");
  }
}

fn row_count(n: u64) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

/// `SELECT` for [`ListOpts`].
///
/// The offset is always bound. SQLite only accepts `OFFSET` after a `LIMIT`,
/// so an unlimited listing uses `LIMIT -1` and binds no limit.
pub fn select_list(opts: &ListOpts) -> Statement {
  let mut st = Statement::default();
  let mut sql = format!("SELECT {COLUMNS} FROM {TABLE}");

  let preds = filter_predicates(&mut st, opts.filter.as_ref());
  push_where(&mut sql, &preds);
  order_by(&mut sql, opts.order);

  if opts.limit > 0 {
    let p = st.bind(row_count(opts.limit));
    sql.push_str(&format!(" LIMIT {p}"));
  } else {
    sql.push_str(" LIMIT -1");
  }
  let p = st.bind(row_count(opts.offset));
  sql.push_str(&format!(" OFFSET {p}"));

  st.sql = sql;
  st
}

/// `SELECT SUM(cost)` with the same filter semantics as [`select_list`].
///
/// With both range bounds set, only subscriptions active at some point in
/// `[start, end]` are summed: started no later than `end` and not expired
/// before `start`.
pub fn select_sum(filter: Option<&SubFilter>, range: Option<&RangeOpts>) -> Statement {
  let mut st = Statement::default();
  let mut sql = format!("SELECT SUM(cost) FROM {TABLE}");

  let mut preds = filter_predicates(&mut st, filter);
  if let Some((start, end)) = range.and_then(RangeOpts::bounds) {
    let end = st.bind(encode_date(month::first_of(end)));
    let start = st.bind(encode_date(month::first_of(start)));
    preds.push(format!("created_at <= {end}"));
    preds.push(format!("(expires IS NULL OR date(expires) >= {start})"));
  }
  push_where(&mut sql, &preds);

  st.sql = sql;
  st
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use uuid::Uuid;

  use super::*;

  fn ymd(y: i32, m: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, 1).unwrap() }

  fn text(s: &str) -> Value { Value::Text(s.to_owned()) }

  #[test]
  fn unfiltered_list_always_binds_offset() {
    let st = select_list(&ListOpts::default());
    assert_eq!(
      st.sql,
      "SELECT id, name, uid, cost, created_at, expires FROM subscriptions LIMIT -1 OFFSET ?1"
    );
    assert_eq!(st.params, vec![Value::Integer(0)]);
  }

  #[test]
  fn nonzero_limit_is_bound_before_offset() {
    let st = select_list(&ListOpts { limit: 5, offset: 3, ..Default::default() });
    assert!(st.sql.ends_with(" LIMIT ?1 OFFSET ?2"), "{}", st.sql);
    assert_eq!(st.params, vec![Value::Integer(5), Value::Integer(3)]);
  }

  #[test]
  fn zero_limit_binds_no_row_bound() {
    let st = select_list(&ListOpts { limit: 0, offset: 7, ..Default::default() });
    assert!(st.sql.contains("LIMIT -1 OFFSET ?1"), "{}", st.sql);
    assert_eq!(st.params, vec![Value::Integer(7)]);
  }

  #[test]
  fn filter_fields_become_positional_equalities() {
    let uid = Uuid::new_v4();
    let st = select_list(&ListOpts {
      filter: Some(SubFilter {
        id:   Some(2),
        uid:  Some(uid),
        name: Some("name #2".into()),
      }),
      order: Some(SortColumn::Id),
      limit: 10,
      ..Default::default()
    });

    assert_eq!(
      st.sql,
      "SELECT id, name, uid, cost, created_at, expires FROM subscriptions \
       WHERE id = ?1 AND uid = ?2 AND name = ?3 ORDER BY id ASC LIMIT ?4 OFFSET ?5"
    );
    assert_eq!(
      st.params,
      vec![
        Value::Integer(2),
        text(&uid.to_string()),
        text("name #2"),
        Value::Integer(10),
        Value::Integer(0),
      ]
    );
  }

  #[test]
  fn empty_filter_emits_no_where_clause() {
    let st = select_list(&ListOpts { filter: Some(SubFilter::default()), ..Default::default() });
    assert!(!st.sql.contains("WHERE"), "{}", st.sql);
  }

  #[test]
  fn filter_values_never_reach_sql_text() {
    let hostile = "x' OR '1'='1";
    let st = select_list(&ListOpts {
      filter: Some(SubFilter { name: Some(hostile.into()), ..Default::default() }),
      ..Default::default()
    });
    assert!(!st.sql.contains(hostile));
    assert_eq!(st.params[0], text(hostile));
  }

  #[test]
  fn order_uses_mapped_column() {
    let st = select_list(&ListOpts { order: Some(SortColumn::Price), ..Default::default() });
    assert!(st.sql.contains("ORDER BY cost ASC"), "{}", st.sql);
  }

  #[test]
  fn sum_without_filter_or_range() {
    let st = select_sum(None, None);
    assert_eq!(st.sql, "SELECT SUM(cost) FROM subscriptions");
    assert!(st.params.is_empty());
  }

  #[test]
  fn sum_with_filter_and_range() {
    let filter = SubFilter { name: Some("spotify".into()), ..Default::default() };
    let range = RangeOpts { start: Some(ymd(2025, 1)), end: Some(ymd(2025, 6)) };
    let st = select_sum(Some(&filter), Some(&range));

    assert_eq!(
      st.sql,
      "SELECT SUM(cost) FROM subscriptions WHERE name = ?1 AND created_at <= ?2 \
       AND (expires IS NULL OR date(expires) >= ?3)"
    );
    assert_eq!(st.params, vec![text("spotify"), text("2025-06-01"), text("2025-01-01")]);
  }

  #[test]
  fn sum_ignores_half_open_range() {
    let range = RangeOpts { start: Some(ymd(2025, 1)), end: None };
    assert_eq!(select_sum(None, Some(&range)), select_sum(None, None));
  }

  #[test]
  fn single_row_statements_number_params_in_order() {
    let sub = Subscription::new(Uuid::nil(), "yandex", 400, ymd(2025, 7));

    let ins = insert(&sub);
    assert_eq!(
      ins.sql,
      "INSERT INTO subscriptions (uid, name, cost, created_at, expires) \
       VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id"
    );
    assert_eq!(ins.params[4], Value::Null);

    let upd = update(9, &sub);
    assert_eq!(
      upd.sql,
      "UPDATE subscriptions SET uid = ?1, name = ?2, cost = ?3, \
       created_at = ?4, expires = ?5 WHERE id = ?6"
    );
    assert_eq!(upd.params[3], text("2025-07-01"));
    assert_eq!(upd.params[5], Value::Integer(9));

    assert_eq!(delete(4).sql, "DELETE FROM subscriptions WHERE id = ?1");
    assert_eq!(select_by_id(4).params, vec![Value::Integer(4)]);
  }
}
