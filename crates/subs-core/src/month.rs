//! The `MM-YYYY` month codec used for `start_date` and `expires`.
//!
//! Months are represented as the first day of the month. Parsing is strict:
//! exactly two digits, a `-`, and four digits.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::{Error, Result};

/// Render a date as `MM-YYYY`. The day component is ignored.
pub fn format(date: NaiveDate) -> String {
  format!("{:02}-{:04}", date.month(), date.year())
}

/// Render a timestamp as `MM-YYYY` in UTC.
pub fn format_instant(dt: DateTime<Utc>) -> String { format(dt.date_naive()) }

/// Parse a `MM-YYYY` string into the first day of that month.
///
/// `field` names the value in the returned error, e.g. `"start_date"`.
pub fn parse(field: &'static str, text: &str) -> Result<NaiveDate> {
  let invalid = || Error::InvalidDate { field, value: text.to_owned() };

  let (mm, yyyy) = text.split_once('-').ok_or_else(invalid)?;
  if mm.len() != 2 || yyyy.len() != 4 || !all_digits(mm) || !all_digits(yyyy) {
    return Err(invalid());
  }

  let month: u32 = mm.parse().map_err(|_| invalid())?;
  let year: i32 = yyyy.parse().map_err(|_| invalid())?;
  NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Parse a `MM-YYYY` string into midnight UTC on the first of that month.
pub fn parse_instant(field: &'static str, text: &str) -> Result<DateTime<Utc>> {
  parse(field, text).map(start_of)
}

/// Truncate a date to the first day of its month.
pub fn first_of(date: NaiveDate) -> NaiveDate { date.with_day(1).unwrap_or(date) }

/// Midnight UTC at the start of `date`.
pub fn start_of(date: NaiveDate) -> DateTime<Utc> {
  date.and_time(NaiveTime::MIN).and_utc()
}

fn all_digits(s: &str) -> bool { s.bytes().all(|b| b.is_ascii_digit()) }
