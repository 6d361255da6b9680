//! Encoding helpers between Rust domain types and SQLite column values.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` strings.

use chrono::NaiveDate;
use pantry_core::NaturalKey;
use rusqlite::types::Value;

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: Option<NaiveDate>) -> Option<String> {
  d.map(|d| d.format("%Y-%m-%d").to_string())
}

// ─── NaturalKey ──────────────────────────────────────────────────────────────

pub fn encode_key(key: NaturalKey) -> Value {
  match key {
    NaturalKey::Code(c) => Value::Integer(c),
    NaturalKey::Text(t) => Value::Text(t),
  }
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `%text%` with LIKE metacharacters escaped by `\`.
pub fn contains_pattern(text: &str) -> String {
  let mut out = String::with_capacity(text.len() + 2);
  out.push('%');
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_encode_as_iso() {
    let d = NaiveDate::from_ymd_opt(2024, 1, 15);
    assert_eq!(encode_date(d).as_deref(), Some("2024-01-15"));
    assert_eq!(encode_date(None), None);
  }

  #[test]
  fn like_metacharacters_are_escaped() {
    assert_eq!(contains_pattern("100%_juice"), "%100\\%\\_juice%");
  }
}
