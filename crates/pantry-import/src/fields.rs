//! Typed field access on parsed records.
//!
//! Blank fields read as absent. Required conversions fail with a
//! [`FieldError`]; optional ones only fail when text is present but does not
//! convert.

use chrono::NaiveDate;
use pantry_csv::Record;

use crate::{error::FieldError, resolve::parse_date};

pub(crate) trait Fields {
  fn int(&self, column: &'static str) -> Result<i64, FieldError>;
  fn opt_int(&self, column: &'static str) -> Result<Option<i64>, FieldError>;
  /// Integer when it converts, `None` otherwise. Never an error.
  fn lenient_int(&self, column: &'static str) -> Option<i64>;
  fn float(&self, column: &'static str) -> Result<f64, FieldError>;
  fn opt_float(&self, column: &'static str) -> Result<Option<f64>, FieldError>;
  /// The raw text of a column that must be present in the header; a blank
  /// value is kept as an empty string.
  fn text(&self, column: &'static str) -> Result<String, FieldError>;
  fn opt_text(&self, column: &'static str) -> Option<String>;
  fn date(&self, column: &'static str) -> Option<NaiveDate>;
}

impl Fields for Record {
  fn int(&self, column: &'static str) -> Result<i64, FieldError> {
    self.opt_int(column)?.ok_or(FieldError::Missing(column))
  }

  fn opt_int(&self, column: &'static str) -> Result<Option<i64>, FieldError> {
    self
      .value(column)
      .map(|v| {
        v.parse().map_err(|_| FieldError::InvalidInt { column, value: v.to_owned() })
      })
      .transpose()
  }

  fn lenient_int(&self, column: &'static str) -> Option<i64> {
    self.value(column).and_then(|v| v.parse().ok())
  }

  fn float(&self, column: &'static str) -> Result<f64, FieldError> {
    self.opt_float(column)?.ok_or(FieldError::Missing(column))
  }

  fn opt_float(&self, column: &'static str) -> Result<Option<f64>, FieldError> {
    self
      .value(column)
      .map(|v| {
        v.parse().map_err(|_| FieldError::InvalidFloat { column, value: v.to_owned() })
      })
      .transpose()
  }

  fn text(&self, column: &'static str) -> Result<String, FieldError> {
    self
      .get(column)
      .map(|v| v.trim().to_owned())
      .ok_or(FieldError::Missing(column))
  }

  fn opt_text(&self, column: &'static str) -> Option<String> {
    self.value(column).map(str::to_owned)
  }

  fn date(&self, column: &'static str) -> Option<NaiveDate> {
    self.value(column).and_then(parse_date)
  }
}

/// Cut `value` to at most `max` characters, marking the cut with `...`.
pub(crate) fn truncate(value: Option<String>, max: usize) -> Option<String> {
  value.map(|v| {
    if v.chars().count() <= max {
      return v;
    }
    let mut cut: String = v.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(csv: &str) -> Record {
    pantry_csv::from_reader(csv.as_bytes(), "test.csv")
      .unwrap()
      .next()
      .unwrap()
      .unwrap()
  }

  #[test]
  fn required_int_rejects_blank_and_garbage() {
    let r = record("id,code\n ,x1\n");
    assert_eq!(r.int("id"), Err(FieldError::Missing("id")));
    assert_eq!(
      r.int("code"),
      Err(FieldError::InvalidInt { column: "code", value: "x1".into() })
    );
    assert_eq!(r.int("absent"), Err(FieldError::Missing("absent")));
  }

  #[test]
  fn optional_fields_read_blank_as_none() {
    let r = record("amount,footnote,rank\n,,  \n");
    assert_eq!(r.opt_float("amount"), Ok(None));
    assert_eq!(r.opt_text("footnote"), None);
    assert_eq!(r.opt_float("rank"), Ok(None));
    assert_eq!(r.opt_int("missing_column"), Ok(None));
  }

  #[test]
  fn optional_float_still_rejects_garbage() {
    let r = record("amount\nabc\n");
    assert!(matches!(r.opt_float("amount"), Err(FieldError::InvalidFloat { .. })));
  }

  #[test]
  fn lenient_int_swallows_garbage() {
    let r = record("Food category code\nN/A\n");
    assert_eq!(r.lenient_int("Food category code"), None);
  }

  #[test]
  fn text_requires_the_column_but_not_a_value() {
    let r = record("description,x\n\"\",1\n");
    assert_eq!(r.text("nope"), Err(FieldError::Missing("nope")));
    assert_eq!(r.text("description"), Ok(String::new()));
  }

  #[test]
  fn truncate_marks_the_cut() {
    assert_eq!(truncate(Some("abcdefgh".into()), 6).as_deref(), Some("abc..."));
    assert_eq!(truncate(Some("abc".into()), 6).as_deref(), Some("abc"));
    assert_eq!(truncate(None, 6), None);
  }
}
