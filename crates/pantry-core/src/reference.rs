//! Natural keys and explicit optional references.
//!
//! Foreign-key resolution never yields "maybe a row": the resolver returns
//! `Option<Reference>` and callers branch on presence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Table;

/// The kinds of entity other rows may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
  FdcCategory,
  FdcNutrient,
  FdcMeasureUnit,
  FdcFood,
  CnCategory,
  CnNutrient,
  CnGpcName,
  CnFood,
}

impl EntityKind {
  /// The table holding rows of this kind.
  pub fn table(self) -> Table {
    match self {
      Self::FdcCategory => Table::FdcFoodCategory,
      Self::FdcNutrient => Table::FdcNutrient,
      Self::FdcMeasureUnit => Table::FdcMeasureUnit,
      Self::FdcFood => Table::FdcFood,
      Self::CnCategory => Table::CnFoodCategory,
      Self::CnNutrient => Table::CnNutrient,
      Self::CnGpcName => Table::CnGpcName,
      Self::CnFood => Table::CnFood,
    }
  }

  /// The primary-key column of [`Self::table`].
  pub fn key_column(self) -> &'static str {
    match self {
      Self::FdcCategory | Self::FdcNutrient | Self::FdcMeasureUnit => "id",
      Self::FdcFood => "fdc_id",
      Self::CnCategory | Self::CnNutrient => "code",
      Self::CnGpcName => "gpc_code",
      Self::CnFood => "cn_code",
    }
  }
}

/// A domain-meaningful identifier used as a primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NaturalKey {
  Code(i64),
  Text(String),
}

impl From<i64> for NaturalKey {
  fn from(code: i64) -> Self { Self::Code(code) }
}

impl From<&str> for NaturalKey {
  fn from(text: &str) -> Self { Self::Text(text.to_owned()) }
}

impl fmt::Display for NaturalKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Code(c) => write!(f, "{c}"),
      Self::Text(t) => f.write_str(t),
    }
  }
}

/// Proof that a row of `kind` with `key` exists in storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
  pub kind: EntityKind,
  pub key:  NaturalKey,
}

impl Reference {
  pub fn code(&self) -> Option<i64> {
    match self.key {
      NaturalKey::Code(c) => Some(c),
      NaturalKey::Text(_) => None,
    }
  }

  pub fn text(&self) -> Option<&str> {
    match &self.key {
      NaturalKey::Text(t) => Some(t),
      NaturalKey::Code(_) => None,
    }
  }
}
