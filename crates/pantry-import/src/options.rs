//! Caller-supplied knobs for one import run.

use std::path::PathBuf;

use serde::Deserialize;
use strum::{Display, EnumString};

/// Release prefix of the Child Nutrition file names.
pub const DEFAULT_CN_RELEASE: &str = "CN.2025.05";

/// What to do with a row whose required fields do not convert.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MalformedRows {
  /// Stop the stage, and with it the run, at the first bad row.
  #[default]
  Abort,
  /// Log the row, count it and carry on.
  Skip,
}

#[derive(Debug, Clone)]
pub struct ImportOptions {
  /// Directory holding the dataset's files.
  pub source_dir:     PathBuf,
  /// Admit at most this many root food rows, first in file order. Rows are
  /// counted, not distinct keys: a repeated food row uses up the limit too.
  pub limit:          Option<u64>,
  /// Skip the nutrient fact stage.
  pub skip_nutrients: bool,
  /// Skip the portion (FDC) or weight (CN) stage.
  pub skip_portions:  bool,
  pub malformed:      MalformedRows,
  pub cn_release:     String,
}

impl ImportOptions {
  pub fn new(source_dir: impl Into<PathBuf>) -> Self {
    Self {
      source_dir:     source_dir.into(),
      limit:          None,
      skip_nutrients: false,
      skip_portions:  false,
      malformed:      MalformedRows::default(),
      cn_release:     DEFAULT_CN_RELEASE.to_owned(),
    }
  }
}
