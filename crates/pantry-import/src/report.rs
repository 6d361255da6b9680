//! Per-stage and per-run outcome records.

use std::{fmt, path::PathBuf};

use pantry_core::Dataset;

use crate::stage::Stage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
  /// Turned off by the caller.
  Disabled,
  /// The stage's optional file is not in the source directory.
  MissingFile(PathBuf),
}

impl fmt::Display for SkipReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Disabled => f.write_str("disabled"),
      Self::MissingFile(path) => write!(f, "missing {}", path.display()),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
  Completed,
  Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
  pub stage:     Stage,
  pub status:    StageStatus,
  /// Records read from the file, malformed ones included.
  pub read:      u64,
  /// Rows handed to storage.
  pub admitted:  u64,
  /// Rows discarded for an unresolved food or nutrient, or a food outside
  /// the admitted set.
  pub dropped:   u64,
  /// Rows skipped under [`MalformedRows::Skip`](crate::MalformedRows::Skip).
  pub malformed: u64,
  /// Rows actually inserted; re-imported keys are not counted.
  pub inserted:  u64,
  pub flushes:   u64,
}

impl StageReport {
  pub(crate) fn new(stage: Stage) -> Self {
    Self {
      stage,
      status: StageStatus::Completed,
      read: 0,
      admitted: 0,
      dropped: 0,
      malformed: 0,
      inserted: 0,
      flushes: 0,
    }
  }

  pub(crate) fn skipped(stage: Stage, reason: SkipReason) -> Self {
    Self { status: StageStatus::Skipped(reason), ..Self::new(stage) }
  }

  pub fn is_skipped(&self) -> bool { matches!(self.status, StageStatus::Skipped(_)) }
}

/// How the post-load search index refresh went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchIndexOutcome {
  Refreshed { foods: u64 },
  /// The refresh was rolled back; the imported rows are unaffected.
  Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
  pub dataset:      Dataset,
  pub stages:       Vec<StageReport>,
  pub search_index: SearchIndexOutcome,
}

impl ImportSummary {
  pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
    self.stages.iter().find(|r| r.stage == stage)
  }

  pub fn inserted(&self) -> u64 { self.stages.iter().map(|r| r.inserted).sum() }
}
