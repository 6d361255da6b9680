//! Error types for the import pipeline.
//!
//! Lookup misses are not errors: they surface as `None` from the resolver.
//! Everything here stops the run.

use std::path::PathBuf;

use pantry_core::Dataset;
use thiserror::Error;

/// A field that could not be converted to its column type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
  #[error("required field `{0}` is missing or blank")]
  Missing(&'static str),

  #[error("field `{column}`: `{value}` is not an integer")]
  InvalidInt { column: &'static str, value: String },

  #[error("field `{column}`: `{value}` is not a number")]
  InvalidFloat { column: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Csv(#[from] pantry_csv::Error),

  #[error("storage error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("{dataset} import: required files missing: {}", display_paths(.files))]
  MissingFiles { dataset: Dataset, files: Vec<PathBuf> },

  #[error("{}:{line}: {source}", .file.display())]
  MalformedRow {
    file:   PathBuf,
    line:   u64,
    #[source]
    source: FieldError,
  },
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

fn display_paths(files: &[PathBuf]) -> String {
  files
    .iter()
    .map(|f| f.display().to_string())
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
