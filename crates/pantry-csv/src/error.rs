//! Error types for the pantry-csv record parser.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("file not found: {}", .0.display())]
  FileNotFound(PathBuf),

  #[error("cannot open {}: {source}", .path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("{}: missing header row", .0.display())]
  MissingHeader(PathBuf),

  #[error("{}:{line}: {source}", .path.display())]
  Csv {
    path:   PathBuf,
    line:   u64,
    #[source]
    source: csv::Error,
  },
}

impl Error {
  pub fn is_not_found(&self) -> bool { matches!(self, Self::FileNotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
