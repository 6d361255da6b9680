//! Delimited-file record parser for Pantry.
//!
//! Reads a CSV file with a header row into a lazy sequence of
//! field-name → raw-text records in file order. Values stay raw text;
//! converting them to numbers or dates is the caller's job. Pure
//! synchronous; no database dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let records = pantry_csv::open("food.csv").unwrap();
//! for record in records {
//!   let record = record.unwrap();
//!   println!("{:?} on line {}", record.value("description"), record.line());
//! }
//! ```

pub mod error;
mod record;

use std::{fs::File, io::Read, path::PathBuf};

pub use error::{Error, Result};
pub use record::{Record, Records};

/// Open `path` for reading.
///
/// A missing file yields [`Error::FileNotFound`] so callers can decide
/// whether the file was optional.
pub fn open(path: impl Into<PathBuf>) -> Result<Records<File>> {
  let path = path.into();
  let file = match File::open(&path) {
    Ok(file) => file,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(Error::FileNotFound(path));
    }
    Err(source) => return Err(Error::Open { path, source }),
  };
  Records::new(file, path)
}

/// Read records from any byte source. `source` names it in errors.
pub fn from_reader<R: Read>(reader: R, source: impl Into<PathBuf>) -> Result<Records<R>> {
  Records::new(reader, source.into())
}
