//! Header-indexed record iteration.
//!
//! Header names are matched case-insensitively after trimming, so
//! `"Cn Code"` and `"Cn code"` address the same column. Rows shorter than
//! the header are accepted; their trailing fields read as absent.

use std::{collections::HashMap, io::Read, path::PathBuf, sync::Arc};

use csv::StringRecord;

use crate::error::{Error, Result};

fn normalize(name: &str) -> String {
  name.trim_start_matches('\u{feff}').trim().to_lowercase()
}

#[derive(Debug)]
struct Header {
  index: HashMap<String, usize>,
}

impl Header {
  fn position(&self, name: &str) -> Option<usize> {
    match self.index.get(name) {
      Some(i) => Some(*i),
      None => self.index.get(&normalize(name)).copied(),
    }
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A lazy, single-pass sequence of [`Record`]s.
pub struct Records<R> {
  reader: csv::Reader<R>,
  header: Arc<Header>,
  path:   PathBuf,
}

impl<R: Read> Records<R> {
  pub(crate) fn new(reader: R, path: PathBuf) -> Result<Self> {
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(true)
      .flexible(true)
      .from_reader(reader);

    let names = reader.headers().map_err(|source| Error::Csv {
      path: path.clone(),
      line: 1,
      source,
    })?;
    // A file with no header line at all is an empty table.
    if !names.is_empty() && names.iter().all(|n| n.trim().is_empty()) {
      return Err(Error::MissingHeader(path));
    }

    let mut index = HashMap::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
      // First occurrence wins for duplicated header names.
      index.entry(normalize(name)).or_insert(i);
    }

    Ok(Self { reader, header: Arc::new(Header { index }), path })
  }

  /// The file these records come from.
  pub fn path(&self) -> &std::path::Path { &self.path }
}

impl<R: Read> Iterator for Records<R> {
  type Item = Result<Record>;

  fn next(&mut self) -> Option<Self::Item> {
    let mut fields = StringRecord::new();
    match self.reader.read_record(&mut fields) {
      Ok(true) => {
        let line = fields.position().map_or(0, |p| p.line());
        Some(Ok(Record { header: Arc::clone(&self.header), fields, line }))
      }
      Ok(false) => None,
      Err(source) => {
        let line = source.position().map_or(0, |p| p.line());
        Some(Err(Error::Csv { path: self.path.clone(), line, source }))
      }
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// One data row, addressed by header name.
#[derive(Debug, Clone)]
pub struct Record {
  header: Arc<Header>,
  fields: StringRecord,
  line:   u64,
}

impl Record {
  /// 1-based line number of this row in its file.
  pub fn line(&self) -> u64 { self.line }

  /// The raw field text, or `None` when the column is absent from the
  /// header or from this (short) row.
  pub fn get(&self, column: &str) -> Option<&str> {
    self.header.position(column).and_then(|i| self.fields.get(i))
  }

  /// The trimmed field text, or `None` when absent or blank.
  pub fn value(&self, column: &str) -> Option<&str> {
    self.get(column).map(str::trim).filter(|v| !v.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use crate::{Error, from_reader, open};

  #[test]
  fn reads_fields_by_header_name_in_file_order() {
    let input = "id,code,description\n1,0100,Dairy and Egg Products\n2,0200,Spices and Herbs\n";
    let rows: Vec<_> = from_reader(input.as_bytes(), "food_category.csv")
      .unwrap()
      .collect::<Result<_, _>>()
      .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("id"), Some("1"));
    assert_eq!(rows[0].get("code"), Some("0100"));
    assert_eq!(rows[1].get("description"), Some("Spices and Herbs"));
    assert_eq!(rows[0].line(), 2);
    assert_eq!(rows[1].line(), 3);
  }

  #[test]
  fn missing_columns_and_short_rows_read_as_absent() {
    let input = "fdc_id,amount,footnote\n100,1.5\n";
    let row = from_reader(input.as_bytes(), "t.csv")
      .unwrap()
      .next()
      .unwrap()
      .unwrap();

    assert_eq!(row.get("amount"), Some("1.5"));
    assert_eq!(row.get("footnote"), None);
    assert_eq!(row.get("not_a_column"), None);
  }

  #[test]
  fn value_treats_blank_as_absent() {
    let input = "gtin,brand_name\n  ,Acme \n";
    let row = from_reader(input.as_bytes(), "t.csv")
      .unwrap()
      .next()
      .unwrap()
      .unwrap();

    assert_eq!(row.get("gtin"), Some("  "));
    assert_eq!(row.value("gtin"), None);
    assert_eq!(row.value("brand_name"), Some("Acme"));
  }

  #[test]
  fn header_lookup_ignores_case_whitespace_and_bom() {
    let input = "\u{feff}Cn Code, Nutrient code \n12345,208\n";
    let row = from_reader(input.as_bytes(), "t.csv")
      .unwrap()
      .next()
      .unwrap()
      .unwrap();

    assert_eq!(row.get("Cn code"), Some("12345"));
    assert_eq!(row.get("Nutrient code"), Some("208"));
  }

  #[test]
  fn quoted_fields_keep_embedded_delimiters() {
    let input = "fdc_id,description\n7,\"Cheese, cheddar \"\"sharp\"\"\"\n";
    let row = from_reader(input.as_bytes(), "t.csv")
      .unwrap()
      .next()
      .unwrap()
      .unwrap();

    assert_eq!(row.get("description"), Some("Cheese, cheddar \"sharp\""));
  }

  #[test]
  fn open_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = open(dir.path().join("nope.csv")).err().unwrap();
    assert!(err.is_not_found());
  }

  #[test]
  fn open_reads_file_lazily() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("measure_unit.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "id,name").unwrap();
    writeln!(file, "1000,cup").unwrap();
    writeln!(file, "1001,tbsp").unwrap();
    drop(file);

    let mut records = open(&path).unwrap();
    assert_eq!(records.path(), path.as_path());
    assert_eq!(records.next().unwrap().unwrap().get("name"), Some("cup"));
    assert_eq!(records.next().unwrap().unwrap().get("name"), Some("tbsp"));
    assert!(records.next().is_none());
  }

  #[test]
  fn empty_input_yields_no_records() {
    let mut records = from_reader("".as_bytes(), "empty.csv").unwrap();
    assert!(records.next().is_none());
  }

  #[test]
  fn blank_header_names_are_rejected() {
    let err = from_reader(",,\n1,2,3\n".as_bytes(), "blank.csv").err().unwrap();
    assert!(matches!(err, Error::MissingHeader(_)));
  }
}
