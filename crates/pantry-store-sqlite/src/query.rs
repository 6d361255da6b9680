//! Point lookups and read-side queries that are not full-text search.
//!
//! Every function here is synchronous and runs inside a
//! `tokio_rusqlite::Connection::call` closure.

use std::collections::{BTreeMap, HashSet};

use pantry_core::{
  Dataset, EntityKind, NaturalKey, Table,
  nutrients::KeyNutrients,
  view::{BarcodeMatch, CategoryCount, Macros, Stats},
};
use rusqlite::{Connection, OptionalExtension as _, params};
use strum::IntoEnumIterator as _;

use crate::encode::encode_key;

// ─── Import-side lookups ─────────────────────────────────────────────────────

pub fn contains(
  conn: &Connection,
  kind: EntityKind,
  key: NaturalKey,
) -> rusqlite::Result<bool> {
  let sql = format!(
    "SELECT 1 FROM {} WHERE {} = ?1",
    kind.table().name(),
    kind.key_column()
  );
  let found = conn
    .prepare_cached(&sql)?
    .query_row([encode_key(key)], |_| Ok(()))
    .optional()?;
  Ok(found.is_some())
}

pub fn food_keys(conn: &Connection, dataset: Dataset) -> rusqlite::Result<HashSet<i64>> {
  let kind = match dataset {
    Dataset::Fdc => EntityKind::FdcFood,
    Dataset::ChildNutrition => EntityKind::CnFood,
  };
  let sql = format!("SELECT {} FROM {}", kind.key_column(), kind.table().name());
  let mut stmt = conn.prepare(&sql)?;
  let keys = stmt
    .query_map([], |r| r.get::<_, i64>(0))?
    .collect::<rusqlite::Result<HashSet<_>>>()?;
  Ok(keys)
}

pub fn count(conn: &Connection, table: Table) -> rusqlite::Result<u64> {
  let sql = format!("SELECT COUNT(*) FROM {}", table.name());
  let n: i64 = conn.query_row(&sql, [], |r| r.get(0))?;
  Ok(n.max(0) as u64)
}

// ─── Barcode ─────────────────────────────────────────────────────────────────

pub fn lookup_barcode(
  conn: &Connection,
  barcode: &str,
) -> rusqlite::Result<Option<BarcodeMatch>> {
  if let Some(found) = branded_by_gtin(conn, barcode)? {
    return Ok(Some(found));
  }
  cn_by_gtin(conn, barcode)
}

fn branded_by_gtin(
  conn: &Connection,
  barcode: &str,
) -> rusqlite::Result<Option<BarcodeMatch>> {
  let row = conn
    .query_row(
      "SELECT f.fdc_id, f.description, b.gtin_upc, b.brand_owner, b.brand_name,
              b.ingredients, b.serving_size, b.serving_size_unit
       FROM fdc_branded_food b
       JOIN fdc_food f ON f.fdc_id = b.fdc_id
       WHERE b.gtin_upc = ?1
       ORDER BY f.fdc_id
       LIMIT 1",
      params![barcode],
      |r| {
        Ok(BarcodeMatch {
          dataset:           Dataset::Fdc,
          code:              r.get(0)?,
          description:       r.get(1)?,
          gtin:              r.get(2)?,
          brand_owner:       r.get(3)?,
          brand_name:        r.get(4)?,
          ingredients:       r.get(5)?,
          serving_size:      r.get(6)?,
          serving_size_unit: r.get(7)?,
          nutrition:         Macros::default(),
        })
      },
    )
    .optional()?;

  let Some(mut found) = row else { return Ok(None) };
  found.nutrition = macros(
    conn,
    "SELECT amount FROM fdc_food_nutrient
     WHERE fdc_id = ?1 AND nutrient_id = ?2
     ORDER BY id LIMIT 1",
    found.code,
    KeyNutrients::for_dataset(Dataset::Fdc),
  )?;
  Ok(Some(found))
}

fn cn_by_gtin(conn: &Connection, barcode: &str) -> rusqlite::Result<Option<BarcodeMatch>> {
  let row = conn
    .query_row(
      "SELECT cn_code, descriptor, gtin, brand_owner_name, brand_name
       FROM cn_food
       WHERE gtin = ?1
       ORDER BY cn_code
       LIMIT 1",
      params![barcode],
      |r| {
        Ok(BarcodeMatch {
          dataset:           Dataset::ChildNutrition,
          code:              r.get(0)?,
          description:       r.get(1)?,
          gtin:              r.get(2)?,
          brand_owner:       r.get(3)?,
          brand_name:        r.get(4)?,
          ingredients:       None,
          serving_size:      None,
          serving_size_unit: None,
          nutrition:         Macros::default(),
        })
      },
    )
    .optional()?;

  let Some(mut found) = row else { return Ok(None) };
  found.nutrition = macros(
    conn,
    "SELECT nutrient_value FROM cn_nutrient_value
     WHERE cn_code = ?1 AND nutrient_code = ?2",
    found.code,
    KeyNutrients::for_dataset(Dataset::ChildNutrition),
  )?;
  Ok(Some(found))
}

/// `sql` takes `(food key, nutrient code)` and yields a single amount.
fn macros(
  conn: &Connection,
  sql: &str,
  food: i64,
  key: &KeyNutrients,
) -> rusqlite::Result<Macros> {
  let mut stmt = conn.prepare_cached(sql)?;
  let mut amounts = [None; 6];
  for (slot, code) in amounts.iter_mut().zip(key.macro_codes()) {
    *slot = stmt
      .query_row(params![food, code], |r| r.get::<_, Option<f64>>(0))
      .optional()?
      .flatten();
  }
  Ok(Macros::from_amounts(amounts))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn stats(conn: &Connection) -> rusqlite::Result<Stats> {
  let mut tables = BTreeMap::new();
  for table in Table::iter() {
    tables.insert(table.name().to_owned(), count(conn, table)?);
  }

  let mut stmt = conn.prepare(
    "SELECT c.id, c.description, COUNT(f.fdc_id) AS n
     FROM fdc_food_category c
     JOIN fdc_food f ON f.food_category_id = c.id
     GROUP BY c.id, c.description
     ORDER BY n DESC, c.id
     LIMIT 10",
  )?;
  let top_categories = stmt
    .query_map([], |r| {
      Ok(CategoryCount {
        id:    r.get(0)?,
        name:  r.get(1)?,
        count: r.get::<_, i64>(2)?.max(0) as u64,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(Stats { tables, top_categories })
}
