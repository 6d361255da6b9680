//! Derived search column, FTS5 index and the search/autocomplete queries.
//!
//! The index tables are external to the schema: a refresh creates them on
//! first use. Searching works without them by falling back to substring
//! matching.

use pantry_core::{
  Dataset,
  view::{FoodHit, FoodQuery, SearchPage},
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, params};

use crate::encode::contains_pattern;

/// Ranked search is only attempted for queries longer than this.
const MIN_RANKED_LEN: usize = 2;

/// Autocomplete needs at least this many characters.
const MIN_AUTOCOMPLETE_LEN: usize = 2;

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Per-dataset SQL fragments. `f` aliases the food table, `c` the category.
struct Layout {
  dataset:   Dataset,
  food:      &'static str,
  key:       &'static str,
  fts:       &'static str,
  /// Column definitions of the FTS5 table, in index order.
  fts_cols:  &'static str,
  /// Expression the FTS5 table is filled from.
  fts_src:   &'static str,
  vector:    &'static str,
  desc:      &'static str,
  data_type: &'static str,
  category:  &'static str,
  join_cat:  &'static str,
  rank:      &'static str,
  like:      &'static str,
}

const FDC: Layout = Layout {
  dataset:   Dataset::Fdc,
  food:      "fdc_food",
  key:       "fdc_id",
  fts:       "fdc_food_fts",
  fts_cols:  "description",
  fts_src:   "description",
  vector:    "lower(trim(description))",
  desc:      "f.description",
  data_type: "f.data_type",
  category:  "f.food_category_id",
  join_cat:  "LEFT JOIN fdc_food_category c ON c.id = f.food_category_id",
  rank:      "bm25(fdc_food_fts)",
  like:      r"f.description LIKE ?1 ESCAPE '\'",
};

const CN: Layout = Layout {
  dataset:   Dataset::ChildNutrition,
  food:      "cn_food",
  key:       "cn_code",
  fts:       "cn_food_fts",
  fts_cols:  "descriptor, abbreviated_descriptor",
  fts_src:   "descriptor, abbreviated_descriptor",
  vector:    "lower(trim(descriptor || ' ' || coalesce(abbreviated_descriptor, '')))",
  desc:      "f.descriptor",
  data_type: "NULL",
  category:  "f.food_category_code",
  join_cat:  "LEFT JOIN cn_food_category c ON c.code = f.food_category_code",
  rank:      "bm25(cn_food_fts, 1.0, 0.4)",
  like:      r"(f.descriptor LIKE ?1 ESCAPE '\' OR f.abbreviated_descriptor LIKE ?1 ESCAPE '\')",
};

fn layout(dataset: Dataset) -> &'static Layout {
  match dataset {
    Dataset::Fdc => &FDC,
    Dataset::ChildNutrition => &CN,
  }
}

// ─── Refresh ─────────────────────────────────────────────────────────────────

/// Recompute `search_vector` and rebuild the FTS5 index of `dataset`.
///
/// Runs inside the caller's transaction; nothing is visible unless the
/// caller commits.
pub fn refresh(tx: &Transaction<'_>, dataset: Dataset) -> rusqlite::Result<u64> {
  let l = layout(dataset);

  tx.execute_batch(&format!(
    "CREATE VIRTUAL TABLE IF NOT EXISTS {fts} USING fts5({cols});
     UPDATE {food} SET search_vector = {vector};
     DELETE FROM {fts};
     INSERT INTO {fts} (rowid, {cols}) SELECT {key}, {src} FROM {food};",
    fts = l.fts,
    cols = l.fts_cols,
    food = l.food,
    vector = l.vector,
    key = l.key,
    src = l.fts_src,
  ))?;

  let n: i64 = tx.query_row(&format!("SELECT COUNT(*) FROM {}", l.food), [], |r| {
    r.get(0)
  })?;
  Ok(n.max(0) as u64)
}

fn index_exists(conn: &Connection, l: &Layout) -> rusqlite::Result<bool> {
  let found = conn
    .query_row(
      "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
      params![l.fts],
      |_| Ok(()),
    )
    .optional()?;
  Ok(found.is_some())
}

// ─── Search ──────────────────────────────────────────────────────────────────

pub fn search(conn: &Connection, query: &FoodQuery) -> rusqlite::Result<SearchPage> {
  let text = query.text.trim();
  if text.is_empty() {
    return Ok(SearchPage::empty(query.page, query.page_size));
  }

  let l = layout(query.dataset);
  if text.chars().count() > MIN_RANKED_LEN
    && let Some(expr) = match_expression(text)
    && index_exists(conn, l)?
  {
    // A MATCH error (e.g. an index left behind by an older build) degrades
    // to substring search.
    if let Ok(page) = ranked(conn, l, &expr, query) {
      return Ok(page);
    }
  }
  substring(conn, l, text, query)
}

/// Each alphanumeric token becomes a quoted prefix term; terms are ANDed.
fn match_expression(text: &str) -> Option<String> {
  let terms: Vec<String> = text
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| !t.is_empty())
    .map(|t| format!("\"{}\"*", t.to_lowercase()))
    .collect();
  (!terms.is_empty()).then(|| terms.join(" "))
}

fn data_type_filter<'q>(l: &Layout, query: &'q FoodQuery) -> Option<&'q str> {
  match l.dataset {
    Dataset::Fdc => query.data_type.as_deref(),
    Dataset::ChildNutrition => None,
  }
}

fn ranked(
  conn: &Connection,
  l: &Layout,
  expr: &str,
  query: &FoodQuery,
) -> rusqlite::Result<SearchPage> {
  let filter = format!(
    "FROM {fts}
     JOIN {food} f ON f.{key} = {fts}.rowid
     {join_cat}
     WHERE {fts} MATCH ?1
       AND (?2 IS NULL OR {data_type} = ?2)
       AND (?3 IS NULL OR {category} = ?3)",
    fts = l.fts,
    food = l.food,
    key = l.key,
    join_cat = l.join_cat,
    data_type = l.data_type,
    category = l.category,
  );
  let data_type = data_type_filter(l, query);

  let total: i64 = conn.query_row(
    &format!("SELECT COUNT(*) {filter}"),
    params![expr, data_type, query.category],
    |r| r.get(0),
  )?;

  let sql = format!(
    "SELECT f.{key}, {desc}, {data_type}, c.description, {rank} AS score
     {filter}
     ORDER BY score, f.{key}
     LIMIT ?4 OFFSET ?5",
    key = l.key,
    desc = l.desc,
    data_type = l.data_type,
    rank = l.rank,
  );
  let mut stmt = conn.prepare(&sql)?;
  let results = stmt
    .query_map(
      params![
        expr,
        data_type,
        query.category,
        query.page_size as i64,
        query.offset() as i64
      ],
      |r| {
        Ok(FoodHit {
          dataset:     l.dataset,
          code:        r.get(0)?,
          description: r.get(1)?,
          data_type:   r.get(2)?,
          category:    r.get(3)?,
          rank:        r.get(4)?,
        })
      },
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(SearchPage::new(results, total.max(0) as u64, query))
}

fn substring(
  conn: &Connection,
  l: &Layout,
  text: &str,
  query: &FoodQuery,
) -> rusqlite::Result<SearchPage> {
  let filter = format!(
    "FROM {food} f
     {join_cat}
     WHERE {like}
       AND (?2 IS NULL OR {data_type} = ?2)
       AND (?3 IS NULL OR {category} = ?3)",
    food = l.food,
    join_cat = l.join_cat,
    like = l.like,
    data_type = l.data_type,
    category = l.category,
  );
  let pattern = contains_pattern(text);
  let data_type = data_type_filter(l, query);

  let total: i64 = conn.query_row(
    &format!("SELECT COUNT(*) {filter}"),
    params![pattern, data_type, query.category],
    |r| r.get(0),
  )?;

  let sql = format!(
    "SELECT f.{key}, {desc}, {data_type}, c.description
     {filter}
     ORDER BY {desc}, f.{key}
     LIMIT ?4 OFFSET ?5",
    key = l.key,
    desc = l.desc,
    data_type = l.data_type,
  );
  let mut stmt = conn.prepare(&sql)?;
  let results = stmt
    .query_map(
      params![
        pattern,
        data_type,
        query.category,
        query.page_size as i64,
        query.offset() as i64
      ],
      |r| {
        Ok(FoodHit {
          dataset:     l.dataset,
          code:        r.get(0)?,
          description: r.get(1)?,
          data_type:   r.get(2)?,
          category:    r.get(3)?,
          rank:        None,
        })
      },
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(SearchPage::new(results, total.max(0) as u64, query))
}

// ─── Autocomplete ────────────────────────────────────────────────────────────

pub fn autocomplete(
  conn: &Connection,
  dataset: Dataset,
  text: &str,
  limit: usize,
) -> rusqlite::Result<Vec<String>> {
  let text = text.trim();
  if text.chars().count() < MIN_AUTOCOMPLETE_LEN || limit == 0 {
    return Ok(Vec::new());
  }

  let l = layout(dataset);
  let sql = format!(
    r"SELECT DISTINCT {desc} FROM {food} f
      WHERE {desc} LIKE ?1 ESCAPE '\'
      ORDER BY {desc}
      LIMIT ?2",
    desc = l.desc,
    food = l.food,
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params![contains_pattern(text), limit as i64], |r| r.get(0))?
    .collect::<rusqlite::Result<Vec<String>>>()?;
  Ok(rows)
}
