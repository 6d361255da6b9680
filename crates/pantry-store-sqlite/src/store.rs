//! [`SqliteStore`]: the SQLite implementation of [`FoodStore`].

use std::{collections::HashSet, path::Path};

use pantry_core::{
  Dataset, EntityKind, NaturalKey, Table,
  store::{Batch, FoodStore},
  view::{BarcodeMatch, FoodQuery, SearchPage, Stats},
};

use tracing::debug;

use crate::{Error, Result, insert, query, schema::SCHEMA, search};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Pantry nutrition store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    debug!(path = %path.display(), "store opened");
    Ok(store)
  }

  /// Open an in-memory store; useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── FoodStore impl ──────────────────────────────────────────────────────────

impl FoodStore for SqliteStore {
  type Error = Error;

  async fn insert_batch(&self, batch: Batch) -> Result<usize> {
    if batch.is_empty() {
      return Ok(0);
    }
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = insert::insert_batch(&tx, batch)?;
        tx.commit()?;
        Ok(n)
      })
      .await?;
    Ok(inserted)
  }

  async fn contains(&self, kind: EntityKind, key: NaturalKey) -> Result<bool> {
    let found = self
      .conn
      .call(move |conn| Ok(query::contains(conn, kind, key)?))
      .await?;
    Ok(found)
  }

  async fn food_keys(&self, dataset: Dataset) -> Result<HashSet<i64>> {
    let keys = self
      .conn
      .call(move |conn| Ok(query::food_keys(conn, dataset)?))
      .await?;
    Ok(keys)
  }

  async fn count(&self, table: Table) -> Result<u64> {
    let n = self
      .conn
      .call(move |conn| Ok(query::count(conn, table)?))
      .await?;
    Ok(n)
  }

  async fn refresh_search_index(&self, dataset: Dataset) -> Result<u64> {
    let indexed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let n = search::refresh(&tx, dataset)?;
        tx.commit()?;
        Ok(n)
      })
      .await?;
    Ok(indexed)
  }

  async fn search<'a>(&'a self, query: &'a FoodQuery) -> Result<SearchPage> {
    let query = query.clone();
    let page = self
      .conn
      .call(move |conn| Ok(search::search(conn, &query)?))
      .await?;
    Ok(page)
  }

  async fn autocomplete<'a>(
    &'a self,
    dataset: Dataset,
    text: &'a str,
    limit: usize,
  ) -> Result<Vec<String>> {
    let text = text.to_owned();
    let rows = self
      .conn
      .call(move |conn| Ok(search::autocomplete(conn, dataset, &text, limit)?))
      .await?;
    Ok(rows)
  }

  async fn lookup_barcode<'a>(&'a self, barcode: &'a str) -> Result<Option<BarcodeMatch>> {
    let barcode = barcode.trim().to_owned();
    if barcode.is_empty() {
      return Ok(None);
    }
    let found = self
      .conn
      .call(move |conn| Ok(query::lookup_barcode(conn, &barcode)?))
      .await?;
    Ok(found)
  }

  async fn stats(&self) -> Result<Stats> {
    let stats = self.conn.call(|conn| Ok(query::stats(conn)?)).await?;
    Ok(stats)
  }
}
