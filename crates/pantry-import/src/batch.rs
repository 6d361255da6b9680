//! Buffered insert-or-ignore writes.

use std::mem;

use pantry_core::store::{Batch, FoodStore};
use tracing::debug;

use crate::error::{Error, Result};

/// Flush threshold for lookup tables (categories, nutrients, measure units,
/// GPC names).
pub const LOOKUP_BATCH: usize = 100;
/// Flush threshold for root foods and their one-to-one extensions.
pub const ROOT_BATCH: usize = 1000;
/// Flush threshold for fact tables (nutrient values, portions, weights).
pub const FACT_BATCH: usize = 5000;

/// Counters of one writer, reported when it is finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
  /// Rows handed to [`BatchWriter::add`].
  pub added:    u64,
  /// Rows the store actually inserted; duplicates are not counted.
  pub inserted: u64,
  pub flushes:  u64,
}

/// Accumulates rows and writes them in fixed-size batches.
pub struct BatchWriter<'s, S, T> {
  store:     &'s S,
  threshold: usize,
  buffer:    Vec<T>,
  stats:     WriteStats,
}

impl<'s, S, T> BatchWriter<'s, S, T>
where
  S: FoodStore,
  Vec<T>: Into<Batch>,
{
  pub fn new(store: &'s S, threshold: usize) -> Self {
    let threshold = threshold.max(1);
    Self { store, threshold, buffer: Vec::with_capacity(threshold), stats: WriteStats::default() }
  }

  /// Buffer `row`, flushing once the threshold is reached.
  pub async fn add(&mut self, row: T) -> Result<()> {
    self.buffer.push(row);
    self.stats.added += 1;
    if self.buffer.len() >= self.threshold {
      self.flush().await?;
    }
    Ok(())
  }

  /// Persist whatever is buffered. A no-op when the buffer is empty.
  pub async fn flush(&mut self) -> Result<()> {
    if self.buffer.is_empty() {
      return Ok(());
    }
    let rows = mem::replace(&mut self.buffer, Vec::with_capacity(self.threshold));
    let batch: Batch = rows.into();
    let (table, len) = (batch.table(), batch.len());

    let inserted = self.store.insert_batch(batch).await.map_err(Error::store)?;
    self.stats.inserted += inserted as u64;
    self.stats.flushes += 1;
    debug!(table = %table, rows = len, inserted, "flushed batch");
    Ok(())
  }

  /// Flush the remainder and return the counters.
  pub async fn finish(mut self) -> Result<WriteStats> {
    self.flush().await?;
    Ok(self.stats)
  }

  pub fn stats(&self) -> WriteStats { self.stats }
}
