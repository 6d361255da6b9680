//! Reference resolution and date parsing.
//!
//! The resolver only ever reads: it answers whether a referenced row is
//! already stored and never creates one. A miss is `Ok(None)`; only storage
//! failures are errors.

use std::collections::HashMap;

use chrono::{Datelike as _, NaiveDate};
use pantry_core::{EntityKind, NaturalKey, Reference, store::FoodStore};

use crate::error::{Error, Result};

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Point lookups against persisted rows, memoised per run.
///
/// Referenced tables are fully loaded before any stage that points at them
/// starts, so a cached answer cannot go stale within a run.
#[derive(Debug, Default)]
pub struct Resolver {
  cache: HashMap<(EntityKind, NaturalKey), bool>,
}

impl Resolver {
  pub fn new() -> Self { Self::default() }

  pub async fn resolve<S: FoodStore>(
    &mut self,
    store: &S,
    kind: EntityKind,
    key: impl Into<NaturalKey>,
  ) -> Result<Option<Reference>> {
    let key = key.into();
    let found = match self.cache.get(&(kind, key.clone())) {
      Some(found) => *found,
      None => {
        let found = store.contains(kind, key.clone()).await.map_err(Error::store)?;
        self.cache.insert((kind, key.clone()), found);
        found
      }
    };
    Ok(found.then_some(Reference { kind, key }))
  }

  /// Resolve an optional key; an absent key is simply no reference.
  pub async fn resolve_opt<S: FoodStore>(
    &mut self,
    store: &S,
    kind: EntityKind,
    key: Option<impl Into<NaturalKey>>,
  ) -> Result<Option<Reference>> {
    match key {
      Some(key) => self.resolve(store, kind, key).await,
      None => Ok(None),
    }
  }
}

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Parse a release-file date.
///
/// `MM/DD/YYYY` first, then `MM/DD/YY` (00-68 → 20xx, 69-99 → 19xx), then
/// ISO `YYYY-MM-DD`. Blank or unrecognised input is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }
  // `%Y` happily reads "24" as year 24, so the long form must be checked.
  NaiveDate::parse_from_str(raw, "%m/%d/%Y")
    .ok()
    .filter(|d| d.year() >= 1000)
    .or_else(|| NaiveDate::parse_from_str(raw, "%m/%d/%y").ok().and_then(pivot_century))
    .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
}

/// chrono maps two-digit years 00-69 to 20xx; 69 belongs to the 1900s.
fn pivot_century(date: NaiveDate) -> Option<NaiveDate> {
  if date.year() >= 2069 { date.with_year(date.year() - 100) } else { Some(date) }
}
