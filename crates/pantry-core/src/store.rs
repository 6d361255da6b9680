//! The `FoodStore` trait and the batch type it ingests.
//!
//! The trait is implemented by storage backends (e.g. `pantry-store-sqlite`).
//! The importer and the read API depend on this abstraction, not on any
//! concrete backend.

use std::{collections::HashSet, future::Future};

use crate::{
  cn::{CnCategory, CnFood, CnGpcName, CnNutrient, CnNutrientValue, CnWeight},
  dataset::{Dataset, Table},
  fdc::{
    FdcBrandedFood, FdcCategory, FdcFood, FdcFoodNutrient, FdcFoodPortion,
    FdcFoundationFood, FdcMeasureUnit, FdcNutrient, FdcSrLegacyFood,
    FdcSurveyFood,
  },
  reference::{EntityKind, NaturalKey},
  view::{BarcodeMatch, FoodQuery, SearchPage, Stats},
};

// ─── Batch ───────────────────────────────────────────────────────────────────

/// A homogeneous group of rows bound for one table.
#[derive(Debug, Clone, PartialEq)]
pub enum Batch {
  FdcCategories(Vec<FdcCategory>),
  FdcNutrients(Vec<FdcNutrient>),
  FdcMeasureUnits(Vec<FdcMeasureUnit>),
  FdcFoods(Vec<FdcFood>),
  FdcFoodNutrients(Vec<FdcFoodNutrient>),
  FdcFoodPortions(Vec<FdcFoodPortion>),
  FdcBrandedFoods(Vec<FdcBrandedFood>),
  FdcFoundationFoods(Vec<FdcFoundationFood>),
  FdcSrLegacyFoods(Vec<FdcSrLegacyFood>),
  FdcSurveyFoods(Vec<FdcSurveyFood>),
  CnCategories(Vec<CnCategory>),
  CnNutrients(Vec<CnNutrient>),
  CnGpcNames(Vec<CnGpcName>),
  CnFoods(Vec<CnFood>),
  CnNutrientValues(Vec<CnNutrientValue>),
  CnWeights(Vec<CnWeight>),
}

macro_rules! batch_variants {
  ($($variant:ident($row:ty) => $table:ident),* $(,)?) => {
    impl Batch {
      pub fn table(&self) -> Table {
        match self {
          $(Self::$variant(_) => Table::$table,)*
        }
      }

      pub fn len(&self) -> usize {
        match self {
          $(Self::$variant(rows) => rows.len(),)*
        }
      }

      pub fn is_empty(&self) -> bool { self.len() == 0 }
    }

    $(
      impl From<Vec<$row>> for Batch {
        fn from(rows: Vec<$row>) -> Self { Self::$variant(rows) }
      }
    )*
  };
}

batch_variants! {
  FdcCategories(FdcCategory) => FdcFoodCategory,
  FdcNutrients(FdcNutrient) => FdcNutrient,
  FdcMeasureUnits(FdcMeasureUnit) => FdcMeasureUnit,
  FdcFoods(FdcFood) => FdcFood,
  FdcFoodNutrients(FdcFoodNutrient) => FdcFoodNutrient,
  FdcFoodPortions(FdcFoodPortion) => FdcFoodPortion,
  FdcBrandedFoods(FdcBrandedFood) => FdcBrandedFood,
  FdcFoundationFoods(FdcFoundationFood) => FdcFoundationFood,
  FdcSrLegacyFoods(FdcSrLegacyFood) => FdcSrLegacyFood,
  FdcSurveyFoods(FdcSurveyFood) => FdcSurveyFnddsFood,
  CnCategories(CnCategory) => CnFoodCategory,
  CnNutrients(CnNutrient) => CnNutrient,
  CnGpcNames(CnGpcName) => CnGpcName,
  CnFoods(CnFood) => CnFood,
  CnNutrientValues(CnNutrientValue) => CnNutrientValue,
  CnWeights(CnWeight) => CnWeight,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Pantry storage backend.
///
/// Writes are insert-or-ignore: a row whose key already exists is skipped,
/// never overwritten. The derived search column is the only data ever
/// recomputed after load.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FoodStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Import side ───────────────────────────────────────────────────────

  /// Persist `batch` in one transaction, skipping rows that conflict with
  /// an existing key. Returns the number of rows actually inserted.
  fn insert_batch(
    &self,
    batch: Batch,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Point lookup: does a row of `kind` with `key` exist?
  fn contains(
    &self,
    kind: EntityKind,
    key: NaturalKey,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every stored root food key of `dataset`.
  fn food_keys(
    &self,
    dataset: Dataset,
  ) -> impl Future<Output = Result<HashSet<i64>, Self::Error>> + Send + '_;

  fn count(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Recompute the derived search column and full-text index of `dataset`
  /// in a single all-or-nothing transaction. Returns the number of foods
  /// indexed.
  fn refresh_search_index(
    &self,
    dataset: Dataset,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Read side ─────────────────────────────────────────────────────────

  fn search<'a>(
    &'a self,
    query: &'a FoodQuery,
  ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send + 'a;

  /// Distinct food descriptions containing `text`.
  fn autocomplete<'a>(
    &'a self,
    dataset: Dataset,
    text: &'a str,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Find a food by GTIN/UPC: branded FDC foods first, then CN foods.
  fn lookup_barcode<'a>(
    &'a self,
    barcode: &'a str,
  ) -> impl Future<Output = Result<Option<BarcodeMatch>, Self::Error>> + Send + 'a;

  fn stats(&self) -> impl Future<Output = Result<Stats, Self::Error>> + Send + '_;
}
