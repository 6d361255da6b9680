//! Read models returned by the query side of a [`FoodStore`].
//!
//! [`FoodStore`]: crate::store::FoodStore

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

// ─── Search ──────────────────────────────────────────────────────────────────

/// Parameters for [`FoodStore::search`](crate::store::FoodStore::search).
#[derive(Debug, Clone)]
pub struct FoodQuery {
  pub text:      String,
  pub dataset:   Dataset,
  /// FDC `data_type` filter; ignored for the Child Nutrition dataset.
  pub data_type: Option<String>,
  pub category:  Option<i64>,
  /// 1-based page number.
  pub page:      u64,
  pub page_size: u64,
}

impl Default for FoodQuery {
  fn default() -> Self {
    Self {
      text:      String::new(),
      dataset:   Dataset::Fdc,
      data_type: None,
      category:  None,
      page:      1,
      page_size: 20,
    }
  }
}

impl FoodQuery {
  pub fn offset(&self) -> u64 { self.page.saturating_sub(1) * self.page_size }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodHit {
  pub dataset:     Dataset,
  pub code:        i64,
  pub description: String,
  pub data_type:   Option<String>,
  pub category:    Option<String>,
  /// Full-text rank; lower is better. `None` for substring matches.
  pub rank:        Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
  pub results:     Vec<FoodHit>,
  pub total_count: u64,
  pub page:        u64,
  pub page_size:   u64,
  pub total_pages: u64,
}

impl SearchPage {
  pub fn empty(page: u64, page_size: u64) -> Self {
    Self { results: Vec::new(), total_count: 0, page, page_size, total_pages: 0 }
  }

  pub fn new(results: Vec<FoodHit>, total_count: u64, query: &FoodQuery) -> Self {
    let total_pages = if query.page_size == 0 {
      0
    } else {
      total_count.div_ceil(query.page_size)
    };
    Self {
      results,
      total_count,
      page: query.page,
      page_size: query.page_size,
      total_pages,
    }
  }
}

// ─── Barcode ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
  pub calories: Option<f64>,
  pub protein:  Option<f64>,
  pub fat:      Option<f64>,
  pub carbs:    Option<f64>,
  pub fiber:    Option<f64>,
  pub sugars:   Option<f64>,
}

impl Macros {
  /// Build from amounts in [`KeyNutrients::macro_codes`] order.
  ///
  /// [`KeyNutrients::macro_codes`]: crate::nutrients::KeyNutrients::macro_codes
  pub fn from_amounts(a: [Option<f64>; 6]) -> Self {
    let [calories, protein, fat, carbs, fiber, sugars] = a;
    Self { calories, protein, fat, carbs, fiber, sugars }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarcodeMatch {
  pub dataset:           Dataset,
  pub code:              i64,
  pub description:       String,
  pub gtin:              String,
  pub brand_owner:       Option<String>,
  pub brand_name:        Option<String>,
  pub ingredients:       Option<String>,
  pub serving_size:      Option<f64>,
  pub serving_size_unit: Option<String>,
  pub nutrition:         Macros,
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
  pub id:    i64,
  pub name:  String,
  pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
  /// Row count per table name.
  pub tables:         BTreeMap<String, u64>,
  /// The ten FDC categories with the most foods.
  pub top_categories: Vec<CategoryCount>,
}
