//! FoodData Central entities.
//!
//! Keys are the published FDC integer ids. Extension rows (branded,
//! foundation, SR legacy, survey) share the `fdc_id` of their food.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcCategory {
  pub id:          i64,
  pub code:        String,
  pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcNutrient {
  pub id:           i64,
  pub name:         String,
  pub unit_name:    String,
  pub nutrient_nbr: Option<String>,
  pub rank:         Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcMeasureUnit {
  pub id:   i64,
  pub name: String,
}

// ─── Root ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcFood {
  pub fdc_id:           i64,
  pub data_type:        String,
  pub description:      String,
  /// `None` when the source code did not match a stored category.
  pub food_category_id: Option<i64>,
  pub publication_date: Option<NaiveDate>,
}

// ─── Facts ───────────────────────────────────────────────────────────────────

/// One measured nutrient amount. Several rows may exist for the same
/// (food, nutrient) pair; `id` tells them apart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FdcFoodNutrient {
  pub id:                  i64,
  pub fdc_id:              i64,
  pub nutrient_id:         i64,
  pub amount:              Option<f64>,
  pub data_points:         Option<i64>,
  pub derivation_id:       Option<i64>,
  pub min:                 Option<f64>,
  pub max:                 Option<f64>,
  pub median:              Option<f64>,
  pub loq:                 Option<String>,
  pub footnote:            Option<String>,
  pub min_year_acquired:   Option<i64>,
  pub percent_daily_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FdcFoodPortion {
  pub id:                  i64,
  pub fdc_id:              i64,
  pub seq_num:             Option<i64>,
  pub amount:              Option<f64>,
  pub measure_unit_id:     Option<i64>,
  pub portion_description: Option<String>,
  pub modifier:            Option<String>,
  pub gram_weight:         Option<f64>,
  pub data_points:         Option<i64>,
  pub footnote:            Option<String>,
  pub min_year_acquired:   Option<i64>,
}

// ─── Extensions ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FdcBrandedFood {
  pub fdc_id:                      i64,
  pub brand_owner:                 Option<String>,
  pub brand_name:                  Option<String>,
  pub subbrand_name:               Option<String>,
  pub gtin_upc:                    Option<String>,
  pub ingredients:                 Option<String>,
  pub not_a_significant_source_of: Option<String>,
  pub serving_size:                Option<f64>,
  pub serving_size_unit:           Option<String>,
  pub household_serving_fulltext:  Option<String>,
  pub branded_food_category:       Option<String>,
  pub data_source:                 Option<String>,
  pub package_weight:              Option<String>,
  pub modified_date:               Option<NaiveDate>,
  pub available_date:              Option<NaiveDate>,
  pub market_country:              Option<String>,
  pub discontinued_date:           Option<NaiveDate>,
  pub preparation_state_code:      Option<String>,
  pub trade_channel:               Option<String>,
  pub short_description:           Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcFoundationFood {
  pub fdc_id:     i64,
  pub ndb_number: Option<i64>,
  pub footnote:   Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcSrLegacyFood {
  pub fdc_id:     i64,
  pub ndb_number: Option<i64>,
}

/// Food and Nutrient Database for Dietary Studies entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FdcSurveyFood {
  pub fdc_id:              i64,
  pub food_code:           Option<i64>,
  pub wweia_category_code: Option<i64>,
  pub start_date:          Option<NaiveDate>,
  pub end_date:            Option<NaiveDate>,
}
