//! Child Nutrition database entities.
//!
//! Every table carries the `date_added` / `last_modified` pair published in
//! the release files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnCategory {
  pub code:          i64,
  pub description:   String,
  pub date_added:    Option<NaiveDate>,
  pub last_modified: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnNutrient {
  pub code:               i64,
  pub description:        String,
  pub description_abbrev: Option<String>,
  pub unit:               String,
  pub date_added:         Option<NaiveDate>,
  pub last_modified:      Option<NaiveDate>,
}

/// Global Product Classification name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnGpcName {
  pub gpc_code:        String,
  pub gpc_description: String,
  pub date_added:      Option<NaiveDate>,
  pub last_modified:   Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CnFood {
  pub cn_code:                i64,
  pub food_category_code:     Option<i64>,
  pub descriptor:             String,
  pub abbreviated_descriptor: String,
  pub gtin:                   Option<String>,
  pub product_code:           Option<String>,
  pub brand_owner_name:       Option<String>,
  pub brand_name:             Option<String>,
  pub fns_material_number:    Option<String>,
  pub source_code:            Option<i64>,
  pub date_added:             Option<NaiveDate>,
  pub last_modified:          Option<NaiveDate>,
  pub discontinued_date:      Option<NaiveDate>,
  pub form_of_food:           Option<String>,
  /// Cross-reference into FoodData Central; not checked against storage.
  pub fdc_id:                 Option<i64>,
  pub gpc_product_code:       Option<String>,
}

/// At most one value per (food, nutrient) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnNutrientValue {
  pub cn_code:         i64,
  pub nutrient_code:   i64,
  pub nutrient_value:  f64,
  pub per_unit:        String,
  pub value_type_code: Option<i64>,
  pub source_code:     Option<i64>,
  pub date_added:      Option<NaiveDate>,
  pub last_modified:   Option<NaiveDate>,
}

/// A portion weight. `sequence_num` is unique per food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CnWeight {
  pub cn_code:             i64,
  pub sequence_num:        i64,
  pub amount:              f64,
  pub measure_description: String,
  pub unit_amount:         f64,
  pub type_of_unit:        String,
  pub source_code:         Option<i64>,
  pub date_added:          Option<NaiveDate>,
  pub last_modified:       Option<NaiveDate>,
}
