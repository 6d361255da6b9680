//! Key nutrient codes per dataset.
//!
//! Immutable configuration: semantic nutrient name → natural key of the
//! nutrient row in that dataset.

use serde::Serialize;

use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeyNutrients {
  pub energy_kcal: i64,
  pub protein:     i64,
  pub total_fat:   i64,
  pub carbs:       i64,
  pub fiber:       i64,
  pub sugars:      i64,
  pub sodium:      i64,
  pub calcium:     i64,
  pub iron:        i64,
  pub vitamin_c:   i64,
  /// Only published by the Child Nutrition database.
  pub vitamin_a:   Option<i64>,
}

pub const FDC: KeyNutrients = KeyNutrients {
  energy_kcal: 1008,
  protein:     1003,
  total_fat:   1004,
  carbs:       1005,
  fiber:       1079,
  sugars:      2000,
  sodium:      1093,
  calcium:     1087,
  iron:        1089,
  vitamin_c:   1162,
  vitamin_a:   None,
};

pub const CN: KeyNutrients = KeyNutrients {
  energy_kcal: 208,
  protein:     203,
  total_fat:   204,
  carbs:       205,
  fiber:       291,
  sugars:      269,
  sodium:      307,
  calcium:     301,
  iron:        303,
  vitamin_c:   401,
  vitamin_a:   Some(320),
};

impl KeyNutrients {
  pub const fn for_dataset(dataset: Dataset) -> &'static Self {
    match dataset {
      Dataset::Fdc => &FDC,
      Dataset::ChildNutrition => &CN,
    }
  }

  /// Codes in [`crate::view::Macros`] field order.
  pub fn macro_codes(&self) -> [i64; 6] {
    [
      self.energy_kcal,
      self.protein,
      self.total_fat,
      self.carbs,
      self.fiber,
      self.sugars,
    ]
  }
}
