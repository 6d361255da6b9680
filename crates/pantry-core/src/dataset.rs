//! Dataset and table identifiers.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// One of the two independent source databases.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
  /// USDA FoodData Central: the general food-composition database.
  #[default]
  #[strum(serialize = "fdc")]
  Fdc,
  /// USDA Child Nutrition database.
  #[serde(rename = "cn")]
  #[strum(serialize = "cn")]
  ChildNutrition,
}

impl Dataset {
  /// The root food table of this dataset.
  pub fn food_table(self) -> Table {
    match self {
      Self::Fdc => Table::FdcFood,
      Self::ChildNutrition => Table::CnFood,
    }
  }

  /// All tables belonging to this dataset, in load order.
  pub fn tables(self) -> impl Iterator<Item = Table> {
    use strum::IntoEnumIterator as _;
    Table::iter().filter(move |t| t.dataset() == self)
  }
}

/// Every relational table the importer writes to.
///
/// The `&'static str` form is the SQL table name.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
  FdcFoodCategory,
  FdcNutrient,
  FdcMeasureUnit,
  FdcFood,
  FdcFoodNutrient,
  FdcFoodPortion,
  FdcBrandedFood,
  FdcFoundationFood,
  FdcSrLegacyFood,
  FdcSurveyFnddsFood,
  CnFoodCategory,
  CnNutrient,
  CnGpcName,
  CnFood,
  CnNutrientValue,
  CnWeight,
}

impl Table {
  pub fn name(self) -> &'static str { self.into() }

  pub fn dataset(self) -> Dataset {
    match self {
      Self::FdcFoodCategory
      | Self::FdcNutrient
      | Self::FdcMeasureUnit
      | Self::FdcFood
      | Self::FdcFoodNutrient
      | Self::FdcFoodPortion
      | Self::FdcBrandedFood
      | Self::FdcFoundationFood
      | Self::FdcSrLegacyFood
      | Self::FdcSurveyFnddsFood => Dataset::Fdc,
      Self::CnFoodCategory
      | Self::CnNutrient
      | Self::CnGpcName
      | Self::CnFood
      | Self::CnNutrientValue
      | Self::CnWeight => Dataset::ChildNutrition,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_names_are_snake_case() {
    assert_eq!(Table::FdcSurveyFnddsFood.name(), "fdc_survey_fndds_food");
    assert_eq!(Table::CnGpcName.name(), "cn_gpc_name");
  }

  #[test]
  fn dataset_partitions_tables() {
    assert_eq!(Dataset::Fdc.tables().count(), 10);
    assert_eq!(Dataset::ChildNutrition.tables().count(), 6);
    assert!(Dataset::ChildNutrition.tables().all(|t| t.name().starts_with("cn_")));
  }

  #[test]
  fn dataset_serde_names() {
    assert_eq!(serde_json::to_string(&Dataset::ChildNutrition).unwrap(), "\"cn\"");
    assert_eq!(
      serde_json::from_str::<Dataset>("\"fdc\"").unwrap(),
      Dataset::Fdc
    );
    assert_eq!(Dataset::ChildNutrition.to_string(), "cn");
  }
}
