//! The fixed stage list of each dataset and the per-stage record loop.

use std::{fs::File, path::PathBuf};

use pantry_core::{Dataset, Table, store::FoodStore};
use pantry_csv::{Record, Records};
use strum::Display;
use tracing::{info, warn};

use crate::{
  batch::{BatchWriter, FACT_BATCH, LOOKUP_BATCH, ROOT_BATCH},
  error::{Error, FieldError, Result},
  options::{ImportOptions, MalformedRows},
  report::StageReport,
};

// ─── Stage ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
  FdcCategories,
  FdcNutrients,
  FdcMeasureUnits,
  FdcFoods,
  FdcFoodNutrients,
  FdcFoodPortions,
  FdcBrandedFoods,
  FdcFoundationFoods,
  FdcSrLegacyFoods,
  FdcSurveyFoods,
  CnCategories,
  CnNutrients,
  CnGpcNames,
  CnFoods,
  CnNutrientValues,
  CnWeights,
}

const FDC_STAGES: &[Stage] = &[
  Stage::FdcCategories,
  Stage::FdcNutrients,
  Stage::FdcMeasureUnits,
  Stage::FdcFoods,
  Stage::FdcFoodNutrients,
  Stage::FdcFoodPortions,
  Stage::FdcBrandedFoods,
  Stage::FdcFoundationFoods,
  Stage::FdcSrLegacyFoods,
  Stage::FdcSurveyFoods,
];

const CN_STAGES: &[Stage] = &[
  Stage::CnCategories,
  Stage::CnNutrients,
  Stage::CnGpcNames,
  Stage::CnFoods,
  Stage::CnNutrientValues,
  Stage::CnWeights,
];

impl Stage {
  /// Stages of `dataset` in execution order.
  pub fn for_dataset(dataset: Dataset) -> &'static [Stage] {
    match dataset {
      Dataset::Fdc => FDC_STAGES,
      Dataset::ChildNutrition => CN_STAGES,
    }
  }

  pub fn table(self) -> Table {
    match self {
      Self::FdcCategories => Table::FdcFoodCategory,
      Self::FdcNutrients => Table::FdcNutrient,
      Self::FdcMeasureUnits => Table::FdcMeasureUnit,
      Self::FdcFoods => Table::FdcFood,
      Self::FdcFoodNutrients => Table::FdcFoodNutrient,
      Self::FdcFoodPortions => Table::FdcFoodPortion,
      Self::FdcBrandedFoods => Table::FdcBrandedFood,
      Self::FdcFoundationFoods => Table::FdcFoundationFood,
      Self::FdcSrLegacyFoods => Table::FdcSrLegacyFood,
      Self::FdcSurveyFoods => Table::FdcSurveyFnddsFood,
      Self::CnCategories => Table::CnFoodCategory,
      Self::CnNutrients => Table::CnNutrient,
      Self::CnGpcNames => Table::CnGpcName,
      Self::CnFoods => Table::CnFood,
      Self::CnNutrientValues => Table::CnNutrientValue,
      Self::CnWeights => Table::CnWeight,
    }
  }

  pub fn dataset(self) -> Dataset { self.table().dataset() }

  /// The source file name; Child Nutrition names carry the release prefix.
  pub fn file_name(self, cn_release: &str) -> String {
    let fdc = |name: &str| name.to_owned();
    let cn = |suffix: &str| format!("{cn_release}_{suffix}.csv");
    match self {
      Self::FdcCategories => fdc("food_category.csv"),
      Self::FdcNutrients => fdc("nutrient.csv"),
      Self::FdcMeasureUnits => fdc("measure_unit.csv"),
      Self::FdcFoods => fdc("food.csv"),
      Self::FdcFoodNutrients => fdc("food_nutrient.csv"),
      Self::FdcFoodPortions => fdc("food_portion.csv"),
      Self::FdcBrandedFoods => fdc("branded_food.csv"),
      Self::FdcFoundationFoods => fdc("foundation_food.csv"),
      Self::FdcSrLegacyFoods => fdc("sr_legacy_food.csv"),
      Self::FdcSurveyFoods => fdc("survey_fndds_food.csv"),
      Self::CnCategories => cn("CTGNME"),
      Self::CnNutrients => cn("NUTDES"),
      Self::CnGpcNames => cn("GPCNME"),
      Self::CnFoods => cn("FDES"),
      Self::CnNutrientValues => cn("NUTVAL"),
      Self::CnWeights => cn("WGHT"),
    }
  }

  pub fn path(self, options: &ImportOptions) -> PathBuf {
    options.source_dir.join(self.file_name(&options.cn_release))
  }

  pub fn batch_size(self) -> usize {
    match self {
      Self::FdcCategories
      | Self::FdcNutrients
      | Self::FdcMeasureUnits
      | Self::CnCategories
      | Self::CnNutrients
      | Self::CnGpcNames => LOOKUP_BATCH,
      Self::FdcFoods
      | Self::FdcBrandedFoods
      | Self::FdcFoundationFoods
      | Self::FdcSrLegacyFoods
      | Self::FdcSurveyFoods
      | Self::CnFoods => ROOT_BATCH,
      Self::FdcFoodNutrients
      | Self::FdcFoodPortions
      | Self::CnNutrientValues
      | Self::CnWeights => FACT_BATCH,
    }
  }

  /// Whether the caller turned this stage off.
  pub fn disabled_by(self, options: &ImportOptions) -> bool {
    match self {
      Self::FdcFoodNutrients | Self::CnNutrientValues => options.skip_nutrients,
      Self::FdcFoodPortions | Self::CnWeights => options.skip_portions,
      _ => false,
    }
  }

  /// Whether a missing file must abort the run before anything is written.
  pub fn required(self, options: &ImportOptions) -> bool {
    match self.dataset() {
      Dataset::Fdc => self == Self::FdcFoods,
      Dataset::ChildNutrition => !self.disabled_by(options),
    }
  }

  /// The stage after which the admitted set of root keys is known.
  pub fn is_root(self) -> bool { matches!(self, Self::FdcFoods | Self::CnFoods) }
}

// ─── StageRun ────────────────────────────────────────────────────────────────

/// One pass over a stage's file: reads records, applies the malformed-row
/// policy and keeps the report counters.
pub(crate) struct StageRun {
  records: Records<File>,
  policy:  MalformedRows,
  report:  StageReport,
}

impl StageRun {
  pub fn new(stage: Stage, records: Records<File>, policy: MalformedRows) -> Self {
    info!(
      stage = %stage,
      table = %stage.table(),
      file = %records.path().display(),
      "stage started"
    );
    Self { records, policy, report: StageReport::new(stage) }
  }

  pub fn stage(&self) -> Stage { self.report.stage }

  /// The next well-formed record, or `None` at end of file.
  pub fn next_record(&mut self) -> Result<Option<Record>> {
    loop {
      match self.records.next() {
        None => return Ok(None),
        Some(Ok(record)) => {
          self.report.read += 1;
          return Ok(Some(record));
        }
        Some(Err(e)) => {
          self.report.read += 1;
          match self.policy {
            MalformedRows::Abort => return Err(e.into()),
            MalformedRows::Skip => {
              warn!(stage = %self.report.stage, error = %e, "skipping unreadable row");
              self.report.malformed += 1;
            }
          }
        }
      }
    }
  }

  /// Apply the malformed-row policy to a conversion result. `None` means
  /// the row was skipped.
  pub fn accept<T>(
    &mut self,
    record: &Record,
    converted: Result<T, FieldError>,
  ) -> Result<Option<T>> {
    match converted {
      Ok(row) => Ok(Some(row)),
      Err(source) => match self.policy {
        MalformedRows::Abort => Err(Error::MalformedRow {
          file: self.records.path().to_owned(),
          line: record.line(),
          source,
        }),
        MalformedRows::Skip => {
          warn!(
            stage = %self.report.stage,
            file = %self.records.path().display(),
            line = record.line(),
            error = %source,
            "skipping malformed row"
          );
          self.report.malformed += 1;
          Ok(None)
        }
      },
    }
  }

  /// Count a row discarded for an unresolved reference.
  pub fn drop_row(&mut self) { self.report.dropped += 1; }

  /// Flush `writer` and close the report.
  pub async fn finish<S, T>(mut self, writer: BatchWriter<'_, S, T>) -> Result<StageReport>
  where
    S: FoodStore,
    Vec<T>: Into<pantry_core::store::Batch>,
  {
    let stats = writer.finish().await?;
    self.report.admitted = stats.added;
    self.report.inserted = stats.inserted;
    self.report.flushes = stats.flushes;

    let r = &self.report;
    info!(
      stage = %r.stage,
      read = r.read,
      admitted = r.admitted,
      dropped = r.dropped,
      malformed = r.malformed,
      inserted = r.inserted,
      "stage finished"
    );
    Ok(self.report)
  }
}
