//! Bulk CSV import pipeline for the Pantry nutrition store.
//!
//! [`import`] runs the fixed, ordered stages of one dataset against any
//! [`FoodStore`]:
//!
//! ```text
//! categories → nutrients → ancillary lookups → foods → facts → extensions
//!            → search index refresh
//! ```
//!
//! Each stage drains one file through the record parser, resolves its
//! references against rows already stored, and writes through a
//! [`BatchWriter`]. Lookup misses drop or null the reference; conversion
//! failures follow [`MalformedRows`].

mod cn;
mod fdc;
mod fields;
mod load;
mod stage;

pub mod batch;
pub mod error;
pub mod options;
pub mod report;
pub mod resolve;

use std::path::PathBuf;

use pantry_core::{Dataset, store::FoodStore};
use tracing::{error, info, warn};

pub use batch::BatchWriter;
pub use error::{Error, FieldError, Result};
pub use options::{ImportOptions, MalformedRows};
pub use report::{ImportSummary, SearchIndexOutcome, SkipReason, StageReport, StageStatus};
pub use resolve::{Resolver, parse_date};
pub use stage::Stage;

use crate::{
  load::{Context, owned_by_food, plain},
  stage::StageRun,
};

/// Import every stage of `dataset` from `options.source_dir`, then refresh
/// the dataset's search index.
///
/// Required files are checked before anything is written. Batches commit as
/// they go, so a run that fails part-way leaves earlier stages in place;
/// running again is safe.
pub async fn import<S: FoodStore>(
  store: &S,
  dataset: Dataset,
  options: &ImportOptions,
) -> Result<ImportSummary> {
  let stages = Stage::for_dataset(dataset);

  let missing: Vec<PathBuf> = stages
    .iter()
    .filter(|s| s.required(options))
    .map(|s| s.path(options))
    .filter(|p| !p.is_file())
    .collect();
  if !missing.is_empty() {
    error!(dataset = %dataset, files = ?missing, "required files missing; nothing imported");
    return Err(Error::MissingFiles { dataset, files: missing });
  }

  info!(
    dataset = %dataset,
    dir = %options.source_dir.display(),
    limit = ?options.limit,
    "import started"
  );

  let mut ctx = Context::new(store, dataset, options.limit);
  let mut reports = Vec::with_capacity(stages.len());

  for &stage in stages {
    let report = if stage.disabled_by(options) {
      info!(stage = %stage, "stage disabled");
      StageReport::skipped(stage, SkipReason::Disabled)
    } else {
      let path = stage.path(options);
      match pantry_csv::open(path.clone()) {
        Ok(records) => {
          let run = StageRun::new(stage, records, options.malformed);
          run_stage(&mut ctx, run).await?
        }
        Err(e) if e.is_not_found() && !stage.required(options) => {
          warn!(stage = %stage, file = %path.display(), "optional file missing; stage skipped");
          StageReport::skipped(stage, SkipReason::MissingFile(path))
        }
        Err(e) => return Err(e.into()),
      }
    };

    if stage.is_root() && options.limit.is_some() {
      let admitted = store.food_keys(dataset).await.map_err(Error::store)?;
      info!(dataset = %dataset, foods = admitted.len(), "admitted set loaded");
      ctx.admitted = Some(admitted);
    }
    reports.push(report);
  }

  let search_index = refresh_search_index(store, dataset).await;
  let summary = ImportSummary { dataset, stages: reports, search_index };
  info!(dataset = %dataset, inserted = summary.inserted(), "import finished");
  Ok(summary)
}

/// Rebuild the derived search column and index of `dataset`.
///
/// Best-effort: a failure is logged and reported, never returned.
pub async fn refresh_search_index<S: FoodStore>(
  store: &S,
  dataset: Dataset,
) -> SearchIndexOutcome {
  match store.refresh_search_index(dataset).await {
    Ok(foods) => {
      info!(dataset = %dataset, foods, "search index refreshed");
      SearchIndexOutcome::Refreshed { foods }
    }
    Err(e) => {
      warn!(dataset = %dataset, error = %e, "search index refresh failed; import kept");
      SearchIndexOutcome::Failed(e.to_string())
    }
  }
}

async fn run_stage<S: FoodStore>(
  ctx: &mut Context<'_, S>,
  run: StageRun,
) -> Result<StageReport> {
  match run.stage() {
    // ── FoodData Central ────────────────────────────────────────────────
    Stage::FdcCategories => plain(ctx, run, fdc::category).await,
    Stage::FdcNutrients => plain(ctx, run, fdc::nutrient).await,
    Stage::FdcMeasureUnits => plain(ctx, run, fdc::measure_unit).await,
    Stage::FdcFoods => fdc::foods(ctx, run).await,
    Stage::FdcFoodNutrients => fdc::food_nutrients(ctx, run).await,
    Stage::FdcFoodPortions => fdc::food_portions(ctx, run).await,
    Stage::FdcBrandedFoods => owned_by_food(ctx, run, fdc::branded_food, |r| r.fdc_id).await,
    Stage::FdcFoundationFoods => {
      owned_by_food(ctx, run, fdc::foundation_food, |r| r.fdc_id).await
    }
    Stage::FdcSrLegacyFoods => {
      owned_by_food(ctx, run, fdc::sr_legacy_food, |r| r.fdc_id).await
    }
    Stage::FdcSurveyFoods => owned_by_food(ctx, run, fdc::survey_food, |r| r.fdc_id).await,

    // ── Child Nutrition ─────────────────────────────────────────────────
    Stage::CnCategories => plain(ctx, run, cn::category).await,
    Stage::CnNutrients => plain(ctx, run, cn::nutrient).await,
    Stage::CnGpcNames => plain(ctx, run, cn::gpc_name).await,
    Stage::CnFoods => cn::foods(ctx, run).await,
    Stage::CnNutrientValues => cn::nutrient_values(ctx, run).await,
    Stage::CnWeights => owned_by_food(ctx, run, cn::weight, |r| r.cn_code).await,
  }
}
