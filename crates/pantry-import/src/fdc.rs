//! FoodData Central stages.
//!
//! Header names are the lowercase snake_case ones of the FDC CSV download.

use pantry_core::{
  EntityKind,
  fdc::{
    FdcBrandedFood, FdcCategory, FdcFood, FdcFoodNutrient, FdcFoodPortion,
    FdcFoundationFood, FdcMeasureUnit, FdcNutrient, FdcSrLegacyFood,
    FdcSurveyFood,
  },
  store::FoodStore,
};
use pantry_csv::Record;

use crate::{
  batch::BatchWriter,
  error::{FieldError, Result},
  fields::{Fields as _, truncate},
  load::Context,
  report::StageReport,
  stage::StageRun,
};

// ─── Stages with references ──────────────────────────────────────────────────

pub(crate) async fn foods<S: FoodStore>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
) -> Result<StageReport> {
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while !ctx.limit_reached(&writer) {
    let Some(record) = run.next_record()? else { break };
    let Some(mut food) = run.accept(&record, food(&record))? else { continue };

    food.food_category_id = ctx
      .resolver
      .resolve_opt(ctx.store, EntityKind::FdcCategory, food.food_category_id)
      .await?
      .and_then(|r| r.code());
    writer.add(food).await?;
  }
  run.finish(writer).await
}

pub(crate) async fn food_nutrients<S: FoodStore>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
) -> Result<StageReport> {
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while let Some(record) = run.next_record()? {
    let Some(fact) = run.accept(&record, food_nutrient(&record))? else { continue };

    let known = ctx.food_admitted(fact.fdc_id).await?
      && ctx
        .resolver
        .resolve(ctx.store, EntityKind::FdcNutrient, fact.nutrient_id)
        .await?
        .is_some();
    if !known {
      run.drop_row();
      continue;
    }
    writer.add(fact).await?;
  }
  run.finish(writer).await
}

pub(crate) async fn food_portions<S: FoodStore>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
) -> Result<StageReport> {
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while let Some(record) = run.next_record()? {
    let Some(mut portion) = run.accept(&record, food_portion(&record))? else { continue };

    if !ctx.food_admitted(portion.fdc_id).await? {
      run.drop_row();
      continue;
    }
    portion.measure_unit_id = ctx
      .resolver
      .resolve_opt(ctx.store, EntityKind::FdcMeasureUnit, portion.measure_unit_id)
      .await?
      .and_then(|r| r.code());
    writer.add(portion).await?;
  }
  run.finish(writer).await
}

// ─── Row conversion ──────────────────────────────────────────────────────────

pub(crate) fn category(r: &Record) -> Result<FdcCategory, FieldError> {
  Ok(FdcCategory { id: r.int("id")?, code: r.text("code")?, description: r.text("description")? })
}

pub(crate) fn nutrient(r: &Record) -> Result<FdcNutrient, FieldError> {
  Ok(FdcNutrient {
    id:           r.int("id")?,
    name:         r.text("name")?,
    unit_name:    r.text("unit_name")?,
    nutrient_nbr: r.opt_text("nutrient_nbr"),
    rank:         r.opt_float("rank")?,
  })
}

pub(crate) fn measure_unit(r: &Record) -> Result<FdcMeasureUnit, FieldError> {
  Ok(FdcMeasureUnit { id: r.int("id")?, name: r.text("name")? })
}

/// `food_category_id` holds the raw code until the stage resolves it.
pub(crate) fn food(r: &Record) -> Result<FdcFood, FieldError> {
  Ok(FdcFood {
    fdc_id:           r.int("fdc_id")?,
    data_type:        r.text("data_type")?,
    description:      r.text("description")?,
    food_category_id: r.opt_int("food_category_id")?,
    publication_date: r.date("publication_date"),
  })
}

pub(crate) fn food_nutrient(r: &Record) -> Result<FdcFoodNutrient, FieldError> {
  Ok(FdcFoodNutrient {
    id:                  r.int("id")?,
    fdc_id:              r.int("fdc_id")?,
    nutrient_id:         r.int("nutrient_id")?,
    amount:              r.opt_float("amount")?,
    data_points:         r.opt_int("data_points")?,
    derivation_id:       r.opt_int("derivation_id")?,
    min:                 r.opt_float("min")?,
    max:                 r.opt_float("max")?,
    median:              r.opt_float("median")?,
    loq:                 r.opt_text("loq"),
    footnote:            r.opt_text("footnote"),
    min_year_acquired:   r.opt_int("min_year_acquired")?,
    percent_daily_value: r.opt_float("percent_daily_value")?,
  })
}

pub(crate) fn food_portion(r: &Record) -> Result<FdcFoodPortion, FieldError> {
  Ok(FdcFoodPortion {
    id:                  r.int("id")?,
    fdc_id:              r.int("fdc_id")?,
    seq_num:             r.opt_int("seq_num")?,
    amount:              r.opt_float("amount")?,
    measure_unit_id:     r.opt_int("measure_unit_id")?,
    portion_description: r.opt_text("portion_description"),
    modifier:            r.opt_text("modifier"),
    gram_weight:         r.opt_float("gram_weight")?,
    data_points:         r.opt_int("data_points")?,
    footnote:            r.opt_text("footnote"),
    min_year_acquired:   r.opt_int("min_year_acquired")?,
  })
}

pub(crate) fn branded_food(r: &Record) -> Result<FdcBrandedFood, FieldError> {
  Ok(FdcBrandedFood {
    fdc_id:                      r.int("fdc_id")?,
    brand_owner:                 truncate(r.opt_text("brand_owner"), 500),
    brand_name:                  truncate(r.opt_text("brand_name"), 500),
    subbrand_name:               truncate(r.opt_text("subbrand_name"), 500),
    gtin_upc:                    r.opt_text("gtin_upc"),
    ingredients:                 r.opt_text("ingredients"),
    not_a_significant_source_of: r.opt_text("not_a_significant_source_of"),
    serving_size:                r.opt_float("serving_size")?,
    serving_size_unit:           truncate(r.opt_text("serving_size_unit"), 50),
    household_serving_fulltext:  truncate(r.opt_text("household_serving_fulltext"), 500),
    branded_food_category:       truncate(r.opt_text("branded_food_category"), 500),
    data_source:                 truncate(r.opt_text("data_source"), 100),
    package_weight:              truncate(r.opt_text("package_weight"), 100),
    modified_date:               r.date("modified_date"),
    available_date:              r.date("available_date"),
    market_country:              truncate(r.opt_text("market_country"), 100),
    discontinued_date:           r.date("discontinued_date"),
    preparation_state_code:      truncate(r.opt_text("preparation_state_code"), 100),
    trade_channel:               truncate(r.opt_text("trade_channel"), 200),
    short_description:           truncate(r.opt_text("short_description"), 500),
  })
}

pub(crate) fn foundation_food(r: &Record) -> Result<FdcFoundationFood, FieldError> {
  Ok(FdcFoundationFood {
    fdc_id:     r.int("fdc_id")?,
    ndb_number: r.opt_int("ndb_number")?,
    footnote:   r.opt_text("footnote"),
  })
}

pub(crate) fn sr_legacy_food(r: &Record) -> Result<FdcSrLegacyFood, FieldError> {
  Ok(FdcSrLegacyFood { fdc_id: r.int("fdc_id")?, ndb_number: r.opt_int("ndb_number")? })
}

pub(crate) fn survey_food(r: &Record) -> Result<FdcSurveyFood, FieldError> {
  Ok(FdcSurveyFood {
    fdc_id:              r.int("fdc_id")?,
    food_code:           r.opt_int("food_code")?,
    wweia_category_code: r.opt_int("wweia_category_code")?,
    start_date:          r.date("start_date"),
    end_date:            r.date("end_date"),
  })
}
