//! Child Nutrition stages.
//!
//! Header names follow the release files ("Cn code", "Food category code",
//! ...); lookup is case-insensitive, so "Cn Code" in NUTVAL matches too.

use pantry_core::{
  EntityKind,
  cn::{CnCategory, CnFood, CnGpcName, CnNutrient, CnNutrientValue, CnWeight},
  store::FoodStore,
};
use pantry_csv::Record;

use crate::{
  batch::BatchWriter,
  error::{FieldError, Result},
  fields::Fields as _,
  load::Context,
  report::StageReport,
  stage::StageRun,
};

/// Basis of a nutrient value when the file does not say.
const DEFAULT_PER_UNIT: &str = "100g";

// ─── Stages with references ──────────────────────────────────────────────────

pub(crate) async fn foods<S: FoodStore>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
) -> Result<StageReport> {
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while !ctx.limit_reached(&writer) {
    let Some(record) = run.next_record()? else { break };
    let Some(mut food) = run.accept(&record, food(&record))? else { continue };

    food.food_category_code = ctx
      .resolver
      .resolve_opt(ctx.store, EntityKind::CnCategory, food.food_category_code)
      .await?
      .and_then(|r| r.code());
    food.gpc_product_code = ctx
      .resolver
      .resolve_opt(ctx.store, EntityKind::CnGpcName, food.gpc_product_code.as_deref())
      .await?
      .and_then(|r| r.text().map(str::to_owned));
    writer.add(food).await?;
  }
  run.finish(writer).await
}

pub(crate) async fn nutrient_values<S: FoodStore>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
) -> Result<StageReport> {
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while let Some(record) = run.next_record()? {
    let Some(value) = run.accept(&record, nutrient_value(&record))? else { continue };

    let known = ctx.food_admitted(value.cn_code).await?
      && ctx
        .resolver
        .resolve(ctx.store, EntityKind::CnNutrient, value.nutrient_code)
        .await?
        .is_some();
    if !known {
      run.drop_row();
      continue;
    }
    writer.add(value).await?;
  }
  run.finish(writer).await
}

// ─── Row conversion ──────────────────────────────────────────────────────────

pub(crate) fn category(r: &Record) -> Result<CnCategory, FieldError> {
  Ok(CnCategory {
    code:          r.int("Food category code")?,
    description:   r.text("Category description")?,
    date_added:    r.date("Date added"),
    last_modified: r.date("Last modified"),
  })
}

pub(crate) fn nutrient(r: &Record) -> Result<CnNutrient, FieldError> {
  Ok(CnNutrient {
    code:               r.int("Nutrient code")?,
    description:        r.text("Nutrient description")?,
    description_abbrev: r.opt_text("Nutrient description abbrev"),
    unit:               r.text("Nutrient unit")?,
    date_added:         r.date("Date added"),
    last_modified:      r.date("Last modified"),
  })
}

pub(crate) fn gpc_name(r: &Record) -> Result<CnGpcName, FieldError> {
  Ok(CnGpcName {
    gpc_code:        r.value("Gpc code").map(str::to_owned).ok_or(FieldError::Missing("Gpc code"))?,
    gpc_description: r.text("Gpc description")?,
    date_added:      r.date("Date added"),
    last_modified:   r.date("Last modified"),
  })
}

/// Category and GPC codes hold the raw values until the stage resolves them.
/// A non-numeric category code is treated as no category.
pub(crate) fn food(r: &Record) -> Result<CnFood, FieldError> {
  Ok(CnFood {
    cn_code:                r.int("Cn code")?,
    food_category_code:     r.lenient_int("Food category code"),
    descriptor:             r.text("Descriptor")?,
    abbreviated_descriptor: r.text("Abbreviated descriptor")?,
    gtin:                   r.opt_text("Gtin"),
    product_code:           r.opt_text("Product code"),
    brand_owner_name:       r.opt_text("Brand owner name"),
    brand_name:             r.opt_text("Brand name"),
    fns_material_number:    r.opt_text("FNS Material Number"),
    source_code:            r.opt_int("Source code")?,
    date_added:             r.date("Date added"),
    last_modified:          r.date("Last modified"),
    discontinued_date:      r.date("Discontinued date"),
    form_of_food:           r.opt_text("Form of food"),
    fdc_id:                 r.opt_int("Fdc id")?,
    gpc_product_code:       r.opt_text("Gpc product code"),
  })
}

pub(crate) fn nutrient_value(r: &Record) -> Result<CnNutrientValue, FieldError> {
  Ok(CnNutrientValue {
    cn_code:         r.int("Cn code")?,
    nutrient_code:   r.int("Nutrient code")?,
    nutrient_value:  r.float("Nutrient value")?,
    per_unit:        r.opt_text("Per unit").unwrap_or_else(|| DEFAULT_PER_UNIT.to_owned()),
    value_type_code: r.opt_int("Value type code")?,
    source_code:     r.opt_int("Source code")?,
    date_added:      r.date("Date added"),
    last_modified:   r.date("Last modified"),
  })
}

pub(crate) fn weight(r: &Record) -> Result<CnWeight, FieldError> {
  Ok(CnWeight {
    cn_code:             r.int("Cn code")?,
    sequence_num:        r.int("Sequence num")?,
    amount:              r.float("Amount")?,
    measure_description: r.text("Measure description")?,
    unit_amount:         r.float("Unit amount")?,
    type_of_unit:        r.text("Type of unit")?,
    source_code:         r.opt_int("Source code")?,
    date_added:          r.date("Date added"),
    last_modified:       r.date("Last modified"),
  })
}
