//! Insert-or-ignore statements, one per table.
//!
//! Each function runs inside the caller's transaction and returns the number
//! of rows actually inserted; rows conflicting on a key are skipped.

use pantry_core::store::Batch;
use rusqlite::{Transaction, params};

use crate::encode::encode_date;

pub fn insert_batch(tx: &Transaction<'_>, batch: Batch) -> rusqlite::Result<usize> {
  let mut inserted = 0;

  match batch {
    // ── FoodData Central ────────────────────────────────────────────────
    Batch::FdcCategories(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_food_category (id, code, description)
         VALUES (?1, ?2, ?3) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![r.id, r.code, r.description])?;
      }
    }
    Batch::FdcNutrients(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_nutrient (id, name, unit_name, nutrient_nbr, rank)
         VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted +=
          stmt.execute(params![r.id, r.name, r.unit_name, r.nutrient_nbr, r.rank])?;
      }
    }
    Batch::FdcMeasureUnits(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_measure_unit (id, name) VALUES (?1, ?2) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![r.id, r.name])?;
      }
    }
    Batch::FdcFoods(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_food (fdc_id, data_type, description, food_category_id, publication_date)
         VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.fdc_id,
          r.data_type,
          r.description,
          r.food_category_id,
          encode_date(r.publication_date),
        ])?;
      }
    }
    Batch::FdcFoodNutrients(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_food_nutrient (
           id, fdc_id, nutrient_id, amount, data_points, derivation_id,
           min, max, median, loq, footnote, min_year_acquired, percent_daily_value
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.id,
          r.fdc_id,
          r.nutrient_id,
          r.amount,
          r.data_points,
          r.derivation_id,
          r.min,
          r.max,
          r.median,
          r.loq,
          r.footnote,
          r.min_year_acquired,
          r.percent_daily_value,
        ])?;
      }
    }
    Batch::FdcFoodPortions(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_food_portion (
           id, fdc_id, seq_num, amount, measure_unit_id, portion_description,
           modifier, gram_weight, data_points, footnote, min_year_acquired
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.id,
          r.fdc_id,
          r.seq_num,
          r.amount,
          r.measure_unit_id,
          r.portion_description,
          r.modifier,
          r.gram_weight,
          r.data_points,
          r.footnote,
          r.min_year_acquired,
        ])?;
      }
    }
    Batch::FdcBrandedFoods(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_branded_food (
           fdc_id, brand_owner, brand_name, subbrand_name, gtin_upc, ingredients,
           not_a_significant_source_of, serving_size, serving_size_unit,
           household_serving_fulltext, branded_food_category, data_source,
           package_weight, modified_date, available_date, market_country,
           discontinued_date, preparation_state_code, trade_channel, short_description
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                   ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
         ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.fdc_id,
          r.brand_owner,
          r.brand_name,
          r.subbrand_name,
          r.gtin_upc,
          r.ingredients,
          r.not_a_significant_source_of,
          r.serving_size,
          r.serving_size_unit,
          r.household_serving_fulltext,
          r.branded_food_category,
          r.data_source,
          r.package_weight,
          encode_date(r.modified_date),
          encode_date(r.available_date),
          r.market_country,
          encode_date(r.discontinued_date),
          r.preparation_state_code,
          r.trade_channel,
          r.short_description,
        ])?;
      }
    }
    Batch::FdcFoundationFoods(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_foundation_food (fdc_id, ndb_number, footnote)
         VALUES (?1, ?2, ?3) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![r.fdc_id, r.ndb_number, r.footnote])?;
      }
    }
    Batch::FdcSrLegacyFoods(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_sr_legacy_food (fdc_id, ndb_number)
         VALUES (?1, ?2) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![r.fdc_id, r.ndb_number])?;
      }
    }
    Batch::FdcSurveyFoods(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO fdc_survey_fndds_food (
           fdc_id, food_code, wweia_category_code, start_date, end_date
         ) VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.fdc_id,
          r.food_code,
          r.wweia_category_code,
          encode_date(r.start_date),
          encode_date(r.end_date),
        ])?;
      }
    }

    // ── Child Nutrition ─────────────────────────────────────────────────
    Batch::CnCategories(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO cn_food_category (code, description, date_added, last_modified)
         VALUES (?1, ?2, ?3, ?4) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.code,
          r.description,
          encode_date(r.date_added),
          encode_date(r.last_modified),
        ])?;
      }
    }
    Batch::CnNutrients(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO cn_nutrient (
           code, description, description_abbrev, unit, date_added, last_modified
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.code,
          r.description,
          r.description_abbrev,
          r.unit,
          encode_date(r.date_added),
          encode_date(r.last_modified),
        ])?;
      }
    }
    Batch::CnGpcNames(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO cn_gpc_name (gpc_code, gpc_description, date_added, last_modified)
         VALUES (?1, ?2, ?3, ?4) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.gpc_code,
          r.gpc_description,
          encode_date(r.date_added),
          encode_date(r.last_modified),
        ])?;
      }
    }
    Batch::CnFoods(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO cn_food (
           cn_code, food_category_code, descriptor, abbreviated_descriptor, gtin,
           product_code, brand_owner_name, brand_name, fns_material_number,
           source_code, date_added, last_modified, discontinued_date,
           form_of_food, fdc_id, gpc_product_code
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
         ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.cn_code,
          r.food_category_code,
          r.descriptor,
          r.abbreviated_descriptor,
          r.gtin,
          r.product_code,
          r.brand_owner_name,
          r.brand_name,
          r.fns_material_number,
          r.source_code,
          encode_date(r.date_added),
          encode_date(r.last_modified),
          encode_date(r.discontinued_date),
          r.form_of_food,
          r.fdc_id,
          r.gpc_product_code,
        ])?;
      }
    }
    Batch::CnNutrientValues(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO cn_nutrient_value (
           cn_code, nutrient_code, nutrient_value, per_unit, value_type_code,
           source_code, date_added, last_modified
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.cn_code,
          r.nutrient_code,
          r.nutrient_value,
          r.per_unit,
          r.value_type_code,
          r.source_code,
          encode_date(r.date_added),
          encode_date(r.last_modified),
        ])?;
      }
    }
    Batch::CnWeights(rows) => {
      let mut stmt = tx.prepare_cached(
        "INSERT INTO cn_weight (
           cn_code, sequence_num, amount, measure_description, unit_amount,
           type_of_unit, source_code, date_added, last_modified
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) ON CONFLICT DO NOTHING",
      )?;
      for r in rows {
        inserted += stmt.execute(params![
          r.cn_code,
          r.sequence_num,
          r.amount,
          r.measure_description,
          r.unit_amount,
          r.type_of_unit,
          r.source_code,
          encode_date(r.date_added),
          encode_date(r.last_modified),
        ])?;
      }
    }
  }

  Ok(inserted)
}
