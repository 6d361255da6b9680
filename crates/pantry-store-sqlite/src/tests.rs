//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::NaiveDate;
use pantry_core::{
  Dataset, EntityKind, NaturalKey, Table,
  cn::{CnCategory, CnFood, CnNutrient, CnNutrientValue},
  fdc::{FdcBrandedFood, FdcCategory, FdcFood, FdcFoodNutrient, FdcNutrient},
  store::{Batch, FoodStore},
  view::FoodQuery,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn category(id: i64, description: &str) -> FdcCategory {
  FdcCategory { id, code: format!("{id:04}"), description: description.into() }
}

fn food(fdc_id: i64, data_type: &str, description: &str, category: Option<i64>) -> FdcFood {
  FdcFood {
    fdc_id,
    data_type: data_type.into(),
    description: description.into(),
    food_category_id: category,
    publication_date: NaiveDate::from_ymd_opt(2024, 4, 18),
  }
}

/// Two categories, two nutrients, four foods, one branded extension.
async fn seeded_fdc() -> SqliteStore {
  let s = store().await;
  s.insert_batch(vec![category(1, "Dairy and Egg Products"), category(2, "Spices and Herbs")].into())
    .await
    .unwrap();
  s.insert_batch(
    vec![
      FdcNutrient {
        id:           1008,
        name:         "Energy".into(),
        unit_name:    "KCAL".into(),
        nutrient_nbr: Some("208".into()),
        rank:         Some(300.0),
      },
      FdcNutrient {
        id:           1003,
        name:         "Protein".into(),
        unit_name:    "G".into(),
        nutrient_nbr: Some("203".into()),
        rank:         Some(600.0),
      },
    ]
    .into(),
  )
  .await
  .unwrap();
  s.insert_batch(
    vec![
      food(1001, "sr_legacy_food", "Cheese, cheddar", Some(1)),
      food(1002, "branded_food", "Cheese, cheddar, sharp", Some(1)),
      food(1003, "sr_legacy_food", "Pepper, black", Some(2)),
      food(1004, "branded_food", "Cheddar crackers", None),
    ]
    .into(),
  )
  .await
  .unwrap();
  s.insert_batch(
    vec![FdcBrandedFood {
      fdc_id: 1002,
      brand_owner: Some("Hillside Creamery".into()),
      gtin_upc: Some("0001234567890".into()),
      serving_size: Some(28.0),
      serving_size_unit: Some("g".into()),
      ..Default::default()
    }]
    .into(),
  )
  .await
  .unwrap();
  s.insert_batch(
    vec![
      FdcFoodNutrient { id: 1, fdc_id: 1002, nutrient_id: 1008, amount: Some(400.0), ..Default::default() },
      FdcFoodNutrient { id: 2, fdc_id: 1002, nutrient_id: 1003, amount: Some(25.0), ..Default::default() },
      FdcFoodNutrient { id: 3, fdc_id: 1002, nutrient_id: 1003, amount: Some(24.0), ..Default::default() },
    ]
    .into(),
  )
  .await
  .unwrap();
  s
}

async fn seeded_cn() -> SqliteStore {
  let s = store().await;
  s.insert_batch(
    vec![CnCategory {
      code:          8,
      description:   "Poultry Products".into(),
      date_added:    None,
      last_modified: None,
    }]
    .into(),
  )
  .await
  .unwrap();
  s.insert_batch(
    vec![CnNutrient {
      code:               208,
      description:        "Energy".into(),
      description_abbrev: Some("ENERC_KCAL".into()),
      unit:               "kcal".into(),
      date_added:         None,
      last_modified:      None,
    }]
    .into(),
  )
  .await
  .unwrap();
  s.insert_batch(
    vec![
      CnFood {
        cn_code: 100001,
        food_category_code: Some(8),
        descriptor: "Chicken nuggets, breaded, frozen".into(),
        abbreviated_descriptor: "CHKN NUGGETS BRD".into(),
        gtin: Some("00070000123456".into()),
        brand_name: Some("Lunchline".into()),
        ..Default::default()
      },
      CnFood {
        cn_code: 100002,
        descriptor: "Apple juice, 100%".into(),
        abbreviated_descriptor: "JUICE APL".into(),
        ..Default::default()
      },
    ]
    .into(),
  )
  .await
  .unwrap();
  s.insert_batch(
    vec![CnNutrientValue {
      cn_code:         100001,
      nutrient_code:   208,
      nutrient_value:  250.0,
      per_unit:        "100g".into(),
      value_type_code: None,
      source_code:     None,
      date_added:      None,
      last_modified:   None,
    }]
    .into(),
  )
  .await
  .unwrap();
  s
}

fn fdc_query(text: &str) -> FoodQuery {
  FoodQuery { text: text.into(), ..Default::default() }
}

fn cn_query(text: &str) -> FoodQuery {
  FoodQuery { text: text.into(), dataset: Dataset::ChildNutrition, ..Default::default() }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_batch_ignores_existing_keys() {
  let s = store().await;
  let first = s
    .insert_batch(vec![category(1, "Dairy"), category(2, "Spices")].into())
    .await
    .unwrap();
  assert_eq!(first, 2);

  let again = s
    .insert_batch(vec![category(2, "Renamed"), category(3, "Fats")].into())
    .await
    .unwrap();
  assert_eq!(again, 1);
  assert_eq!(s.count(Table::FdcFoodCategory).await.unwrap(), 3);
}

#[tokio::test]
async fn existing_rows_are_never_overwritten() {
  let s = store().await;
  s.insert_batch(vec![category(1, "Dairy")].into()).await.unwrap();
  s.insert_batch(vec![category(1, "Renamed")].into()).await.unwrap();

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.tables["fdc_food_category"], 1);

  let name: String = s
    .conn
    .call(|conn| {
      Ok(conn.query_row("SELECT description FROM fdc_food_category WHERE id = 1", [], |r| r.get(0))?)
    })
    .await
    .unwrap();
  assert_eq!(name, "Dairy");
}

#[tokio::test]
async fn empty_batch_is_a_no_op() {
  let s = store().await;
  assert_eq!(s.insert_batch(Batch::FdcFoods(Vec::new())).await.unwrap(), 0);
}

#[tokio::test]
async fn cn_nutrient_values_are_unique_per_food_and_nutrient() {
  let s = seeded_cn().await;
  let duplicate = CnNutrientValue {
    cn_code:         100001,
    nutrient_code:   208,
    nutrient_value:  999.0,
    per_unit:        "100g".into(),
    value_type_code: None,
    source_code:     None,
    date_added:      None,
    last_modified:   None,
  };
  assert_eq!(s.insert_batch(vec![duplicate].into()).await.unwrap(), 0);
  assert_eq!(s.count(Table::CnNutrientValue).await.unwrap(), 1);
}

#[tokio::test]
async fn fdc_food_nutrients_allow_repeated_pairs() {
  let s = seeded_fdc().await;
  // ids 2 and 3 share (1002, 1003).
  assert_eq!(s.count(Table::FdcFoodNutrient).await.unwrap(), 3);
}

#[tokio::test]
async fn orphan_fact_is_rejected_by_the_schema() {
  let s = store().await;
  let orphan = FdcFoodNutrient { id: 1, fdc_id: 42, nutrient_id: 1008, ..Default::default() };
  assert!(s.insert_batch(vec![orphan].into()).await.is_err());
  assert_eq!(s.count(Table::FdcFoodNutrient).await.unwrap(), 0);
}

#[tokio::test]
async fn dates_are_stored_as_iso_text() {
  let s = seeded_fdc().await;
  let date: Option<String> = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT publication_date FROM fdc_food WHERE fdc_id = 1001",
        [],
        |r| r.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(date.as_deref(), Some("2024-04-18"));
}

// ─── Lookups ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn contains_checks_each_entity_kind() {
  let s = seeded_fdc().await;
  assert!(s.contains(EntityKind::FdcCategory, NaturalKey::Code(1)).await.unwrap());
  assert!(!s.contains(EntityKind::FdcCategory, NaturalKey::Code(9)).await.unwrap());
  assert!(s.contains(EntityKind::FdcNutrient, NaturalKey::Code(1008)).await.unwrap());
  assert!(s.contains(EntityKind::FdcFood, NaturalKey::Code(1004)).await.unwrap());
  assert!(!s.contains(EntityKind::CnFood, NaturalKey::Code(1004)).await.unwrap());
  assert!(
    !s.contains(EntityKind::CnGpcName, NaturalKey::from("10000025"))
      .await
      .unwrap()
  );
}

#[tokio::test]
async fn food_keys_lists_one_dataset() {
  let s = seeded_fdc().await;
  let keys = s.food_keys(Dataset::Fdc).await.unwrap();
  assert_eq!(keys, HashSet::from([1001, 1002, 1003, 1004]));
  assert!(s.food_keys(Dataset::ChildNutrition).await.unwrap().is_empty());
}

// ─── Search index ────────────────────────────────────────────────────────────

#[tokio::test]
async fn refresh_fills_search_vector_and_counts_foods() {
  let s = seeded_cn().await;
  assert_eq!(s.refresh_search_index(Dataset::ChildNutrition).await.unwrap(), 2);

  let vector: Option<String> = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT search_vector FROM cn_food WHERE cn_code = 100001",
        [],
        |r| r.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(vector.as_deref(), Some("chicken nuggets, breaded, frozen chkn nuggets brd"));
}

#[tokio::test]
async fn refresh_is_repeatable() {
  let s = seeded_fdc().await;
  assert_eq!(s.refresh_search_index(Dataset::Fdc).await.unwrap(), 4);
  assert_eq!(s.refresh_search_index(Dataset::Fdc).await.unwrap(), 4);
  assert_eq!(s.search(&fdc_query("pepper")).await.unwrap().total_count, 1);
}

#[tokio::test]
async fn failed_refresh_rolls_back_search_vector() {
  let s = seeded_fdc().await;
  // A plain table squatting on the index name makes the rebuild fail.
  s.conn
    .call(|conn| {
      conn.execute_batch("CREATE TABLE fdc_food_fts (other TEXT);")?;
      Ok(())
    })
    .await
    .unwrap();

  assert!(s.refresh_search_index(Dataset::Fdc).await.is_err());

  let filled: i64 = s
    .conn
    .call(|conn| {
      Ok(conn.query_row(
        "SELECT COUNT(*) FROM fdc_food WHERE search_vector IS NOT NULL",
        [],
        |r| r.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(filled, 0);
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_query_returns_empty_page() {
  let s = seeded_fdc().await;
  let page = s.search(&fdc_query("   ")).await.unwrap();
  assert!(page.results.is_empty());
  assert_eq!(page.total_count, 0);
  assert_eq!(page.page, 1);
}

#[tokio::test]
async fn ranked_search_uses_the_index() {
  let s = seeded_fdc().await;
  s.refresh_search_index(Dataset::Fdc).await.unwrap();

  let page = s.search(&fdc_query("cheddar")).await.unwrap();
  assert_eq!(page.total_count, 3);
  assert!(page.results.iter().all(|h| h.rank.is_some()));

  let mut codes: Vec<i64> = page.results.iter().map(|h| h.code).collect();
  codes.sort_unstable();
  assert_eq!(codes, vec![1001, 1002, 1004]);
}

#[tokio::test]
async fn ranked_search_matches_prefixes() {
  let s = seeded_fdc().await;
  s.refresh_search_index(Dataset::Fdc).await.unwrap();
  let page = s.search(&fdc_query("chee")).await.unwrap();
  assert_eq!(page.total_count, 2);
}

#[tokio::test]
async fn search_without_index_falls_back_to_substring() {
  let s = seeded_fdc().await;
  let page = s.search(&fdc_query("CHEDDAR")).await.unwrap();
  assert_eq!(page.total_count, 3);
  assert!(page.results.iter().all(|h| h.rank.is_none()));

  let descriptions: Vec<&str> =
    page.results.iter().map(|h| h.description.as_str()).collect();
  assert_eq!(
    descriptions,
    vec!["Cheddar crackers", "Cheese, cheddar", "Cheese, cheddar, sharp"]
  );
}

#[tokio::test]
async fn short_queries_use_substring_match() {
  let s = seeded_fdc().await;
  s.refresh_search_index(Dataset::Fdc).await.unwrap();
  let page = s.search(&fdc_query("ck")).await.unwrap();
  assert_eq!(page.total_count, 2);
  assert!(page.results.iter().all(|h| h.rank.is_none()));
}

#[tokio::test]
async fn search_filters_by_data_type_and_category() {
  let s = seeded_fdc().await;
  s.refresh_search_index(Dataset::Fdc).await.unwrap();

  let branded = FoodQuery { data_type: Some("branded_food".into()), ..fdc_query("cheddar") };
  let page = s.search(&branded).await.unwrap();
  assert_eq!(page.total_count, 2);
  assert!(page.results.iter().all(|h| h.data_type.as_deref() == Some("branded_food")));

  let dairy = FoodQuery { category: Some(1), ..fdc_query("cheddar") };
  let page = s.search(&dairy).await.unwrap();
  assert_eq!(page.total_count, 2);
  assert!(
    page
      .results
      .iter()
      .all(|h| h.category.as_deref() == Some("Dairy and Egg Products"))
  );
}

#[tokio::test]
async fn search_paginates() {
  let s = seeded_fdc().await;
  let query = FoodQuery { page: 2, page_size: 2, ..fdc_query("cheddar") };
  let page = s.search(&query).await.unwrap();
  assert_eq!(page.total_count, 3);
  assert_eq!(page.total_pages, 2);
  assert_eq!(page.results.len(), 1);
  assert_eq!(page.results[0].description, "Cheese, cheddar, sharp");
}

#[tokio::test]
async fn like_metacharacters_match_literally() {
  let s = seeded_cn().await;
  let page = s.search(&cn_query("100%")).await.unwrap();
  assert_eq!(page.total_count, 1);
  assert_eq!(page.results[0].code, 100002);
}

#[tokio::test]
async fn cn_search_covers_abbreviated_descriptor() {
  let s = seeded_cn().await;

  let before = s.search(&cn_query("chkn")).await.unwrap();
  assert_eq!(before.total_count, 1);

  s.refresh_search_index(Dataset::ChildNutrition).await.unwrap();
  let after = s.search(&cn_query("chkn")).await.unwrap();
  assert_eq!(after.total_count, 1);
  let hit = &after.results[0];
  assert_eq!(hit.code, 100001);
  assert_eq!(hit.dataset, Dataset::ChildNutrition);
  assert_eq!(hit.category.as_deref(), Some("Poultry Products"));
  assert_eq!(hit.data_type, None);
}

// ─── Autocomplete ────────────────────────────────────────────────────────────

#[tokio::test]
async fn autocomplete_returns_sorted_distinct_descriptions() {
  let s = seeded_fdc().await;
  let names = s.autocomplete(Dataset::Fdc, "ch", 10).await.unwrap();
  assert_eq!(
    names,
    vec!["Cheddar crackers", "Cheese, cheddar", "Cheese, cheddar, sharp"]
  );
  assert_eq!(s.autocomplete(Dataset::Fdc, "ch", 2).await.unwrap().len(), 2);
}

#[tokio::test]
async fn autocomplete_needs_two_characters() {
  let s = seeded_fdc().await;
  assert!(s.autocomplete(Dataset::Fdc, "c", 10).await.unwrap().is_empty());
}

// ─── Barcode ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn barcode_finds_branded_food_with_macros() {
  let s = seeded_fdc().await;
  let hit = s.lookup_barcode("0001234567890").await.unwrap().unwrap();
  assert_eq!(hit.dataset, Dataset::Fdc);
  assert_eq!(hit.code, 1002);
  assert_eq!(hit.brand_owner.as_deref(), Some("Hillside Creamery"));
  assert_eq!(hit.serving_size, Some(28.0));
  assert_eq!(hit.nutrition.calories, Some(400.0));
  // The lowest fact id wins when a pair repeats.
  assert_eq!(hit.nutrition.protein, Some(25.0));
  assert_eq!(hit.nutrition.fat, None);
}

#[tokio::test]
async fn barcode_falls_back_to_cn_foods() {
  let s = seeded_cn().await;
  let hit = s.lookup_barcode(" 00070000123456 ").await.unwrap().unwrap();
  assert_eq!(hit.dataset, Dataset::ChildNutrition);
  assert_eq!(hit.code, 100001);
  assert_eq!(hit.brand_name.as_deref(), Some("Lunchline"));
  assert_eq!(hit.nutrition.calories, Some(250.0));
  assert_eq!(hit.ingredients, None);
}

#[tokio::test]
async fn unknown_barcode_is_none() {
  let s = seeded_fdc().await;
  assert!(s.lookup_barcode("999").await.unwrap().is_none());
  assert!(s.lookup_barcode("").await.unwrap().is_none());
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_counts_every_table() {
  let s = seeded_fdc().await;
  let stats = s.stats().await.unwrap();
  assert_eq!(stats.tables.len(), 16);
  assert_eq!(stats.tables["fdc_food"], 4);
  assert_eq!(stats.tables["fdc_branded_food"], 1);
  assert_eq!(stats.tables["cn_food"], 0);

  assert_eq!(stats.top_categories.len(), 2);
  assert_eq!(stats.top_categories[0].id, 1);
  assert_eq!(stats.top_categories[0].count, 2);
  assert_eq!(stats.top_categories[1].name, "Spices and Herbs");
}
