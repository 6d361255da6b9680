//! Handlers for `GET /search` and `GET /autocomplete`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use pantry_core::{
  Dataset,
  store::FoodStore,
  view::{FoodQuery, SearchPage},
};
use serde::Deserialize;

use crate::error::ApiError;

/// Largest accepted `page_size`.
pub const MAX_PAGE_SIZE: u64 = 100;
/// Largest accepted autocomplete `limit`.
pub const MAX_SUGGESTIONS: usize = 50;

// ─── Search ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub q:         Option<String>,
  /// `fdc` (default) or `cn`.
  pub dataset:   Option<Dataset>,
  /// FDC only, e.g. `branded_food`.
  pub data_type: Option<String>,
  pub category:  Option<i64>,
  pub page:      Option<u64>,
  pub page_size: Option<u64>,
}

/// `GET /search?q=...[&dataset=fdc|cn][&data_type=...][&category=...][&page=...][&page_size=...]`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>, ApiError>
where
  S: FoodStore,
{
  let defaults = FoodQuery::default();
  let page = params.page.unwrap_or(defaults.page);
  let page_size = params.page_size.unwrap_or(defaults.page_size);
  if page == 0 {
    return Err(ApiError::invalid("page", "must be at least 1"));
  }
  if page_size == 0 || page_size > MAX_PAGE_SIZE {
    return Err(ApiError::invalid(
      "page_size",
      format!("must be between 1 and {MAX_PAGE_SIZE}"),
    ));
  }

  let query = FoodQuery {
    text: params.q.unwrap_or_default(),
    dataset: params.dataset.unwrap_or_default(),
    data_type: params.data_type.filter(|t| !t.trim().is_empty()),
    category: params.category,
    page,
    page_size,
  };

  let results = store.search(&query).await.map_err(ApiError::store)?;
  Ok(Json(results))
}

// ─── Autocomplete ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct AutocompleteParams {
  pub q:       Option<String>,
  pub dataset: Option<Dataset>,
  /// Default 10.
  pub limit:   Option<usize>,
}

/// `GET /autocomplete?q=...[&dataset=fdc|cn][&limit=...]`
pub async fn autocomplete<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<AutocompleteParams>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: FoodStore,
{
  let text = params.q.unwrap_or_default();
  let limit = params.limit.unwrap_or(10).min(MAX_SUGGESTIONS);
  let names = store
    .autocomplete(params.dataset.unwrap_or_default(), &text, limit)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(names))
}
