//! Handler for `GET /stats`.

use std::sync::Arc;

use axum::{Json, extract::State};
use pantry_core::{store::FoodStore, view::Stats};

use crate::error::ApiError;

/// `GET /stats`: row count per table and the largest FDC categories.
pub async fn handler<S>(State(store): State<Arc<S>>) -> Result<Json<Stats>, ApiError>
where
  S: FoodStore,
{
  let stats = store.stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
