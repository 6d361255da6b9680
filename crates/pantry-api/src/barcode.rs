//! Handler for `GET /barcode`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use pantry_core::{store::FoodStore, view::BarcodeMatch};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct BarcodeParams {
  pub barcode: Option<String>,
}

/// `GET /barcode?barcode=<gtin>`: 400 without a barcode, 404 when no food
/// carries it.
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<BarcodeParams>,
) -> Result<Json<BarcodeMatch>, ApiError>
where
  S: FoodStore,
{
  let barcode = params.barcode.unwrap_or_default();
  let barcode = barcode.trim();
  if barcode.is_empty() {
    return Err(ApiError::MissingParam("barcode"));
  }

  let found = store
    .lookup_barcode(barcode)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::UnknownBarcode(barcode.to_owned()))?;
  Ok(Json(found))
}
