//! JSON read API for Pantry.
//!
//! Exposes an axum [`Router`] backed by any [`pantry_core::store::FoodStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", pantry_api::api_router(Arc::new(store)))
//! ```

pub mod barcode;
pub mod error;
pub mod search;
pub mod stats;

use std::sync::Arc;

use axum::{Router, routing::get};
use pantry_core::store::FoodStore;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: FoodStore + 'static,
{
  Router::new()
    .route("/search", get(search::handler::<S>))
    .route("/autocomplete", get(search::autocomplete::<S>))
    .route("/barcode", get(barcode::handler::<S>))
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
