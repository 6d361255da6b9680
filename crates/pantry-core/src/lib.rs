//! Core types and trait definitions for the Pantry nutrition store.
//!
//! This crate is deliberately free of file, HTTP and database dependencies.
//! The importer, the storage backends and the read API all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod cn;
pub mod dataset;
pub mod fdc;
pub mod nutrients;
pub mod reference;
pub mod store;
pub mod view;

pub use dataset::{Dataset, Table};
pub use reference::{EntityKind, NaturalKey, Reference};
