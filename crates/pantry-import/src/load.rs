//! Shared stage bodies: the run context and the loops common to both
//! datasets.

use std::collections::HashSet;

use pantry_core::{Dataset, EntityKind, store::{Batch, FoodStore}};
use pantry_csv::Record;

use crate::{
  batch::BatchWriter,
  error::{FieldError, Result},
  report::StageReport,
  resolve::Resolver,
  stage::StageRun,
};

pub(crate) type Parse<T> = fn(&Record) -> Result<T, FieldError>;

/// State carried from stage to stage within one run.
pub(crate) struct Context<'s, S> {
  pub store:    &'s S,
  pub dataset:  Dataset,
  pub resolver: Resolver,
  /// Root keys admitted by a limited food stage. `None` when no limit was
  /// applied, in which case food references are checked against storage.
  pub admitted: Option<HashSet<i64>>,
  pub limit:    Option<u64>,
}

impl<'s, S: FoodStore> Context<'s, S> {
  pub fn new(store: &'s S, dataset: Dataset, limit: Option<u64>) -> Self {
    Self { store, dataset, resolver: Resolver::new(), admitted: None, limit }
  }

  /// Whether a fact or extension row for `food` may be stored.
  pub async fn food_admitted(&mut self, food: i64) -> Result<bool> {
    if let Some(admitted) = &self.admitted {
      return Ok(admitted.contains(&food));
    }
    let kind = match self.dataset {
      Dataset::Fdc => EntityKind::FdcFood,
      Dataset::ChildNutrition => EntityKind::CnFood,
    };
    Ok(self.resolver.resolve(self.store, kind, food).await?.is_some())
  }

  /// Whether the food stage has admitted as many rows as the limit allows.
  pub fn limit_reached<T>(&self, writer: &BatchWriter<'_, S, T>) -> bool
  where
    Vec<T>: Into<Batch>,
  {
    self.limit.is_some_and(|limit| writer.stats().added >= limit)
  }
}

/// A table without references: every well-formed row is written.
pub(crate) async fn plain<S, T>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
  parse: Parse<T>,
) -> Result<StageReport>
where
  S: FoodStore,
  Vec<T>: Into<Batch>,
{
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while let Some(record) = run.next_record()? {
    let Some(row) = run.accept(&record, parse(&record))? else { continue };
    writer.add(row).await?;
  }
  run.finish(writer).await
}

/// Rows that belong to a root food (extensions, weights): written only when
/// their food was admitted.
pub(crate) async fn owned_by_food<S, T>(
  ctx: &mut Context<'_, S>,
  mut run: StageRun,
  parse: Parse<T>,
  food_of: fn(&T) -> i64,
) -> Result<StageReport>
where
  S: FoodStore,
  Vec<T>: Into<Batch>,
{
  let mut writer = BatchWriter::new(ctx.store, run.stage().batch_size());
  while let Some(record) = run.next_record()? {
    let Some(row) = run.accept(&record, parse(&record))? else { continue };
    if !ctx.food_admitted(food_of(&row)).await? {
      run.drop_row();
      continue;
    }
    writer.add(row).await?;
  }
  run.finish(writer).await
}
