//! The `pantry` binary.
//!
//! Loads the USDA FoodData Central and Child Nutrition CSV releases into a
//! SQLite store and serves the JSON read API over it. Settings come from
//! `pantry.toml` (or the path given with `--config`) and `PANTRY_*`
//! environment variables.
//!
//! ```text
//! pantry import-fdc --dir data/fdc --limit 500
//! pantry import-cn --release CN.2025.05 --skip-weights
//! pantry serve
//! ```

mod settings;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use anyhow::Context as _;
use axum::http::{Method, header::CONTENT_TYPE};
use clap::{Args, Parser, Subcommand};
use pantry_core::{Dataset, store::FoodStore as _};
use pantry_import::{
  ImportOptions, ImportSummary, MalformedRows, SearchIndexOutcome, StageStatus,
};
use pantry_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::{
  cors::{Any, CorsLayer},
  trace::TraceLayer,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

#[derive(Parser)]
#[command(author, version, about = "USDA food composition importer and API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "pantry.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import a FoodData Central release.
  ImportFdc {
    #[command(flatten)]
    import: ImportArgs,
    /// Skip food_portion.csv.
    #[arg(long)]
    skip_portions: bool,
  },
  /// Import a Child Nutrition release.
  ImportCn {
    #[command(flatten)]
    import: ImportArgs,
    /// Skip the WGHT file.
    #[arg(long)]
    skip_weights: bool,
    /// File name prefix of the release, e.g. `CN.2025.05`.
    #[arg(long)]
    release: Option<String>,
  },
  /// Rebuild the full-text search index of a dataset.
  Reindex {
    #[arg(long, default_value = "fdc")]
    dataset: Dataset,
  },
  /// Print row counts per table as JSON.
  Stats,
  /// Serve the JSON API.
  Serve,
}

#[derive(Args)]
struct ImportArgs {
  /// Source directory; defaults to the configured one.
  #[arg(long)]
  dir: Option<PathBuf>,
  /// Admit at most this many foods.
  #[arg(long)]
  limit: Option<u64>,
  /// Skip the nutrient value file.
  #[arg(long)]
  skip_nutrients: bool,
  /// What to do with rows that do not convert.
  #[arg(long, value_name = "abort|skip")]
  on_malformed: Option<MalformedRows>,
}

impl ImportArgs {
  fn options(self, default_dir: &Path, settings: &Settings) -> ImportOptions {
    let mut options = ImportOptions::new(self.dir.unwrap_or_else(|| default_dir.to_path_buf()));
    options.limit = self.limit;
    options.skip_nutrients = self.skip_nutrients;
    options.malformed = self.on_malformed.unwrap_or(settings.on_malformed);
    options.cn_release = settings.cn_release.clone();
    options
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  match cli.command {
    Command::ImportFdc { import, skip_portions } => {
      let mut options = import.options(&settings.fdc_dir, &settings);
      options.skip_portions = skip_portions;
      run_import(&store, Dataset::Fdc, &options).await?;
    }
    Command::ImportCn { import, skip_weights, release } => {
      let mut options = import.options(&settings.cn_dir, &settings);
      options.skip_portions = skip_weights;
      if let Some(release) = release {
        options.cn_release = release;
      }
      run_import(&store, Dataset::ChildNutrition, &options).await?;
    }
    Command::Reindex { dataset } => {
      match pantry_import::refresh_search_index(&store, dataset).await {
        SearchIndexOutcome::Refreshed { foods } => println!("{dataset}: indexed {foods} foods"),
        SearchIndexOutcome::Failed(reason) => anyhow::bail!("{dataset}: reindex failed: {reason}"),
      }
    }
    Command::Stats => {
      let stats = store.stats().await.context("failed to read stats")?;
      println!("{}", serde_json::to_string_pretty(&stats)?);
    }
    Command::Serve => serve(store, &settings).await?,
  }

  Ok(())
}

async fn run_import(
  store: &SqliteStore,
  dataset: Dataset,
  options: &ImportOptions,
) -> anyhow::Result<()> {
  let summary = pantry_import::import(store, dataset, options)
    .await
    .with_context(|| format!("{dataset} import from {} failed", options.source_dir.display()))?;
  print_summary(&summary);
  Ok(())
}

fn print_summary(summary: &ImportSummary) {
  println!(
    "{:<24} {:>9} {:>9} {:>9} {:>9} {:>9}",
    "stage", "read", "admitted", "dropped", "malformed", "inserted"
  );
  for report in &summary.stages {
    match &report.status {
      StageStatus::Completed => println!(
        "{:<24} {:>9} {:>9} {:>9} {:>9} {:>9}",
        report.stage.to_string(),
        report.read,
        report.admitted,
        report.dropped,
        report.malformed,
        report.inserted
      ),
      StageStatus::Skipped(reason) => {
        println!("{:<24} skipped ({reason})", report.stage.to_string())
      }
    }
  }
  match &summary.search_index {
    SearchIndexOutcome::Refreshed { foods } => println!("search index: {foods} foods"),
    SearchIndexOutcome::Failed(reason) => println!("search index: failed ({reason})"),
  }
}

async fn serve(store: SqliteStore, settings: &Settings) -> anyhow::Result<()> {
  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::OPTIONS])
    .allow_headers([CONTENT_TYPE])
    .max_age(Duration::from_secs(60 * 60));

  let app = axum::Router::new()
    .nest("/api", pantry_api::api_router(Arc::new(store)))
    .layer(cors)
    .layer(TraceLayer::new_for_http());
  let address = format!("{}:{}", settings.host, settings.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("Server shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::warn!(error = %e, "failed to listen for ctrl-c");
    std::future::pending::<()>().await;
  }
}
