//! Layered runtime settings: built-in defaults, then the TOML file, then
//! `PANTRY_*` environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use pantry_import::{MalformedRows, options::DEFAULT_CN_RELEASE};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file.
  pub store_path:   PathBuf,
  pub host:         String,
  pub port:         u16,
  /// Default FoodData Central source directory.
  pub fdc_dir:      PathBuf,
  /// Default Child Nutrition source directory.
  pub cn_dir:       PathBuf,
  pub cn_release:   String,
  pub on_malformed: MalformedRows,
}

impl Settings {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = defaults()?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PANTRY"))
      .build()
      .context("failed to read config file")?;

    let settings: Self = settings
      .try_deserialize()
      .context("failed to deserialise Settings")?;
    Ok(settings.expanded())
  }

  fn expanded(self) -> Self {
    Self {
      store_path: expand_tilde(&self.store_path),
      fdc_dir: expand_tilde(&self.fdc_dir),
      cn_dir: expand_tilde(&self.cn_dir),
      ..self
    }
  }
}

fn defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
  Ok(
    config::Config::builder()
      .set_default("store_path", "pantry.db")?
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8000)?
      .set_default("fdc_dir", "data/fdc")?
      .set_default("cn_dir", "data/cn")?
      .set_default("cn_release", DEFAULT_CN_RELEASE)?
      .set_default("on_malformed", "abort")?,
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn from_toml(toml: &str) -> Settings {
    defaults()
      .unwrap()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn defaults_fill_every_field() {
    let s = from_toml("");
    assert_eq!(s.store_path, PathBuf::from("pantry.db"));
    assert_eq!(s.port, 8000);
    assert_eq!(s.cn_release, DEFAULT_CN_RELEASE);
    assert_eq!(s.on_malformed, MalformedRows::Abort);
  }

  #[test]
  fn file_values_override_defaults() {
    let s = from_toml(
      "port = 9100\ncn_dir = \"/srv/cn\"\ncn_release = \"CN.2026.01\"\non_malformed = \"skip\"\n",
    );
    assert_eq!(s.port, 9100);
    assert_eq!(s.cn_dir, PathBuf::from("/srv/cn"));
    assert_eq!(s.cn_release, "CN.2026.01");
    assert_eq!(s.on_malformed, MalformedRows::Skip);
    assert_eq!(s.host, "127.0.0.1");
  }

  #[test]
  fn missing_file_is_not_an_error() {
    let s = Settings::load(Path::new("/nonexistent/pantry.toml")).unwrap();
    assert_eq!(s.fdc_dir, PathBuf::from("data/fdc"));
  }

  #[test]
  fn tilde_expands_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/db/pantry.db")), PathBuf::from(home).join("db/pantry.db"));
    assert_eq!(expand_tilde(Path::new("/abs/pantry.db")), PathBuf::from("/abs/pantry.db"));
  }
}
