//! Runtime configuration for the `gazette-server` binary.
//!
//! Settings come from an optional TOML file layered under `GAZETTE_*`
//! environment variables, so `GAZETTE_PORT=9000` overrides `port = 8080`.

use std::path::{Path, PathBuf};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use gazette_store_sqlite::StoreOptions;
use serde::Deserialize;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// SQLite database file; a leading `~/` is expanded.
  pub store_path:      PathBuf,
  pub busy_retries:    usize,
  pub busy_backoff_ms: u64,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_string(),
      port:            8080,
      store_path:      PathBuf::from("gazette.db"),
      busy_retries:    3,
      busy_backoff_ms: 10,
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions {
      busy_retries: self.busy_retries,
      busy_backoff_ms: self.busy_backoff_ms,
      ..StoreOptions::default()
    }
  }

  /// The store path with `~` resolved against `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Load configuration from `path` (if given and present) and the environment.
pub fn load_config(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
  let mut builder = Config::builder();
  if let Some(path) = path {
    builder = builder.add_source(File::from(path).required(false));
  }
  finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<ServerConfig, ConfigError> {
  builder
    .add_source(Environment::with_prefix("GAZETTE").try_parsing(true))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
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
  use config::FileFormat;

  use super::*;

  fn from_toml(toml: &str) -> ServerConfig {
    finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml))).unwrap()
  }

  #[test]
  fn missing_file_falls_back_to_defaults() {
    let cfg = load_config(Some(Path::new("/nonexistent/gazette.toml"))).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("gazette.db"));
    assert_eq!(cfg.busy_retries, 3);
  }

  #[test]
  fn file_values_override_defaults() {
    let cfg = from_toml("port = 9191\nstore_path = \"/var/lib/gazette.db\"\nbusy_retries = 0");
    assert_eq!(cfg.port, 9191);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.store_options().busy_retries, 0);
    assert_eq!(cfg.resolved_store_path(), PathBuf::from("/var/lib/gazette.db"));
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/gazette/db.sqlite")),
      PathBuf::from(home).join("gazette/db.sqlite")
    );
    assert_eq!(expand_tilde(Path::new("relative.db")), PathBuf::from("relative.db"));
  }
}
