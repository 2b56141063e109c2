use crate::error::AggregateError;
use crate::models::{Category, CategoryDef, CategoryTable, MatchMode};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gstr-reco.toml";
/// Env var overriding the config file path
pub const CONFIG_PATH_ENV: &str = "GSTR_RECO_CONFIG";
/// Prefix for env overrides, e.g. `GSTR_RECO__SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "GSTR_RECO";

/// Application config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Category keyword table and matching policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub match_mode: MatchMode,
    /// Full replacement of the built-in table when non-empty
    #[serde(default)]
    pub categories: Vec<CategoryDef>,
    /// Per-category keyword overrides applied on top of the table
    #[serde(default)]
    pub overrides: Vec<CategoryDef>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            match_mode: MatchMode::Substring,
            categories: Category::ALL.iter().map(Category::definition).collect(),
            overrides: Vec::new(),
        }
    }
}

impl AggregatorConfig {
    /// Builds the validated category table
    pub fn category_table(&self) -> Result<CategoryTable, AggregateError> {
        let base = if self.categories.is_empty() {
            CategoryTable::default().with_mode(self.match_mode)
        } else {
            CategoryTable::new(self.categories.clone(), self.match_mode)?
        };
        self.overrides
            .iter()
            .try_fold(base, |table, o| table.with_override(&o.name, o.keywords.clone()))
    }
}

impl AppConfig {
    /// Loads defaults, then the config file, then `GSTR_RECO__*` env vars.
    pub fn load() -> Result<Self, AggregateError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(Path::new(&path))
    }

    /// Like [`AppConfig::load`] with an explicit file; a missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, AggregateError> {
        let defaults = ServerConfig::default();
        let settings = Config::builder()
            .set_default("server.host", defaults.host)?
            .set_default("server.port", defaults.port as i64)?
            .set_default("server.max_upload_bytes", defaults.max_upload_bytes as i64)?
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let cfg: AppConfig = settings.try_deserialize()?;
        // Surface a bad table at startup rather than on the first request
        cfg.aggregator.category_table()?;
        Ok(cfg)
    }
}
