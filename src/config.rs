// YAML configuration: current store, log level, recent-activity window

use crate::query::{DEFAULT_VENTANA_DIAS, QueryContext};
use crate::record::deserialize_opt_id;
use chrono::{DateTime, Duration, Utc};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

const APP_DIR: &str = "salon-query";
const CONFIG_FILE: &str = "config.yaml";

/// Longest accepted recent-activity window, in days (ten years)
pub const MAX_VENTANA_DIAS: i64 = 3650;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Store whose records are in scope; None means every store
    #[serde(deserialize_with = "deserialize_opt_id")]
    pub tienda_actual: Option<String>,
    pub log_level: String,
    /// Days counted as "recent" for movimientos_recientes
    pub ventana_reciente_dias: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tienda_actual: None,
            log_level: "warn".to_string(),
            ventana_reciente_dias: DEFAULT_VENTANA_DIAS,
        }
    }
}

impl Config {
    /// `<config dir>/salon-query/config.yaml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&content).wrap_err_with(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content).context("Failed to parse YAML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_VENTANA_DIAS).contains(&self.ventana_reciente_dias) {
            return Err(eyre!(
                "ventana_reciente_dias must be between 1 and {}, got {}",
                MAX_VENTANA_DIAS,
                self.ventana_reciente_dias
            ));
        }
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| eyre!("Invalid log_level: {} (expected trace, debug, info, warn or error)", self.log_level))
    }

    /// Build the query context, letting an explicit store override the configured one
    ///
    /// The window is clamped to the accepted range for configs built in code.
    pub fn query_context(&self, tienda: Option<String>, now: DateTime<Utc>) -> QueryContext {
        let dias = self.ventana_reciente_dias.clamp(1, MAX_VENTANA_DIAS);
        let mut ctx = QueryContext::new(now).with_ventana(Duration::days(dias));
        ctx.tienda_id = tienda
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.tienda_actual.clone());
        ctx
    }
}
