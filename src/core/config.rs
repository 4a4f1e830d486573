use crate::core::filter::CardGroupMapping;
use crate::core::format::{Locale, NumberFormatter};
use crate::core::resource::DEFAULT_REFRESH_INTERVAL;
use crate::core::settings::DisabledGroups;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

fn default_refresh_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_currency_unit() -> String {
    "IRR".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_currency_unit")]
    pub currency_unit: String,
    #[serde(default)]
    pub disabled_groups: Vec<String>,
    #[serde(default)]
    pub card_groups: HashMap<String, Vec<String>>,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "homedash", "homedash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "homedash", "homedash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn group_settings(&self) -> DisabledGroups {
        DisabledGroups::new(self.disabled_groups.iter().cloned())
    }

    pub fn card_mapping(&self) -> CardGroupMapping {
        CardGroupMapping::builtin().with_overrides(&self.card_groups)
    }

    pub fn number_formatter(&self) -> NumberFormatter {
        NumberFormatter::new(self.locale, &self.currency_unit)
    }
}
