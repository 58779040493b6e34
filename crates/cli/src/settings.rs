// Layered CLI settings: defaults < qmore.toml < --config file < QMORE_* env

use anyhow::{Context, Result};
use qmore_core::ResolverConfig;
use qmore_infra_redis::RedisEngineConfig;
use serde::Deserialize;
use std::path::Path;

/// Default settings file looked up in the working directory
const DEFAULT_SETTINGS_FILE: &str = "qmore";

/// Prefix for environment overrides (`QMORE_REDIS__URL`, ...)
const ENV_PREFIX: &str = "QMORE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub redis: RedisEngineConfig,
    pub resolver: ResolverConfig,
}

impl Settings {
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(DEFAULT_SETTINGS_FILE).required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings: Settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        settings
            .resolver
            .validate()
            .context("Invalid resolver settings")?;
        Ok(settings)
    }
}
