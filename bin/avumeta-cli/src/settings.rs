//! Layered configuration: optional TOML file, then `AVUMETA_*` environment

use anyhow::{Context, Result};
use avumeta_common::MetadataConfig;
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "AVUMETA";

pub fn load_config(path: Option<&Path>) -> Result<MetadataConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));

    let config = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize::<MetadataConfig>()
        .context("Invalid configuration")?;
    tracing::debug!("Using configuration {:?}", config);
    Ok(config)
}
