#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::{LogFormat, StoreBackend, TomlConfig};

use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::path::Path;

/// Reads the config file if one is given, otherwise starts from defaults.
/// `store_override` replaces the configured store path and forces the file backend.
pub fn load_config(path: Option<&Path>, store_override: Option<&str>) -> Result<TomlConfig> {
    let mut config = match path {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };

    if let Some(store) = store_override {
        config.store.backend = StoreBackend::File;
        config.store.path = store.to_string();
    }

    config.validate()?;
    Ok(config)
}
