mod config;

pub use config::{Config, DataConfig, MockConfig, ServerConfig, ServiceVariant};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `ATENA_ML_DATA_DIR` wins outright. Otherwise the directory is
/// `~/.config/atena-ml[-dev]/`, with `ATENA_ML_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("ATENA_ML_DATA_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("ATENA_ML_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("atena-ml-dev")
            } else {
                base_dir.join("atena-ml")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
