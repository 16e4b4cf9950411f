//! Configuration management for the RAX files service
//!
//! Everything here is read once at startup; the sandbox root in particular
//! never changes while the process runs.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::sandbox::DEFAULT_MAX_DEPTH;
use crate::storage::StoragePolicy;
use crate::storage::mime::DEFAULT_SNIFF_BYTES;

/// Environment variables with this prefix override file values,
/// e.g. `RAX_FILES_STORAGE_ROOT=/srv/files`.
pub const ENV_PREFIX: &str = "RAX_FILES";

const DEFAULT_MAX_COMMAND_LENGTH: usize = 4096;

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Root directory all file operations are confined to
    pub storage_root: String,

    /// Create the storage root at startup when it is missing
    pub create_root: bool,

    /// Deepest nesting accepted below a directory being deleted
    pub max_delete_depth: usize,

    /// Leading bytes read when sniffing a file's content type
    pub mime_sniff_bytes: usize,

    /// Console lines longer than this are rejected
    pub max_command_length: usize,
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Try the packaged location first, then the working directory
        let config_paths = ["rax-files/config", "config"];

        let mut last_error = None;
        for config_path in config_paths {
            match Self::load_from(config_path) {
                Ok(config) => return Ok(config),
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| ConfigError::Message("no configuration found".into())))
    }

    /// Load configuration from one explicit file, with environment overrides
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("create_root", true)?
            .set_default("max_delete_depth", DEFAULT_MAX_DEPTH as u64)?
            .set_default("mime_sniff_bytes", DEFAULT_SNIFF_BYTES as u64)?
            .set_default("max_command_length", DEFAULT_MAX_COMMAND_LENGTH as u64)?
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_root.trim().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        if self.mime_sniff_bytes == 0 {
            return Err(ConfigError::Message(
                "mime_sniff_bytes must be greater than 0".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Get storage root as PathBuf
    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }

    pub fn storage_policy(&self) -> StoragePolicy {
        StoragePolicy {
            max_delete_depth: self.max_delete_depth,
            mime_sniff_bytes: self.mime_sniff_bytes,
        }
    }
}
