use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid registry config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// RegistryConfig
///
/// Behaviour switches for a registry. Every field has a default, so an empty
/// document is a valid config.
///
/// ```toml
/// unique_collections = true
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Claim each collection name for exactly one root class. When off, a
    /// collection annotation simply overwrites the root's name.
    pub unique_collections: bool,
}

impl RegistryConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(source)?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loading registry config");

        Self::from_toml_str(&source)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            unique_collections: true,
        }
    }
}

///
/// TESTS
///
