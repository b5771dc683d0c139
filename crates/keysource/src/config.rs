//! Configuration types for secrets backends.
//!
//! A [`SourceConfig`] names a backend and carries its settings. It can be
//! built directly, converted from a [`SourceType`], or (with the `config`
//! feature) loaded from a TOML file layered with `KEYSOURCE_` environment
//! overrides:
//!
//! ```toml
//! backend = "environment"
//! prefix = "MYAPP"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SecretsError;
use crate::types::SourceType;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "keysource.toml";

/// Prefix for environment variables overriding file settings.
pub const ENV_OVERRIDE_PREFIX: &str = "KEYSOURCE_";

/// Backend configuration variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
#[non_exhaustive]
pub enum SourceConfig {
    /// Environment variable backend.
    #[serde(alias = "env")]
    Environment {
        /// Optional variable prefix; key `K` then reads `{prefix}_K`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prefix: Option<String>,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::Environment { prefix: None }
    }
}

impl From<SourceType> for SourceConfig {
    fn from(source_type: SourceType) -> Self {
        match source_type {
            SourceType::Environment => Self::Environment { prefix: None },
        }
    }
}

impl SourceConfig {
    /// Returns the backend this configuration selects.
    #[must_use]
    pub const fn source_type(&self) -> SourceType {
        match self {
            Self::Environment { .. } => SourceType::Environment,
        }
    }

    /// Checks backend-specific settings.
    pub fn validate(&self) -> Result<(), SecretsError> {
        match self {
            Self::Environment { prefix: Some(prefix) } => {
                if prefix.is_empty() {
                    return Err(SecretsError::Configuration(
                        "environment prefix must not be empty".to_owned(),
                    ));
                }
                if prefix.contains(|c: char| c == '=' || c == '\0') {
                    return Err(SecretsError::Configuration(format!(
                        "environment prefix {prefix:?} contains '=' or NUL"
                    )));
                }
                Ok(())
            }
            Self::Environment { prefix: None } => Ok(()),
        }
    }
}

#[cfg(feature = "config")]
pub use loader::ConfigError;

#[cfg(feature = "config")]
mod loader {
    use std::path::Path;

    use figment::providers::{Env, Format, Serialized, Toml};
    use figment::{Error as FigmentError, Figment};
    use thiserror::Error;

    use super::{SourceConfig, DEFAULT_CONFIG_FILE, ENV_OVERRIDE_PREFIX};

    /// Errors that can occur when loading or parsing source configuration.
    #[derive(Error, Debug)]
    pub enum ConfigError {
        /// Error from the Figment configuration library.
        #[error("configuration error: {0}")]
        Figment(Box<FigmentError>),

        /// The specified configuration file was not found.
        #[error("configuration file not found: {0}")]
        FileNotFound(String),
    }

    impl From<FigmentError> for ConfigError {
        fn from(err: FigmentError) -> Self {
            Self::Figment(Box::new(err))
        }
    }

    impl SourceConfig {
        /// Loads configuration from the default path (`keysource.toml`).
        pub fn load() -> Result<Self, ConfigError> {
            Self::load_from(DEFAULT_CONFIG_FILE)
        }

        /// Loads configuration from the specified file path.
        ///
        /// Environment variables prefixed with `KEYSOURCE_` override file
        /// settings, e.g. `KEYSOURCE_PREFIX=MYAPP`. Omitted settings fall back
        /// to the environment backend with no prefix.
        pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
            let path = path.as_ref();

            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.display().to_string()));
            }

            let figment = Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file(path))
                .merge(Env::prefixed(ENV_OVERRIDE_PREFIX));

            figment.extract::<Self>().map_err(ConfigError::from)
        }

        /// Parses configuration from a TOML string.
        pub fn parse(content: &str) -> Result<Self, ConfigError> {
            let figment =
                Figment::from(Serialized::defaults(Self::default())).merge(Toml::string(content));
            figment.extract::<Self>().map_err(ConfigError::from)
        }
    }
}
