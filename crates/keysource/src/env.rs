//! Environment variable secrets backend.
//!
//! A read-only backend that resolves keys against the process environment.

use std::borrow::Cow;
use std::env;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::SecretsError;
use crate::traits::Source;
use crate::types::{SecretValue, SourceType};

/// Environment variable secrets backend.
///
/// Without a prefix, key `API_KEY` reads variable `API_KEY`. With prefix
/// `MYAPP`, it reads `MYAPP_API_KEY`.
///
/// A variable set to the empty string is a present, empty secret. Only a
/// variable that is not set at all is reported as `NotFound`. Keys are not
/// validated: an empty key, or one the platform cannot represent, is
/// simply absent.
///
/// Every call re-reads the environment; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: Option<String>,
}

impl EnvSource {
    /// Creates a backend that reads keys as variable names verbatim.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that reads `{prefix}_{key}`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Returns the configured prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn env_var_name<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}_{key}")),
            None => Cow::Borrowed(key),
        }
    }
}

#[async_trait]
impl Source for EnvSource {
    async fn get(&self, _ctx: &Context, key: &str) -> Result<SecretValue, SecretsError> {
        let var_name = self.env_var_name(key);

        // var_os keeps "set to empty" distinct from "not set".
        let Some(raw) = env::var_os(&*var_name) else {
            return Err(SecretsError::not_found(key));
        };

        let value = match raw.into_string() {
            Ok(value) => value,
            Err(raw) => {
                tracing::warn!(
                    secret.name = key,
                    secret.env_var = %var_name,
                    "Environment variable contains invalid UTF-8, decoding lossily"
                );
                raw.to_string_lossy().into_owned()
            }
        };

        tracing::debug!(
            secret.name = key,
            secret.env_var = %var_name,
            secret.operation = "get",
            "Secret read from environment"
        );
        Ok(SecretValue::new(value))
    }

    fn source_type(&self) -> SourceType {
        SourceType::Environment
    }
}
