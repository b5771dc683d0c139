//! The source contract and its convenience extensions.

use async_trait::async_trait;

use crate::context::Context;
use crate::error::SecretsError;
use crate::types::{SecretValue, SourceType};

/// A backend that resolves secret keys to values.
///
/// Implementations may read from the process environment, files, or remote
/// secret managers. Callers hold an `Arc<dyn Source>` and stay agnostic of
/// which backend answers.
///
/// # Absence
///
/// A key with no value must be reported as [`SecretsError::NotFound`].
/// Every other failure uses a different variant, so callers can treat a
/// missing optional secret as a normal branch while still surfacing
/// infrastructure errors.
///
/// # Context
///
/// Backends that perform blocking or remote work should stop when `ctx` is
/// cancelled or its deadline passes. Backends that answer immediately may
/// ignore it.
#[async_trait]
pub trait Source: Send + Sync {
    /// Retrieves the value stored under `key`.
    ///
    /// Keys are passed through unvalidated; what counts as a well-formed
    /// key is up to the backend.
    async fn get(&self, ctx: &Context, key: &str) -> Result<SecretValue, SecretsError>;

    /// Returns the type of backend serving this source.
    fn source_type(&self) -> SourceType;
}

/// Helpers for call sites where a secret is optional.
#[async_trait]
pub trait SourceExt: Source {
    /// Like [`Source::get`], but maps `NotFound` to `Ok(None)`.
    async fn get_optional(
        &self,
        ctx: &Context,
        key: &str,
    ) -> Result<Option<SecretValue>, SecretsError> {
        match self.get(ctx, key).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns `default` when the key is absent. Other errors propagate.
    async fn get_or(
        &self,
        ctx: &Context,
        key: &str,
        default: SecretValue,
    ) -> Result<SecretValue, SecretsError> {
        Ok(self.get_optional(ctx, key).await?.unwrap_or(default))
    }

    /// Checks whether the key has a value.
    async fn exists(&self, ctx: &Context, key: &str) -> Result<bool, SecretsError> {
        Ok(self.get_optional(ctx, key).await?.is_some())
    }
}

impl<S: Source + ?Sized> SourceExt for S {}
