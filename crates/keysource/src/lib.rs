//! Uniform retrieval of named secret values.
//!
//! This crate provides a trait-based abstraction for fetching secrets (API
//! keys, credentials, tokens) from pluggable backends. Every backend
//! implements [`Source`], and absence of a key is reported through a
//! distinguished [`SecretsError::NotFound`] variant so that callers can treat
//! optional secrets differently from infrastructure failures.
//!
//! Values are wrapped in [`SecretValue`], which redacts itself in `Debug`
//! output and zeroes its memory on drop.
//!
//! # Backends
//!
//! - **Environment** (`env` feature): reads the process environment
//!
//! # Example
//!
//! ```rust,ignore
//! use keysource::{new_source, Context, SourceExt, SourceType};
//!
//! let ctx = Context::background();
//! let source = new_source(&ctx, SourceType::Environment).await?;
//!
//! let token = source.get(&ctx, "GITHUB_TOKEN").await?;
//! let region = source.get_optional(&ctx, "AWS_REGION").await?;
//! ```

mod context;
mod error;
mod provider;
mod traits;
mod types;

#[cfg(feature = "env")]
mod env;

pub mod config;

pub use config::SourceConfig;
pub use context::Context;
pub use error::{ErrorKind, SecretsError};
pub use provider::{new_source, new_source_with_config};
pub use traits::{Source, SourceExt};
pub use types::{SecretValue, SourceType};

#[cfg(feature = "env")]
pub use env::EnvSource;

#[cfg(feature = "config")]
pub use config::ConfigError;
