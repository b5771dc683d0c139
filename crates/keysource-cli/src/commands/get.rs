//! Secret lookup commands.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use keysource::{new_source_with_config, ConfigError, Context, Source, SourceConfig, SourceExt};
use tracing::debug;

use super::Outcome;
use crate::SourceArgs;

fn load_config(args: &SourceArgs) -> Result<SourceConfig> {
    let mut config = match &args.config {
        Some(path) => SourceConfig::load_from(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => match SourceConfig::load() {
            Ok(config) => config,
            Err(ConfigError::FileNotFound(path)) => {
                debug!(path = %path, "No configuration file, using default configuration");
                SourceConfig::default()
            }
            Err(e) => return Err(e).context("failed to load configuration"),
        },
    };

    if let Some(backend) = args.backend {
        if backend != config.source_type() {
            config = SourceConfig::from(backend);
        }
    }

    Ok(config)
}

async fn build_source(ctx: &Context, args: &SourceArgs) -> Result<Arc<dyn Source>> {
    let config = load_config(args)?;
    debug!(backend = %config.source_type(), "Configuration loaded");

    new_source_with_config(ctx, &config)
        .await
        .context("failed to initialise secrets source")
}

/// Writes the secret's value (or `default`) followed by a newline.
pub async fn run<W: Write>(
    ctx: &Context,
    args: &SourceArgs,
    key: &str,
    default: Option<&str>,
    out: &mut W,
) -> Result<Outcome> {
    let source = build_source(ctx, args).await?;

    match ctx.run(source.get_optional(ctx, key)).await? {
        Some(value) => {
            writeln!(out, "{}", value.expose())?;
        }
        None => match default {
            Some(default) => writeln!(out, "{default}")?,
            None => {
                eprintln!("Secret '{key}' not found");
                return Ok(Outcome::Missing);
            }
        },
    }

    out.flush()?;
    Ok(Outcome::Found)
}

/// Reports whether the key has a value, without printing it.
pub async fn exists(ctx: &Context, args: &SourceArgs, key: &str) -> Result<Outcome> {
    let source = build_source(ctx, args).await?;

    if ctx.run(source.exists(ctx, key)).await? {
        Ok(Outcome::Found)
    } else {
        Ok(Outcome::Missing)
    }
}
