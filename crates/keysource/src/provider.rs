//! Factory for secrets sources.

use std::sync::Arc;

use crate::config::SourceConfig;
use crate::context::Context;
use crate::error::SecretsError;
use crate::traits::Source;
use crate::types::SourceType;

#[cfg(feature = "env")]
use crate::env::EnvSource;

/// Constructs a source for the given backend type with default settings.
///
/// Fails immediately if the backend is not compiled in or `ctx` is already
/// done; a successfully constructed source is ready for use.
pub async fn new_source(
    ctx: &Context,
    source_type: SourceType,
) -> Result<Arc<dyn Source>, SecretsError> {
    new_source_with_config(ctx, &SourceConfig::from(source_type)).await
}

/// Constructs a source from backend-specific configuration.
pub async fn new_source_with_config(
    ctx: &Context,
    config: &SourceConfig,
) -> Result<Arc<dyn Source>, SecretsError> {
    ctx.check()?;
    config.validate()?;

    let source = create_source(config)?;
    tracing::debug!(
        source.backend = %config.source_type(),
        "Secrets source constructed"
    );
    Ok(source)
}

fn create_source(config: &SourceConfig) -> Result<Arc<dyn Source>, SecretsError> {
    match config {
        #[cfg(feature = "env")]
        SourceConfig::Environment { prefix } => {
            let source = match prefix {
                Some(prefix) => EnvSource::with_prefix(prefix),
                None => EnvSource::new(),
            };
            Ok(Arc::new(source))
        }

        #[allow(unreachable_patterns)]
        _ => Err(SecretsError::UnsupportedBackend(format!(
            "{} backend is not enabled",
            config.source_type()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[cfg(feature = "env")]
    #[tokio::test]
    async fn environment_backend_from_type() {
        let ctx = Context::background();

        let source = new_source(&ctx, SourceType::Environment).await.unwrap();

        assert_eq!(source.source_type(), SourceType::Environment);
    }

    #[cfg(feature = "env")]
    #[tokio::test]
    async fn environment_backend_from_config_uses_prefix() {
        std::env::set_var("KSRC_PROVIDER_DB_URL", "postgres://localhost");

        let ctx = Context::background();
        let config = SourceConfig::Environment {
            prefix: Some("KSRC_PROVIDER".to_owned()),
        };
        let source = new_source_with_config(&ctx, &config).await.unwrap();

        let value = source.get(&ctx, "DB_URL").await.unwrap();
        assert_eq!(value.expose(), "postgres://localhost");

        std::env::remove_var("KSRC_PROVIDER_DB_URL");
    }

    #[tokio::test]
    async fn invalid_config_fails_at_construction() {
        let ctx = Context::background();
        let config = SourceConfig::Environment {
            prefix: Some(String::new()),
        };

        let err = new_source_with_config(&ctx, &config).await.err().unwrap();

        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn cancelled_context_fails_construction() {
        let ctx = Context::background();
        ctx.cancel();

        let err = new_source(&ctx, SourceType::Environment).await.err().unwrap();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
    }

    #[cfg(not(feature = "env"))]
    #[tokio::test]
    async fn disabled_backend_is_unsupported() {
        let ctx = Context::background();

        let err = new_source(&ctx, SourceType::Environment).await.err().unwrap();

        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
