//! keysource CLI - resolve secrets from the configured backend.

mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use keysource::{Context, SourceType};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use commands::Outcome;

#[derive(Parser)]
#[command(name = "keysource")]
#[command(about = "Resolve secrets from environment and other backends")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value of a secret
    Get {
        /// Secret key
        key: String,

        /// Value to print when the key is not set
        #[arg(long)]
        default: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Exit 0 if a secret is set, 2 if it is not
    Exists {
        /// Secret key
        key: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Options selecting and bounding the backend.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Configuration file (defaults to keysource.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend type, overriding the configuration file
    #[arg(short, long)]
    pub backend: Option<SourceType>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // stdout carries secret values; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        info!("Received Ctrl+C, cancelling");
        cancel_on_signal.cancel();
    });

    let result = match cli.command {
        Commands::Get {
            key,
            default,
            source,
        } => {
            let ctx = build_context(&cancel, &source);
            commands::get::run(&ctx, &source, &key, default.as_deref(), &mut io::stdout()).await
        }
        Commands::Exists { key, source } => {
            let ctx = build_context(&cancel, &source);
            commands::get::exists(&ctx, &source, &key).await
        }
    };

    match result {
        Ok(Outcome::Found) => ExitCode::SUCCESS,
        Ok(Outcome::Missing) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn build_context(cancel: &CancellationToken, args: &SourceArgs) -> Context {
    let ctx = Context::background().with_cancellation(cancel.clone());
    match args.timeout {
        Some(secs) => ctx.with_timeout(Duration::from_secs(secs)),
        None => ctx,
    }
}
