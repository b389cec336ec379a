//! # ltrctl
//!
//! Entry point for the long-term retention policy CLI.
//!
//! Startup order matters: the rustls crypto provider must be installed
//! before any TLS connection is attempted.

use anyhow::Result;
use clap::Parser;
use ltr_policy_cli::cli::Cli;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    // Configure rustls crypto provider FIRST, before any other operations
    // Required for rustls 0.23+ when no default provider is set via features
    // We use ring as the crypto provider
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ltrctl=info,ltr_policy_cli=info".into()),
        )
        .init();

    debug!(
        "ltrctl {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_GIT_HASH"),
        env!("BUILD_DATETIME")
    );

    let cli = Cli::parse();
    ltr_policy_cli::cli::execute(cli).await
}
