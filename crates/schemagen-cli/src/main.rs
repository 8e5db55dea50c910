//! `schemagen`: generates typed client code from GraphQL introspection.
//!
//! `schemagen generate --config schemagen.toml` runs every configured target
//! and reports each one; `schemagen validate <file>` runs the generated-code
//! checks on an existing file and prints the report as JSON.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Allow for tests"
    )
)]

use std::io::{stderr, stdout};

use anyhow::Result;
use clap::Parser as _;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

use cli::{Cli, Commands};

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "schemagen=info".into()))
        .with(layer().with_writer(stderr))
        .init();

    let cli = Cli::parse();
    let mut out = stdout().lock();

    match cli.command {
        Commands::Generate { config } => {
            let cancel = cancel_on_ctrl_c();
            commands::handle_generate(&config, &cancel, &mut out).await?;
        }
        Commands::Validate {
            file,
            ignore,
            language,
            report,
        } => {
            commands::handle_validate(&file, &ignore, &language, report.as_deref(), &mut out)
                .await?;
        }
    }

    Ok(())
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling in-flight targets");
            watcher.cancel();
        }
    });
    cancel
}
