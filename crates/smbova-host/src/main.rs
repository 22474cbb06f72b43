// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Smbova: SambaPlugin host process.
//
// Entry point. Initialises logging and configuration, serves a share tree
// through `SambaHost`, and speaks line-delimited JSON on stdin/stdout. Logs go
// to stderr so stdout stays a clean reply stream.

mod session;
mod wire;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use smbova_core::SambaError;
use smbova_core::config::{default_config_path, load_config, save_config};
use smbova_core::error::Result;
use smbova_native::{HeadlessLauncher, LocalShare, SambaHost};

/// Serve SambaPlugin calls over stdin/stdout.
#[derive(Debug, Parser)]
#[command(name = "smbova", version, about)]
struct Cli {
    /// Directory whose `<host>/<share>/...` tree backs `smb://` URLs.
    #[arg(long)]
    root: PathBuf,

    /// Configuration file (defaults to the per-user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration back to the config file and continue.
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path);
    if cli.save_config {
        save_config(&config_path, &config)?;
        tracing::info!(path = %config_path.display(), "configuration saved");
    }

    tracing::info!(root = %cli.root.display(), "Smbova host starting");

    let host = SambaHost::new(
        Arc::new(LocalShare::new(cli.root)),
        Arc::new(HeadlessLauncher),
        config,
        Handle::current(),
    );

    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(session::write_output(
        tokio::io::stdout(),
        host.subscribe_progress(),
        out_rx,
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        session::handle_line(&host, &out_tx, &line);
    }

    tracing::info!("stdin closed; waiting for in-flight calls");
    drop(out_tx);

    // The writer ends once every pending completion has replied.
    writer
        .await
        .map_err(|e| SambaError::Bridge(format!("writer task failed: {e}")))??;
    tracing::info!("Smbova host stopped");
    Ok(())
}
