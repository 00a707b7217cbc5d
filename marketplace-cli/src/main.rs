//! Marketplace CLI
//!
//! Terminal front-end over `marketplace-client`: sign in, browse products,
//! buy and resell licenses, follow badges and payouts, and moderate as an
//! admin. The session lives in a JSON file so consecutive invocations stay
//! signed in.

#![allow(clippy::print_stdout, reason = "CLI tool outputs to stdout")]

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use marketplace_client::config::ENV_API_URL;
use marketplace_client::{ClientConfig, ClientError, FileStore, Marketplace, SessionStore};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod account_commands;
mod admin_commands;
mod catalog_commands;
mod cli;
mod commands;
mod render;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    if let Err(e) = run(cli).await {
        // Backend and transport failures carry text meant for the user.
        let message = match e.downcast_ref::<ClientError>() {
            Some(client_err)
                if client_err.status().is_some()
                    || client_err.is_transport()
                    || client_err.is_validation() =>
            {
                client_err.user_friendly_message()
            },
            _ => format!("{:#}", e),
        };
        tracing::debug!("command failed: {:?}", e);
        eprintln!("{} {}", "✗".red(), message);
        std::process::exit(1);
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let store: Arc<dyn SessionStore> = match &cli.session_file {
        Some(path) => Arc::new(FileStore::open(path.clone())?),
        None => Arc::new(FileStore::open_default()?),
    };

    let api_url = cli.api_url.clone();
    let config = ClientConfig::from_lookup(|key| {
        if key == ENV_API_URL {
            api_url.clone().or_else(|| std::env::var(key).ok())
        } else {
            std::env::var(key).ok()
        }
    })
    .context("Set NEXT_PUBLIC_API_URL or pass --api-url")?;

    let client = Marketplace::new(config, store)?;
    let state = client.session().init();
    tracing::debug!("session: {:?}", state);

    commands::dispatch(&client, cli.command).await
}
