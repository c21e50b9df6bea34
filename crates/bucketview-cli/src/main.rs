#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod output;

use std::process;

use anyhow::{Context, bail};
use bucketview_object::{ListingProvider, ListingService};
use bucketview_store::BucketStore;

use crate::config::{Cli, Command};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "bucketview_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "bucketview_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "bucketview_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %error,
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let service = ListingService::from_config(cli.bucket.clone());

    match cli.command {
        Command::Ls {
            prefix,
            search,
            json,
        } => list(service, cli.page_size, &prefix, search, json).await,
        Command::Url { key } => {
            println!("{}", service.url_for(&key));
            Ok(())
        }
        Command::Status => status(&service).await,
    }
}

/// Loads a prefix through the store and prints what the browser would show.
async fn list(
    service: ListingService,
    page_size: usize,
    prefix: &str,
    search: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let live = service.is_live();
    let store = BucketStore::new(service).with_page_size(page_size);

    store.load(prefix).await;
    if let Some(error) = store.error() {
        bail!("failed to list '{prefix}': {error}");
    }
    if let Some(query) = search {
        store.set_search_query(query);
    }

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        prefix,
        live,
        total_count = store.total_count(),
        "Listing ready"
    );

    if json {
        let entries = store.filtered_entries();
        let rendered =
            serde_json::to_string_pretty(&entries).context("failed to serialize listing")?;
        println!("{rendered}");
    } else {
        println!("{}", output::render_listing(&store.snapshot()));
    }
    Ok(())
}

/// Prints the health of the listing backend.
async fn status(service: &ListingService) -> anyhow::Result<()> {
    let health = service
        .health_check()
        .await
        .context("failed to check listing backend")?;

    print!("{:?}", health.status);
    if let Some(response) = health.response {
        print!(" in {}ms", response.as_millis());
    }
    match &health.message {
        Some(message) => println!(": {message}"),
        None => println!(),
    }
    Ok(())
}
