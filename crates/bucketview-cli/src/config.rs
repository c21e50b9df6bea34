//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── bucket: BucketConfig   # credentials, region, endpoint, bucket, HTTP
//! ├── page_size              # keys requested per listing
//! └── command: Command       # ls | url | status
//! ```
//!
//! All configuration can be provided via CLI arguments or environment
//! variables. Use `--help` to see all available options.

use std::process;

use anyhow::{Context, ensure};
use bucketview_object::{BucketConfig, DEFAULT_MAX_KEYS, MAX_KEYS_LIMIT};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "bucketview")]
#[command(about = "Browse an S3-compatible bucket")]
#[command(version)]
pub struct Cli {
    /// Bucket connection configuration.
    #[clap(flatten)]
    pub bucket: BucketConfig,

    /// Number of keys requested per listing
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_MAX_KEYS, global = true)]
    pub page_size: usize,

    #[command(subcommand)]
    pub command: Command,
}

/// Actions the CLI can run.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List a prefix
    Ls {
        /// Prefix to list; empty lists the root
        #[arg(default_value = "")]
        prefix: String,

        /// Only show entries whose key contains this text (case-insensitive)
        #[arg(long, short)]
        search: Option<String>,

        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the public URL of a key
    Url {
        /// Object key
        key: String,
    },

    /// Report whether the live backend answers
    Status,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so listings on stdout stay pipeable.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.bucket
            .validate()
            .context("invalid bucket configuration")?;
        ensure!(
            (1..=MAX_KEYS_LIMIT).contains(&self.page_size),
            "page size must be between 1 and {MAX_KEYS_LIMIT}, got {}",
            self.page_size
        );
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            endpoint = %self.bucket.endpoint,
            bucket = %self.bucket.bucket,
            region = %self.bucket.region,
            has_credentials = self.bucket.has_credentials(),
            timeout_secs = self.bucket.effective_timeout().as_secs(),
            page_size = self.page_size,
            "Bucket configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
