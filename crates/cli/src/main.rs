//! Rocket Shoes CLI - command-line consumer of the cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted cart
//! rs-cart show
//! rs-cart show --json
//!
//! # Add one unit of product 3 (checks stock, fetches catalog data)
//! rs-cart add 3
//!
//! # Set product 3 to 2 units
//! rs-cart update 3 2
//!
//! # Remove product 3
//! rs-cart remove 3
//!
//! # Delete the persisted cart
//! rs-cart clear
//! ```
//!
//! Configuration comes from the environment; see
//! [`rocket_shoes_cart::config`]. Rejected mutations are reported through the
//! log and exit with status 1.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rocket_shoes_cart::{CartConfig, LogFormat};
use rocket_shoes_core::ProductId;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cart")]
#[command(author, version, about = "Rocket Shoes cart")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show {
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product id
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product id
        product_id: ProductId,

        /// New absolute amount (values <= 0 are ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Delete the persisted cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter`, the configured format and Sentry.
///
/// Logs go to stderr so `show` output on stdout stays machine-readable.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocket_shoes_cart=info,rs_cart=info".into());

    let pretty = (format == LogFormat::Pretty)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json = (format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt().with_writer(std::io::stderr).init();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(config.log_format);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Show { json } => commands::show(config, json),
        Commands::Add { product_id } => commands::add(config, product_id).await,
        Commands::Remove { product_id } => commands::remove(config, product_id),
        Commands::Update { product_id, amount } => {
            commands::update(config, product_id, amount).await
        }
        Commands::Clear => commands::clear(config),
    }
}
