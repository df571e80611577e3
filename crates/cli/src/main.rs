//! RocketShoes CLI - Cart sessions and the catalog fixture server.
//!
//! # Usage
//!
//! ```bash
//! # Serve stock and products from a fixture file
//! rocketshoes serve --db server.json
//!
//! # Work with the persisted cart
//! rocketshoes cart show
//! rocketshoes cart add 1
//! rocketshoes cart update 1 3
//! rocketshoes cart remove 1
//! ```
//!
//! # Commands
//!
//! - `cart` - Load the persisted cart, apply one operation, print the result
//! - `serve` - Run the catalog server (`/stock/{id}`, `/products/{id}`)
//!
//! See `rocketshoes_storefront::config` for environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rocketshoes_core::ProductId;
use rocketshoes_storefront::config::{StorefrontConfig, parse_base_url};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "rocketshoes")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    /// Stock/product API base URL (overrides `ROCKETSHOES_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory holding the persisted cart (overrides `ROCKETSHOES_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Serve stock and products from a JSON fixture file
    Serve {
        /// Fixture file (overrides `CATALOG_DB`)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Listen port (overrides `CATALOG_PORT`)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set a product's quantity (zero or less is ignored)
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration first (needed for Sentry init)
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "rocketshoes_cli=info,rocketshoes_storefront=info,tower_http=debug".into()
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CliError::Config(e)),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), CliError> {
    if let Some(raw) = cli.api_url {
        config.api.base_url = parse_base_url(&raw).map_err(CliError::InvalidArgument)?;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&config)?,
            CartAction::Add { product_id } => commands::cart::add(&config, product_id).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&config, product_id).await?;
            }
            CartAction::Update { product_id, amount } => {
                commands::cart::update(&config, product_id, amount).await?;
            }
        },
        Commands::Serve { db, port } => {
            if let Some(db) = db {
                config.catalog.db_path = db;
            }
            if let Some(port) = port {
                config.catalog.port = port;
            }
            commands::serve::run(&config.catalog).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_accepts_negative_amount() {
        let cli = Cli::try_parse_from(["rocketshoes", "cart", "update", "3", "-1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Update { amount: -1, .. }
            })
        ));
    }

    #[test]
    fn test_non_numeric_product_id_is_rejected() {
        assert!(Cli::try_parse_from(["rocketshoes", "cart", "add", "shoe"]).is_err());
    }
}
