//! Pineapple Cart CLI - Inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! cart-cli show
//!
//! # Add a product (or one more unit of it)
//! cart-cli add --id shirt --title "Shirt" --image-url https://cdn.example.com/shirt.png --price 10
//!
//! # Change quantities
//! cart-cli increment shirt
//! cart-cli decrement shirt
//!
//! # Create the snapshot table (postgres feature)
//! cart-cli migrate
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart
//! - `add` - Add a product
//! - `increment` / `decrement` - Change a line's quantity
//! - `migrate` - Run database migrations (requires the `postgres` feature)
//!
//! Configuration is read from the environment; see
//! [`pineapple_cart_store::config`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use pineapple_cart_store::CartConfig;
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Pineapple Cart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the stored cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product identifier
        #[arg(long)]
        id: String,

        /// Display title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(long)]
        price: Decimal,
    },
    /// Add one unit to an existing line
    Increment {
        /// Product identifier
        id: String,
    },
    /// Remove one unit from a line (removes the line at zero)
    Decrement {
        /// Product identifier
        id: String,
    },
    /// Run database migrations
    #[cfg(feature = "postgres")]
    Migrate,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
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

/// Initialize tracing with `EnvFilter` and Sentry integration.
///
/// Defaults to warnings plus our own info logs if `RUST_LOG` is not set, so
/// command output stays readable.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,pineapple_cart_store=info,cart_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CartConfig) -> Result<(), commands::cart::CartCommandError> {
    match cli.command {
        Commands::Show => commands::cart::show(config).await?,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(config, &id, title, image_url, price).await?,
        Commands::Increment { id } => commands::cart::increment(config, &id).await?,
        Commands::Decrement { id } => commands::cart::decrement(config, &id).await?,
        #[cfg(feature = "postgres")]
        Commands::Migrate => commands::migrate::run(config).await?,
    }
    Ok(())
}
