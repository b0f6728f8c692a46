//! Tote CLI - Inspect and edit a locally persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! tote list
//!
//! # Add a product, then change its quantity
//! tote add --id 1 --title Shoe --image-url https://img.example/shoe.png --price 100
//! tote increment 1
//! tote decrement 1
//!
//! # Use a different storage directory
//! tote --data-dir /tmp/cart list --json
//! ```
//!
//! # Commands
//!
//! - `list` - Print the cart
//! - `add` - Add one unit of a product
//! - `increment` - Add one unit to an existing line
//! - `decrement` - Remove one unit, dropping the line at zero

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tote_core::{Price, ProductId, ProductRef};
use tote_store::{CartProvider, CartStore, FileStorage};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::{LogFormat, ToteConfig};

#[derive(Parser)]
#[command(name = "tote")]
#[command(author, version, about = "Tote cart tools")]
struct Cli {
    /// Directory holding the cart files (overrides `TOTE_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    List {
        /// Print the raw JSON snapshot instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Display name
        #[arg(long)]
        title: String,

        /// Image URL
        #[arg(long, default_value = "")]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: Price,
    },
    /// Add one unit to an existing line
    Increment {
        /// Product id
        id: ProductId,
    },
    /// Remove one unit from a line, removing it at zero
    Decrement {
        /// Product id
        id: ProductId,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = ToteConfig::from_env();
    init_tracing(
        config
            .as_ref()
            .map_or(LogFormat::default(), |config| config.log_format),
    );

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing with `EnvFilter`, writing to stderr so command output
/// on stdout stays clean.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tote=info,tote_store=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli, config: ToteConfig) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli.data_dir.unwrap_or(config.data_dir);

    let storage = FileStorage::open(&data_dir).await?;
    tracing::debug!(path = %storage.root().display(), "Using file storage");

    let store = CartStore::load(Arc::new(storage), config.storage_key).await?;

    CartProvider::scope(store, async move {
        match cli.command {
            Commands::List { json } => commands::cart::list(json)?,
            Commands::Add {
                id,
                title,
                image_url,
                price,
            } => {
                commands::cart::add(ProductRef {
                    id,
                    title,
                    image_url,
                    price,
                })
                .await?;
            }
            Commands::Increment { id } => commands::cart::increment(&id).await?,
            Commands::Decrement { id } => commands::cart::decrement(&id).await?,
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
    .await
}
