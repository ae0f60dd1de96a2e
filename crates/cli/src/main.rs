//! Balaji CLI - Browse the catalog, collect an inquiry and manage content.
//!
//! # Usage
//!
//! ```bash
//! # Browse
//! balaji products list
//! balaji services list --recent
//! balaji highlights list
//!
//! # Collect products and send them over WhatsApp
//! balaji inquiry add <product-id>
//! balaji inquiry send
//!
//! # Manage content (password via --password or BALAJI_ADMIN_PASSWORD)
//! balaji admin --password '1234#' products create \
//!     --name "Precast Panel" --price "₹200/sqft" \
//!     --description "Interlocking panel" --category Wall --image panel.jpg
//! ```
//!
//! # Commands
//!
//! - `products` - List or show catalog products
//! - `services` - List services
//! - `highlights` - List service highlights
//! - `inquiry` - Manage the saved inquiry list and send messages
//! - `admin` - Create, update and delete products, services and highlights
//!
//! Configuration is read from the environment (see `balaji_site::config`).
//! Logs go to stderr; command output goes to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use balaji_site::AppState;
use balaji_site::config::SiteConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::admin::AdminArgs;
use commands::inquiry::InquiryAction;
use commands::{Output, PrintOpener};

#[derive(Parser)]
#[command(name = "balaji")]
#[command(author, version, about = "Balaji boundary walls catalog and admin tools")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse catalog products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Browse services
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },
    /// Browse service highlights
    Highlights {
        #[command(subcommand)]
        action: HighlightsAction,
    },
    /// Saved inquiry list and WhatsApp messages
    Inquiry {
        #[command(subcommand)]
        action: InquiryAction,
    },
    /// Manage products, services and highlights
    Admin(AdminArgs),
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List every product
    List,
    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum ServicesAction {
    /// List services
    List {
        /// Only the most recently updated services
        #[arg(long)]
        recent: bool,
    },
}

#[derive(Subcommand)]
enum HighlightsAction {
    /// List highlights in display order
    List {
        /// Include inactive highlights
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.log_json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        match e.downcast_ref::<commands::CliError>() {
            Some(cli_error) if cli_error.is_user_error() => tracing::warn!("{e}"),
            _ => tracing::error!("Command failed: {e}"),
        }
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr. Defaults to info for our crates if
/// `RUST_LOG` is not set.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "balaji=info,balaji_site=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = SiteConfig::from_env()?;
    let state = AppState::from_config(config, Arc::new(PrintOpener)).await?;
    let out = Output::new(cli.json);

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List => commands::browse::list_products(&state, &out).await?,
            ProductsAction::Show { id } => {
                commands::browse::show_product(&state, &out, &id).await?;
            }
        },
        Commands::Services { action } => match action {
            ServicesAction::List { recent } => {
                commands::browse::list_services(&state, &out, recent).await?;
            }
        },
        Commands::Highlights { action } => match action {
            HighlightsAction::List { all } => {
                commands::browse::list_highlights(&state, &out, all).await?;
            }
        },
        Commands::Inquiry { action } => commands::inquiry::run(&state, &out, action).await?,
        Commands::Admin(args) => commands::admin::run(&state, &out, args).await?,
    }
    Ok(())
}
