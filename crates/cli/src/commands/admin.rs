//! Admin content management commands.
//!
//! Every admin command first authenticates through the shared password
//! gate. Update commands only change the fields that are passed; anything
//! omitted keeps its current value. Product commands need
//! `FIREBASE_PROJECT_ID`.
//!
//! # Usage
//!
//! ```bash
//! balaji admin -p '1234#' products create --name "Gate A" --price "₹5,000" \
//!     --description "Steel gate" --category Gates --image gate.png
//! balaji admin -p '1234#' products update <id> --price "₹5,500"
//! balaji admin -p '1234#' services create --title "Compound Walls" \
//!     --description "RCC walls" --price "Quote on Request" --category Construction \
//!     --features "RCC, Precast"
//! balaji admin -p '1234#' highlights update 3 --inactive
//! ```

use std::path::PathBuf;

use balaji_core::{
    HighlightIcon, HighlightId, HighlightInput, ProductDetails, ProductId, ServiceId, ServiceInput,
};
use balaji_site::catalog::ProductInput;
use balaji_site::image::ImageUpload;
use balaji_site::state::AdminTab;
use balaji_site::{AppState, SiteError};
use clap::{Args, Subcommand};

use super::browse::{render_highlight, render_product, render_service};
use super::{CliError, Output};

#[derive(Args)]
pub struct AdminArgs {
    /// Admin password
    #[arg(short, long, env = "BALAJI_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    #[command(subcommand)]
    target: AdminTarget,
}

#[derive(Subcommand)]
enum AdminTarget {
    /// Manage catalog products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage services
    Services {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Manage service highlights
    Highlights {
        #[command(subcommand)]
        action: HighlightAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// Add a product
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// Image file to embed
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Change a product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Replacement image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Subcommand)]
enum ServiceAction {
    /// Add a service
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: String,
        #[arg(long)]
        category: String,
        #[arg(long, default_value = "")]
        image_url: String,
        /// Comma-separated features
        #[arg(long)]
        features: Option<String>,
        /// Show the "Popular" badge
        #[arg(long)]
        highlighted: bool,
    },
    /// Change a service
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
        /// Comma-separated features; omit to keep the current list
        #[arg(long)]
        features: Option<String>,
        #[arg(long)]
        highlighted: Option<bool>,
    },
    /// Delete a service
    Delete { id: String },
}

#[derive(Subcommand)]
enum HighlightAction {
    /// Add a highlight
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        /// Shield, Truck, Wrench, Clock, Award or Users
        #[arg(long, default_value = "Shield")]
        icon: String,
        /// Display position, ascending
        #[arg(long, default_value_t = 0)]
        order: i32,
        /// Keep the highlight hidden
        #[arg(long)]
        inactive: bool,
    },
    /// Change a highlight
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        order: Option<i32>,
        #[arg(long, conflicts_with = "inactive")]
        active: bool,
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a highlight
    Delete { id: String },
}

pub async fn run(state: &AppState, out: &Output, args: AdminArgs) -> Result<(), CliError> {
    let mut password = args.password;
    state
        .login(&mut password)
        .await
        .map_err(SiteError::from)?;

    match args.target {
        AdminTarget::Products { action } => {
            // Without a project, product edits would only live in this process.
            state
                .config()
                .require_firestore()
                .map_err(SiteError::from)?;
            state.set_tab(AdminTab::Products).await;
            products(state, out, action).await
        }
        AdminTarget::Services { action } => {
            state.set_tab(AdminTab::Services).await;
            services(state, out, action).await
        }
        AdminTarget::Highlights { action } => {
            state.set_tab(AdminTab::Highlights).await;
            highlights(state, out, action).await
        }
    }
}

async fn load_image(path: Option<PathBuf>) -> Result<Option<ImageUpload>, CliError> {
    match path {
        Some(path) => Ok(Some(
            ImageUpload::from_path(path).await.map_err(SiteError::from)?,
        )),
        None => Ok(None),
    }
}

async fn products(state: &AppState, out: &Output, action: ProductAction) -> Result<(), CliError> {
    match action {
        ProductAction::Create {
            name,
            price,
            description,
            category,
            image,
        } => {
            let input = ProductInput {
                details: ProductDetails {
                    name,
                    price,
                    description,
                    category,
                },
                image: load_image(image).await?,
            };
            let id = state.create_product(input).await?;
            show_product(state, out, &id).await
        }
        ProductAction::Update {
            id,
            name,
            price,
            description,
            category,
            image,
        } => {
            let id = ProductId::new(id);
            state.catalog().list().await?;
            let current = state
                .catalog()
                .get(&id)
                .await
                .ok_or_else(|| CliError::NotFound(id.to_string()))?;
            let input = ProductInput {
                details: ProductDetails {
                    name: name.unwrap_or(current.name),
                    price: price.unwrap_or(current.price),
                    description: description.unwrap_or(current.description),
                    category: category.unwrap_or(current.category),
                },
                image: load_image(image).await?,
            };
            state.update_product(&id, input).await?;
            show_product(state, out, &id).await
        }
        ProductAction::Delete { id } => {
            state.remove_product(&ProductId::new(id)).await?;
            out.message("Product deleted")
        }
    }
}

async fn show_product(state: &AppState, out: &Output, id: &ProductId) -> Result<(), CliError> {
    let product = state
        .catalog()
        .get(id)
        .await
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;
    out.item(&product, render_product)
}

async fn services(state: &AppState, out: &Output, action: ServiceAction) -> Result<(), CliError> {
    match action {
        ServiceAction::Create {
            title,
            description,
            price,
            category,
            image_url,
            features,
            highlighted,
        } => {
            let service = state
                .create_service(ServiceInput {
                    title,
                    description,
                    price,
                    image_url,
                    features,
                    category,
                    is_highlighted: highlighted,
                })
                .await?;
            out.item(&service, render_service)
        }
        ServiceAction::Update {
            id,
            title,
            description,
            price,
            category,
            image_url,
            features,
            highlighted,
        } => {
            let id = ServiceId::new(id);
            let current = state
                .services()
                .get(&id)
                .await?
                .ok_or_else(|| CliError::NotFound(id.to_string()))?;
            let input = ServiceInput {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                price: price.unwrap_or(current.price),
                image_url: image_url.unwrap_or(current.image_url),
                features,
                category: category.unwrap_or(current.category),
                is_highlighted: highlighted.unwrap_or(current.is_highlighted),
            };
            let service = state.update_service(&id, input).await?;
            out.item(&service, render_service)
        }
        ServiceAction::Delete { id } => {
            state.remove_service(&ServiceId::new(id)).await?;
            out.message("Service deleted")
        }
    }
}

async fn highlights(
    state: &AppState,
    out: &Output,
    action: HighlightAction,
) -> Result<(), CliError> {
    match action {
        HighlightAction::Create {
            title,
            description,
            icon,
            order,
            inactive,
        } => {
            let highlight = state
                .create_highlight(HighlightInput {
                    title,
                    description,
                    icon: HighlightIcon::from_name(&icon),
                    is_active: !inactive,
                    order,
                })
                .await?;
            out.item(&highlight, render_highlight)
        }
        HighlightAction::Update {
            id,
            title,
            description,
            icon,
            order,
            active,
            inactive,
        } => {
            let id = HighlightId::new(id);
            let current = state
                .highlights()
                .get(&id)
                .await?
                .ok_or_else(|| CliError::NotFound(id.to_string()))?;
            let is_active = if active {
                true
            } else if inactive {
                false
            } else {
                current.is_active
            };
            let input = HighlightInput {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                icon: icon.map_or(current.icon, |name| HighlightIcon::from_name(&name)),
                is_active,
                order: order.unwrap_or(current.order),
            };
            let highlight = state.update_highlight(&id, input).await?;
            out.item(&highlight, render_highlight)
        }
        HighlightAction::Delete { id } => {
            state.remove_highlight(&HighlightId::new(id)).await?;
            out.message("Highlight deleted")
        }
    }
}
