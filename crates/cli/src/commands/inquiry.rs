//! Inquiry list commands.

use balaji_core::ProductId;
use balaji_site::AppState;
use clap::Subcommand;
use serde::Serialize;

use super::browse::render_product;
use super::{CliError, Output};

#[derive(Subcommand)]
pub enum InquiryAction {
    /// Show saved products
    List,
    /// Save a catalog product
    Add {
        /// Product ID
        id: String,
    },
    /// Drop a saved product
    Remove {
        /// Product ID
        id: String,
    },
    /// Drop every saved product
    Clear,
    /// Show the message that would be sent
    Preview,
    /// Send the saved products over WhatsApp
    Send,
    /// Ask about a single product or service by name
    Ask {
        /// Product or service name
        name: String,
    },
    /// Request a free consultation
    Consult,
}

#[derive(Serialize)]
struct Preview {
    message: String,
    link: String,
}

pub async fn run(state: &AppState, out: &Output, action: InquiryAction) -> Result<(), CliError> {
    match action {
        InquiryAction::List => {
            let items = state.inquiry().items().await?;
            out.list(&items, render_product)?;
        }
        InquiryAction::Add { id } => {
            let id = ProductId::new(id);
            if state.add_to_inquiry(&id).await? {
                out.message(&format!("Added {id} to your inquiry"))?;
            } else {
                out.message(&format!("{id} is already in your inquiry"))?;
            }
        }
        InquiryAction::Remove { id } => {
            state.inquiry().remove(&ProductId::new(id)).await?;
            out.message("Removed")?;
        }
        InquiryAction::Clear => {
            state.inquiry().clear().await?;
            out.message("Inquiry cleared")?;
        }
        InquiryAction::Preview => {
            let message = state.inquiry().message().await?;
            let link = state.composer().link(&message)?.to_string();
            out.item(&Preview { message, link }, |p| {
                format!("{}\n\n{}", p.message, p.link)
            })?;
        }
        InquiryAction::Send => {
            state.send_inquiry().await?;
        }
        InquiryAction::Ask { name } => {
            state.inquire_about(&name).await?;
        }
        InquiryAction::Consult => {
            state.request_consultation().await?;
        }
    }
    Ok(())
}
