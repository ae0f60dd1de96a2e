//! Command implementations and shared output handling.

pub mod admin;
pub mod browse;
pub mod inquiry;

use std::io::Write;

use async_trait::async_trait;
use balaji_site::SiteError;
use balaji_site::inquiry::LinkOpener;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Site(#[from] SiteError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl CliError {
    /// Whether the failure was caused by the command's input.
    pub const fn is_user_error(&self) -> bool {
        match self {
            Self::Site(e) => e.is_user_error(),
            Self::NotFound(_) => true,
            Self::Io(_) | Self::Json(_) => false,
        }
    }
}

/// Writes command results to stdout, as text or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print a list, one rendered entry per block.
    pub fn list<T: Serialize>(
        &self,
        items: &[T],
        render: impl Fn(&T) -> String,
    ) -> Result<(), CliError> {
        let mut stdout = std::io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, items)?;
            writeln!(stdout)?;
            return Ok(());
        }
        if items.is_empty() {
            writeln!(stdout, "(none)")?;
        }
        for item in items {
            writeln!(stdout, "{}", render(item))?;
        }
        Ok(())
    }

    /// Print a single value.
    pub fn item<T: Serialize>(&self, item: &T, render: impl Fn(&T) -> String) -> Result<(), CliError> {
        let mut stdout = std::io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, item)?;
            writeln!(stdout)?;
        } else {
            writeln!(stdout, "{}", render(item))?;
        }
        Ok(())
    }

    /// Print a status line. Suppressed in JSON mode.
    pub fn message(&self, text: &str) -> Result<(), CliError> {
        if !self.json {
            writeln!(std::io::stdout().lock(), "{text}")?;
        }
        Ok(())
    }
}

/// Opens WhatsApp links by printing them for the user to follow.
pub struct PrintOpener;

#[async_trait]
impl LinkOpener for PrintOpener {
    async fn open(&self, url: &Url) -> Result<(), String> {
        writeln!(std::io::stdout().lock(), "Open this link to send your message:\n{url}")
            .map_err(|e| e.to_string())
    }
}
