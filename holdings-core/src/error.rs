//! Per-ticker error type.
//!
//! Every variant here is recoverable at the ticker boundary: the update run
//! logs it, leaves the ticker out of the manifest, and moves on.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HoldingsError {
    #[error("config error: {0}")]
    Config(String),

    #[error("HTTP {status} {url}")]
    Fetch { status: u16, url: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("no Ticker/Weight headers: {header:?}")]
    MissingColumns { header: Vec<String> },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HoldingsError {
    /// Short machine-friendly label for log fields and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            HoldingsError::Config(_) => "config",
            HoldingsError::Fetch { .. } => "fetch",
            HoldingsError::Network { .. } => "network",
            HoldingsError::MissingColumns { .. } => "missing_columns",
            HoldingsError::Parse(_) => "parse",
            HoldingsError::Io { .. } => "io",
        }
    }
}

pub type Result<T, E = HoldingsError> = std::result::Result<T, E>;
