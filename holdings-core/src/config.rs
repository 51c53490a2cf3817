//! Ticker configuration.
//!
//! The config file maps each ticker to its [`SourceDescriptor`]:
//!
//! ```json
//! { "tickers": { "SPY": { "source": "ssga" },
//!                "ARKK": { "source": "ark", "url": "https://example.com/ARKK.csv" } } }
//! ```
//!
//! TOML is accepted too (`[tickers.SPY]` tables) when the path ends in
//! `.toml`. Key order is kept and is the order tickers are processed in.

use crate::source::SourceDescriptor;
use std::path::Path;
use thiserror::Error;

/// Startup-level configuration failure. Unlike per-ticker errors these stop
/// the run before anything is fetched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("config has no `tickers` table")]
    MissingTickers,

    #[error("invalid source descriptor for {ticker}: {message}")]
    InvalidEntry { ticker: String, message: String },
}

/// One configured ticker and its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerEntry {
    pub ticker: String,
    pub descriptor: SourceDescriptor,
}

/// All configured tickers, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HoldingsConfig {
    pub tickers: Vec<TickerEntry>,
}

impl HoldingsConfig {
    /// Load from a JSON or TOML file, chosen by extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;

        if path.extension().and_then(|e| e.to_str()) == Some("toml") {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        }
    }

    /// Parse JSON. Accepts `{"tickers": {...}}` or the bare ticker mapping.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let root: serde_json::Value =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let mut root = match root {
            serde_json::Value::Object(map) => map,
            _ => return Err(ConfigError::MissingTickers),
        };
        let table = match root.remove("tickers") {
            Some(serde_json::Value::Object(map)) => map,
            Some(_) => return Err(ConfigError::MissingTickers),
            None => root,
        };

        let tickers = table
            .into_iter()
            .map(|(ticker, value)| {
                serde_json::from_value::<SourceDescriptor>(value)
                    .map(|descriptor| TickerEntry {
                        ticker: ticker.clone(),
                        descriptor,
                    })
                    .map_err(|e| ConfigError::InvalidEntry {
                        ticker,
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tickers })
    }

    /// Parse TOML with a `[tickers]` table.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut root: toml::Table =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let table = match root.remove("tickers") {
            Some(toml::Value::Table(table)) => table,
            _ => return Err(ConfigError::MissingTickers),
        };

        let tickers = table
            .into_iter()
            .map(|(ticker, value)| {
                value
                    .try_into::<SourceDescriptor>()
                    .map(|descriptor| TickerEntry {
                        ticker: ticker.clone(),
                        descriptor,
                    })
                    .map_err(|e| ConfigError::InvalidEntry {
                        ticker,
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tickers })
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}
