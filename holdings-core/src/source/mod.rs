//! Source adapters: turn a publisher's download into a [`RawTable`].
//!
//! Each supported publisher format is one [`SourceKind`] variant. All of them
//! share one capability, [`SourceKind::load_table`], which resolves the
//! download URL, fetches it, and parses the body.

pub mod delimited;
pub mod spreadsheet;

use crate::error::{HoldingsError, Result};
use crate::fetch::{decode_text, Fetcher};
use crate::table::RawTable;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SSGA_HOLDINGS_BASE: &str =
    "https://www.ssga.com/library-content/products/fund-data/etfs/us/holdings-daily-us-en-";

const INVESCO_HOLDINGS_BASE: &str =
    "https://www.invesco.com/us/financial-products/etfs/holdings/main/holdings/0";

/// Characters left unescaped in a query value, as `encodeURIComponent` does.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Where one ticker's holdings come from, as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDescriptor {
    /// Publisher format name (`ssga`, `spdr`, `invesco`, `csv`, `ark`).
    #[serde(default)]
    pub source: Option<String>,
    /// Explicit download URL; overrides the publisher template.
    #[serde(default)]
    pub url: Option<String>,
}

impl SourceDescriptor {
    pub fn new(source: &str, url: Option<&str>) -> Self {
        Self {
            source: Some(source.to_string()),
            url: url.map(String::from),
        }
    }

    /// Parse the configured format name into a [`SourceKind`].
    pub fn kind(&self) -> Result<SourceKind> {
        self.source.as_deref().unwrap_or("").parse()
    }
}

/// Supported publisher formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// State Street SPDR daily holdings workbook.
    Ssga,
    /// Invesco holdings workbook export.
    Invesco,
    /// Plain comma-separated export at an explicit URL.
    Csv,
    /// ARK fund CSV export; handled exactly like [`SourceKind::Csv`].
    Ark,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Ssga,
        SourceKind::Invesco,
        SourceKind::Csv,
        SourceKind::Ark,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Ssga => "ssga",
            SourceKind::Invesco => "invesco",
            SourceKind::Csv => "csv",
            SourceKind::Ark => "ark",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, SourceKind::Ssga | SourceKind::Invesco)
    }

    /// Download URL for `ticker`: the explicit URL if configured, otherwise
    /// the publisher template. Delimited sources have no template.
    pub fn resolve_url(&self, ticker: &str, explicit: Option<&str>) -> Result<String> {
        if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }
        match self {
            SourceKind::Ssga => Ok(ssga_url(ticker)),
            SourceKind::Invesco => Ok(invesco_url(ticker)),
            SourceKind::Csv | SourceKind::Ark => Err(HoldingsError::Config(format!(
                "{} url missing for {ticker}",
                self.name()
            ))),
        }
    }

    /// Fetch and parse `ticker`'s holdings document into a raw table.
    pub fn load_table(
        &self,
        ticker: &str,
        descriptor: &SourceDescriptor,
        fetcher: &dyn Fetcher,
    ) -> Result<RawTable> {
        let url = self.resolve_url(ticker, descriptor.url.as_deref())?;
        tracing::debug!(ticker, source = self.name(), %url, "fetching holdings");

        let table = if self.is_spreadsheet() {
            spreadsheet::parse_workbook(fetcher.fetch_bytes(&url)?)?
        } else {
            delimited::parse_text(&fetcher.fetch_text(&url)?)
        };

        tracing::debug!(ticker, rows = table.len(), "parsed raw table");
        Ok(table)
    }

    /// Parse an already downloaded document.
    pub fn parse_bytes(&self, bytes: Vec<u8>) -> Result<RawTable> {
        if self.is_spreadsheet() {
            spreadsheet::parse_workbook(bytes)
        } else {
            Ok(delimited::parse_text(&decode_text(&bytes)))
        }
    }
}

impl FromStr for SourceKind {
    type Err = HoldingsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ssga" | "spdr" => Ok(SourceKind::Ssga),
            "invesco" => Ok(SourceKind::Invesco),
            "csv" => Ok(SourceKind::Csv),
            "ark" => Ok(SourceKind::Ark),
            other => Err(HoldingsError::Config(format!("unknown source {other:?}"))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn ssga_url(ticker: &str) -> String {
    format!("{SSGA_HOLDINGS_BASE}{}.xlsx", ticker.to_lowercase())
}

fn invesco_url(ticker: &str) -> String {
    format!(
        "{INVESCO_HOLDINGS_BASE}?action=download&audienceType=Investor&ticker={}",
        utf8_percent_encode(ticker, QUERY_VALUE)
    )
}
