//! Holdings Core — fund holdings extraction and snapshotting.
//!
//! This crate turns publisher holdings downloads into clean per-ticker
//! snapshots:
//! - Raw table model with tagged cells (`table`)
//! - Weight normalization to fractions (`weight`)
//! - Tolerant header resolution (`header`)
//! - Row extraction into holding records (`extract`)
//! - Per-publisher source adapters (`source`)
//! - HTTP transport behind a mockable trait (`fetch`)
//! - Ticker configuration (`config`)
//! - Snapshot CSV and manifest writers (`output`)
//! - Sequential update run with per-ticker failure isolation (`update`)

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod header;
pub mod output;
pub mod source;
pub mod table;
pub mod update;
pub mod weight;

pub use config::{ConfigError, HoldingsConfig, TickerEntry};
pub use error::HoldingsError;
pub use extract::{extract, HoldingRecord};
pub use fetch::{FetchResponse, Fetcher, HttpFetcher};
pub use header::{resolve, ColumnMap};
pub use output::{SnapshotWriter, UpdateManifest};
pub use source::{SourceDescriptor, SourceKind};
pub use table::{Cell, RawTable};
pub use update::{run_update, LogProgress, TickerOutcome, UpdateProgress, UpdateSummary};
pub use weight::{normalize, Weight};
