//! Update run — fetch, extract and snapshot every configured ticker in order.
//!
//! Tickers are processed one at a time in configuration order. A failure on
//! one ticker is logged and recorded in the summary; it never stops the run.
//! The manifest is written once at the end and lists exactly the tickers
//! whose snapshot was written.

use crate::config::{HoldingsConfig, TickerEntry};
use crate::error::{HoldingsError, Result};
use crate::extract::extract;
use crate::fetch::Fetcher;
use crate::output::{SnapshotWriter, UpdateManifest};
use chrono::Utc;
use std::path::PathBuf;

/// What happened to a ticker that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickerOutcome {
    /// Snapshot written with this many records.
    Updated { records: usize, path: PathBuf },
    /// Source parsed fine but held no holdings rows; nothing written.
    Empty,
}

/// Progress callbacks for an update run.
pub trait UpdateProgress {
    /// Called before a ticker is fetched.
    fn on_start(&self, ticker: &str, index: usize, total: usize);

    /// Called once a ticker has finished, successfully or not.
    fn on_complete(&self, ticker: &str, result: &Result<TickerOutcome>);

    /// Called after the manifest has been written.
    fn on_run_complete(&self, summary: &UpdateSummary);
}

/// Reports progress through `tracing` events.
pub struct LogProgress;

impl UpdateProgress for LogProgress {
    fn on_start(&self, ticker: &str, index: usize, total: usize) {
        tracing::debug!(ticker, "[{}/{}] updating", index + 1, total);
    }

    fn on_complete(&self, ticker: &str, result: &Result<TickerOutcome>) {
        match result {
            Ok(TickerOutcome::Updated { records, .. }) => {
                tracing::info!(ticker, records, "OK");
            }
            Ok(TickerOutcome::Empty) => tracing::info!(ticker, "skip empty"),
            Err(e) => tracing::warn!(ticker, kind = e.kind(), "ERR {e}"),
        }
    }

    fn on_run_complete(&self, summary: &UpdateSummary) {
        tracing::info!(
            updated = summary.updated.len(),
            skipped = summary.skipped.len(),
            failed = summary.errors.len(),
            manifest = %summary.manifest_path.display(),
            "update complete"
        );
    }
}

/// Outcome of a full update run.
#[derive(Debug)]
pub struct UpdateSummary {
    pub total: usize,
    /// Updated tickers with their record counts, in processing order.
    pub updated: Vec<(String, usize)>,
    /// Tickers whose source yielded no records.
    pub skipped: Vec<String>,
    pub errors: Vec<(String, HoldingsError)>,
    pub manifest: UpdateManifest,
    pub manifest_path: PathBuf,
}

impl UpdateSummary {
    pub fn all_succeeded(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run the update over every configured ticker.
///
/// Only output-directory and manifest failures are returned as errors;
/// per-ticker problems are collected in [`UpdateSummary::errors`].
pub fn run_update(
    config: &HoldingsConfig,
    fetcher: &dyn Fetcher,
    writer: &SnapshotWriter,
    progress: &dyn UpdateProgress,
) -> Result<UpdateSummary> {
    writer.ensure_dir()?;

    let total = config.tickers.len();
    let mut updated = Vec::new();
    let mut skipped = Vec::new();
    let mut errors = Vec::new();

    for (i, entry) in config.tickers.iter().enumerate() {
        progress.on_start(&entry.ticker, i, total);

        let result = update_ticker(entry, fetcher, writer);
        progress.on_complete(&entry.ticker, &result);

        match result {
            Ok(TickerOutcome::Updated { records, .. }) => {
                updated.push((entry.ticker.clone(), records));
            }
            Ok(TickerOutcome::Empty) => skipped.push(entry.ticker.clone()),
            Err(e) => errors.push((entry.ticker.clone(), e)),
        }
    }

    let manifest = UpdateManifest::new(
        Utc::now(),
        updated.iter().map(|(ticker, _)| ticker.clone()).collect(),
    );
    let manifest_path = writer.write_manifest(&manifest)?;

    let summary = UpdateSummary {
        total,
        updated,
        skipped,
        errors,
        manifest,
        manifest_path,
    };
    progress.on_run_complete(&summary);
    Ok(summary)
}

/// Fetch → parse → extract → snapshot for one ticker.
pub fn update_ticker(
    entry: &TickerEntry,
    fetcher: &dyn Fetcher,
    writer: &SnapshotWriter,
) -> Result<TickerOutcome> {
    let kind = entry.descriptor.kind()?;
    let table = kind.load_table(&entry.ticker, &entry.descriptor, fetcher)?;
    let records = extract(&table)?;

    if records.is_empty() {
        return Ok(TickerOutcome::Empty);
    }

    let path = writer.write_snapshot(&entry.ticker, &records)?;
    Ok(TickerOutcome::Updated {
        records: records.len(),
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchResponse;
    use crate::source::SourceDescriptor;
    use std::cell::RefCell;

    struct OneBody(&'static str);

    impl Fetcher for OneBody {
        fn get(&self, _url: &str) -> Result<FetchResponse> {
            Ok(FetchResponse {
                status: 200,
                body: self.0.as_bytes().to_vec(),
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        started: RefCell<Vec<String>>,
        finished: RefCell<usize>,
    }

    impl UpdateProgress for Recorder {
        fn on_start(&self, ticker: &str, _index: usize, _total: usize) {
            self.started.borrow_mut().push(ticker.to_string());
        }
        fn on_complete(&self, _ticker: &str, _result: &Result<TickerOutcome>) {}
        fn on_run_complete(&self, _summary: &UpdateSummary) {
            *self.finished.borrow_mut() += 1;
        }
    }

    fn entry(ticker: &str, source: &str, url: Option<&str>) -> TickerEntry {
        TickerEntry {
            ticker: ticker.into(),
            descriptor: SourceDescriptor::new(source, url),
        }
    }

    #[test]
    fn header_only_source_is_skipped_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        let outcome = update_ticker(
            &entry("ABC", "csv", Some("http://x/abc.csv")),
            &OneBody("Ticker,Weight\n"),
            &writer,
        )
        .unwrap();
        assert_eq!(outcome, TickerOutcome::Empty);
        assert!(!writer.snapshot_path("ABC").exists());
    }

    #[test]
    fn unknown_source_fails_before_fetching() {
        struct NoNetwork;
        impl Fetcher for NoNetwork {
            fn get(&self, url: &str) -> Result<FetchResponse> {
                panic!("unexpected fetch of {url}");
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let err = update_ticker(
            &entry("ABC", "morningstar", None),
            &NoNetwork,
            &SnapshotWriter::new(dir.path()),
        )
        .unwrap_err();
        assert!(matches!(err, HoldingsError::Config(_)));
    }

    #[test]
    fn progress_sees_every_ticker_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = HoldingsConfig {
            tickers: vec![
                entry("B", "csv", Some("http://x/b.csv")),
                entry("A", "ark", Some("http://x/a.csv")),
                entry("C", "csv", None),
            ],
        };
        let recorder = Recorder::default();
        let summary = run_update(
            &config,
            &OneBody("Symbol,Weight\nAAA,1\n"),
            &SnapshotWriter::new(dir.path()),
            &recorder,
        )
        .unwrap();

        assert_eq!(*recorder.started.borrow(), vec!["B", "A", "C"]);
        assert_eq!(*recorder.finished.borrow(), 1);
        assert_eq!(summary.manifest.tickers, vec!["B", "A"]);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].0, "C");
        assert!(!summary.all_succeeded());
    }
}
