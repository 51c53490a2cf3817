//! Snapshot and manifest writers.
//!
//! Layout of the output directory:
//! - `{TICKER}.csv` — one snapshot per updated ticker (`Ticker,Weight` header)
//! - `index.json` — manifest of tickers updated by the latest run
//!
//! Both are rewritten wholesale on every run. Writes go to a `.tmp` sibling
//! first and are renamed into place.

use crate::error::{HoldingsError, Result};
use crate::extract::HoldingRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "index.json";

const SNAPSHOT_HEADER: [&str; 2] = ["Ticker", "Weight"];

/// Manifest of the tickers a run updated, in processing order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateManifest {
    #[serde(serialize_with = "iso_millis")]
    pub updated_at: DateTime<Utc>,
    pub tickers: Vec<String>,
}

impl UpdateManifest {
    pub fn new(updated_at: DateTime<Utc>, tickers: Vec<String>) -> Self {
        Self {
            updated_at,
            tickers,
        }
    }
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// File name of a ticker's snapshot.
pub fn snapshot_file_name(ticker: &str) -> String {
    format!("{}.csv", ticker.to_uppercase())
}

/// Render records as snapshot CSV text. Symbols are written unquoted.
pub fn render_snapshot(records: &[HoldingRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let csv_err = |e: csv::Error| HoldingsError::Parse(format!("snapshot encoding: {e}"));

    writer.write_record(SNAPSHOT_HEADER).map_err(csv_err)?;
    for record in records {
        writer
            .write_record([record.symbol.as_str(), &record.weight.to_string()])
            .map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| HoldingsError::Parse(format!("snapshot encoding: {e}")))?;
    String::from_utf8(bytes).map_err(|e| HoldingsError::Parse(format!("snapshot encoding: {e}")))
}

/// Writes snapshots and the manifest into one directory.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    out_dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Create the output directory if needed.
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.out_dir).map_err(|e| HoldingsError::Io {
            path: self.out_dir.clone(),
            source: e,
        })
    }

    pub fn snapshot_path(&self, ticker: &str) -> PathBuf {
        self.out_dir.join(snapshot_file_name(ticker))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join(MANIFEST_FILE)
    }

    /// Write `{TICKER}.csv`, returning its path.
    pub fn write_snapshot(&self, ticker: &str, records: &[HoldingRecord]) -> Result<PathBuf> {
        let path = self.snapshot_path(ticker);
        write_atomic(&path, render_snapshot(records)?.as_bytes())?;
        Ok(path)
    }

    /// Write `index.json`, returning its path.
    pub fn write_manifest(&self, manifest: &UpdateManifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| HoldingsError::Parse(format!("manifest encoding: {e}")))?;
        write_atomic(&path, json.as_bytes())?;
        Ok(path)
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    let io_err = |e: std::io::Error| HoldingsError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    fs::write(&tmp_path, contents).map_err(io_err)?;
    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_err(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weight::Weight;
    use chrono::TimeZone;

    #[test]
    fn snapshot_has_header_and_blank_unknowns() {
        let records = vec![
            HoldingRecord::new("AAA", Weight::Fraction(0.05)),
            HoldingRecord::new("BBB", Weight::Unknown),
        ];
        assert_eq!(
            render_snapshot(&records).unwrap(),
            "Ticker,Weight\nAAA,0.05\nBBB,\n"
        );
    }

    #[test]
    fn symbols_with_commas_are_not_quoted() {
        let records = vec![HoldingRecord::new("BRK,B", Weight::Fraction(0.5))];
        assert_eq!(
            render_snapshot(&records).unwrap(),
            "Ticker,Weight\nBRK,B,0.5\n"
        );
    }

    #[test]
    fn snapshot_name_is_uppercased() {
        assert_eq!(snapshot_file_name("arkk"), "ARKK.csv");
    }

    #[test]
    fn manifest_uses_camel_case_and_millis() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 21, 5, 0).unwrap();
        let manifest = UpdateManifest::new(ts, vec!["SPY".into(), "ARKK".into()]);
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&manifest).unwrap()).unwrap();
        assert_eq!(json["updatedAt"], "2024-03-01T21:05:00.000Z");
        assert_eq!(json["tickers"], serde_json::json!(["SPY", "ARKK"]));
    }

    #[test]
    fn writes_replace_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path().join("data"));
        writer.ensure_dir().unwrap();

        writer
            .write_snapshot("spy", &[HoldingRecord::new("AAPL", Weight::Fraction(0.07))])
            .unwrap();
        let path = writer
            .write_snapshot("SPY", &[HoldingRecord::new("MSFT", Weight::Unknown)])
            .unwrap();

        assert_eq!(path, dir.path().join("data/SPY.csv"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "Ticker,Weight\nMSFT,\n");
        assert!(!dir.path().join("data/SPY.tmp").exists());
    }

    #[test]
    fn manifest_round_trips_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let writer = SnapshotWriter::new(dir.path());
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let path = writer
            .write_manifest(&UpdateManifest::new(ts, vec!["XYZ".into()]))
            .unwrap();

        let loaded: UpdateManifest =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(loaded.tickers, vec!["XYZ".to_string()]);
        assert_eq!(loaded.updated_at, ts);
    }
}
