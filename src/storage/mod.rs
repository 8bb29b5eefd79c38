// src/storage/mod.rs
//! CSV persistence for recordings and processed output
//!
//! Recording files carry `#`-prefixed metadata lines above a
//! `timestamp,emg_raw` header. Processed files keep the original columns and
//! append `emg_filtered`, `emg_rectified`, `emg_envelope`, aligned by row
//! index.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::acquisition::{Recording, TimedSample};
use crate::processing::ProcessingError;
use crate::signal::{ProcessedBundle, Signal};

/// Timestamp format used in recording rows, millisecond precision.
const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Errors raised while reading or writing recording files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV content.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Processed signals do not line up with the recording rows.
    #[error("row count mismatch: recording has {rows} rows, processed signals have {samples}")]
    RowCountMismatch {
        /// Rows in the tabular recording.
        rows: usize,
        /// Samples per processed signal.
        samples: usize,
    },
}

/// One row of a recording file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedRow {
    /// Wall-clock arrival timestamp, kept verbatim for provenance.
    pub timestamp: String,
    /// Raw amplitude value.
    pub emg_raw: f64,
}

/// A recording loaded from disk, row-aligned for later column appending.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularRecording {
    /// Rows in file order.
    pub rows: Vec<RecordedRow>,
}

impl TabularRecording {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the file held no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Extract the raw samples as a [`Signal`] at the given rate.
    pub fn to_signal(&self, sample_rate_hz: f64) -> Result<Signal, ProcessingError> {
        Signal::new(self.rows.iter().map(|r| r.emg_raw).collect(), sample_rate_hz)
    }
}

/// Load a recording file, skipping `#` metadata lines.
pub fn load_recording<P: AsRef<Path>>(path: P) -> Result<TabularRecording, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<RecordedRow>, _>>()?;
    info!(path = %path.as_ref().display(), rows = rows.len(), "recording loaded");
    Ok(TabularRecording { rows })
}

/// Metadata written above the CSV header of a recording file.
#[derive(Debug, Clone)]
pub struct RecordingMeta {
    /// Capture start time.
    pub started_at: DateTime<Local>,
    /// Nominal device sample rate in Hz.
    pub sample_rate_hz: f64,
    /// Port the samples came from.
    pub port: String,
}

/// Incremental writer for recording files.
///
/// Rows are flushed as they arrive so an interrupted session still leaves a
/// loadable file behind.
pub struct RecordingWriter {
    writer: csv::Writer<File>,
}

impl RecordingWriter {
    /// Create the file, write the metadata block and the column header.
    pub fn create<P: AsRef<Path>>(path: P, meta: &RecordingMeta) -> Result<Self, StorageError> {
        let mut file = File::create(path.as_ref())?;
        writeln!(file, "# EMG Recording - Movement Chain")?;
        writeln!(file, "# Start time: {}", meta.started_at.to_rfc3339())?;
        writeln!(file, "# Sample rate: {} Hz", meta.sample_rate_hz)?;
        writeln!(file, "# Port: {}", meta.port)?;
        writeln!(file, "#")?;

        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["timestamp", "emg_raw"])?;
        Ok(Self { writer })
    }

    /// Append one sample row.
    pub fn append(&mut self, sample: &TimedSample) -> Result<(), StorageError> {
        self.writer.write_record([
            sample.timestamp.format(ROW_TIMESTAMP_FORMAT).to_string(),
            format_value(sample.value),
        ])?;
        Ok(())
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> Result<(), StorageError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Persist a completed in-memory recording in one call.
pub fn save_recording<P: AsRef<Path>>(
    path: P,
    recording: &Recording,
    port: &str,
) -> Result<(), StorageError> {
    let meta = RecordingMeta {
        started_at: recording.started_at,
        sample_rate_hz: recording.sample_rate_hz,
        port: port.to_string(),
    };
    let mut writer = RecordingWriter::create(path, &meta)?;
    for sample in &recording.samples {
        writer.append(sample)?;
    }
    writer.finish()
}

/// Write the processed output: original columns plus the three derived ones.
pub fn save_processed<P: AsRef<Path>>(
    path: P,
    recording: &TabularRecording,
    bundle: &ProcessedBundle,
) -> Result<(), StorageError> {
    if recording.len() != bundle.len() {
        return Err(StorageError::RowCountMismatch {
            rows: recording.len(),
            samples: bundle.len(),
        });
    }

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record([
        "timestamp",
        "emg_raw",
        "emg_filtered",
        "emg_rectified",
        "emg_envelope",
    ])?;

    let filtered = bundle.filtered.samples();
    let rectified = bundle.rectified.samples();
    let envelope = bundle.envelope.samples();
    for (i, row) in recording.rows.iter().enumerate() {
        writer.write_record([
            row.timestamp.clone(),
            format_value(row.emg_raw),
            format_value(filtered[i]),
            format_value(rectified[i]),
            format_value(envelope[i]),
        ])?;
    }
    writer.flush()?;
    info!(path = %path.as_ref().display(), rows = recording.len(), "processed output saved");
    Ok(())
}

/// Derive the processed-output path: `foo.csv` becomes `foo_processed.csv`.
pub fn processed_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "recording".to_string());
    input.with_file_name(format!("{stem}_processed.csv"))
}

/// Integer-valued samples print without a decimal point, like the device
/// emitted them; everything else keeps full precision.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::pipeline::{EmgPipeline, PipelineConfig};
    use chrono::TimeZone;

    fn sample_recording() -> Recording {
        let base = Local.with_ymd_and_hms(2026, 1, 11, 17, 30, 0).unwrap();
        Recording {
            started_at: base,
            sample_rate_hz: 1000.0,
            samples: (0..40i64)
                .map(|i| TimedSample {
                    timestamp: base + chrono::Duration::milliseconds(i),
                    value: (i % 7) as f64 - 3.0,
                })
                .collect(),
            decode_errors: 0,
        }
    }

    #[test]
    fn test_recording_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emg_test.csv");

        let recording = sample_recording();
        save_recording(&path, &recording, "/dev/ttyACM0").unwrap();

        let loaded = load_recording(&path).unwrap();
        assert_eq!(loaded.len(), 40);
        for (row, sample) in loaded.rows.iter().zip(&recording.samples) {
            assert_eq!(row.emg_raw, sample.value);
        }
    }

    #[test]
    fn test_metadata_lines_skipped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        std::fs::write(
            &path,
            "# comment line\n# another\ntimestamp,emg_raw\n2026-01-11 17:30:00.000,512\n",
        )
        .unwrap();
        let loaded = load_recording(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.rows[0].emg_raw, 512.0);
    }

    #[test]
    fn test_save_processed_appends_columns() {
        let dir = tempfile::tempdir().unwrap();
        let in_path = dir.path().join("emg.csv");
        let out_path = processed_path(&in_path);
        assert_eq!(out_path, dir.path().join("emg_processed.csv"));

        save_recording(&in_path, &sample_recording(), "sim").unwrap();
        let loaded = load_recording(&in_path).unwrap();

        let signal = loaded.to_signal(1000.0).unwrap();
        let bundle = EmgPipeline::new(PipelineConfig::default())
            .process(&signal)
            .unwrap();
        save_processed(&out_path, &loaded, &bundle).unwrap();

        let text = std::fs::read_to_string(&out_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "timestamp,emg_raw,emg_filtered,emg_rectified,emg_envelope"
        );
        assert_eq!(text.lines().count(), 41);
    }

    #[test]
    fn test_save_processed_rejects_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = TabularRecording {
            rows: vec![RecordedRow {
                timestamp: "t".to_string(),
                emg_raw: 1.0,
            }],
        };
        let recording = sample_recording();
        let signal = Signal::new(
            recording.samples.iter().map(|s| s.value).collect(),
            1000.0,
        )
        .unwrap();
        let bundle = EmgPipeline::new(PipelineConfig::default())
            .process(&signal)
            .unwrap();
        let err = save_processed(dir.path().join("x.csv"), &loaded, &bundle).unwrap_err();
        assert!(matches!(
            err,
            StorageError::RowCountMismatch {
                rows: 1,
                samples: 40
            }
        ));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(512.0), "512");
        assert_eq!(format_value(-3.0), "-3");
        assert_eq!(format_value(1.5), "1.5");
    }
}
