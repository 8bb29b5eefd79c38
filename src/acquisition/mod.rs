// src/acquisition/mod.rs
//! Serial EMG acquisition
//!
//! An I/O shim in front of the processing core: it finds the device, frames
//! newline-delimited ASCII samples, filters malformed lines, and hands the
//! core a finished sequence plus the sample rate. No processing happens here.

pub mod line_decoder;
pub mod port_scan;
pub mod recorder;

pub use line_decoder::{LineDecoder, SamplePoll};
pub use port_scan::detect_port;
pub use recorder::{connect, open_port, Recorder, RecorderStats, Recording, SerialRecorder, TimedSample};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::constants::acquisition as defaults;

/// Errors raised while acquiring samples from the device.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    /// No serial port matched the device heuristics.
    #[error("no EMG device found; set the port explicitly")]
    NoDeviceFound,

    /// Serial port enumeration failed.
    #[error("serial port scan failed: {0}")]
    PortScan(#[from] serialport::Error),

    /// The port could not be opened after the configured retries.
    #[error("failed to open {port} after {attempts} attempt(s): {source}")]
    ConnectFailed {
        /// Port that refused to open.
        port: String,
        /// Attempts made.
        attempts: u32,
        /// Last error from the serial layer.
        source: serialport::Error,
    },

    /// I/O failure while reading samples.
    #[error("I/O error while reading samples: {0}")]
    Io(#[from] std::io::Error),
}

/// Serial recorder parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Port path, e.g. `/dev/ttyACM0` or `COM3`; auto-detected when absent.
    #[serde(default)]
    pub port: Option<String>,

    /// Baud rate; must match the firmware.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Device sample rate in Hz, recorded as provenance.
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,

    /// Serial read timeout in milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    /// Connection attempts before giving up.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Settle time after opening the port, in milliseconds. Boards with an
    /// auto-reset-on-open bootloader need this before they emit samples.
    #[serde(default = "default_reset_delay_ms")]
    pub reset_delay_ms: u64,
}

fn default_baud_rate() -> u32 {
    defaults::DEFAULT_BAUD_RATE
}
fn default_sample_rate_hz() -> f64 {
    crate::config::constants::signal::DEFAULT_SAMPLE_RATE_HZ
}
fn default_read_timeout_ms() -> u64 {
    defaults::DEFAULT_READ_TIMEOUT_MS
}
fn default_retry_attempts() -> u32 {
    defaults::DEFAULT_RETRY_ATTEMPTS
}
fn default_reset_delay_ms() -> u64 {
    defaults::DEVICE_RESET_DELAY_MS
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            sample_rate_hz: default_sample_rate_hz(),
            read_timeout_ms: default_read_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            reset_delay_ms: default_reset_delay_ms(),
        }
    }
}
