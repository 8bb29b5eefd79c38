// src/acquisition/recorder.rs
//! Sample recording over a framed byte source
//!
//! [`Recorder`] is generic over the byte source so recordings can be driven
//! from an in-memory buffer in tests; [`SerialRecorder`] is the hardware
//! instantiation. Capture only happens here; processing operates on the
//! completed [`Recording`].

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Local};
use crossbeam::channel::{unbounded, Receiver};
use serialport::{ClearBuffer, SerialPort};
use tracing::{info, warn};

use super::line_decoder::{LineDecoder, SamplePoll};
use super::port_scan::detect_port;
use super::{AcquisitionError, RecorderConfig};
use crate::config::constants::acquisition::{PROGRESS_INTERVAL_SAMPLES, RETRY_BASE_DELAY_MS};
use crate::processing::ProcessingError;
use crate::signal::Signal;

/// One decoded sample with its wall-clock arrival time (provenance only).
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSample {
    /// Arrival timestamp.
    pub timestamp: DateTime<Local>,
    /// Amplitude value as emitted by the device.
    pub value: f64,
}

/// A completed capture session.
#[derive(Debug, Clone)]
pub struct Recording {
    /// When the capture started.
    pub started_at: DateTime<Local>,
    /// Nominal device sample rate in Hz.
    pub sample_rate_hz: f64,
    /// Samples in acquisition order.
    pub samples: Vec<TimedSample>,
    /// Lines dropped during framing.
    pub decode_errors: usize,
}

impl Recording {
    /// Number of captured samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Strip timestamps and hand the core a plain signal.
    pub fn to_signal(&self) -> Result<Signal, ProcessingError> {
        Signal::new(
            self.samples.iter().map(|s| s.value).collect(),
            self.sample_rate_hz,
        )
    }
}

/// Counters reported by a streaming capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderStats {
    /// Samples delivered.
    pub samples: usize,
    /// Lines dropped during framing.
    pub decode_errors: usize,
}

/// Records framed samples from a byte source until stopped.
pub struct Recorder<R> {
    decoder: LineDecoder<R>,
    sample_rate_hz: f64,
}

impl<R: Read> Recorder<R> {
    /// Wrap a framed byte source with its nominal sample rate.
    pub fn new(source: R, sample_rate_hz: f64) -> Self {
        Self {
            decoder: LineDecoder::new(source),
            sample_rate_hz,
        }
    }

    /// Record until the stop flag is raised or the source ends.
    ///
    /// `on_progress` fires every [`PROGRESS_INTERVAL_SAMPLES`] samples with
    /// the running count.
    pub fn record_until<F>(
        &mut self,
        stop: &AtomicBool,
        mut on_progress: F,
    ) -> Result<Recording, AcquisitionError>
    where
        F: FnMut(usize),
    {
        let started_at = Local::now();
        let mut samples = Vec::new();

        while !stop.load(Ordering::Relaxed) {
            match self.decoder.poll()? {
                SamplePoll::Sample(value) => {
                    samples.push(TimedSample {
                        timestamp: Local::now(),
                        value,
                    });
                    if samples.len() % PROGRESS_INTERVAL_SAMPLES == 0 {
                        on_progress(samples.len());
                    }
                }
                SamplePoll::Pending => {}
                SamplePoll::Eof => break,
            }
        }

        Ok(Recording {
            started_at,
            sample_rate_hz: self.sample_rate_hz,
            samples,
            decode_errors: self.decoder.decode_errors(),
        })
    }
}

impl<R: Read + Send + 'static> Recorder<R> {
    /// Capture on a dedicated thread, streaming samples over a channel.
    ///
    /// The capture ends when the stop flag is raised, the source ends, or the
    /// receiver is dropped; the join handle then yields the final counters.
    pub fn stream(
        mut self,
        stop: Arc<AtomicBool>,
    ) -> Result<
        (
            Receiver<TimedSample>,
            JoinHandle<Result<RecorderStats, AcquisitionError>>,
        ),
        AcquisitionError,
    > {
        let (tx, rx) = unbounded();
        let handle = thread::Builder::new()
            .name("emg-recorder".to_string())
            .spawn(move || {
                let mut count = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    match self.decoder.poll()? {
                        SamplePoll::Sample(value) => {
                            let sample = TimedSample {
                                timestamp: Local::now(),
                                value,
                            };
                            if tx.send(sample).is_err() {
                                break;
                            }
                            count += 1;
                        }
                        SamplePoll::Pending => {}
                        SamplePoll::Eof => break,
                    }
                }
                Ok(RecorderStats {
                    samples: count,
                    decode_errors: self.decoder.decode_errors(),
                })
            })?;
        Ok((rx, handle))
    }
}

/// Recorder bound to a hardware serial port.
pub type SerialRecorder = Recorder<Box<dyn SerialPort>>;

/// Resolve and open the device port, retrying on failure.
///
/// Returns the resolved port name alongside the opened port. After opening,
/// waits out the board's reset and discards whatever it printed while
/// booting.
pub fn open_port(config: &RecorderConfig) -> Result<(String, Box<dyn SerialPort>), AcquisitionError> {
    let port_name = match &config.port {
        Some(port) => port.clone(),
        None => detect_port()?.ok_or(AcquisitionError::NoDeviceFound)?,
    };

    let mut attempt = 0;
    loop {
        attempt += 1;
        match serialport::new(&port_name, config.baud_rate)
            .timeout(Duration::from_millis(config.read_timeout_ms))
            .open()
        {
            Ok(port) => {
                info!(port = %port_name, baud = config.baud_rate, "serial port opened");
                thread::sleep(Duration::from_millis(config.reset_delay_ms));
                if let Err(err) = port.clear(ClearBuffer::Input) {
                    warn!(error = %err, "could not discard boot output");
                }
                return Ok((port_name, port));
            }
            Err(err) if attempt < config.retry_attempts => {
                warn!(port = %port_name, attempt, error = %err, "open failed, retrying");
                thread::sleep(Duration::from_millis(RETRY_BASE_DELAY_MS * attempt as u64));
            }
            Err(err) => {
                return Err(AcquisitionError::ConnectFailed {
                    port: port_name,
                    attempts: attempt,
                    source: err,
                });
            }
        }
    }
}

/// Open the configured (or auto-detected) device and wrap it in a recorder.
pub fn connect(config: &RecorderConfig) -> Result<SerialRecorder, AcquisitionError> {
    let (_, port) = open_port(config)?;
    Ok(Recorder::new(port, config.sample_rate_hz))
}
