// src/bin/record.rs
//! Record EMG samples from a serial device into a CSV file.

use std::error::Error;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use emg_pipeline::acquisition::{open_port, Recorder, RecorderConfig};
use emg_pipeline::storage::{RecordingMeta, RecordingWriter};

#[derive(Parser)]
#[command(name = "emg-record", about = "Record EMG samples from a serial device to CSV")]
struct Args {
    /// Serial port (auto-detected when omitted)
    #[arg(long)]
    port: Option<String>,

    /// Baud rate; must match the firmware
    #[arg(long, default_value_t = 115_200)]
    baud: u32,

    /// Device sample rate in Hz; must match the firmware
    #[arg(long, default_value_t = 1000.0)]
    rate: f64,

    /// Output CSV path (defaults to emg_<timestamp>.csv)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    println!();
    println!("==================================================");
    println!("  EMG Recorder - Movement Chain");
    println!("==================================================");

    let config = RecorderConfig {
        port: args.port,
        baud_rate: args.baud,
        sample_rate_hz: args.rate,
        ..RecorderConfig::default()
    };

    let (port_name, port) = open_port(&config)?;
    println!("  Port: {port_name}");

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!("emg_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
    });
    println!("  Output file: {}", output.display());

    println!();
    println!("  Press ENTER to start recording...");
    wait_for_enter()?;

    // Drop whatever arrived while we waited; recording starts now.
    port.clear(serialport::ClearBuffer::Input)?;
    let started_at = Local::now();

    let meta = RecordingMeta {
        started_at,
        sample_rate_hz: args.rate,
        port: port_name,
    };
    let mut writer = RecordingWriter::create(&output, &meta)?;

    println!();
    println!("  Recording started!");
    println!("  Press ENTER to stop and save.");
    println!("==================================================");
    println!();

    let stop = Arc::new(AtomicBool::new(false));
    let stop_on_enter = stop.clone();
    thread::spawn(move || {
        let _ = std::io::stdin().lock().read_line(&mut String::new());
        stop_on_enter.store(true, Ordering::Relaxed);
    });

    let recorder = Recorder::new(port, args.rate);
    let (rx, handle) = recorder.stream(stop)?;

    let mut count = 0usize;
    for sample in rx.iter() {
        writer.append(&sample)?;
        count += 1;
        if count % 1000 == 0 {
            let elapsed = (Local::now() - started_at).num_milliseconds() as f64 / 1000.0;
            let actual_rate = if elapsed > 0.0 { count as f64 / elapsed } else { 0.0 };
            println!("  Samples: {count}  |  Time: {elapsed:.1}s  |  Rate: {actual_rate:.0} Hz");
        }
    }

    let stats = handle
        .join()
        .map_err(|_| "recorder thread panicked")??;
    writer.finish()?;

    let duration = (Local::now() - started_at).num_milliseconds() as f64 / 1000.0;
    println!();
    println!("==================================================");
    println!("  Recording Complete!");
    println!("==================================================");
    println!("  Duration:    {duration:.1} seconds");
    println!("  Samples:     {}", stats.samples);
    if duration > 0.0 {
        println!("  Actual rate: {:.0} Hz", stats.samples as f64 / duration);
    }
    println!("  Saved to:    {}", output.display());
    if stats.decode_errors > 0 {
        println!("  Dropped:     {} malformed line(s)", stats.decode_errors);
    }
    println!();
    println!("  Next step: emg-analyze {}", output.display());
    println!("==================================================");
    println!();

    Ok(())
}

fn wait_for_enter() -> std::io::Result<()> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
