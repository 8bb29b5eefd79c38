// src/config/constants.rs
//! System-wide configuration constants

/// Signal constants
pub mod signal {
    /// Default device sample rate in Hz; must match the firmware.
    pub const DEFAULT_SAMPLE_RATE_HZ: f64 = 1000.0;
}

/// Bandpass filter constants (standard surface-EMG range)
pub mod filters {
    /// Low cutoff in Hz; removes low-frequency motion artifacts.
    pub const DEFAULT_BANDPASS_LOW_HZ: f64 = 20.0;
    /// High cutoff in Hz; removes high-frequency noise.
    pub const DEFAULT_BANDPASS_HIGH_HZ: f64 = 450.0;
    /// Butterworth prototype order.
    pub const DEFAULT_FILTER_ORDER: usize = 4;
    /// Largest accepted prototype order.
    pub const MAX_FILTER_ORDER: usize = 8;
}

/// Envelope extraction constants
pub mod envelope {
    /// Moving-average window in milliseconds.
    pub const DEFAULT_WINDOW_MS: f64 = 100.0;
}

/// Serial acquisition constants
pub mod acquisition {
    /// Default baud rate; must match the firmware.
    pub const DEFAULT_BAUD_RATE: u32 = 115_200;
    /// Serial read timeout in milliseconds.
    pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;
    /// Connection attempts before giving up.
    pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
    /// Delay between connection attempts in milliseconds.
    pub const RETRY_BASE_DELAY_MS: u64 = 500;
    /// Settle time after opening the port; the board resets on open.
    pub const DEVICE_RESET_DELAY_MS: u64 = 2000;
    /// Samples between progress callbacks.
    pub const PROGRESS_INTERVAL_SAMPLES: usize = 1000;
}
