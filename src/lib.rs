#![deny(missing_docs)]

//! Real-time noise suppression bridge between a host audio callback and RNNoise.
//!
//! Hosts deliver and consume blocks of whatever size the device picks, while RNNoise only
//! accepts 480-sample frames. The [`CallbackDriver`](driver::CallbackDriver) decouples the
//! two with a pair of fixed-capacity [`RingBuffer`](ring::RingBuffer)s: captured samples
//! are queued on the input ring, the [`FrameAligner`](aligner::FrameAligner) moves whole
//! frames through the denoiser and the wet/dry mix into the output ring, and the host's
//! output is filled from there. Nothing on that path allocates, locks or blocks.

use std::sync::Once;

pub mod aligner;
pub mod config;
/// Audio device glue and the operator console.
pub mod control;
pub mod denoise;
pub mod driver;
pub mod latency;
pub mod mix;
pub mod ring;
pub mod selftest;

#[cfg(test)]
mod tests;

pub use config::{Command, SessionConfig};
pub use denoise::{Bypass, Denoiser, FRAME_SIZE, RnnoiseDenoiser};
pub use driver::{CallbackDriver, Diagnostics, SharedDiagnostics, StreamStatus};
pub use mix::WetDryMix;
pub use ring::RingBuffer;

static TRACING_INIT: Once = Once::new();

/// Install the fmt subscriber once per process. Later calls are no-ops.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_writer(std::io::stderr).try_init();
    });
}

/// Error enumeration surfaced across the public API.
#[derive(thiserror::Error, Debug)]
pub enum NoiezError {
    /// Ring capacity was zero or not a power of two.
    #[error("ring capacity {0} is not a power of two")]
    CapacityNotPowerOfTwo(usize),
    /// Ring capacity cannot hold a single denoiser frame.
    #[error("ring capacity {capacity} is smaller than one {frame}-sample frame")]
    CapacityBelowFrame {
        /// Requested capacity.
        capacity: usize,
        /// Denoiser frame size.
        frame: usize,
    },
    /// Wet/dry ratio outside `[0, 1]`.
    #[error("wet mix {0} is outside 0.0..=1.0")]
    InvalidWetMix(f32),
    /// Block or queue size of zero, or a block larger than the configured maximum.
    #[error("invalid block size {0}")]
    InvalidBlockSize(usize),
    /// Unrecognised command-line argument.
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),
    /// Flag given without its value.
    #[error("{0} expects a value")]
    MissingValue(&'static str),
    /// Flag value could not be parsed.
    #[error("invalid value '{value}' for {flag}")]
    InvalidValue {
        /// Flag being parsed.
        flag: &'static str,
        /// Offending value.
        value: String,
    },
    /// The default host has no capture device.
    #[error("no default input device available")]
    NoInputDevice,
    /// The default host has no playback device.
    #[error("no default output device available")]
    NoOutputDevice,
    /// Querying the output device's default configuration failed.
    #[error("failed to query output configuration: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),
    /// Opening a stream failed.
    #[error("failed to open stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    /// Starting a stream failed.
    #[error("failed to start stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    /// Stopping a stream failed.
    #[error("failed to stop stream: {0}")]
    PauseStream(#[from] cpal::PauseStreamError),
    /// Console I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
