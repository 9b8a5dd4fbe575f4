//! Offline pipeline check that simulates a host without audio hardware.

use crate::NoiezError;
use crate::config::SessionConfig;
use crate::denoise::{Bypass, FRAME_SIZE};
use crate::driver::{CallbackDriver, Diagnostics, StreamStatus};
use crate::latency::{LatencyProbe, LatencyReport};

const BURST_HZ: f32 = 1_000.0;

/// Outcome of a self-test run.
#[derive(Debug, Clone, Copy)]
pub struct SelftestReport {
    /// Host block size that was simulated.
    pub block_frames: usize,
    /// Buffering latency measured on the burst.
    pub latency: LatencyReport,
    /// Driver counters at the end of the run.
    pub diagnostics: Diagnostics,
}

impl SelftestReport {
    /// Measured latency in milliseconds.
    pub fn latency_ms(&self) -> f32 {
        self.latency.offset_seconds * 1_000.0
    }
}

/// Feed silence, a sine burst and more silence through a bypass pipeline in constant
/// `block_frames` blocks, then locate the burst in the output.
///
/// The warm-up lasts 100 ms so that start-up underflows have settled before the burst.
pub fn run(config: &SessionConfig, block_frames: usize) -> Result<SelftestReport, NoiezError> {
    if block_frames == 0 || block_frames > config.max_block_frames {
        return Err(NoiezError::InvalidBlockSize(block_frames));
    }

    let mut driver = CallbackDriver::new(config, Bypass)?;
    let probe = LatencyProbe::new(config.sample_rate, BURST_HZ, FRAME_SIZE);

    let warmup = config.sample_rate as usize / 10;
    let tail = warmup;
    let mut input = vec![0.0f32; warmup + probe.reference().len() + tail];
    probe.emit_burst(&mut input[warmup..]);

    let mut recorded = vec![0.0f32; input.len()];
    for (block_in, block_out) in input
        .chunks(block_frames)
        .zip(recorded.chunks_mut(block_frames))
    {
        driver.process(Some(block_in), block_out, StreamStatus::default());
    }

    let latency = probe.measure(&recorded[warmup..]);
    tracing::debug!(
        block_frames,
        offset = latency.offset_frames,
        correlation = latency.correlation,
        "selftest finished"
    );

    Ok(SelftestReport {
        block_frames,
        latency,
        diagnostics: *driver.diagnostics(),
    })
}
