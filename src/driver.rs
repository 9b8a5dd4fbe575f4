//! Per-callback entry point invoked on the real-time audio thread.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::NoiezError;
use crate::aligner::FrameAligner;
use crate::config::SessionConfig;
use crate::denoise::Denoiser;
use crate::ring::RingBuffer;

/// Host-reported stream anomalies since the previous callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamStatus {
    /// The host dropped captured samples before this callback.
    pub input_overflow: bool,
    /// The host starved the output device before this callback.
    pub output_underflow: bool,
}

/// Session counters. Each [`CallbackDriver::process`] call bumps each event counter at most
/// once. The live session splits device buffers longer than `max_block_frames` into several
/// calls, so one device callback may count more than once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Callbacks in which input was lost, either by the host or by a full input ring.
    pub input_overflows: u64,
    /// Callbacks in which output was starved, either by the host or by an empty output ring.
    pub output_underflows: u64,
    /// `process` calls handled.
    pub callbacks: u64,
    /// Frames run through the denoiser.
    pub frames_denoised: u64,
    /// Input samples dropped because the input ring was full.
    pub samples_dropped: u64,
    /// Output samples zero-filled because the output ring ran dry.
    pub samples_zero_filled: u64,
}

impl Diagnostics {
    /// Copy the counters into `shared` with relaxed stores. Lock and allocation free.
    pub fn publish(&self, shared: &SharedDiagnostics) {
        shared.input_overflows.store(self.input_overflows, Ordering::Relaxed);
        shared.output_underflows.store(self.output_underflows, Ordering::Relaxed);
        shared.callbacks.store(self.callbacks, Ordering::Relaxed);
        shared.frames_denoised.store(self.frames_denoised, Ordering::Relaxed);
        shared.samples_dropped.store(self.samples_dropped, Ordering::Relaxed);
        shared
            .samples_zero_filled
            .store(self.samples_zero_filled, Ordering::Relaxed);
    }
}

/// Counters mirrored out of the audio thread for the controlling thread.
///
/// Only meaningful once the stream that publishes into it has stopped.
#[derive(Debug, Default)]
pub struct SharedDiagnostics {
    input_overflows: AtomicU64,
    output_underflows: AtomicU64,
    callbacks: AtomicU64,
    frames_denoised: AtomicU64,
    samples_dropped: AtomicU64,
    samples_zero_filled: AtomicU64,
}

impl SharedDiagnostics {
    /// Read the last published counters.
    pub fn snapshot(&self) -> Diagnostics {
        Diagnostics {
            input_overflows: self.input_overflows.load(Ordering::Relaxed),
            output_underflows: self.output_underflows.load(Ordering::Relaxed),
            callbacks: self.callbacks.load(Ordering::Relaxed),
            frames_denoised: self.frames_denoised.load(Ordering::Relaxed),
            samples_dropped: self.samples_dropped.load(Ordering::Relaxed),
            samples_zero_filled: self.samples_zero_filled.load(Ordering::Relaxed),
        }
    }
}

/// Callback state for one session: both rings, the aligner and the counters.
pub struct CallbackDriver<D: Denoiser> {
    input: RingBuffer,
    output: RingBuffer,
    aligner: FrameAligner<D>,
    silence: Box<[f32]>,
    diagnostics: Diagnostics,
}

impl<D: Denoiser> CallbackDriver<D> {
    /// Allocate the rings and scratch space described by `config`.
    pub fn new(config: &SessionConfig, denoiser: D) -> Result<Self, NoiezError> {
        config.validate()?;
        Ok(Self {
            input: RingBuffer::new(config.ring_capacity)?,
            output: RingBuffer::new(config.ring_capacity)?,
            aligner: FrameAligner::new(denoiser, config.wet_mix),
            silence: vec![0.0f32; config.max_block_frames].into_boxed_slice(),
            diagnostics: Diagnostics::default(),
        })
    }

    /// Counters accumulated so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Samples waiting for the denoiser.
    pub fn input_backlog(&self) -> usize {
        self.input.available_read()
    }

    /// Denoised samples waiting for the host.
    pub fn output_backlog(&self) -> usize {
        self.output.available_read()
    }

    /// Run one host callback.
    ///
    /// `None` input is treated as `output.len()` samples of silence. Input that does not
    /// fit in the input ring is dropped; output the pipeline cannot supply is zero-filled.
    /// Returns the number of denoised samples delivered into `output`.
    pub fn process(&mut self, input: Option<&[f32]>, output: &mut [f32], status: StreamStatus) -> usize {
        let dropped = match input {
            Some(samples) => samples.len() - self.input.write(samples),
            None => self.write_silence(output.len()),
        };

        let frames = self.aligner.run(&mut self.input, &mut self.output);

        let delivered = self.output.read(output);
        let shortfall = output.len() - delivered;
        if shortfall > 0 {
            output[delivered..].fill(0.0);
        }

        let stats = &mut self.diagnostics;
        stats.callbacks += 1;
        stats.frames_denoised += frames as u64;
        stats.samples_dropped += dropped as u64;
        stats.samples_zero_filled += shortfall as u64;
        if status.input_overflow || dropped > 0 {
            stats.input_overflows += 1;
        }
        if status.output_underflow || shortfall > 0 {
            stats.output_underflows += 1;
        }
        delivered
    }

    // Returns the number of silent samples that did not fit.
    fn write_silence(&mut self, samples: usize) -> usize {
        let mut remaining = samples;
        while remaining > 0 {
            let chunk = remaining.min(self.silence.len());
            let written = self.input.write(&self.silence[..chunk]);
            remaining -= written;
            if written < chunk {
                break;
            }
        }
        remaining
    }
}
