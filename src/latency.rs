//! Latency probe: a windowed sine burst and a cross-correlation estimator.

use dasp_signal::{self as signal, Signal};

/// Latency measurement report capturing the best-fit offset.
#[derive(Debug, Clone, Copy)]
pub struct LatencyReport {
    /// Estimated offset in samples between the reference burst and the recording.
    pub offset_frames: usize,
    /// Offset converted to seconds.
    pub offset_seconds: f32,
    /// Normalized cross-correlation score (0.0 - 1.0).
    pub correlation: f32,
}

/// Deterministic burst generator and latency estimator for mono signals.
pub struct LatencyProbe {
    sample_rate: u32,
    reference: Vec<f32>,
}

impl LatencyProbe {
    /// Build a Hann-windowed sine burst of `window_frames` samples at `frequency_hz`.
    pub fn new(sample_rate: u32, frequency_hz: f32, window_frames: usize) -> Self {
        let reference = build_reference_burst(sample_rate, frequency_hz, window_frames);
        Self {
            sample_rate,
            reference,
        }
    }

    /// The reference burst.
    pub fn reference(&self) -> &[f32] {
        &self.reference
    }

    /// Copy the burst into `out`. Returns samples written.
    pub fn emit_burst(&self, out: &mut [f32]) -> usize {
        let samples = out.len().min(self.reference.len());
        out[..samples].copy_from_slice(&self.reference[..samples]);
        samples
    }

    /// Find where the burst best lines up within `recorded`.
    pub fn measure(&self, recorded: &[f32]) -> LatencyReport {
        if recorded.len() < self.reference.len() || self.reference.is_empty() {
            return LatencyReport {
                offset_frames: 0,
                offset_seconds: 0.0,
                correlation: 0.0,
            };
        }

        let max_offset = recorded.len() - self.reference.len();
        let reference_norm = norm(&self.reference);
        let mut best = (0usize, 0.0f32);

        for offset in 0..=max_offset {
            let slice = &recorded[offset..offset + self.reference.len()];
            let corr = correlation(&self.reference, slice, reference_norm);
            if corr > best.1 {
                best = (offset, corr);
            }
        }

        LatencyReport {
            offset_frames: best.0,
            offset_seconds: best.0 as f32 / self.sample_rate as f32,
            correlation: best.1,
        }
    }
}

fn build_reference_burst(sample_rate: u32, frequency: f32, frames: usize) -> Vec<f32> {
    let sine = signal::rate(sample_rate as f64)
        .const_hz(frequency as f64)
        .sine()
        .take(frames);
    let span = frames.saturating_sub(1).max(1) as f32;
    sine.enumerate()
        .map(|(n, value)| {
            let window = 0.5 - 0.5 * (std::f32::consts::TAU * n as f32 / span).cos();
            value as f32 * window * 0.5
        })
        .collect()
}

// Normalized cross-correlation of `recorded` against a reference with precomputed norm.
fn correlation(reference: &[f32], recorded: &[f32], reference_norm: f32) -> f32 {
    let (cross, power) = reference
        .iter()
        .zip(recorded)
        .fold((0.0f32, 0.0f32), |(cross, power), (&r, &x)| {
            (cross + r * x, power + x * x)
        });
    if reference_norm == 0.0 || power == 0.0 {
        return 0.0;
    }
    cross / (reference_norm * power.sqrt())
}

fn norm(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc + s * s).sqrt()
}
