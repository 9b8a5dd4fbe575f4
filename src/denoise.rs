//! Fixed-frame denoising transforms driven by the frame aligner.

use nnnoiseless::DenoiseState;

/// Samples per denoiser frame: 10 ms at 48 kHz.
pub const FRAME_SIZE: usize = 480;

// RNNoise works on samples in the 16-bit integer range.
const RNNOISE_SCALE: f32 = 32_768.0;

/// A transform that consumes and produces exactly [`FRAME_SIZE`] samples per call.
///
/// Implementations run on the real-time thread and must not allocate, lock or block.
pub trait Denoiser: Send + 'static {
    /// Denoise `input` into `output`. The return value is the voice-activity probability
    /// when the transform computes one, and is otherwise `0.0`.
    fn process_frame(&mut self, output: &mut [f32; FRAME_SIZE], input: &[f32; FRAME_SIZE]) -> f32;
}

/// RNNoise suppression backed by the pure-Rust `nnnoiseless` port.
pub struct RnnoiseDenoiser {
    state: Box<DenoiseState<'static>>,
    scaled_in: [f32; FRAME_SIZE],
    scaled_out: [f32; FRAME_SIZE],
}

impl RnnoiseDenoiser {
    /// Create a fresh RNNoise state with the built-in model.
    pub fn new() -> Self {
        debug_assert_eq!(DenoiseState::FRAME_SIZE, FRAME_SIZE);
        Self {
            state: DenoiseState::new(),
            scaled_in: [0.0; FRAME_SIZE],
            scaled_out: [0.0; FRAME_SIZE],
        }
    }
}

impl Default for RnnoiseDenoiser {
    fn default() -> Self {
        Self::new()
    }
}

impl Denoiser for RnnoiseDenoiser {
    fn process_frame(&mut self, output: &mut [f32; FRAME_SIZE], input: &[f32; FRAME_SIZE]) -> f32 {
        for (scaled, &sample) in self.scaled_in.iter_mut().zip(input.iter()) {
            *scaled = sample * RNNOISE_SCALE;
        }
        let vad = self
            .state
            .process_frame(&mut self.scaled_out[..], &self.scaled_in[..]);
        for (out, &scaled) in output.iter_mut().zip(self.scaled_out.iter()) {
            *out = scaled / RNNOISE_SCALE;
        }
        vad
    }
}

/// Identity transform. Copies input to output unchanged.
#[derive(Default, Debug, Clone, Copy)]
pub struct Bypass;

impl Denoiser for Bypass {
    fn process_frame(&mut self, output: &mut [f32; FRAME_SIZE], input: &[f32; FRAME_SIZE]) -> f32 {
        output.copy_from_slice(input);
        0.0
    }
}
