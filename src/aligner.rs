//! Converts between the host's arbitrary block sizes and the denoiser's fixed frames.

use crate::denoise::{Denoiser, FRAME_SIZE};
use crate::mix::WetDryMix;
use crate::ring::RingBuffer;

/// One denoiser frame, aligned for vectorised access.
#[repr(C, align(64))]
struct AlignedFrame([f32; FRAME_SIZE]);

impl AlignedFrame {
    const fn zeroed() -> Self {
        Self([0.0; FRAME_SIZE])
    }
}

/// Pulls whole frames from the input ring, denoises and mixes them, and pushes the
/// result into the output ring.
pub struct FrameAligner<D: Denoiser> {
    denoiser: D,
    mix: WetDryMix,
    dry: AlignedFrame,
    wet: AlignedFrame,
}

impl<D: Denoiser> FrameAligner<D> {
    /// Take ownership of `denoiser` for the lifetime of the aligner.
    pub fn new(denoiser: D, mix: WetDryMix) -> Self {
        Self {
            denoiser,
            mix,
            dry: AlignedFrame::zeroed(),
            wet: AlignedFrame::zeroed(),
        }
    }

    /// Configured wet/dry ratio.
    pub fn mix(&self) -> WetDryMix {
        self.mix
    }

    /// Process frames until `input` holds less than a frame or `output` has room for less
    /// than one. Returns the number of frames processed.
    pub fn run(&mut self, input: &mut RingBuffer, output: &mut RingBuffer) -> usize {
        let mut frames = 0usize;
        while input.available_read() >= FRAME_SIZE && output.available_write() >= FRAME_SIZE {
            let read = input.read(&mut self.dry.0);
            debug_assert_eq!(read, FRAME_SIZE);

            self.denoiser.process_frame(&mut self.wet.0, &self.dry.0);
            self.mix.apply(&self.dry.0, &mut self.wet.0);

            let written = output.write(&self.wet.0);
            debug_assert_eq!(written, FRAME_SIZE);
            frames += 1;
        }
        frames
    }
}
