//! Wet/dry blending of a denoised frame with its original input.

use crate::NoiezError;

/// Fraction of the processed ("wet") signal in the output, always within `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WetDryMix {
    wet: f32,
}

impl WetDryMix {
    /// Output only the processed signal.
    pub const FULLY_WET: Self = Self { wet: 1.0 };

    /// Validate a wet ratio. NaN and values outside `[0, 1]` are rejected.
    pub fn new(wet: f32) -> Result<Self, NoiezError> {
        if !(0.0..=1.0).contains(&wet) {
            return Err(NoiezError::InvalidWetMix(wet));
        }
        Ok(Self { wet })
    }

    /// Wet fraction.
    pub fn wet(&self) -> f32 {
        self.wet
    }

    /// Dry fraction, `1 - wet`.
    pub fn dry(&self) -> f32 {
        1.0 - self.wet
    }

    /// Blend `dry` into `wet` in place: `wet[i] = dry[i] * (1 - r) + wet[i] * r`.
    ///
    /// A fully wet ratio leaves `wet` untouched and a fully dry ratio copies `dry` over it;
    /// for finite samples both match the general formula exactly.
    pub fn apply(&self, dry: &[f32], wet: &mut [f32]) {
        debug_assert_eq!(dry.len(), wet.len());
        if self.wet >= 1.0 {
            return;
        }
        if self.wet <= 0.0 {
            wet.copy_from_slice(dry);
            return;
        }

        let wet_gain = self.wet;
        let dry_gain = self.dry();
        for (out, &input) in wet.iter_mut().zip(dry.iter()) {
            *out = input * dry_gain + *out * wet_gain;
        }
    }
}

impl Default for WetDryMix {
    fn default() -> Self {
        Self::FULLY_WET
    }
}
