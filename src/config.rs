//! Session settings and command-line parsing.

use crate::NoiezError;
use crate::denoise::FRAME_SIZE;
use crate::mix::WetDryMix;

/// Default capture/playback rate in Hertz. RNNoise is trained for 48 kHz.
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
/// Default capacity of each ring in samples.
pub const DEFAULT_RING_CAPACITY: usize = 8_192;
/// Default upper bound on the samples the driver renders per call.
pub const DEFAULT_MAX_BLOCK_FRAMES: usize = 4_096;
/// Default capacity of the capture-to-playback bridge in samples.
pub const DEFAULT_BRIDGE_CAPACITY: usize = 16_384;
/// Default block size for the offline self-test.
pub const DEFAULT_SELFTEST_BLOCK: usize = 256;

/// Settings fixed for the lifetime of a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Stream sample rate in Hertz.
    pub sample_rate: u32,
    /// Capacity of the input and output rings. Must be a power of two of at least one frame.
    pub ring_capacity: usize,
    /// Wet/dry ratio applied to every denoised frame.
    pub wet_mix: WetDryMix,
    /// Largest number of samples handed to the driver in one call.
    pub max_block_frames: usize,
    /// Capacity of the queue carrying captured samples to the playback callback.
    pub bridge_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            ring_capacity: DEFAULT_RING_CAPACITY,
            wet_mix: WetDryMix::FULLY_WET,
            max_block_frames: DEFAULT_MAX_BLOCK_FRAMES,
            bridge_capacity: DEFAULT_BRIDGE_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Check the invariants the rings and the aligner rely on.
    pub fn validate(&self) -> Result<(), NoiezError> {
        if !self.ring_capacity.is_power_of_two() {
            return Err(NoiezError::CapacityNotPowerOfTwo(self.ring_capacity));
        }
        if self.ring_capacity < FRAME_SIZE {
            return Err(NoiezError::CapacityBelowFrame {
                capacity: self.ring_capacity,
                frame: FRAME_SIZE,
            });
        }
        if self.max_block_frames == 0 {
            return Err(NoiezError::InvalidBlockSize(self.max_block_frames));
        }
        if self.bridge_capacity == 0 {
            return Err(NoiezError::InvalidBlockSize(self.bridge_capacity));
        }
        Ok(())
    }
}

/// What the binary was asked to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Run live noise suppression until a key is pressed.
    Run(SessionConfig),
    /// Push a test burst through the pipeline offline and report its latency.
    Selftest {
        /// Pipeline settings.
        config: SessionConfig,
        /// Constant host block size to simulate.
        block_frames: usize,
    },
    /// Print usage.
    Help,
}

/// Usage text for `--help`.
pub const USAGE: &str = "Usage: noiez [--wet <0..1>] [--capacity <pow2>] [--max-block <n>] [--selftest [--block <n>]]

Without --selftest, denoises the default input device into the default output device
until Enter is pressed.";

/// Parse arguments (without the program name).
pub fn parse_args<I, S>(args: I) -> Result<Command, NoiezError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut config = SessionConfig::default();
    let mut selftest = false;
    let mut block_frames = DEFAULT_SELFTEST_BLOCK;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_ref() {
            "--help" | "-h" => return Ok(Command::Help),
            "--selftest" => selftest = true,
            "--wet" | "-w" => {
                let wet: f32 = parse_value("--wet", args.next())?;
                config.wet_mix = WetDryMix::new(wet)?;
            }
            "--capacity" => config.ring_capacity = parse_value("--capacity", args.next())?,
            "--max-block" => config.max_block_frames = parse_value("--max-block", args.next())?,
            "--block" => block_frames = parse_value("--block", args.next())?,
            other => return Err(NoiezError::UnknownArgument(other.to_string())),
        }
    }

    config.validate()?;
    if selftest {
        if block_frames == 0 || block_frames > config.max_block_frames {
            return Err(NoiezError::InvalidBlockSize(block_frames));
        }
        Ok(Command::Selftest {
            config,
            block_frames,
        })
    } else {
        Ok(Command::Run(config))
    }
}

fn parse_value<T, S>(flag: &'static str, value: Option<S>) -> Result<T, NoiezError>
where
    T: std::str::FromStr,
    S: AsRef<str>,
{
    let value = value.ok_or(NoiezError::MissingValue(flag))?;
    value
        .as_ref()
        .trim()
        .parse()
        .map_err(|_| NoiezError::InvalidValue {
            flag,
            value: value.as_ref().to_string(),
        })
}
