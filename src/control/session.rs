use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, bounded};
use rtrb::{Consumer, Producer};
use tracing::{debug, info, warn};

use crate::NoiezError;
use crate::config::SessionConfig;
use crate::denoise::Denoiser;
use crate::driver::{CallbackDriver, Diagnostics, SharedDiagnostics, StreamStatus};

const ERROR_QUEUE: usize = 16;

/// A running capture/playback pair feeding a [`CallbackDriver`].
///
/// Capture and playback are separate cpal streams. Captured samples cross to the playback
/// callback through a lock-free queue; the playback callback owns the driver.
pub struct Session {
    input_stream: cpal::Stream,
    output_stream: cpal::Stream,
    diagnostics: Arc<SharedDiagnostics>,
    errors: Receiver<cpal::StreamError>,
}

impl Session {
    /// Open the default input and output devices and start processing.
    pub fn start<D: Denoiser>(config: &SessionConfig, denoiser: D) -> Result<Self, NoiezError> {
        let driver = CallbackDriver::new(config, denoiser)?;

        let host = cpal::default_host();
        let input_device = host
            .default_input_device()
            .ok_or(NoiezError::NoInputDevice)?;
        let output_device = host
            .default_output_device()
            .ok_or(NoiezError::NoOutputDevice)?;

        let output_channels = output_device.default_output_config()?.channels().max(1);
        let input_config = cpal::StreamConfig {
            channels: 1,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };
        let output_config = cpal::StreamConfig {
            channels: output_channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let (producer, consumer) = rtrb::RingBuffer::<f32>::new(config.bridge_capacity);
        let input_overflow = Arc::new(AtomicBool::new(false));
        let diagnostics = Arc::new(SharedDiagnostics::default());
        let (error_tx, errors) = bounded(ERROR_QUEUE);

        let mut capture = Capture {
            producer,
            overflow: input_overflow.clone(),
        };
        let input_stream = input_device.build_input_stream(
            &input_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| capture.push(data),
            stream_error_callback(error_tx.clone(), "input"),
            None,
        )?;

        let mut playback = Playback::new(
            driver,
            consumer,
            input_overflow,
            diagnostics.clone(),
            config,
            output_channels as usize,
        );
        let output_stream = output_device.build_output_stream(
            &output_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                no_denormals::no_denormals(|| playback.render(data))
            },
            stream_error_callback(error_tx, "output"),
            None,
        )?;

        output_stream.play()?;
        input_stream.play()?;

        info!(
            sample_rate = config.sample_rate,
            ring_capacity = config.ring_capacity,
            wet_mix = config.wet_mix.wet(),
            output_channels,
            "session started"
        );

        Ok(Self {
            input_stream,
            output_stream,
            diagnostics,
            errors,
        })
    }

    /// Runtime errors reported by either stream.
    pub fn errors(&self) -> &Receiver<cpal::StreamError> {
        &self.errors
    }

    /// Stop both streams and return the final counters.
    pub fn stop(self) -> Diagnostics {
        if let Err(err) = self.input_stream.pause() {
            warn!(%err, "failed to pause input stream");
        }
        if let Err(err) = self.output_stream.pause() {
            warn!(%err, "failed to pause output stream");
        }
        let Self {
            input_stream,
            output_stream,
            diagnostics,
            ..
        } = self;
        drop(input_stream);
        drop(output_stream);

        let snapshot = diagnostics.snapshot();
        debug!(?snapshot, "session stopped");
        snapshot
    }
}

fn stream_error_callback(
    tx: Sender<cpal::StreamError>,
    direction: &'static str,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    move |err| {
        warn!(direction, %err, "stream error");
        let _ = tx.try_send(err);
    }
}

/// Capture-side half: forwards device samples into the bridge.
struct Capture {
    producer: Producer<f32>,
    overflow: Arc<AtomicBool>,
}

impl Capture {
    fn push(&mut self, data: &[f32]) {
        for &sample in data {
            if self.producer.push(sample).is_err() {
                self.overflow.store(true, Ordering::Relaxed);
                break;
            }
        }
    }
}

/// Playback-side half: drains the bridge through the driver into the device buffer.
struct Playback<D: Denoiser> {
    driver: CallbackDriver<D>,
    consumer: Consumer<f32>,
    overflow: Arc<AtomicBool>,
    shared: Arc<SharedDiagnostics>,
    bridged: Vec<f32>,
    mono: Vec<f32>,
    channels: usize,
}

impl<D: Denoiser> Playback<D> {
    fn new(
        driver: CallbackDriver<D>,
        consumer: Consumer<f32>,
        overflow: Arc<AtomicBool>,
        shared: Arc<SharedDiagnostics>,
        config: &SessionConfig,
        channels: usize,
    ) -> Self {
        Self {
            driver,
            consumer,
            overflow,
            shared,
            bridged: vec![0.0f32; config.bridge_capacity],
            mono: vec![0.0f32; config.max_block_frames],
            channels,
        }
    }

    // Device buffers longer than `max_block_frames` run through the driver in pieces.
    fn render(&mut self, data: &mut [f32]) {
        let channels = self.channels;
        for out in data.chunks_mut(self.mono.len() * channels) {
            let frames = out.len() / channels;
            let captured = self.drain_bridge();
            let status = StreamStatus {
                input_overflow: self.overflow.swap(false, Ordering::Relaxed),
                output_underflow: false,
            };
            self.driver.process(
                Some(&self.bridged[..captured]),
                &mut self.mono[..frames],
                status,
            );
            for (frame, &sample) in out.chunks_exact_mut(channels).zip(self.mono.iter()) {
                frame.fill(sample);
            }
        }
        self.driver.diagnostics().publish(&self.shared);
    }

    fn drain_bridge(&mut self) -> usize {
        let available = self.consumer.slots().min(self.bridged.len());
        if available == 0 {
            return 0;
        }
        let Ok(chunk) = self.consumer.read_chunk(available) else {
            return 0;
        };
        let (first, second) = chunk.as_slices();
        self.bridged[..first.len()].copy_from_slice(first);
        self.bridged[first.len()..first.len() + second.len()].copy_from_slice(second);
        chunk.commit_all();
        available
    }
}
