use noiez::aligner::FrameAligner;
use noiez::{Bypass, Denoiser, FRAME_SIZE, RingBuffer, WetDryMix};

/// Deterministic stand-in that halves and offsets every sample.
struct Halve;

impl Denoiser for Halve {
    fn process_frame(&mut self, output: &mut [f32; FRAME_SIZE], input: &[f32; FRAME_SIZE]) -> f32 {
        for (out, &sample) in output.iter_mut().zip(input.iter()) {
            *out = sample * 0.5 + 0.125;
        }
        0.0
    }
}

fn signal(len: usize) -> Vec<f32> {
    (0..len).map(|n| ((n * 37) % 101) as f32 / 101.0 - 0.5).collect()
}

fn drain(ring: &mut RingBuffer) -> Vec<f32> {
    let mut out = vec![0.0f32; ring.available_read()];
    ring.read(&mut out);
    out
}

fn aligned_output<D: Denoiser>(denoiser: D, mix: WetDryMix, writes: &[&[f32]]) -> Vec<f32> {
    let mut aligner = FrameAligner::new(denoiser, mix);
    let mut input = RingBuffer::new(2_048).unwrap();
    let mut output = RingBuffer::new(2_048).unwrap();
    for chunk in writes {
        input.write(chunk);
        aligner.run(&mut input, &mut output);
    }
    drain(&mut output)
}

#[test]
fn output_is_independent_of_write_granularity() {
    let samples = signal(2 * FRAME_SIZE);
    let mix = WetDryMix::new(0.5).unwrap();

    let whole = aligned_output(Halve, mix, &[&samples[..]]);
    let split = aligned_output(
        Halve,
        mix,
        &[&samples[..FRAME_SIZE], &samples[FRAME_SIZE..]],
    );
    let ragged = aligned_output(
        Halve,
        mix,
        &[&samples[..100], &samples[100..700], &samples[700..]],
    );

    assert_eq!(whole.len(), 2 * FRAME_SIZE);
    assert_eq!(whole, split);
    assert_eq!(whole, ragged);

    for (out, &dry) in whole.iter().zip(samples.iter()) {
        let wet = dry * 0.5 + 0.125;
        let expected = dry * 0.5 + wet * 0.5;
        assert_eq!(*out, expected);
    }
}

#[test]
fn identity_transform_reproduces_input() {
    let samples = signal(2 * FRAME_SIZE);
    let out = aligned_output(Bypass, WetDryMix::FULLY_WET, &[&samples[..]]);
    assert_eq!(out, samples);
}

#[test]
fn partial_frames_stay_queued() {
    let mut aligner = FrameAligner::new(Bypass, WetDryMix::FULLY_WET);
    let mut input = RingBuffer::new(1_024).unwrap();
    let mut output = RingBuffer::new(1_024).unwrap();

    input.write(&signal(FRAME_SIZE - 1));
    assert_eq!(aligner.run(&mut input, &mut output), 0);
    assert_eq!(input.available_read(), FRAME_SIZE - 1);
    assert!(output.is_empty());

    input.write(&[0.0]);
    assert_eq!(aligner.run(&mut input, &mut output), 1);
    assert!(input.is_empty());
    assert_eq!(output.available_read(), FRAME_SIZE);
}

#[test]
fn stops_when_output_lacks_room_for_a_frame() {
    let mut aligner = FrameAligner::new(Bypass, WetDryMix::FULLY_WET);
    let mut input = RingBuffer::new(2_048).unwrap();
    let mut output = RingBuffer::new(1_024).unwrap();

    input.write(&signal(4 * FRAME_SIZE));
    // 1024 holds two frames; the remaining 64 samples of space are not enough for a third.
    assert_eq!(aligner.run(&mut input, &mut output), 2);
    assert_eq!(input.available_read(), 2 * FRAME_SIZE);
    assert_eq!(output.available_write(), 1_024 - 2 * FRAME_SIZE);
}
