use crate::config::SessionConfig;
use crate::denoise::FRAME_SIZE;
use crate::selftest;

// Once primed, the delay equals the largest `n * block mod FRAME_SIZE`.
fn expected_latency(block: usize) -> usize {
    (1..=FRAME_SIZE).map(|n| (n * block) % FRAME_SIZE).max().unwrap_or(0)
}

#[test]
fn selftest_measures_frame_alignment_latency() {
    let config = SessionConfig::default();
    let report = selftest::run(&config, 256).expect("selftest");

    assert_eq!(expected_latency(256), 448);
    assert!(
        (report.latency.offset_frames as isize - 448).abs() <= 2,
        "measured latency {} differs from expected 448",
        report.latency.offset_frames
    );
    assert!(
        report.latency.correlation > 0.95,
        "correlation too low: {}",
        report.latency.correlation
    );
    assert_eq!(report.diagnostics.input_overflows, 0);
    assert!(report.diagnostics.output_underflows > 0);
}

#[test]
fn frame_sized_blocks_add_no_latency() {
    let config = SessionConfig::default();
    let report = selftest::run(&config, FRAME_SIZE).expect("selftest");

    assert_eq!(report.latency.offset_frames, 0);
    assert_eq!(report.diagnostics.output_underflows, 0);
}

#[test]
fn selftest_rejects_oversized_blocks() {
    let config = SessionConfig {
        max_block_frames: 512,
        ..SessionConfig::default()
    };
    assert!(selftest::run(&config, 1_024).is_err());
    assert!(selftest::run(&config, 0).is_err());
}
