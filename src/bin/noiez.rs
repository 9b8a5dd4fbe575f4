use std::env;
use std::process;

use noiez::config::{self, Command, SessionConfig};
use noiez::control::console::{self, Quit};
use noiez::control::session::Session;
use noiez::{Diagnostics, NoiezError, RnnoiseDenoiser, selftest};

fn print_diagnostics(diagnostics: &Diagnostics) {
    println!("Final diagnostics:");
    println!("  Input overflows   : {}", diagnostics.input_overflows);
    println!("  Output underflows : {}", diagnostics.output_underflows);
    println!("  Samples dropped   : {}", diagnostics.samples_dropped);
    println!("  Samples zero-fill : {}", diagnostics.samples_zero_filled);
    println!("  Frames denoised   : {}", diagnostics.frames_denoised);
    println!("  Callbacks         : {}", diagnostics.callbacks);
}

fn run_live(config: &SessionConfig) -> Result<(), NoiezError> {
    let session = Session::start(config, RnnoiseDenoiser::new())?;
    println!(
        "Noise suppression is active (wet mix: {:.2}). Press Enter to quit...",
        config.wet_mix.wet()
    );

    let quit = console::wait_for_quit(session.errors());
    let diagnostics = session.stop();
    match quit? {
        Quit::Requested => println!("Stopped cleanly."),
        Quit::StreamError(err) => eprintln!("noiez: stream error: {err}"),
    }
    print_diagnostics(&diagnostics);
    Ok(())
}

fn run_selftest(config: &SessionConfig, block_frames: usize) -> Result<(), NoiezError> {
    let report = selftest::run(config, block_frames)?;
    println!("Block size  : {} samples", report.block_frames);
    println!(
        "Latency     : {} samples ({:.2} ms)",
        report.latency.offset_frames,
        report.latency_ms()
    );
    println!("Correlation : {:.3}", report.latency.correlation);
    print_diagnostics(&report.diagnostics);
    Ok(())
}

fn main() {
    noiez::init_tracing();

    let command = match config::parse_args(env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("noiez: {err}");
            eprintln!("{}", config::USAGE);
            process::exit(1);
        }
    };

    let result = match command {
        Command::Help => {
            println!("{}", config::USAGE);
            return;
        }
        Command::Run(config) => run_live(&config),
        Command::Selftest {
            config,
            block_frames,
        } => run_selftest(&config, block_frames),
    };

    if let Err(err) = result {
        eprintln!("noiez: {err}");
        process::exit(1);
    }
}
