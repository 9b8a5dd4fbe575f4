use std::io;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, bounded, select};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::debug;

use crate::NoiezError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Why the console stopped waiting.
#[derive(Debug)]
pub enum Quit {
    /// The operator pressed a quit key.
    Requested,
    /// A stream reported a runtime error.
    StreamError(cpal::StreamError),
}

/// Block until the operator presses Enter, `q`, Esc or Ctrl-C, or a stream error arrives.
///
/// Falls back to waiting for a line on stdin when the terminal cannot enter raw mode.
pub fn wait_for_quit(errors: &Receiver<cpal::StreamError>) -> Result<Quit, NoiezError> {
    match RawMode::enable() {
        Ok(_raw) => loop {
            if let Ok(err) = errors.try_recv() {
                return Ok(Quit::StreamError(err));
            }
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if is_quit_key(&key) {
                        return Ok(Quit::Requested);
                    }
                }
            }
        },
        Err(err) => {
            debug!(%err, "raw mode unavailable, waiting for a line on stdin");
            Ok(wait_for_line(errors))
        }
    }
}

fn wait_for_line(errors: &Receiver<cpal::StreamError>) -> Quit {
    let (line_tx, line_rx) = bounded(1);
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        let _ = line_tx.send(());
    });

    select! {
        recv(line_rx) -> _ => Quit::Requested,
        recv(errors) -> err => match err {
            Ok(err) => Quit::StreamError(err),
            Err(_) => Quit::Requested,
        },
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}
