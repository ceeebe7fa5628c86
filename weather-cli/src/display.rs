use std::{
    io::{IsTerminal, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::sync::watch;
use weather_core::{ViewState, render::LOADING_TEXT};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Loading indicator drawn on stderr while the screen is `Loading`.
#[derive(Debug, Clone, Default)]
pub struct ProgressLine {
    paused: Arc<AtomicBool>,
}

/// Keeps the indicator hidden until dropped.
pub struct PauseGuard {
    paused: Arc<AtomicBool>,
}

impl Drop for PauseGuard {
    fn drop(&mut self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}

impl ProgressLine {
    /// Hide the indicator, e.g. while an interactive prompt owns the terminal.
    pub fn pause(&self) -> PauseGuard {
        self.paused.store(true, Ordering::SeqCst);
        clear_line();
        PauseGuard { paused: Arc::clone(&self.paused) }
    }

    /// Animate until the observed state leaves `Loading`, then erase the line.
    pub async fn run(&self, mut state: watch::Receiver<ViewState>) {
        let draw = std::io::stderr().is_terminal();
        let mut ticker = tokio::time::interval(FRAME_INTERVAL);
        let mut frame = 0usize;

        loop {
            if state.borrow_and_update().is_terminal() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    if draw && !self.paused.load(Ordering::SeqCst) {
                        let mut err = std::io::stderr().lock();
                        let _ = write!(err, "\r{} {}", FRAMES[frame % FRAMES.len()], LOADING_TEXT);
                        let _ = err.flush();
                        frame = frame.wrapping_add(1);
                    }
                }
                changed = state.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        if draw {
            clear_line();
        }
    }
}

fn clear_line() {
    let mut err = std::io::stderr().lock();
    let _ = write!(err, "\r\x1b[2K");
    let _ = err.flush();
}
