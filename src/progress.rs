//! A terminal progress display for long research runs.
//!
//! A background task repaints a bar on stderr while the chat loop feeds
//! it fractions through a watch channel. The fraction is a wall-clock
//! estimate, not real pipeline progress, so it is clamped below 1.0
//! until the run actually completes.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Repaint interval.
const INTERVAL: Duration = Duration::from_millis(200);

/// Bar width in characters.
const WIDTH: usize = 24;

/// Progress ceiling before completion.
const CEILING: f64 = 0.9;

/// Estimate completion from elapsed time against an assumed nominal
/// duration. Monotone in `elapsed` and clamped to [`CEILING`].
pub fn estimate(elapsed: Duration, nominal: Duration) -> f64 {
    if nominal.is_zero() {
        return CEILING;
    }
    (elapsed.as_secs_f64() / nominal.as_secs_f64()).min(CEILING)
}

/// A live progress bar. Start it, feed it via [`ProgressBar::update`],
/// then [`ProgressBar::finish`] or [`ProgressBar::abandon`].
pub struct ProgressBar {
    handle: JoinHandle<()>,
    state: watch::Sender<(f64, u64)>,
}

impl ProgressBar {
    /// Spawn the repaint task with the given label (e.g. `"researching"`).
    pub fn start(label: &str) -> Self {
        let (state_tx, mut state_rx) = watch::channel((0.0_f64, 0_u64));
        let label = label.to_string();

        let handle = tokio::spawn(async move {
            loop {
                let (fraction, elapsed) = *state_rx.borrow_and_update();
                paint(&label, fraction, elapsed);

                tokio::select! {
                    _ = tokio::time::sleep(INTERVAL) => {}
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            // Clear the bar line
            eprint!("\x1b[2K\r");
            let _ = std::io::stderr().flush();
        });

        Self {
            handle,
            state: state_tx,
        }
    }

    /// Publish a new fraction and elapsed-seconds reading.
    pub fn update(&self, fraction: f64, elapsed: Duration) {
        let _ = self.state.send((fraction.clamp(0.0, 1.0), elapsed.as_secs()));
    }

    /// Jump to 100% briefly, then clear the line and stop.
    pub async fn finish(self) {
        let elapsed = self.state.borrow().1;
        let _ = self.state.send((1.0, elapsed));
        // Give the repaint task one frame to show the full bar.
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.stop().await;
    }

    /// Clear the line and stop without completing the bar.
    pub async fn abandon(self) {
        self.stop().await;
    }

    async fn stop(self) {
        drop(self.state);
        let _ = self.handle.await;
    }
}

fn paint(label: &str, fraction: f64, elapsed: u64) {
    let filled = (fraction * WIDTH as f64).round() as usize;
    let filled = filled.min(WIDTH);
    let bar: String = "█".repeat(filled) + &"░".repeat(WIDTH - filled);
    eprint!(
        "\x1b[2K\r{label} [{bar}] {:3.0}% ({elapsed}s)",
        fraction * 100.0
    );
    let _ = std::io::stderr().flush();
}
