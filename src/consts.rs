//! Project-wide constants.

use std::time::Duration;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default writer model when none is specified.
pub const DEFAULT_WRITER_MODEL: &str = "gpt-4";

/// Default planner model when none is specified.
pub const DEFAULT_PLANNER_MODEL: &str = "claude-3-sonnet";

/// Models the writer selector offers.
pub const WRITER_MODELS: &[&str] = &[
    "gpt-4",
    "gpt-3.5-turbo",
    "claude-3-sonnet",
    "claude-3-haiku",
];

/// Models the planner selector offers.
pub const PLANNER_MODELS: &[&str] = &["gpt-4", "claude-3-sonnet", "claude-3-haiku"];

/// Search depth bounds and default.
pub const MIN_SEARCH_DEPTH: u32 = 1;
pub const MAX_SEARCH_DEPTH: u32 = 5;
pub const DEFAULT_SEARCH_DEPTH: u32 = 2;

/// Report section bounds and default.
pub const MIN_SECTIONS: u32 = 3;
pub const MAX_SECTIONS: u32 = 10;
pub const DEFAULT_SECTIONS: u32 = 5;

/// How long the chat loop waits for a report before giving up.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);

/// How often the chat loop checks the task handle.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Assumed nominal run length, used only for the progress estimate.
pub const DEFAULT_NOMINAL_DURATION: Duration = Duration::from_secs(60);

/// Default research engine endpoint (a local graph dev server).
pub const DEFAULT_ENGINE_URL: &str = "http://localhost:8123";

/// How many recent topics `/history` shows.
pub const HISTORY_DISPLAY_LIMIT: usize = 5;

/// Format a number with comma separators (e.g. 1,234,567).
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(c);
    }
    result
}
