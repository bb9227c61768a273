//! Startup banner and session summary display.

use std::time::Duration;

use crate::consts::{AUTHOR, HOMEPAGE, REPO, format_number};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub engine_mode: &'a str,
    pub engine_url: &'a str,
    pub writer_model: &'a str,
    pub planner_model: &'a str,
    pub search_depth: u32,
    pub max_sections: u32,
    pub max_wait: Duration,
    pub poll_interval: Duration,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║             D E L V E R               ║
   ║      deep research, one topic deep    ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   engine    {} ({})
   writer    {}
   planner   {}
   depth     {} (sections: up to {})
   waits     {}s max, polling every {}s
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.engine_mode,
        info.engine_url,
        info.writer_model,
        info.planner_model,
        info.search_depth,
        info.max_sections,
        info.max_wait.as_secs(),
        info.poll_interval.as_secs(),
    );
}

/// Print the session summary (reports produced + farewell).
pub fn print_session_summary(reports: u64, words: u64) {
    if reports > 0 {
        println!(
            "session: {} report(s), {} words",
            format_number(reports),
            format_number(words),
        );
    }
    println!("goodbye.");
}
