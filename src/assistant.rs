//! The chat loop's research cycle. Wires together a [`Bridge`], a
//! [`ChatSession`], and a polling policy.
//!
//! One cycle: log the topic, submit, poll the handle with a bounded
//! wait budget while the progress bar ticks, then render either the
//! report or a timeout notice. Every exit path leaves the session
//! ready for the next topic. A run that outlives the wait budget is
//! abandoned, not cancelled.

use std::time::{Duration, Instant};

use anyhow::Result;

use crate::bridge::{Bridge, TaskHandle};
use crate::consts::{DEFAULT_MAX_WAIT, DEFAULT_NOMINAL_DURATION, DEFAULT_POLL_INTERVAL};
use crate::error::BridgeError;
use crate::progress::{ProgressBar, estimate};
use crate::report::{ReportMetadata, format_result};
use crate::session::{ChatSession, Status};
use crate::workflow::ResearchConfig;

/// How long the chat loop waits, how often it checks, and what run
/// length the progress estimate assumes.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub max_wait: Duration,
    pub interval: Duration,
    pub nominal_duration: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            interval: DEFAULT_POLL_INTERVAL,
            nominal_duration: DEFAULT_NOMINAL_DURATION,
        }
    }
}

/// Whether a real engine is wired up. Decided once at startup and kept
/// for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Live,
    Simulation,
}

impl EngineMode {
    pub fn label(&self) -> &'static str {
        match self {
            EngineMode::Live => "live",
            EngineMode::Simulation => "simulation",
        }
    }
}

/// Tunable research parameters, adjustable at runtime via commands.
#[derive(Debug, Clone)]
pub struct Settings {
    pub writer_model: String,
    pub planner_model: String,
    pub search_depth: u32,
    pub max_sections: u32,
}

impl Settings {
    pub fn to_config(&self) -> ResearchConfig {
        ResearchConfig::new(
            &self.writer_model,
            &self.planner_model,
            self.search_depth,
            self.max_sections,
        )
    }
}

/// The research assistant a REPL talks to.
pub struct Assistant {
    bridge: Bridge,
    policy: PollPolicy,
    mode: EngineMode,
    pub settings: Settings,
    session: ChatSession,
    reports_produced: u64,
    words_produced: u64,
}

impl Assistant {
    pub fn new(bridge: Bridge, mode: EngineMode, settings: Settings, policy: PollPolicy) -> Self {
        Self {
            bridge,
            policy,
            mode,
            settings,
            session: ChatSession::new(),
            reports_produced: 0,
            words_produced: 0,
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// (reports rendered, words across them) for the exit summary.
    pub fn totals(&self) -> (u64, u64) {
        (self.reports_produced, self.words_produced)
    }

    /// Run one research cycle for `topic`. An empty topic is ignored
    /// silently; nothing is submitted or logged.
    pub async fn research(&mut self, topic: &str) -> Result<()> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Ok(());
        }

        self.session.push_user(topic);
        self.session.record_topic(topic);
        self.session.set_status(Status::Researching);

        let handle = match self.bridge.submit(topic, self.settings.to_config()) {
            Ok(handle) => handle,
            Err(e) => {
                // Only an empty topic fails here, and that was guarded
                // above; keep the session usable regardless.
                self.session.set_status(Status::Error(e.to_string()));
                return Ok(());
            }
        };

        let bar = ProgressBar::start("researching");
        let completed =
            poll_until_done(&handle, &self.policy, |fraction, elapsed| {
                bar.update(fraction, elapsed);
            })
            .await;

        if !completed {
            bar.abandon().await;
            let notice = timeout_notice(topic, self.policy.max_wait);
            println!("\n{notice}");
            self.session
                .push_assistant(&notice, Some(ReportMetadata::timeout(topic)));
            self.session.set_status(Status::Error("timeout".to_string()));
            return Ok(());
        }

        bar.finish().await;

        let result = handle.result()?;
        let (text, metadata) = format_result(&result, topic);

        println!("\n{text}");
        if let Some(metadata) = &metadata {
            println!("\n--- research details ---");
            print!("{}", metadata.render());
            self.reports_produced += 1;
            self.words_produced += metadata.word_count.unwrap_or(0) as u64;
        }

        let errored = result.is_error();
        self.session.push_assistant(&text, metadata);
        self.session.set_status(if errored {
            Status::CompleteWithError
        } else {
            Status::Complete
        });

        Ok(())
    }

    /// Bookkeeping for a wait abandoned from outside the cycle (e.g.
    /// Ctrl+C): same contract as the timeout path — a synthetic
    /// error-classified entry, and the background run keeps going.
    /// Does nothing unless a research cycle was actually in flight.
    pub fn abandon_wait(&mut self, topic: &str) {
        if *self.session.status() != Status::Researching {
            return;
        }
        let topic = topic.trim();
        let notice = format!(
            "research interrupted: \"{topic}\"\n\
             The run was left to finish in the background."
        );
        self.session
            .push_assistant(&notice, Some(ReportMetadata::abandoned(topic, "interrupted")));
        self.session
            .set_status(Status::Error("interrupted".to_string()));
    }
}

/// Poll `handle` until completion or the deadline, calling `tick` with
/// the progress estimate before each bounded wait. The bounded wait
/// doubles as the poll sleep; completion wakes it early. Returns
/// whether the run completed within budget.
pub async fn poll_until_done<F>(handle: &TaskHandle, policy: &PollPolicy, mut tick: F) -> bool
where
    F: FnMut(f64, Duration),
{
    let start = Instant::now();
    loop {
        if handle.is_done() {
            return true;
        }
        let elapsed = start.elapsed();
        if elapsed >= policy.max_wait {
            return false;
        }
        tick(estimate(elapsed, policy.nominal_duration), elapsed);
        if handle.wait_done(policy.interval).await {
            return true;
        }
    }
}

fn timeout_notice(topic: &str, max_wait: Duration) -> String {
    format!(
        "⏳ {}: \"{topic}\"\n\
         The run was left to finish in the background; try again later \
         or raise --max-wait.",
        BridgeError::Timeout(max_wait.as_secs())
    )
}
