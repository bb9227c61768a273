//! The request bridge: hands a topic to the research engine on a
//! background worker and gives the chat loop a pollable handle.
//!
//! The handle is single-owner and its result slot is single-writer, so
//! an execution the UI abandoned can finish whenever it likes without
//! touching anything the rest of the session can see. There is no
//! cancellation: a submitted run always goes to completion or failure.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::{Semaphore, watch};

use crate::error::BridgeError;
use crate::workflow::{ResearchConfig, Workflow, WorkflowOutput};

/// How many engine runs may execute concurrently. Abandoned runs hold a
/// slot until they finish, so a stream of timeouts queues rather than
/// piling up unbounded work.
pub const WORKER_POOL_SIZE: usize = 2;

/// One submission: topic plus the configuration it was submitted with.
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct ResearchRequest {
    pub topic: String,
    pub config: ResearchConfig,
}

/// Terminal value of one background execution. Produced exactly once;
/// engine failures arrive here as `error_message`, never as a panic or
/// an error the chat loop has to catch.
#[derive(Debug, Clone)]
pub struct ResearchResult {
    pub final_report: String,
    pub error_message: Option<String>,
    pub sections: Option<Vec<String>>,
    pub sources_used: bool,
}

impl ResearchResult {
    fn from_output(output: WorkflowOutput) -> Self {
        let sources_used = output.source_str.is_some();
        Self {
            final_report: output.final_report,
            error_message: None,
            sections: output
                .sections
                .map(|sections| sections.into_iter().map(|s| s.name).collect()),
            sources_used,
        }
    }

    fn failed(topic: &str, message: &str) -> Self {
        Self {
            final_report: format!(
                "An error occurred while researching \"{topic}\": {message}"
            ),
            error_message: Some(message.to_string()),
            sections: None,
            sources_used: false,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_message.is_some()
    }
}

/// A pollable reference to one background execution. Owned by the chat
/// loop that submitted it; never shared across requests.
#[derive(Debug)]
pub struct TaskHandle {
    slot: Arc<OnceLock<ResearchResult>>,
    done: watch::Receiver<bool>,
}

impl TaskHandle {
    /// Non-blocking completion check. Safe to call at any time,
    /// including immediately after `submit`.
    pub fn is_done(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The terminal value, or [`BridgeError::NotReady`] if the
    /// execution is still running. Never a partial value.
    pub fn result(&self) -> Result<ResearchResult, BridgeError> {
        self.slot.get().cloned().ok_or(BridgeError::NotReady)
    }

    /// Wait up to `timeout` for completion. Returns whether the result
    /// is now available; the execution is not cancelled either way.
    pub async fn wait_done(&self, timeout: Duration) -> bool {
        if self.is_done() {
            return true;
        }
        let mut done = self.done.clone();
        let notified = tokio::time::timeout(timeout, async move {
            while !*done.borrow_and_update() {
                if done.changed().await.is_err() {
                    break;
                }
            }
        })
        .await;
        notified.is_ok() && self.is_done()
    }
}

/// Submits topics to the engine without ever blocking the caller.
pub struct Bridge {
    workflow: Arc<dyn Workflow>,
    pool: Arc<Semaphore>,
}

impl Bridge {
    pub fn new(workflow: Arc<dyn Workflow>) -> Self {
        Self {
            workflow,
            pool: Arc::new(Semaphore::new(WORKER_POOL_SIZE)),
        }
    }

    /// Validate the topic, start a background execution, and return a
    /// handle immediately. The only error here is an empty topic; once
    /// a run is in flight, its failures surface through the result.
    pub fn submit(
        &self,
        topic: &str,
        config: ResearchConfig,
    ) -> Result<TaskHandle, BridgeError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(BridgeError::EmptyTopic);
        }

        let request = ResearchRequest {
            topic: topic.to_string(),
            config,
        };

        let slot = Arc::new(OnceLock::new());
        let (done_tx, done_rx) = watch::channel(false);
        let workflow = Arc::clone(&self.workflow);
        let pool = Arc::clone(&self.pool);
        let worker_slot = Arc::clone(&slot);

        tokio::spawn(async move {
            let result = match pool.acquire_owned().await {
                Ok(_permit) => match workflow.invoke(&request.topic, &request.config).await {
                    Ok(output) => ResearchResult::from_output(output),
                    Err(e) => ResearchResult::failed(&request.topic, &e.to_string()),
                },
                // The pool lives as long as the bridge; a closed
                // semaphore still must not leave the handle hanging.
                Err(e) => ResearchResult::failed(&request.topic, &e.to_string()),
            };
            let _ = worker_slot.set(result);
            let _ = done_tx.send(true);
        });

        Ok(TaskHandle {
            slot,
            done: done_rx,
        })
    }
}
