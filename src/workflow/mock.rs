use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::watch;

use super::{ResearchConfig, Workflow, WorkflowOutput};

/// One scripted engine response.
#[derive(Debug, Clone)]
pub enum ScriptedCall {
    /// Return this report.
    Report(WorkflowOutput),
    /// Fail with this message.
    Fail(String),
    /// Block until [`MockWorkflow::release`] is called, then return
    /// a placeholder report. Used for timeout and no-cancellation tests.
    Hang,
}

/// A scripted workflow for tests. Returns pre-defined responses in order.
pub struct MockWorkflow {
    calls: Vec<ScriptedCall>,
    index: AtomicUsize,
    completed: AtomicUsize,
    gate_tx: watch::Sender<bool>,
}

impl MockWorkflow {
    pub fn new(calls: Vec<ScriptedCall>) -> Self {
        let (gate_tx, _) = watch::channel(false);
        Self {
            calls,
            index: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            gate_tx,
        }
    }

    /// Shorthand for a single successful report.
    pub fn single_report(final_report: &str) -> Self {
        Self::new(vec![ScriptedCall::Report(WorkflowOutput {
            final_report: final_report.to_string(),
            sections: None,
            source_str: None,
        })])
    }

    /// How many invocations have started.
    pub fn call_count(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// How many invocations have run to completion (success or failure).
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Unblock every hanging invocation, including ones that have not
    /// subscribed to the gate yet.
    pub fn release(&self) {
        self.gate_tx.send_replace(true);
    }
}

#[async_trait]
impl Workflow for MockWorkflow {
    async fn invoke(&self, topic: &str, _config: &ResearchConfig) -> Result<WorkflowOutput> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        let call = self.calls.get(i).cloned().ok_or_else(|| {
            anyhow::anyhow!("MockWorkflow: no more scripted calls (called {} times)", i + 1)
        })?;

        let result = match call {
            ScriptedCall::Report(output) => Ok(output),
            ScriptedCall::Fail(message) => Err(anyhow::anyhow!(message)),
            ScriptedCall::Hang => {
                let mut gate_rx = self.gate_tx.subscribe();
                while !*gate_rx.borrow() {
                    gate_rx.changed().await?;
                }
                Ok(WorkflowOutput {
                    final_report: format!("# {topic}\n\nreleased after hang"),
                    sections: None,
                    source_str: None,
                })
            }
        };

        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }
}
