//! Typed errors at the bridge boundary.
//!
//! Workflow execution failures are deliberately NOT here: the bridge
//! converts them into an errored [`ResearchResult`](crate::bridge::ResearchResult)
//! so the chat loop never has to unwind past a running session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The topic was empty or whitespace. No submission happened.
    #[error("research topic is empty")]
    EmptyTopic,

    /// `result()` was called before the background execution finished.
    #[error("research is still running; result is not ready")]
    NotReady,

    /// The chat loop gave up waiting. The background execution keeps running.
    #[error("timed out after {0} seconds waiting for the report")]
    Timeout(u64),
}
