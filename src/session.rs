//! Process-lifetime chat state: conversation log, topic history, status.
//!
//! One `ChatSession` per REPL, owned and mutated only by the loop that
//! created it. Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::report::ReportMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the append-only conversation log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
}

/// Where the session currently stands. Every research cycle ends back
/// in a state that accepts the next topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    AwaitingInput,
    Researching,
    Complete,
    CompleteWithError,
    Error(String),
}

impl Status {
    pub fn label(&self) -> String {
        match self {
            Status::AwaitingInput => "awaiting input".to_string(),
            Status::Researching => "research in progress".to_string(),
            Status::Complete => "research complete".to_string(),
            Status::CompleteWithError => "research complete (with errors)".to_string(),
            Status::Error(kind) => format!("error: {kind}"),
        }
    }
}

#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ConversationEntry>,
    topics: Vec<String>,
    status: Status,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            topics: Vec::new(),
            status: Status::AwaitingInput,
        }
    }

    pub fn push_user(&mut self, content: &str) {
        self.messages.push(ConversationEntry {
            role: Role::User,
            content: content.to_string(),
            metadata: None,
        });
    }

    pub fn push_assistant(&mut self, content: &str, metadata: Option<ReportMetadata>) {
        self.messages.push(ConversationEntry {
            role: Role::Assistant,
            content: content.to_string(),
            metadata,
        });
    }

    pub fn record_topic(&mut self, topic: &str) {
        self.topics.push(topic.to_string());
    }

    pub fn messages(&self) -> &[ConversationEntry] {
        &self.messages
    }

    /// The last `n` topics, oldest first.
    pub fn recent_topics(&self, n: usize) -> &[String] {
        let start = self.topics.len().saturating_sub(n);
        &self.topics[start..]
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    /// Wipe the conversation and topic history. Idempotent; status
    /// returns to awaiting input.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.topics.clear();
        self.status = Status::AwaitingInput;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
