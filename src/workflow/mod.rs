pub mod mock;
pub mod remote;
pub mod simulated;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::{
    DEFAULT_PLANNER_MODEL, DEFAULT_SEARCH_DEPTH, DEFAULT_SECTIONS, DEFAULT_WRITER_MODEL,
};

/// Configuration handed to the engine with every invocation.
/// Immutable once the request is submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    pub thread_id: String,
    pub max_search_depth: u32,
    pub max_sections: u32,
    pub writer_model: String,
    pub planner_model: String,
    pub writer_provider: String,
    pub planner_provider: String,
}

impl ResearchConfig {
    /// Build a config for one submission. Each call mints a fresh
    /// `thread_id` so the engine never conflates two runs.
    pub fn new(
        writer_model: &str,
        planner_model: &str,
        search_depth: u32,
        max_sections: u32,
    ) -> Self {
        Self {
            thread_id: fresh_thread_id(),
            max_search_depth: search_depth,
            max_sections,
            writer_model: writer_model.to_string(),
            planner_model: planner_model.to_string(),
            writer_provider: "openai".to_string(),
            planner_provider: "anthropic".to_string(),
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_WRITER_MODEL,
            DEFAULT_PLANNER_MODEL,
            DEFAULT_SEARCH_DEPTH,
            DEFAULT_SECTIONS,
        )
    }
}

/// Timestamp plus a random suffix. The timestamp alone collides when two
/// submissions land in the same second.
fn fresh_thread_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("delver-{secs}-{:08x}", rand::random::<u32>())
}

/// A named report section, as the engine reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
}

/// What the engine hands back for one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowOutput {
    pub final_report: String,
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
    /// Raw dump of the sources the engine consulted, when it used any.
    #[serde(default)]
    pub source_str: Option<String>,
}

/// The external research engine. A multi-step graph of planning, search,
/// and writing — all of it behind this one call.
#[async_trait]
pub trait Workflow: Send + Sync {
    async fn invoke(&self, topic: &str, config: &ResearchConfig) -> Result<WorkflowOutput>;
}
