use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use super::{ResearchConfig, Workflow, WorkflowOutput};

/// How long the availability probe waits before declaring the engine down.
const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// A research engine reachable over HTTP (e.g. a local graph dev server).
pub struct RemoteWorkflow {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    topic: &'a str,
    config: &'a ResearchConfig,
}

impl RemoteWorkflow {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// One-shot startup probe. `false` means the process should run in
    /// simulation mode for its whole lifetime.
    pub async fn probe(base_url: &str) -> bool {
        let url = format!("{}/health", base_url.trim_end_matches('/'));
        let client = reqwest::Client::new();
        match client.get(&url).timeout(PROBE_TIMEOUT).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Workflow for RemoteWorkflow {
    async fn invoke(&self, topic: &str, config: &ResearchConfig) -> Result<WorkflowOutput> {
        let url = format!("{}/invoke", self.base_url);
        let body = InvokeRequest { topic, config };

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("research engine error ({}): {}", status, text);
        }

        let output: WorkflowOutput = resp.json().await?;

        if output.final_report.trim().is_empty() {
            bail!("research engine returned an empty report");
        }

        Ok(output)
    }
}
