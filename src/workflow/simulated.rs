//! Degraded mode for when no research engine is reachable.
//!
//! Chosen once at startup and kept for the life of the process; the
//! chat loop behaves identically either way.

use anyhow::Result;
use async_trait::async_trait;

use super::{ResearchConfig, Section, Workflow, WorkflowOutput};

/// Names of the canned sections every simulated report carries.
const SECTION_NAMES: &[&str] = &[
    "Executive Summary",
    "Key Findings",
    "Detailed Analysis",
    "Conclusions and Recommendations",
];

/// Synthesizes a clearly-labeled placeholder report without touching
/// the network. Never fails.
pub struct SimulatedWorkflow;

#[async_trait]
impl Workflow for SimulatedWorkflow {
    async fn invoke(&self, topic: &str, config: &ResearchConfig) -> Result<WorkflowOutput> {
        Ok(WorkflowOutput {
            final_report: simulated_report(topic, config),
            sections: Some(
                SECTION_NAMES
                    .iter()
                    .map(|name| Section {
                        name: name.to_string(),
                    })
                    .collect(),
            ),
            source_str: None,
        })
    }
}

fn simulated_report(topic: &str, config: &ResearchConfig) -> String {
    format!(
        r#"# {topic} — deep research report (simulation mode)

## Executive Summary
A simulated analysis of "{topic}".

**Note**: this report was generated in simulation mode because no research
engine was reachable. Nothing below is backed by real research.

## Key Findings
1. **Dominant trend**: the area is developing quickly
2. **Key challenges**: several technical and market obstacles remain
3. **Opportunities**: meaningful openings were identified

## Detailed Analysis
### Technology
- Innovation continues at pace
- Supporting infrastructure is maturing
- Standardization efforts are accelerating

### Market
- Adoption is gradually broadening
- The regulatory picture is clarifying
- Investment activity stays healthy

## Conclusions and Recommendations
Based on the above we suggest:
1. Track technical developments
2. Watch for regulatory changes
3. Time market entry carefully

*Simulated with {writer} / {planner}, depth {depth}. For demonstration only.*"#,
        topic = topic,
        writer = config.writer_model,
        planner = config.planner_model,
        depth = config.max_search_depth,
    )
}
