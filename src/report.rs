//! Turns a terminal [`ResearchResult`] into display text plus metadata.
//! Pure and total: given any result this never fails and never retries.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::bridge::ResearchResult;

/// Marker that opens a section heading in engine reports.
const HEADING_MARKER: &str = "##";

/// What the detail view shows next to a finished report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub timestamp: String,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sources_used: Option<bool>,
    /// Set only on synthetic entries, e.g. `"timeout"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReportMetadata {
    /// Metadata for the synthetic entry logged when the chat loop stops
    /// waiting while the run keeps going (`"timeout"`, `"interrupted"`).
    pub fn abandoned(topic: &str, kind: &str) -> Self {
        Self {
            timestamp: now(),
            topic: topic.to_string(),
            error: Some(kind.to_string()),
            ..Self::default()
        }
    }

    /// Metadata for the synthetic entry logged when the chat loop gives
    /// up waiting.
    pub fn timeout(topic: &str) -> Self {
        Self::abandoned(topic, "timeout")
    }

    /// Multi-line block for the terminal detail view.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("  topic      {}\n", self.topic));
        out.push_str(&format!("  time       {}\n", self.timestamp));
        if let Some(count) = self.sections_count {
            out.push_str(&format!("  sections   {count}\n"));
        }
        if let Some(count) = self.word_count {
            out.push_str(&format!("  words      {count}\n"));
        }
        if let Some(names) = &self.sections {
            for name in names {
                out.push_str(&format!("             - {name}\n"));
            }
        }
        if self.sources_used == Some(true) {
            out.push_str("  sources    external sources were used\n");
        }
        if let Some(kind) = &self.error {
            out.push_str(&format!("  error      {kind}\n"));
        }
        out
    }
}

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Map a result to `(display text, metadata)`.
///
/// Errored results render as a prefixed error line with no metadata.
/// Successful reports pass through verbatim; the metadata counts `##`
/// occurrences as sections and whitespace tokens as words.
pub fn format_result(
    result: &ResearchResult,
    topic: &str,
) -> (String, Option<ReportMetadata>) {
    if let Some(message) = &result.error_message {
        return (format!("✗ research failed: {message}"), None);
    }

    let report = &result.final_report;
    let metadata = ReportMetadata {
        timestamp: now(),
        topic: topic.to_string(),
        sections_count: Some(report.matches(HEADING_MARKER).count()),
        word_count: Some(report.split_whitespace().count()),
        sections: result.sections.clone(),
        sources_used: result.sources_used.then_some(true),
        error: None,
    };

    (report.clone(), Some(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_result(report: &str) -> ResearchResult {
        ResearchResult {
            final_report: report.to_string(),
            error_message: None,
            sections: None,
            sources_used: false,
        }
    }

    #[test]
    fn error_result_formats_as_prefixed_line_without_metadata() {
        let result = ResearchResult {
            final_report: "fallback".to_string(),
            error_message: Some("engine exploded".to_string()),
            sections: None,
            sources_used: false,
        };
        let (text, metadata) = format_result(&result, "web3");
        assert!(text.contains("engine exploded"));
        assert!(text.starts_with('✗'));
        assert!(metadata.is_none());
    }

    #[test]
    fn report_text_passes_through_verbatim() {
        let (text, _) = format_result(&ok_result("# Title\n\nbody"), "t");
        assert_eq!(text, "# Title\n\nbody");
    }

    #[test]
    fn three_heading_markers_count_as_three_sections() {
        let report = "# T\n\n## One\na\n\n## Two\nb\n\n## Three\nc";
        let (_, metadata) = format_result(&ok_result(report), "t");
        assert_eq!(metadata.unwrap().sections_count, Some(3));
    }

    #[test]
    fn word_count_is_whitespace_tokens() {
        let (_, metadata) = format_result(&ok_result("a b c"), "t");
        assert_eq!(metadata.unwrap().word_count, Some(3));
    }

    #[test]
    fn section_names_and_sources_flow_into_metadata() {
        let result = ResearchResult {
            final_report: "## A\n## B".to_string(),
            error_message: None,
            sections: Some(vec!["A".to_string(), "B".to_string()]),
            sources_used: true,
        };
        let (_, metadata) = format_result(&result, "t");
        let metadata = metadata.unwrap();
        assert_eq!(metadata.sections.as_deref().unwrap().len(), 2);
        assert_eq!(metadata.sources_used, Some(true));
        assert_eq!(metadata.topic, "t");
        assert!(!metadata.timestamp.is_empty());
    }

    #[test]
    fn timeout_metadata_is_error_classified() {
        let metadata = ReportMetadata::timeout("slow topic");
        assert_eq!(metadata.error.as_deref(), Some("timeout"));
        assert_eq!(metadata.topic, "slow topic");
        assert!(metadata.sections_count.is_none());

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["error"], "timeout");
        assert!(json.get("word_count").is_none());
    }

    #[test]
    fn render_lists_sections() {
        let result = ResearchResult {
            final_report: "## A".to_string(),
            error_message: None,
            sections: Some(vec!["A".to_string()]),
            sources_used: true,
        };
        let (_, metadata) = format_result(&result, "t");
        let rendered = metadata.unwrap().render();
        assert!(rendered.contains("- A"));
        assert!(rendered.contains("external sources"));
    }
}
