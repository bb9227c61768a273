use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

/// Longest topic prefix the list shows per line.
const TOPIC_PREVIEW: usize = 30;

pub struct HistoryCommand;

#[async_trait]
impl Command for HistoryCommand {
    fn name(&self) -> &str {
        "/history"
    }

    fn description(&self) -> &str {
        "list recent research topics"
    }

    async fn execute(&self, _args: &[&str], info: &SessionInfo<'_>) -> CommandResult {
        if info.topics.is_empty() {
            println!("  no research history yet");
            return CommandResult::Handled;
        }
        for (i, topic) in info.topics.iter().enumerate() {
            println!("  {}. {}", i + 1, preview(topic));
        }
        CommandResult::Handled
    }
}

fn preview(topic: &str) -> String {
    if topic.chars().count() <= TOPIC_PREVIEW {
        topic.to_string()
    } else {
        let cut: String = topic.chars().take(TOPIC_PREVIEW).collect();
        format!("{cut}...")
    }
}
