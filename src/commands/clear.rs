use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};

pub struct ClearCommand;

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &str {
        "/clear"
    }

    fn aliases(&self) -> &[&str] {
        &["/new"]
    }

    fn description(&self) -> &str {
        "clear the conversation and research history"
    }

    async fn execute(&self, _args: &[&str], _info: &SessionInfo<'_>) -> CommandResult {
        println!("  ✓ history cleared");
        CommandResult::StateChanged(StateChange::ClearHistory)
    }
}
