use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

/// Listed for `/help` output; actual rendering happens in the registry,
/// which is the only place that can see every command.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _args: &[&str], _info: &SessionInfo<'_>) -> CommandResult {
        CommandResult::Handled
    }
}
