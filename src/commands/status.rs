use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct StatusCommand;

#[async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &str {
        "/status"
    }

    fn description(&self) -> &str {
        "show session status and engine mode"
    }

    async fn execute(&self, _args: &[&str], info: &SessionInfo<'_>) -> CommandResult {
        println!("  status    {}", info.status);
        println!("  engine    {}", info.engine_mode);
        println!("  writer    {}", info.writer_model);
        println!("  planner   {}", info.planner_model);
        println!(
            "  depth     {} (sections: up to {})",
            info.search_depth, info.max_sections
        );
        println!(
            "  session   {} message(s), {} report(s)",
            info.message_count, info.reports
        );
        CommandResult::Handled
    }
}
