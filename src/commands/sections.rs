use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};
use crate::consts::{MAX_SECTIONS, MIN_SECTIONS};

pub struct SectionsCommand;

#[async_trait]
impl Command for SectionsCommand {
    fn name(&self) -> &str {
        "/sections"
    }

    fn description(&self) -> &str {
        "show or set the report section cap: /sections [3-10]"
    }

    async fn execute(&self, args: &[&str], info: &SessionInfo<'_>) -> CommandResult {
        match args {
            [] => {
                println!(
                    "  max sections: {} (range {}-{})",
                    info.max_sections, MIN_SECTIONS, MAX_SECTIONS
                );
                CommandResult::Handled
            }
            [value] => match value.parse::<u32>() {
                Ok(n) if (MIN_SECTIONS..=MAX_SECTIONS).contains(&n) => {
                    println!("  ✓ max sections set to {n}");
                    CommandResult::StateChanged(StateChange::MaxSections(n))
                }
                _ => {
                    eprintln!(
                        "  ✗ sections must be {}-{}, got: {value}",
                        MIN_SECTIONS, MAX_SECTIONS
                    );
                    CommandResult::Handled
                }
            },
            _ => {
                eprintln!("  ✗ usage: /sections [3-10]");
                CommandResult::Handled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;

    #[test]
    fn metadata() {
        assert_eq!(SectionsCommand.name(), "/sections");
        assert!(!SectionsCommand.description().is_empty());
    }

    #[tokio::test]
    async fn in_range_value_changes_cap() {
        let result = SectionsCommand.execute(&["7"], &test_info()).await;
        assert!(matches!(
            result,
            CommandResult::StateChanged(StateChange::MaxSections(7))
        ));
    }

    #[tokio::test]
    async fn out_of_range_value_is_rejected() {
        assert!(matches!(
            SectionsCommand.execute(&["2"], &test_info()).await,
            CommandResult::Handled
        ));
        assert!(matches!(
            SectionsCommand.execute(&["11"], &test_info()).await,
            CommandResult::Handled
        ));
    }
}
