use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};
use crate::consts::{MAX_SEARCH_DEPTH, MIN_SEARCH_DEPTH};

pub struct DepthCommand;

#[async_trait]
impl Command for DepthCommand {
    fn name(&self) -> &str {
        "/depth"
    }

    fn description(&self) -> &str {
        "show or set the search depth: /depth [1-5]"
    }

    async fn execute(&self, args: &[&str], info: &SessionInfo<'_>) -> CommandResult {
        match args {
            [] => {
                println!(
                    "  search depth: {} (range {}-{})",
                    info.search_depth, MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH
                );
                CommandResult::Handled
            }
            [value] => match value.parse::<u32>() {
                Ok(n) if (MIN_SEARCH_DEPTH..=MAX_SEARCH_DEPTH).contains(&n) => {
                    println!("  ✓ search depth set to {n}");
                    CommandResult::StateChanged(StateChange::SearchDepth(n))
                }
                _ => {
                    eprintln!(
                        "  ✗ depth must be {}-{}, got: {value}",
                        MIN_SEARCH_DEPTH, MAX_SEARCH_DEPTH
                    );
                    CommandResult::Handled
                }
            },
            _ => {
                eprintln!("  ✗ usage: /depth [1-5]");
                CommandResult::Handled
            }
        }
    }
}
