//! Built-in REPL commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry handles dispatch, alias resolution,
//! argument splitting, and dynamic help generation.

mod clear;
mod depth;
mod help;
mod history;
mod model;
mod quit;
mod sections;
mod status;

use async_trait::async_trait;
use std::sync::Arc;

/// Session info available to commands during execution.
pub struct SessionInfo<'a> {
    pub engine_mode: &'a str,
    pub status: String,
    pub writer_model: &'a str,
    pub planner_model: &'a str,
    pub search_depth: u32,
    pub max_sections: u32,
    /// Recent research topics, oldest first.
    pub topics: &'a [String],
    pub message_count: usize,
    pub reports: u64,
}

/// A state change the REPL needs to apply after a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Active writer model changed.
    WriterModel(String),
    /// Active planner model changed.
    PlannerModel(String),
    /// Search depth changed.
    SearchDepth(u32),
    /// Maximum report sections changed.
    MaxSections(u32),
    /// Conversation log and topic history must be wiped.
    ClearHistory,
}

/// What the REPL should do after a command runs.
pub enum CommandResult {
    /// Not a command — treat the input as a research topic.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Command produced a state change the REPL must apply.
    StateChanged(StateChange),
    /// Exit the REPL.
    Quit,
}

/// A REPL command. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/status"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/h", "/?"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command with whitespace-split arguments.
    async fn execute(&self, args: &[&str], info: &SessionInfo<'_>) -> CommandResult;
}

/// Holds registered commands. Supports runtime registration.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(status::StatusCommand),
            Arc::new(history::HistoryCommand),
            Arc::new(clear::ClearCommand),
            Arc::new(model::ModelCommand),
            Arc::new(depth::DepthCommand),
            Arc::new(sections::SectionsCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    /// Register an additional command.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Dispatch input to a matching command, or return `NotACommand`.
    pub async fn dispatch(&self, input: &str, info: &SessionInfo<'_>) -> CommandResult {
        let mut parts = input.trim().split_whitespace();
        let Some(cmd) = parts.next() else {
            return CommandResult::NotACommand;
        };
        let args: Vec<&str> = parts.collect();

        for command in &self.commands {
            if cmd == command.name() || command.aliases().contains(&cmd) {
                // /help is special: it needs the registry to list all commands
                if command.name() == "/help" {
                    print!("{}", self.help_text());
                    return CommandResult::Handled;
                }
                return command.execute(&args, info).await;
            }
        }

        if cmd.starts_with('/') {
            println!("unknown command: {cmd}");
            println!("type /help for available commands");
            return CommandResult::Handled;
        }

        CommandResult::NotACommand
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    /// All registered command names (for testing).
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// All registered names and aliases (for duplicate detection).
    pub fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, aliases: &[&str]) -> String {
    if aliases.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, aliases.join(", "))
    }
}
