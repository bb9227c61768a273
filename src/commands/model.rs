use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};
use crate::consts::{PLANNER_MODELS, WRITER_MODELS};

pub struct ModelCommand;

#[async_trait]
impl Command for ModelCommand {
    fn name(&self) -> &str {
        "/model"
    }

    fn description(&self) -> &str {
        "show or switch models: /model [writer|planner] <name>"
    }

    async fn execute(&self, args: &[&str], info: &SessionInfo<'_>) -> CommandResult {
        match args {
            [] => {
                println!("  writer   {}", info.writer_model);
                for model in WRITER_MODELS {
                    let marker = if *model == info.writer_model {
                        " ← current"
                    } else {
                        ""
                    };
                    println!("           - {model}{marker}");
                }
                println!("  planner  {}", info.planner_model);
                for model in PLANNER_MODELS {
                    let marker = if *model == info.planner_model {
                        " ← current"
                    } else {
                        ""
                    };
                    println!("           - {model}{marker}");
                }
                CommandResult::Handled
            }
            ["writer", name] => switch("writer", name, WRITER_MODELS, info.writer_model),
            ["planner", name] => switch("planner", name, PLANNER_MODELS, info.planner_model),
            _ => {
                eprintln!("  ✗ usage: /model [writer|planner] <name>");
                CommandResult::Handled
            }
        }
    }
}

fn switch(role: &str, name: &str, allowed: &[&str], current: &str) -> CommandResult {
    if !allowed.contains(&name) {
        eprintln!("  ✗ unknown {role} model: {name}");
        eprintln!("    available: {}", allowed.join(", "));
        return CommandResult::Handled;
    }
    if name == current {
        println!("  already using {name}");
        return CommandResult::Handled;
    }
    println!("  ✓ {role} model changed to {name}");
    match role {
        "writer" => CommandResult::StateChanged(StateChange::WriterModel(name.to_string())),
        _ => CommandResult::StateChanged(StateChange::PlannerModel(name.to_string())),
    }
}
