use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use delver::assistant::{Assistant, EngineMode, PollPolicy, Settings};
use delver::banner::{BannerInfo, print_banner, print_session_summary};
use delver::bridge::Bridge;
use delver::commands::{CommandRegistry, CommandResult, SessionInfo, StateChange};
use delver::consts::{
    DEFAULT_ENGINE_URL, DEFAULT_PLANNER_MODEL, DEFAULT_SEARCH_DEPTH, DEFAULT_SECTIONS,
    DEFAULT_WRITER_MODEL, HISTORY_DISPLAY_LIMIT,
};
use delver::workflow::Workflow;
use delver::workflow::remote::RemoteWorkflow;
use delver::workflow::simulated::SimulatedWorkflow;

#[derive(Parser)]
#[command(name = "delver", version, about = "Deep research, one topic deep.")]
struct Cli {
    /// Research engine endpoint
    #[arg(short, long, default_value = DEFAULT_ENGINE_URL)]
    engine_url: String,

    /// Skip the engine probe and run in simulation mode
    #[arg(long, default_value_t = false)]
    simulate: bool,

    /// Model that writes report sections
    #[arg(long, default_value = DEFAULT_WRITER_MODEL)]
    writer_model: String,

    /// Model that plans the report
    #[arg(long, default_value = DEFAULT_PLANNER_MODEL)]
    planner_model: String,

    /// Search depth per section
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH,
          value_parser = clap::value_parser!(u32).range(1..=5))]
    search_depth: u32,

    /// Maximum report sections
    #[arg(long, default_value_t = DEFAULT_SECTIONS,
          value_parser = clap::value_parser!(u32).range(3..=10))]
    max_sections: u32,

    /// Seconds to wait for a report before giving up
    #[arg(long, default_value_t = 300)]
    max_wait: u64,

    /// Seconds between completion checks
    #[arg(long, default_value_t = 2)]
    poll_interval: u64,

    /// Research a single topic and exit (non-interactive)
    #[arg(short, long)]
    run: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Decide the engine mode once for the whole process.
    let (workflow, mode): (Arc<dyn Workflow>, EngineMode) = if cli.simulate {
        (Arc::new(SimulatedWorkflow), EngineMode::Simulation)
    } else if RemoteWorkflow::probe(&cli.engine_url).await {
        (
            Arc::new(RemoteWorkflow::new(&cli.engine_url)),
            EngineMode::Live,
        )
    } else {
        eprintln!(
            "warning: no research engine at {}; running in simulation mode",
            cli.engine_url
        );
        (Arc::new(SimulatedWorkflow), EngineMode::Simulation)
    };

    let settings = Settings {
        writer_model: cli.writer_model.clone(),
        planner_model: cli.planner_model.clone(),
        search_depth: cli.search_depth,
        max_sections: cli.max_sections,
    };

    let policy = PollPolicy {
        max_wait: Duration::from_secs(cli.max_wait),
        interval: Duration::from_secs(cli.poll_interval.max(1)),
        ..PollPolicy::default()
    };

    print_banner(&BannerInfo {
        engine_mode: mode.label(),
        engine_url: &cli.engine_url,
        writer_model: &settings.writer_model,
        planner_model: &settings.planner_model,
        search_depth: settings.search_depth,
        max_sections: settings.max_sections,
        max_wait: policy.max_wait,
        poll_interval: policy.interval,
    });

    let bridge = Bridge::new(workflow);
    let mut assistant = Assistant::new(bridge, mode, settings, policy);

    // Single topic mode
    if let Some(topic) = cli.run {
        if let Err(e) = assistant.research(&topic).await {
            eprintln!("\nerror: {}", e);
        }
        let (reports, words) = assistant.totals();
        print_session_summary(reports, words);
        return Ok(());
    }

    let registry = CommandRegistry::new();

    // REPL — async stdin so Ctrl+C is caught at the prompt too
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\ndelver> ");
        io::stdout().flush()?;

        // Read next line, interruptible by Ctrl+C
        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let command_result = {
            let (reports, _) = assistant.totals();
            let info = SessionInfo {
                engine_mode: assistant.mode().label(),
                status: assistant.session().status().label(),
                writer_model: &assistant.settings.writer_model,
                planner_model: &assistant.settings.planner_model,
                search_depth: assistant.settings.search_depth,
                max_sections: assistant.settings.max_sections,
                topics: assistant.session().recent_topics(HISTORY_DISPLAY_LIMIT),
                message_count: assistant.session().messages().len(),
                reports,
            };
            registry.dispatch(input, &info).await
        };

        match command_result {
            CommandResult::Quit => break,
            CommandResult::Handled => continue,
            CommandResult::StateChanged(change) => {
                apply_change(&mut assistant, change);
                continue;
            }
            CommandResult::NotACommand => {}
        }

        // Ctrl+C during research abandons the wait; the background run
        // is never cancelled.
        let interrupted = tokio::select! {
            result = assistant.research(input) => {
                if let Err(e) = result {
                    eprintln!("\nerror: {}", e);
                }
                false
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n\ninterrupted — the run continues in the background");
                true
            }
        };
        if interrupted {
            // Same bookkeeping as the timeout path, applied after the
            // dropped cycle releases its borrow.
            assistant.abandon_wait(input);
        }
    }

    let (reports, words) = assistant.totals();
    print_session_summary(reports, words);
    Ok(())
}

fn apply_change(assistant: &mut Assistant, change: StateChange) {
    match change {
        StateChange::WriterModel(model) => assistant.settings.writer_model = model,
        StateChange::PlannerModel(model) => assistant.settings.planner_model = model,
        StateChange::SearchDepth(depth) => assistant.settings.search_depth = depth,
        StateChange::MaxSections(count) => assistant.settings.max_sections = count,
        StateChange::ClearHistory => assistant.session_mut().clear(),
    }
}
