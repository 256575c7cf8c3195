use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use gridtown::{
    presentation,
    scenario::{Scenario, ScenarioLoader},
    session::Session,
    snapshot::SaveState,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Score a tile town, or serve it over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a scenario once and print the result
    Score {
        /// Path to the scenario YAML file
        #[arg(long, default_value = "scenarios/riverside.yaml")]
        scenario: PathBuf,

        /// Save file whose categories replace the scenario's before scoring
        #[arg(long)]
        load: Option<PathBuf>,

        /// Write the scored categories to this save file
        #[arg(long)]
        save: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Serve the scenario as a JSON + SSE API
    Serve {
        #[arg(long, default_value = "scenarios/riverside.yaml")]
        scenario: PathBuf,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");

    match cli.command {
        Command::Score {
            scenario,
            load,
            save,
            format,
        } => {
            let scenario = loader.load(&scenario)?;
            init_tracing(&scenario);
            score(&scenario, load, save, format)
        }
        Command::Serve {
            scenario,
            host,
            port,
        } => {
            let scenario = loader.load(&scenario)?;
            init_tracing(&scenario);
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            runtime.block_on(web::run(WebServerConfig {
                scenario,
                host,
                port,
            }))
        }
    }
}

fn init_tracing(scenario: &Scenario) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn score(
    scenario: &Scenario,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let mut session = Session::from_scenario(scenario)?;

    if let Some(path) = load {
        let state = SaveState::read(&path)
            .with_context(|| format!("Failed to read save {}", path.display()))?;
        session
            .load_state(&state)
            .with_context(|| format!("Failed to apply save {}", path.display()))?;
    }

    if let Some(path) = save {
        session
            .save()
            .write(&path)
            .with_context(|| format!("Failed to write save {}", path.display()))?;
    }

    let frame = session.frame();
    match format {
        OutputFormat::Text => print!("{}", presentation::render_text(&frame)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&frame)?),
    }
    Ok(())
}
