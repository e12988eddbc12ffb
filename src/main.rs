mod cli;
mod clock;
mod config;
mod demo;
mod engine;
mod error;
mod generator;
mod notify;
mod openai;
mod reconcile;
mod scheduler;
mod ui;
mod workflow;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::EngineConfig;
use generator::CoverLetterGenerator;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = EngineConfig::load()?;

    match cli.command {
        Command::Demo => demo::run(config).await?,
        Command::Letter {
            company,
            role,
            description,
        } => {
            let generator = CoverLetterGenerator::from_config(&config);
            let letter = generator
                .generate(
                    &company,
                    &role,
                    description.as_deref().unwrap_or(""),
                    chrono::Utc::now(),
                )
                .await;
            println!("{}", letter.content);
        }
    }

    Ok(())
}

// RUST_LOG takes precedence; --verbose only widens the default filter.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "applyflow=debug"
    } else {
        "applyflow=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();
}
