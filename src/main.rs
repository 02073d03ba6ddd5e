//! Slidesmith - deck compilation pipeline
//!
//! CLI entry point for generating decks and listing themes.

use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use slidesmith::cli::{Cli, Command};
use slidesmith::config::Config;
use slidesmith::deck::DeckStatus;
use slidesmith::generator::ChatOutlineGenerator;
use slidesmith::pipeline::{DeckPipeline, DeckRequest};
use slidesmith::service::HttpSlidesService;
use slidesmith::theme;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            title,
            topic,
            slides,
            theme,
        } => {
            debug!("main: matched Generate command");
            cmd_generate(&config, title, topic, slides, theme).await
        }
        Command::Themes => {
            debug!("main: matched Themes command");
            cmd_themes()
        }
    }
}

async fn cmd_generate(
    config: &Config,
    title: String,
    topic: String,
    slides: usize,
    theme: Option<String>,
) -> Result<()> {
    debug!(title = %title, slides, "cmd_generate: called");
    config.validate()?;

    let generator = ChatOutlineGenerator::from_config(&config.generator)?;
    let service = HttpSlidesService::from_config(&config.slides)?;

    let pipeline = DeckPipeline::new(
        Arc::new(generator),
        Arc::new(service),
        config.pipeline.normalize_options(),
    );

    let request = DeckRequest {
        title,
        topic,
        slide_count: slides,
        theme_id: theme.unwrap_or_else(|| config.pipeline.default_theme.clone()),
    };

    let outcome = pipeline.compile_and_execute(&request).await?;
    info!(status = ?outcome.status, "cmd_generate: pipeline finished");

    match outcome.status {
        DeckStatus::Success => {
            println!("Deck created: {}", outcome.deck_id.as_deref().unwrap_or("unknown"));
            Ok(())
        }
        DeckStatus::Partial => {
            println!(
                "Deck partially created: {} (some content may be missing)",
                outcome.deck_id.as_deref().unwrap_or("unknown")
            );
            Ok(())
        }
        DeckStatus::Failure => Err(eyre::eyre!("deck creation failed")),
    }
}

fn cmd_themes() -> Result<()> {
    debug!("cmd_themes: called");
    for choice in theme::choices() {
        println!("{:<12} {} - {}", choice.id, choice.name, choice.description);
    }
    Ok(())
}
