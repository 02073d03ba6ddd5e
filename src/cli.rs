//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Slidesmith - deck compilation pipeline
#[derive(Parser)]
#[command(
    name = "slidesmith",
    about = "Compile LLM-generated outlines into presentation decks",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a deck from a topic
    Generate {
        /// Deck title
        title: String,

        /// Topic to build the outline around
        topic: String,

        /// Requested slide count
        #[arg(short, long, default_value_t = 8)]
        slides: usize,

        /// Theme id (see `slidesmith themes`)
        #[arg(short, long)]
        theme: Option<String>,
    },

    /// List available themes
    Themes,
}
