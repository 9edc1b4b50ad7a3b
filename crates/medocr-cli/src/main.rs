//! CLI application for medical document OCR.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract};

/// Medical document OCR - extract structured clinical fields from scanned prescriptions
#[derive(Parser)]
#[command(name = "medocr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract clinical fields from a single document
    Extract(extract::ExtractArgs),

    /// Extract clinical fields from many documents
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    commands::block_on(async move {
        match cli.command {
            Commands::Extract(args) => extract::run(args, cli.config.as_deref()).await,
            Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
            Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
        }
    })?
}
