//! Extract command - extract clinical fields from a single document.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use medocr_core::models::record::{ExtractionRecord, Vital};
use medocr_core::{DocumentParser, MedicalExtractor};

use super::{load_config, read_document};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (image or .txt), or `-` to read text from stdin
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory (overrides `ocr.model_dir`)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Also print the normalized text the fields were extracted from
    #[arg(long)]
    raw: bool,

    /// Print extraction warnings
    #[arg(long)]
    warnings: bool,

    /// Compact single-line JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON record
    Json,
    /// Human-readable summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    let text = if args.input == "-" {
        pb.set_message("Reading stdin...");
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        text
    } else {
        let path = Path::new(&args.input);
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }
        info!("Processing file: {}", path.display());
        pb.set_message("Reading document...");
        read_document(path, &config.ocr, args.model_dir.as_deref())?
    };

    pb.set_message("Extracting fields...");

    let result = MedicalExtractor::from_config(&config.extraction)
        .parse(&text)
        .context("no text to extract from")?;

    pb.finish_and_clear();

    if args.raw {
        eprintln!("{}", style("Normalized text:").bold());
        eprintln!("{}", result.normalized_text);
        eprintln!();
    }

    if args.warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    let output = format_record(&result.record, args.format, args.compact)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Extracted {} fields in {}ms (total {:?})",
        result.record.field_count(),
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}

/// Render a record in the requested format.
pub fn format_record(
    record: &ExtractionRecord,
    format: OutputFormat,
    compact: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if compact => Ok(serde_json::to_string(record)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_text(record: &ExtractionRecord) -> String {
    if record.is_empty() {
        return "No clinical fields recognized.\n".to_string();
    }

    let mut output = String::new();

    let patient = &record.patient;
    if !patient.is_empty() {
        output.push_str("Patient:\n");
        let fields = [
            ("Age", &patient.age),
            ("Gender", &patient.gender),
            ("Weight", &patient.weight),
            ("Health card expiry", &patient.health_card_expiry),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                output.push_str(&format!("  {}: {}\n", label, value));
            }
        }
        output.push('\n');
    }

    if !record.vitals.is_empty() {
        output.push_str("Vitals:\n");
        for vital in Vital::ALL {
            if let Some(value) = record.vitals.get(&vital) {
                output.push_str(&format!("  {}: {}\n", vital.label(), value));
            }
        }
        output.push('\n');
    }

    let sections = [
        ("Complaints", &record.complaints),
        ("Reactions", &record.reactions),
        ("Diagnosis", &record.diagnosis),
        ("Investigations", &record.investigations),
        ("Medications", &record.medications),
        ("Advice", &record.advice),
    ];
    for (title, lines) in sections {
        if lines.is_empty() {
            continue;
        }
        output.push_str(&format!("{}:\n", title));
        for line in lines {
            output.push_str(&format!("  - {}\n", line));
        }
        output.push('\n');
    }

    if let Some(date) = &record.follow_up.date {
        output.push_str(&format!("Follow-up: {}\n", date));
    }

    output
}
