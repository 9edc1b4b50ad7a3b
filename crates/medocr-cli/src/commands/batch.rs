//! Batch command - extract clinical fields from many documents concurrently.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use medocr_core::models::config::OcrConfig;
use medocr_core::models::record::{ExtractionRecord, Vital};
use medocr_core::{DocumentParser, MedicalExtractor};

use super::extract::{format_record, OutputFormat};
use super::{load_config, read_document};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input files (images and .txt)
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file records (default: JSON lines on stdout)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of documents processed concurrently (default: `batch.jobs`)
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Per-document time budget in seconds (default: `batch.timeout_secs`)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Model directory (overrides `ocr.model_dir`)
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    outcome: Result<ExtractionRecord, String>,
    warnings: Vec<String>,
    processing_time_ms: u64,
    finished_at: chrono::DateTime<chrono::Utc>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && config.batch.accepts(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let jobs = args.jobs.unwrap_or(config.batch.jobs).max(1);
    let budget = Duration::from_secs(args.timeout.unwrap_or(config.batch.timeout_secs));

    eprintln!(
        "{} Found {} files to process ({} at a time)",
        style("ℹ").blue(),
        files.len(),
        jobs
    );

    let outputs = match args.output_dir {
        Some(ref output_dir) => {
            fs::create_dir_all(output_dir)?;
            Some(plan_outputs(output_dir, &files, args.format))
        }
        None => None,
    };

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(MedicalExtractor::from_config(&config.extraction));
    let ocr = Arc::new(config.ocr.clone());
    let model_dir = args.model_dir.clone().map(Arc::new);

    let mut results: Vec<(usize, FileResult)> = stream::iter(files.into_iter().enumerate())
        .map(|(index, path)| {
            let extractor = Arc::clone(&extractor);
            let ocr = Arc::clone(&ocr);
            let model_dir = model_dir.clone();
            let pb = overall_pb.clone();
            async move {
                let result = run_with_budget(path.clone(), budget, move || {
                    process_file(&path, &extractor, &ocr, model_dir.as_deref().map(PathBuf::as_path))
                })
                .await;
                pb.inc(1);
                (index, result)
            }
        })
        .buffer_unordered(jobs)
        .collect()
        .await;

    overall_pb.finish_and_clear();

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<FileResult> = results.into_iter().map(|(_, r)| r).collect();

    for (index, result) in results.iter().enumerate() {
        let Ok(record) = &result.outcome else {
            continue;
        };

        match &outputs {
            Some(outputs) => {
                let output_path = &outputs[index];
                fs::write(output_path, format_record(record, args.format, false)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
            None => {
                let line = serde_json::json!({
                    "file": result.path.display().to_string(),
                    "record": record,
                });
                println!("{}", line);
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.outcome.is_err()).collect();
    let succeeded = results.len() - failed.len();

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(succeeded).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(error) = &result.outcome {
                eprintln!("  - {}: {}", result.path.display(), error);
            }
        }
    }

    if succeeded == 0 {
        anyhow::bail!("All {} files failed", results.len());
    }

    Ok(())
}

/// Run the work for one document on the blocking pool, bounded by `budget`.
///
/// A document that exceeds the budget is reported as failed; its blocking
/// task is detached and dropped when the runtime shuts down.
async fn run_with_budget<F>(path: PathBuf, budget: Duration, work: F) -> FileResult
where
    F: FnOnce() -> anyhow::Result<(ExtractionRecord, Vec<String>)> + Send + 'static,
{
    let file_start = Instant::now();

    let task = tokio::task::spawn_blocking(work);

    let outcome = match tokio::time::timeout(budget, task).await {
        Ok(Ok(Ok(outcome))) => Ok(outcome),
        Ok(Ok(Err(e))) => Err(format!("{:#}", e)),
        Ok(Err(e)) => Err(format!("worker failed: {}", e)),
        Err(_) => Err(format!("timed out after {:?}", budget)),
    };

    let (outcome, warnings) = match outcome {
        Ok((record, warnings)) => (Ok(record), warnings),
        Err(error) => {
            warn!("Failed to process {}: {}", path.display(), error);
            (Err(error), Vec::new())
        }
    };

    FileResult {
        path,
        outcome,
        warnings,
        processing_time_ms: file_start.elapsed().as_millis() as u64,
        finished_at: chrono::Utc::now(),
    }
}

fn process_file(
    path: &Path,
    extractor: &MedicalExtractor,
    ocr: &OcrConfig,
    model_dir: Option<&Path>,
) -> anyhow::Result<(ExtractionRecord, Vec<String>)> {
    let text = read_document(path, ocr, model_dir)?;
    let result = extractor.parse(&text)?;
    Ok((result.record, result.warnings))
}

/// One output path per input, in input order.
///
/// Names keep the input's extension (`rx.png` -> `rx.png.json`). Names already
/// taken in this batch, and paths that resolve to one of the inputs, get a
/// numeric suffix instead (`rx.png-2.json`).
fn plan_outputs(output_dir: &Path, inputs: &[PathBuf], format: OutputFormat) -> Vec<PathBuf> {
    let resolved_dir = fs::canonicalize(output_dir).unwrap_or_else(|_| output_dir.to_path_buf());
    let sources: HashSet<PathBuf> = inputs
        .iter()
        .map(|p| fs::canonicalize(p).unwrap_or_else(|_| p.clone()))
        .collect();

    let mut taken = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let name = input
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "document".to_string());

            let mut candidate = format!("{}.{}", name, format.extension());
            let mut n = 1;
            while taken.contains(&candidate) || sources.contains(&resolved_dir.join(&candidate)) {
                n += 1;
                candidate = format!("{}-{}.{}", name, n, format.extension());
            }

            let path = output_dir.join(&candidate);
            taken.insert(candidate);
            path
        })
        .collect()
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "age",
        "gender",
        "bp",
        "diagnosis",
        "medications",
        "follow_up",
        "fields",
        "warnings",
        "processing_time_ms",
        "finished_at",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time_ms = result.processing_time_ms.to_string();
        let finished_at = result.finished_at.to_rfc3339();

        match &result.outcome {
            Ok(record) => {
                wtr.write_record([
                    filename,
                    "success",
                    record.patient.age.as_deref().unwrap_or(""),
                    record.patient.gender.as_deref().unwrap_or(""),
                    record.vitals.get(&Vital::Bp).map(String::as_str).unwrap_or(""),
                    &record.diagnosis.join("; "),
                    &record.medications.len().to_string(),
                    record.follow_up.date.as_deref().unwrap_or(""),
                    &record.field_count().to_string(),
                    &result.warnings.len().to_string(),
                    &time_ms,
                    &finished_at,
                    "",
                ])?;
            }
            Err(error) => {
                wtr.write_record([
                    filename,
                    "error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    "",
                    &time_ms,
                    &finished_at,
                    error,
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
