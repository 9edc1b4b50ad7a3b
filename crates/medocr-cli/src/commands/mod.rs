//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use medocr_core::models::config::{MedocrConfig, OcrConfig};
use medocr_core::{create_engine_from_dir, TextSource};

/// Drive `future` to completion on a fresh multi-threaded runtime.
///
/// The runtime is shut down without waiting for blocking tasks, so work
/// abandoned after a timeout does not keep the process alive.
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let output = runtime.block_on(future);
    runtime.shutdown_background();
    Ok(output)
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("medocr")
        .join("config.json")
}

/// The `--config` path, or the default location.
pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration from `--config`, the default file if it exists, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<MedocrConfig> {
    if let Some(path) = config_path {
        return MedocrConfig::from_file(Path::new(path))
            .with_context(|| format!("failed to load config from {}", path));
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading config from {}", path.display());
        MedocrConfig::from_file(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))
    } else {
        Ok(MedocrConfig::default())
    }
}

/// Whether a document is plain text and skips OCR.
pub fn is_text_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

/// Read the raw text of one document: verbatim for `.txt`, OCR otherwise.
pub fn read_document(
    path: &Path,
    ocr: &OcrConfig,
    model_dir: Option<&Path>,
) -> anyhow::Result<String> {
    if is_text_document(path) {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    let image = image::open(path)
        .with_context(|| format!("failed to open image {}", path.display()))?;

    let model_dir = model_dir.unwrap_or(&ocr.model_dir);
    if !ocr.models_present(model_dir) {
        anyhow::bail!(
            "OCR models not found in {}.\n\n\
             Place {}, {} and {} there, or run \
             'medocr config set ocr.model_dir <DIR>'.",
            model_dir.display(),
            ocr.detection_model,
            ocr.recognition_model,
            ocr.dictionary
        );
    }

    let engine = create_engine_from_dir(Some(model_dir), ocr)
        .context("failed to load OCR models")?;

    Ok(engine.extract_text(&image)?)
}
