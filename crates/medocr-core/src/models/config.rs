//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the medocr pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MedocrConfig {
    /// OCR collaborator configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Batch driver configuration.
    pub batch: BatchConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of replacing them with spaces.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl OcrConfig {
    /// Paths of the detection model, recognition model and dictionary.
    pub fn model_paths(&self, model_dir: &Path) -> [PathBuf; 3] {
        [
            model_dir.join(&self.detection_model),
            model_dir.join(&self.recognition_model),
            model_dir.join(&self.dictionary),
        ]
    }

    /// Check that every model file exists in `model_dir`.
    pub fn models_present(&self, model_dir: &Path) -> bool {
        self.model_paths(model_dir).iter().all(|p| p.exists())
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Normalize whitespace before matching.
    pub normalize_input: bool,

    /// Inputs longer than this are truncated before matching.
    pub max_input_bytes: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            normalize_input: true,
            max_input_bytes: 1024 * 1024,
        }
    }
}

/// Batch driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of documents processed concurrently.
    pub jobs: usize,

    /// Per-document time budget in seconds.
    pub timeout_secs: u64,

    /// File extensions picked up by the batch driver (lowercase, no dot).
    pub extensions: Vec<String>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            timeout_secs: 60,
            extensions: ["png", "jpg", "jpeg", "tiff", "tif", "bmp", "webp", "txt"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl BatchConfig {
    /// Whether a path has one of the configured extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }
}

impl MedocrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: MedocrConfig =
            serde_json::from_str(r#"{"batch": {"jobs": 8}}"#).unwrap();
        assert_eq!(config.batch.jobs, 8);
        assert_eq!(config.batch.timeout_secs, 60);
        assert!(config.extraction.normalize_input);
        assert_eq!(config.ocr.detection_model, "det.onnx");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = MedocrConfig::default();
        config.extraction.max_input_bytes = 4096;
        config.save(&path).unwrap();

        let loaded = MedocrConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.max_input_bytes, 4096);
    }

    #[test]
    fn test_invalid_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = MedocrConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_batch_accepts_extensions() {
        let batch = BatchConfig::default();
        assert!(batch.accepts(Path::new("scan.PNG")));
        assert!(batch.accepts(Path::new("notes.txt")));
        assert!(!batch.accepts(Path::new("report.docx")));
        assert!(!batch.accepts(Path::new("README")));
    }

    #[test]
    fn test_models_present() {
        let dir = tempfile::tempdir().unwrap();
        let ocr = OcrConfig::default();
        assert!(!ocr.models_present(dir.path()));

        for path in ocr.model_paths(dir.path()) {
            std::fs::write(path, b"stub").unwrap();
        }
        assert!(ocr.models_present(dir.path()));
    }
}
