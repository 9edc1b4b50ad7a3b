//! Error types for the medocr-core library.

use thiserror::Error;

/// Main error type for the medocr library.
#[derive(Error, Debug)]
pub enum MedocrError {
    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Clinical field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// No OCR backend is compiled in or configured.
    #[error("OCR unavailable: {0}")]
    Unavailable(String),
}

/// Errors related to clinical field extraction.
///
/// Only [`ExtractionError::EmptyInput`] ever reaches callers of
/// [`DocumentParser::parse`](crate::extract::DocumentParser::parse);
/// the per-field variants are absorbed at the field boundary and surface as
/// warnings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// There was no text to extract from.
    #[error("no input text")]
    EmptyInput,

    /// A field pattern could not be evaluated.
    #[error("pattern evaluation failed for {field}: {reason}")]
    PatternEvaluation { field: String, reason: String },

    /// A pattern matched but an expected capture group was absent.
    #[error("{field} matched without capture group `{group}`")]
    MalformedMatch { field: String, group: String },
}

impl ExtractionError {
    /// Name of the field this error belongs to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::EmptyInput => None,
            Self::PatternEvaluation { field, .. } | Self::MalformedMatch { field, .. } => {
                Some(field)
            }
        }
    }
}

/// Result type for the medocr library.
pub type Result<T> = std::result::Result<T, MedocrError>;
