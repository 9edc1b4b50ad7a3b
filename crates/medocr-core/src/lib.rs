//! Core library for medical document OCR.
//!
//! This crate provides:
//! - OCR text normalization
//! - Rule-based clinical field extraction (patient, vitals, sections,
//!   medications, follow-up)
//! - The fixed-shape extraction record and pipeline configuration
//! - An OCR seam with a pure Rust ONNX engine (feature `native`)

pub mod error;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod ocr;

use image::DynamicImage;

pub use error::{ExtractionError, MedocrError, OcrError, Result};
pub use extract::{extract, extract_raw, DocumentParser, ExtractionResult, MedicalExtractor};
pub use models::config::{BatchConfig, ExtractionConfig, MedocrConfig, OcrConfig};
pub use models::record::{ExtractionRecord, FollowUp, Gender, PatientInfo, Vital};
pub use normalize::normalize;
pub use ocr::{OcrOutput, TextRegion, TextSource};
#[cfg(feature = "native")]
pub use ocr::{create_engine_from_dir, PureOcrEngine};

/// Recognize an image with `source` and extract a record from its text.
pub fn extract_image<S: TextSource + ?Sized>(
    source: &S,
    image: &DynamicImage,
    extractor: &MedicalExtractor,
) -> Result<ExtractionResult> {
    let text = source.extract_text(image)?;
    Ok(extractor.parse(&text)?)
}
