//! WASM bindings for medical document field extraction.
//!
//! OCR runs outside (e.g. in the browser); these bindings take the recognized
//! text and return the structured record as a plain JS object.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use medocr_core::{DocumentParser, ExtractionResult, MedicalExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Normalize raw OCR text (collapse spaces, squeeze blank lines).
#[wasm_bindgen]
pub fn normalize_text(raw: &str) -> String {
    medocr_core::normalize(raw)
}

/// Extract the record from raw OCR text.
///
/// Never fails on text: unrecognized or empty input gives the empty record.
#[wasm_bindgen]
pub fn extract_record(text: &str) -> Result<JsValue, JsValue> {
    to_js(&medocr_core::extract_raw(text))
}

/// Extract the record together with the normalized text and warnings.
#[wasm_bindgen]
pub fn extract_with_warnings(text: &str) -> Result<JsValue, JsValue> {
    parse_to_js(&MedicalExtractor::new(), text)
}

/// Extractor class for browser use.
#[wasm_bindgen]
pub struct MedicalExtractorJs {
    extractor: MedicalExtractor,
}

#[wasm_bindgen]
impl MedicalExtractorJs {
    /// Create a new extractor with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: MedicalExtractor::new(),
        }
    }

    /// Configure whitespace normalization before matching.
    #[wasm_bindgen]
    pub fn set_normalization(&mut self, normalize: bool) {
        self.extractor = self.extractor.clone().with_normalization(normalize);
    }

    /// Configure the input size cap in bytes.
    #[wasm_bindgen]
    pub fn set_max_input_bytes(&mut self, max: usize) {
        self.extractor = self.extractor.clone().with_max_input_bytes(max);
    }

    /// Extract the record from text. Rejects empty input.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self
            .extractor
            .parse(text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        to_js(&result.record)
    }

    /// Extract the record with normalized text and warnings.
    #[wasm_bindgen]
    pub fn extract_with_warnings(&self, text: &str) -> Result<JsValue, JsValue> {
        parse_to_js(&self.extractor, text)
    }
}

impl Default for MedicalExtractorJs {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct ExtractOutput {
    record: medocr_core::ExtractionRecord,
    normalized_text: String,
    warnings: Vec<String>,
    processing_time_ms: u64,
}

impl From<ExtractionResult> for ExtractOutput {
    fn from(result: ExtractionResult) -> Self {
        Self {
            record: result.record,
            normalized_text: result.normalized_text,
            warnings: result.warnings,
            processing_time_ms: result.processing_time_ms,
        }
    }
}

fn parse_to_js(extractor: &MedicalExtractor, text: &str) -> Result<JsValue, JsValue> {
    let result = extractor
        .parse(text)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    for warning in &result.warnings {
        web_sys::console::warn_1(&JsValue::from_str(warning));
    }

    to_js(&ExtractOutput::from(result))
}

/// Serialize to plain JS objects (maps become objects, not `Map`).
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
