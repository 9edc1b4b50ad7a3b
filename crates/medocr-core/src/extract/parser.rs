//! Medical document parser running the field rule table.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{ExtractionRecord, FollowUp, Vital};
use crate::normalize::normalize;

use super::rules::patterns::{
    ADVICE_RULE, COMPLAINTS_RULE, DIAGNOSIS_RULE, FOLLOW_UP_RULE, HEALTH_CARD_RULE,
    INVESTIGATIONS_RULE, REACTIONS_RULE, WEIGHT_RULE,
};
use super::rules::{
    AgeGenderExtractor, CaptureRule, FieldExtractor, MedicationExtractor, SectionRule,
    VitalsExtractor,
};
use super::{DocumentParser, Result};

/// Result of extracting one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: ExtractionRecord,
    /// The text the rules ran on (normalized and length-capped).
    pub normalized_text: String,
    /// Fields that could not be evaluated, and input adjustments.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Rule-based extractor for medical documents.
#[derive(Debug, Clone)]
pub struct MedicalExtractor {
    /// Whether `parse` normalizes whitespace first.
    normalize_input: bool,
    /// Longer inputs are truncated before matching.
    max_input_bytes: usize,
}

impl MedicalExtractor {
    /// Create a new extractor with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor from the extraction section of the config.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            normalize_input: config.normalize_input,
            max_input_bytes: config.max_input_bytes,
        }
    }

    /// Set input normalization.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_input = normalize;
        self
    }

    /// Set the input size cap.
    pub fn with_max_input_bytes(mut self, max: usize) -> Self {
        self.max_input_bytes = max;
        self
    }

    /// Extract a record from already-normalized text.
    ///
    /// Never fails: fields whose rule cannot be evaluated are logged and
    /// left at their defaults, and empty input gives the empty record.
    pub fn extract(&self, text: &str) -> ExtractionRecord {
        let mut warnings = Vec::new();
        let text = cap_input(text, self.max_input_bytes, &mut warnings);
        self.extract_fields(text, &mut warnings)
    }

    fn extract_fields(&self, text: &str, warnings: &mut Vec<String>) -> ExtractionRecord {
        let record = extract_with_rules(text, &FieldRules::standard(), warnings);

        debug!(
            "Extracted {} fields from {} characters",
            record.field_count(),
            text.len()
        );

        record
    }
}

/// The rule for every record field.
struct FieldRules<'r> {
    age_gender: AgeGenderExtractor,
    weight: &'r CaptureRule,
    health_card: &'r CaptureRule,
    vitals: Vec<(Vital, &'r CaptureRule)>,
    diagnosis: &'r SectionRule,
    complaints: &'r SectionRule,
    reactions: &'r SectionRule,
    investigations: &'r SectionRule,
    advice: &'r SectionRule,
    medications: MedicationExtractor,
    follow_up: &'r CaptureRule,
}

impl FieldRules<'static> {
    fn standard() -> Self {
        Self {
            age_gender: AgeGenderExtractor::new(),
            weight: &WEIGHT_RULE,
            health_card: &HEALTH_CARD_RULE,
            vitals: VitalsExtractor::new().rules().collect(),
            diagnosis: &DIAGNOSIS_RULE,
            complaints: &COMPLAINTS_RULE,
            reactions: &REACTIONS_RULE,
            investigations: &INVESTIGATIONS_RULE,
            advice: &ADVICE_RULE,
            medications: MedicationExtractor::new(),
            follow_up: &FOLLOW_UP_RULE,
        }
    }
}

/// Fill a record field by field; each field is guarded on its own.
fn extract_with_rules(
    text: &str,
    rules: &FieldRules<'_>,
    warnings: &mut Vec<String>,
) -> ExtractionRecord {
    let mut record = ExtractionRecord::default();

    if let Some(found) = guarded(&rules.age_gender, text, warnings) {
        record.patient.age = Some(found.age);
        record.patient.gender = Some(found.gender);
    }
    record.patient.weight = guarded(rules.weight, text, warnings);
    record.patient.health_card_expiry = guarded(rules.health_card, text, warnings);

    for &(vital, rule) in &rules.vitals {
        if let Some(value) = guarded(rule, text, warnings) {
            record.vitals.insert(vital, value);
        }
    }

    let sections = [
        (rules.diagnosis, &mut record.diagnosis),
        (rules.complaints, &mut record.complaints),
        (rules.reactions, &mut record.reactions),
        (rules.investigations, &mut record.investigations),
        (rules.advice, &mut record.advice),
    ];
    for (rule, slot) in sections {
        if let Some(lines) = guarded(rule, text, warnings) {
            *slot = lines;
        }
    }

    record.medications = guarded(&rules.medications, text, warnings).unwrap_or_default();

    record.follow_up = FollowUp {
        date: guarded(rules.follow_up, text, warnings),
    };

    record
}

impl Default for MedicalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser for MedicalExtractor {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        info!("Parsing document from {} characters of text", text.len());

        let capped = cap_input(text, self.max_input_bytes, &mut warnings);
        let normalized_text = if self.normalize_input {
            normalize(capped)
        } else {
            capped.to_string()
        };

        let record = self.extract_fields(&normalized_text, &mut warnings);

        if record.is_empty() {
            warnings.push("No clinical fields recognized".to_string());
        }

        Ok(ExtractionResult {
            record,
            normalized_text,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Run one field rule; a failing rule is reported and leaves the field empty.
fn guarded<E: FieldExtractor>(
    extractor: &E,
    text: &str,
    warnings: &mut Vec<String>,
) -> Option<E::Output> {
    match extractor.extract(text) {
        Ok(value) => value,
        Err(e) => {
            warn!("Skipping field {}: {}", extractor.field(), e);
            warnings.push(e.to_string());
            None
        }
    }
}

/// Truncate `text` to at most `max` bytes on a char boundary.
fn cap_input<'t>(text: &'t str, max: usize, warnings: &mut Vec<String>) -> &'t str {
    if text.len() <= max {
        return text;
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    warn!("Input of {} bytes truncated to {} bytes", text.len(), end);
    warnings.push(format!("input truncated from {} to {} bytes", text.len(), end));
    &text[..end]
}

/// Extract a record from normalized text with default settings.
pub fn extract(text: &str) -> ExtractionRecord {
    MedicalExtractor::new().extract(text)
}

/// Normalize raw OCR text and extract a record from it.
pub fn extract_raw(text: &str) -> ExtractionRecord {
    extract(&normalize(text))
}
