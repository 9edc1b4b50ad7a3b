//! Clinical field extraction module.

mod parser;
pub mod rules;

pub use parser::{extract, extract_raw, ExtractionResult, MedicalExtractor};

use crate::error::ExtractionError;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for document parsers turning raw text into a record.
pub trait DocumentParser {
    /// Parse raw (possibly unnormalized) text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}
