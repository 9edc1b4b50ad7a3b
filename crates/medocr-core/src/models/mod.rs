//! Data models.

pub mod config;
pub mod record;

pub use config::{BatchConfig, ExtractionConfig, MedocrConfig, OcrConfig};
pub use record::{ExtractionRecord, FollowUp, Gender, PatientInfo, Vital};
