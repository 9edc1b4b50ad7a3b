//! Structured record extracted from a medical document.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Clinical fields extracted from one document.
///
/// The shape is fixed: every top-level field is always serialized, falling
/// back to an empty array or object, so consumers never need presence checks
/// on the top level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionRecord {
    /// Patient demographics.
    pub patient: PatientInfo,

    /// Measured vitals keyed by vital name.
    pub vitals: BTreeMap<Vital, String>,

    /// Diagnosis lines in document order.
    pub diagnosis: Vec<String>,

    /// Chief complaints.
    pub complaints: Vec<String>,

    /// Adverse reactions.
    pub reactions: Vec<String>,

    /// Ordered investigations / tests.
    pub investigations: Vec<String>,

    /// Prescribed medications, one per numbered item.
    pub medications: Vec<String>,

    /// Advice lines.
    pub advice: Vec<String>,

    /// Next visit.
    pub follow_up: FollowUp,
}

impl ExtractionRecord {
    /// True when no field was extracted at all.
    pub fn is_empty(&self) -> bool {
        self.patient.is_empty()
            && self.vitals.is_empty()
            && self.diagnosis.is_empty()
            && self.complaints.is_empty()
            && self.reactions.is_empty()
            && self.investigations.is_empty()
            && self.medications.is_empty()
            && self.advice.is_empty()
            && self.follow_up.date.is_none()
    }

    /// Number of populated leaf fields, used for batch summaries.
    pub fn field_count(&self) -> usize {
        let patient = [
            &self.patient.age,
            &self.patient.gender,
            &self.patient.weight,
            &self.patient.health_card_expiry,
        ]
        .iter()
        .filter(|f| f.is_some())
        .count();

        let sections = [
            &self.diagnosis,
            &self.complaints,
            &self.reactions,
            &self.investigations,
            &self.medications,
            &self.advice,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .count();

        patient + self.vitals.len() + sections + usize::from(self.follow_up.date.is_some())
    }
}

/// Patient demographics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientInfo {
    /// Age in years, digits only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    /// Gender token as written, case-normalized (`M`, `F`, `Male`, `Female`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Weight formatted as `"<digits> kg"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,

    /// Health card expiry date, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_card_expiry: Option<String>,
}

impl PatientInfo {
    pub fn is_empty(&self) -> bool {
        self.age.is_none()
            && self.gender.is_none()
            && self.weight.is_none()
            && self.health_card_expiry.is_none()
    }

    /// Canonical gender, if one was extracted.
    pub fn gender_kind(&self) -> Option<Gender> {
        self.gender.as_deref().and_then(Gender::from_str)
    }
}

/// Canonical patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Parse an abbreviated or spelled-out gender token, ignoring case.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "m" | "male" => Some(Self::Male),
            "f" | "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vital signs recognized by the extractor.
///
/// Serialized with the short keys used in the record (`bp`, `pulse`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    /// Blood pressure, systolic/diastolic.
    Bp,
    /// Pulse / heart rate.
    Pulse,
    /// Body temperature.
    Temp,
    /// Respiratory rate.
    Rr,
    /// Oxygen saturation.
    Spo2,
}

impl Vital {
    /// All vitals in record order.
    pub const ALL: [Vital; 5] = [Vital::Bp, Vital::Pulse, Vital::Temp, Vital::Rr, Vital::Spo2];

    /// Record key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Bp => "bp",
            Self::Pulse => "pulse",
            Self::Temp => "temp",
            Self::Rr => "rr",
            Self::Spo2 => "spo2",
        }
    }

    /// Field name used in extraction warnings.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Bp => "vitals.bp",
            Self::Pulse => "vitals.pulse",
            Self::Temp => "vitals.temp",
            Self::Rr => "vitals.rr",
            Self::Spo2 => "vitals.spo2",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bp => "Blood pressure",
            Self::Pulse => "Pulse",
            Self::Temp => "Temperature",
            Self::Rr => "Respiratory rate",
            Self::Spo2 => "Oxygen saturation",
        }
    }
}

impl fmt::Display for Vital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Follow-up visit. Serializes as `{}` when no date was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowUp {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
