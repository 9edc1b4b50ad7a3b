//! Pattern table for clinical field extraction.
//!
//! Each row pairs a field with its label pattern and, for sections, the
//! terminator that closes the capture. Adding a field means adding a row
//! here and a slot in [`ExtractionRecord`](crate::models::ExtractionRecord).
//!
//! All patterns run on the `regex` crate's finite automata, so matching is
//! linear in the input length. Lookaround is unavailable there; sections are
//! captured with a label match followed by a terminator search (see
//! [`SectionRule`](super::SectionRule)).

use lazy_static::lazy_static;

use crate::models::Vital;

use super::{CaptureRule, Pattern, SectionRule, SectionShape};

// Patient demographics

/// `PATIENT(F)/45Y`: gender in parentheses, then age followed by a literal `Y`.
pub const AGE_GENDER_PRIMARY: &str =
    r"PATIENT\s*\(\s*(?P<gender>(?i:M|F|Male|Female))\s*\)\s*/\s*(?P<age>\d{1,3})Y\b";

/// `, 30/M`: age before gender after a comma.
pub const AGE_GENDER_FALLBACK: &str =
    r",\s*(?P<age>\d{1,3})\s*/\s*(?P<gender>(?i:M|F|Male|Female))\b";

pub const WEIGHT: &str = r"(?i)Weight\s*\(\s*Kg\s*\)\s*:\s*(\d+)";

pub const HEALTH_CARD_EXPIRY: &str =
    r"(?i)Health\s*Card[:\s]*Exp\.?[:\s]*(\d{4}[/\-]\d{2}[/\-]\d{2})";

// Vitals

/// Vital sign patterns. Group 1 is the value; the unit suffix is optional
/// and never captured.
pub const VITALS: [(Vital, &str); 5] = [
    (
        Vital::Bp,
        r"(?i)\b(?:BP|Blood\s*Pressure)[\s:]*(\d{2,3}\s*/\s*\d{2,3})(?:\s*mmHg)?",
    ),
    (
        Vital::Pulse,
        r"(?i)\b(?:Pulse|Heart\s*Rate)[\s:]*(\d{2,3})(?:\s*bpm)?",
    ),
    (
        Vital::Temp,
        r"(?i)\b(?:Temperature|Temp)[\s:]*(\d{2,3}(?:\.\d+)?)(?:\s*°?\s*[CF]\b)?",
    ),
    (
        Vital::Rr,
        r"(?i)\b(?:RR|Respiratory\s*Rate)[\s:]*(\d{2})(?:\s*/\s*min)?",
    ),
    (
        Vital::Spo2,
        r"(?i)\b(?:SpO2|Oxygen\s*Saturation)[\s:]*(\d{2,3})(?:\s*%)?",
    ),
];

// Sections

pub const DIAGNOSIS_LABEL: &str = r"(?i)Diagnosis[:\s-]+";
pub const DIAGNOSIS_END: &str = r"(?i)\n\s*\n|Medicine Name";

pub const COMPLAINTS_LABEL: &str = r"(?i)Chief\s*Complaints[:\s-]+";
pub const REACTIONS_LABEL: &str = r"(?i)Adverse\s*Reactions[\s:]+";
pub const LINE_END: &str = r"\n";

pub const INVESTIGATIONS_LABEL: &str = r"(?i)\b(?:Investigations|Tests)[:\s-]+";
pub const INVESTIGATIONS_END: &str = r"(?i)\n\s*\n|Medicine|Advice";

pub const ADVICE_LABEL: &str = r"(?i)Advice[:\s-]+";
pub const ADVICE_END: &str = r"(?i)\n\s*(?:Follow\s*Up|Next\s*Visit)";

// Medications

/// Start of a numbered list item: `1)`, `12)` at the beginning of a line.
pub const NUMBERED_ITEM: &str = r"(?m)^\s*\d+\)";

// Follow-up

pub const FOLLOW_UP: &str = r"(?i)Follow\s*Up[:\s-]+(\d{2}[/\-]\d{2}[/\-](?:\d{4}|\d{2}))\b";

lazy_static! {
    pub static ref AGE_GENDER_RULES: [Pattern; 2] = [
        Pattern::new("patient.age_gender", AGE_GENDER_PRIMARY),
        Pattern::new("patient.age_gender", AGE_GENDER_FALLBACK),
    ];

    pub static ref WEIGHT_RULE: CaptureRule =
        CaptureRule::new("patient.weight", WEIGHT, super::patient::format_weight);

    pub static ref HEALTH_CARD_RULE: CaptureRule = CaptureRule::new(
        "patient.health_card_expiry",
        HEALTH_CARD_EXPIRY,
        super::dates::normalize_separators,
    );

    pub static ref VITAL_RULES: Vec<(Vital, CaptureRule)> = VITALS
        .iter()
        .map(|&(vital, source)| {
            (vital, CaptureRule::new(vital.field_name(), source, super::vitals::strip_spaces))
        })
        .collect();

    pub static ref DIAGNOSIS_RULE: SectionRule = SectionRule::new(
        "diagnosis",
        DIAGNOSIS_LABEL,
        Some(DIAGNOSIS_END),
        false,
        SectionShape::Lines,
    );

    pub static ref COMPLAINTS_RULE: SectionRule = SectionRule::new(
        "complaints",
        COMPLAINTS_LABEL,
        Some(LINE_END),
        true,
        SectionShape::Line,
    );

    pub static ref REACTIONS_RULE: SectionRule = SectionRule::new(
        "reactions",
        REACTIONS_LABEL,
        Some(LINE_END),
        true,
        SectionShape::Line,
    );

    pub static ref INVESTIGATIONS_RULE: SectionRule = SectionRule::new(
        "investigations",
        INVESTIGATIONS_LABEL,
        Some(INVESTIGATIONS_END),
        true,
        SectionShape::Lines,
    );

    pub static ref ADVICE_RULE: SectionRule = SectionRule::new(
        "advice",
        ADVICE_LABEL,
        Some(ADVICE_END),
        true,
        SectionShape::Lines,
    );

    pub static ref MEDICATIONS_RULE: Pattern = Pattern::new("medications", NUMBERED_ITEM);

    pub static ref FOLLOW_UP_RULE: CaptureRule =
        CaptureRule::new("follow_up", FOLLOW_UP, super::dates::trim_value);
}
