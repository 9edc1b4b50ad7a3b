//! Vital sign extraction.

use std::collections::BTreeMap;

use tracing::warn;

use crate::models::Vital;

use super::patterns::VITAL_RULES;
use super::{CaptureRule, FieldExtractor};

/// Extractor over the vital sign rule table.
pub struct VitalsExtractor {
    rules: &'static [(Vital, CaptureRule)],
}

impl VitalsExtractor {
    pub fn new() -> Self {
        Self {
            rules: VITAL_RULES.as_slice(),
        }
    }

    /// Rules in table order, one per vital.
    pub fn rules(&self) -> impl Iterator<Item = (Vital, &'static CaptureRule)> {
        self.rules.iter().map(|(vital, rule)| (*vital, rule))
    }

    /// Extract every vital present in the text. A rule that fails is logged
    /// and skipped.
    pub fn extract_all(&self, text: &str) -> BTreeMap<Vital, String> {
        let mut vitals = BTreeMap::new();
        for (vital, rule) in self.rules() {
            match rule.extract(text) {
                Ok(Some(value)) => {
                    vitals.insert(vital, value);
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping {}: {}", vital, e),
            }
        }
        vitals
    }
}

impl Default for VitalsExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract vitals from text.
pub fn extract_vitals(text: &str) -> BTreeMap<Vital, String> {
    VitalsExtractor::new().extract_all(text)
}

/// Remove every space from a captured value (`120 / 80` → `120/80`).
pub fn strip_spaces(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vital(text: &str, vital: Vital) -> Option<String> {
        extract_vitals(text).remove(&vital)
    }

    #[test]
    fn test_blood_pressure() {
        assert_eq!(vital("BP: 120/80 mmHg", Vital::Bp), Some("120/80".to_string()));
        assert_eq!(vital("BP 120 / 80", Vital::Bp), Some("120/80".to_string()));
        assert_eq!(vital("Blood Pressure:130/90mmHg", Vital::Bp), Some("130/90".to_string()));
        assert_eq!(vital("SBP: 120/80", Vital::Bp), None);
    }

    #[test]
    fn test_pulse() {
        assert_eq!(vital("Pulse: 72 bpm", Vital::Pulse), Some("72".to_string()));
        assert_eq!(vital("Heart Rate 104", Vital::Pulse), Some("104".to_string()));
    }

    #[test]
    fn test_temperature() {
        assert_eq!(vital("Temp: 98.6 °F", Vital::Temp), Some("98.6".to_string()));
        assert_eq!(vital("Temperature: 37.2C", Vital::Temp), Some("37.2".to_string()));
        assert_eq!(vital("temp 102.5F", Vital::Temp), Some("102.5".to_string()));
    }

    #[test]
    fn test_respiratory_rate_and_saturation() {
        assert_eq!(vital("RR: 18/min", Vital::Rr), Some("18".to_string()));
        assert_eq!(vital("Respiratory Rate 22", Vital::Rr), Some("22".to_string()));
        assert_eq!(vital("SpO2: 98%", Vital::Spo2), Some("98".to_string()));
        assert_eq!(vital("Oxygen Saturation 100 %", Vital::Spo2), Some("100".to_string()));
    }

    #[test]
    fn test_absent_vitals_are_absent_keys() {
        let vitals = extract_vitals("BP: 110/70\nPulse: 80");
        assert_eq!(vitals.len(), 2);
        assert!(!vitals.contains_key(&Vital::Temp));
        assert!(extract_vitals("").is_empty());
    }

    #[test]
    fn test_strip_spaces() {
        assert_eq!(strip_spaces(" 120 / 80 "), "120/80");
    }
}
