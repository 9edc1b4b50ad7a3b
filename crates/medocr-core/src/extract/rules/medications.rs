//! Medication list extraction.
//!
//! Prescriptions list medicines as numbered items (`1) Tab Dolo 650mg`). An
//! item may wrap onto following lines, so an item runs until the next line
//! that starts with a number marker, not until the end of its line.

use crate::normalize::collapse_whitespace;

use super::patterns::MEDICATIONS_RULE;
use super::{FieldExtractor, FieldResult, Pattern};

/// Numbered-list medication extractor.
pub struct MedicationExtractor {
    marker: &'static Pattern,
}

impl MedicationExtractor {
    pub fn new() -> Self {
        Self {
            marker: &MEDICATIONS_RULE,
        }
    }
}

impl Default for MedicationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MedicationExtractor {
    type Output = Vec<String>;

    fn field(&self) -> &'static str {
        self.marker.field()
    }

    fn extract(&self, text: &str) -> FieldResult<Vec<String>> {
        let markers: Vec<_> = self.marker.regex()?.find_iter(text).collect();
        if markers.is_empty() {
            return Ok(None);
        }

        let items = markers
            .iter()
            .enumerate()
            .map(|(i, marker)| {
                let end = markers.get(i + 1).map_or(text.len(), |next| next.start());
                collapse_whitespace(&text[marker.end()..end])
            })
            .filter(|item| !item.is_empty())
            .collect();

        Ok(Some(items))
    }
}

/// Extract medications from text.
pub fn extract_medications(text: &str) -> Vec<String> {
    MedicationExtractor::new()
        .extract(text)
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbered_items() {
        let text = "1) Paracetamol 500mg twice daily\n2) Ibuprofen 200mg";
        assert_eq!(
            extract_medications(text),
            vec!["Paracetamol 500mg twice daily", "Ibuprofen 200mg"]
        );
    }

    #[test]
    fn test_items_span_lines() {
        let text = "Medicine Name\n1) Tab Augmentin 625mg\n   1-0-1 x 5 days\n 2) Syp Ascoril\n10 ml TDS";
        assert_eq!(
            extract_medications(text),
            vec!["Tab Augmentin 625mg 1-0-1 x 5 days", "Syp Ascoril 10 ml TDS"]
        );
    }

    #[test]
    fn test_marker_must_start_a_line() {
        let text = "1) Tab A 2) Tab B\nTake 3) later";
        assert_eq!(extract_medications(text), vec!["Tab A 2) Tab B Take 3) later"]);
    }

    #[test]
    fn test_empty_items_are_dropped() {
        assert_eq!(extract_medications("1)\n2) Tab B"), vec!["Tab B"]);
        assert!(extract_medications("no list here").is_empty());
    }

    #[test]
    fn test_absent_list_is_none() {
        assert_eq!(MedicationExtractor::new().extract("Advice: rest").unwrap(), None);
    }
}
