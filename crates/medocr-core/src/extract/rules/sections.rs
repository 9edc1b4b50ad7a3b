//! Free-text sections: diagnosis, complaints, reactions, investigations, advice.

/// Split a section body into trimmed, non-empty lines in document order.
pub fn split_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::rules::patterns::{
        ADVICE_RULE, COMPLAINTS_RULE, DIAGNOSIS_RULE, INVESTIGATIONS_RULE, REACTIONS_RULE,
    };
    use crate::extract::rules::FieldExtractor;
    use pretty_assertions::assert_eq;

    fn lines(values: &[&str]) -> Option<Vec<String>> {
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_diagnosis_until_blank_line() {
        let text = "Diagnosis: Viral fever\nDehydration\n\nBP: 120/80";
        assert_eq!(
            DIAGNOSIS_RULE.extract(text).unwrap(),
            lines(&["Viral fever", "Dehydration"])
        );
    }

    #[test]
    fn test_diagnosis_until_medicine_name() {
        let text = "DIAGNOSIS - Acute gastritis\nMedicine Name Dosage\n1) Tab Pan 40";
        assert_eq!(DIAGNOSIS_RULE.extract(text).unwrap(), lines(&["Acute gastritis"]));
    }

    #[test]
    fn test_diagnosis_keeps_duplicates() {
        let text = "Diagnosis:\nAsthma\n Asthma \n\n";
        assert_eq!(DIAGNOSIS_RULE.extract(text).unwrap(), lines(&["Asthma", "Asthma"]));
    }

    #[test]
    fn test_diagnosis_without_terminator() {
        assert_eq!(DIAGNOSIS_RULE.extract("Diagnosis: Flu").unwrap(), None);
        assert_eq!(DIAGNOSIS_RULE.extract("no label here").unwrap(), None);
    }

    #[test]
    fn test_single_line_sections() {
        let text = "Chief Complaints: Fever since 3 days, cough\nAdverse Reactions: None known\n";
        assert_eq!(
            COMPLAINTS_RULE.extract(text).unwrap(),
            lines(&["Fever since 3 days, cough"])
        );
        assert_eq!(REACTIONS_RULE.extract(text).unwrap(), lines(&["None known"]));
        assert_eq!(
            REACTIONS_RULE.extract("Adverse Reactions: rash").unwrap(),
            lines(&["rash"])
        );
    }

    #[test]
    fn test_investigations_terminators() {
        let text = "Investigations: CBC\nLFT\nAdvice: rest";
        assert_eq!(INVESTIGATIONS_RULE.extract(text).unwrap(), lines(&["CBC", "LFT"]));

        let text = "Tests - X-ray chest\nMedicine: none";
        assert_eq!(INVESTIGATIONS_RULE.extract(text).unwrap(), lines(&["X-ray chest"]));

        let text = "Investigations: CBC\nUrine routine";
        assert_eq!(
            INVESTIGATIONS_RULE.extract(text).unwrap(),
            lines(&["CBC", "Urine routine"])
        );
    }

    #[test]
    fn test_advice_until_follow_up() {
        let text = "Advice: Plenty of fluids\nAvoid oily food\nFollow Up: 12/05/2025";
        assert_eq!(
            ADVICE_RULE.extract(text).unwrap(),
            lines(&["Plenty of fluids", "Avoid oily food"])
        );

        let text = "Advice: Rest\n Next Visit after a week";
        assert_eq!(ADVICE_RULE.extract(text).unwrap(), lines(&["Rest"]));

        assert_eq!(ADVICE_RULE.extract("Advice: Rest").unwrap(), lines(&["Rest"]));
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(" a \n\n b\r\n"), vec!["a", "b"]);
        assert!(split_lines("\n \n").is_empty());
    }
}
