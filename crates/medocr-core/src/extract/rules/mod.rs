//! Rule-based field extractors for medical documents.

pub mod dates;
pub mod medications;
pub mod patient;
pub mod patterns;
pub mod sections;
pub mod vitals;

pub use dates::{extract_follow_up, normalize_separators};
pub use medications::{extract_medications, MedicationExtractor};
pub use patient::{extract_age_gender, AgeGender, AgeGenderExtractor};
pub use sections::split_lines;
pub use vitals::{extract_vitals, VitalsExtractor};

use regex::{Captures, Regex};

use crate::error::ExtractionError;

/// Result of evaluating one field rule.
pub type FieldResult<T> = Result<Option<T>, ExtractionError>;

/// Trait for field extractors.
///
/// `Ok(None)` means the field is simply absent from the text; `Err` means
/// the rule itself could not be evaluated. Callers keep the field at its
/// default in both cases.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Field name used in warnings and logs.
    fn field(&self) -> &'static str;

    /// Extract the field from normalized text.
    fn extract(&self, text: &str) -> FieldResult<Self::Output>;
}

/// A compiled pattern that remembers which field it belongs to.
///
/// Compilation errors are kept rather than raised, so a broken pattern
/// disables its own field only.
pub struct Pattern {
    field: &'static str,
    compiled: Result<Regex, regex::Error>,
}

impl Pattern {
    pub fn new(field: &'static str, source: &str) -> Self {
        Self {
            field,
            compiled: Regex::new(source),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    /// The compiled regex, or a pattern evaluation error.
    pub fn regex(&self) -> Result<&Regex, ExtractionError> {
        self.compiled
            .as_ref()
            .map_err(|e| ExtractionError::PatternEvaluation {
                field: self.field.to_string(),
                reason: e.to_string(),
            })
    }

    /// First match's captures, if any.
    pub fn captures<'t>(&self, text: &'t str) -> FieldResult<Captures<'t>> {
        Ok(self.regex()?.captures(text))
    }
}

/// Fetch a capture group that the pattern guarantees on a successful match.
pub fn group<'t>(caps: &Captures<'t>, field: &str, name: &str) -> Result<&'t str, ExtractionError> {
    caps.name(name)
        .map(|m| m.as_str())
        .ok_or_else(|| ExtractionError::MalformedMatch {
            field: field.to_string(),
            group: name.to_string(),
        })
}

/// A single-capture rule: label pattern, capture group 1, formatter.
pub struct CaptureRule {
    pattern: Pattern,
    format: fn(&str) -> String,
}

impl CaptureRule {
    pub fn new(field: &'static str, source: &str, format: fn(&str) -> String) -> Self {
        Self {
            pattern: Pattern::new(field, source),
            format,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl FieldExtractor for CaptureRule {
    type Output = String;

    fn field(&self) -> &'static str {
        self.pattern.field()
    }

    fn extract(&self, text: &str) -> FieldResult<String> {
        let Some(caps) = self.pattern.captures(text)? else {
            return Ok(None);
        };

        let value = caps
            .get(1)
            .ok_or_else(|| ExtractionError::MalformedMatch {
                field: self.field().to_string(),
                group: "1".to_string(),
            })?;

        Ok(Some((self.format)(value.as_str())))
    }
}

/// How a section capture is turned into record values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// The capture is one entry.
    Line,
    /// The capture is split into trimmed, non-empty lines.
    Lines,
}

/// A labeled span of text closed by a terminator.
///
/// The body starts right after the label match and ends at the earliest
/// terminator match starting at or after the body's second character (the
/// body is never empty). Without a terminator match the body runs to the
/// end of the text if the section is open-ended, otherwise the section does
/// not match. Both scans are linear.
pub struct SectionRule {
    label: Pattern,
    terminator: Option<Pattern>,
    open_ended: bool,
    shape: SectionShape,
}

impl SectionRule {
    pub fn new(
        field: &'static str,
        label: &str,
        terminator: Option<&str>,
        open_ended: bool,
        shape: SectionShape,
    ) -> Self {
        Self {
            label: Pattern::new(field, label),
            terminator: terminator.map(|t| Pattern::new(field, t)),
            open_ended,
            shape,
        }
    }

    pub fn field(&self) -> &'static str {
        self.label.field()
    }

    /// Whether every pattern of the rule compiled.
    pub fn is_valid(&self) -> bool {
        self.label.regex().is_ok()
            && self.terminator.as_ref().is_none_or(|t| t.regex().is_ok())
    }

    /// The raw body of the first labeled section.
    pub fn find<'t>(&self, text: &'t str) -> FieldResult<&'t str> {
        let Some(label) = self.label.regex()?.find(text) else {
            return Ok(None);
        };

        let start = label.end();
        let Some(first) = text[start..].chars().next() else {
            return Ok(None);
        };
        let search_from = start + first.len_utf8();

        let end = match &self.terminator {
            Some(terminator) => terminator
                .regex()?
                .find_at(text, search_from)
                .map(|m| m.start()),
            None => None,
        };

        match end {
            Some(end) => Ok(Some(&text[start..end])),
            None if self.open_ended => Ok(Some(&text[start..])),
            None => Ok(None),
        }
    }
}

impl FieldExtractor for SectionRule {
    type Output = Vec<String>;

    fn field(&self) -> &'static str {
        SectionRule::field(self)
    }

    fn extract(&self, text: &str) -> FieldResult<Vec<String>> {
        let Some(body) = self.find(text)? else {
            return Ok(None);
        };

        let values = match self.shape {
            SectionShape::Line => {
                let line = body.trim();
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![line.to_string()]
                }
            }
            SectionShape::Lines => split_lines(body),
        };

        Ok(Some(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(terminator: Option<&str>, open_ended: bool) -> SectionRule {
        SectionRule::new("test", r"(?i)Label[:\s]+", terminator, open_ended, SectionShape::Lines)
    }

    #[test]
    fn test_section_stops_at_earliest_terminator() {
        let rule = section(Some(r"\n\n|STOP"), false);
        assert_eq!(rule.find("Label: a\nb STOP c\n\nd").unwrap(), Some("a\nb "));
        assert_eq!(rule.find("Label: a\nb\n\nSTOP").unwrap(), Some("a\nb"));
    }

    #[test]
    fn test_section_requires_terminator_unless_open_ended() {
        assert_eq!(section(Some(r"\n\n"), false).find("Label: a").unwrap(), None);
        assert_eq!(section(Some(r"\n\n"), true).find("Label: a").unwrap(), Some("a"));
        assert_eq!(section(None, true).find("x Label: a b").unwrap(), Some("a b"));
    }

    #[test]
    fn test_section_body_is_never_empty() {
        // The terminator cannot match at the first body character.
        let rule = section(Some(r"X"), false);
        assert_eq!(rule.find("Label: XyX").unwrap(), Some("Xy"));
        assert_eq!(section(None, true).find("Label: ").unwrap(), None);
    }

    #[test]
    fn test_section_handles_multibyte_body() {
        let rule = section(Some(r"\n"), true);
        assert_eq!(rule.find("Label: é\nnext").unwrap(), Some("é"));
    }

    #[test]
    fn test_broken_pattern_is_isolated() {
        let rule = CaptureRule::new("broken", r"(unclosed", |s| s.to_string());
        let err = rule.extract("anything").unwrap_err();
        assert!(matches!(err, ExtractionError::PatternEvaluation { .. }));
        assert_eq!(err.field(), Some("broken"));

        let section = section(Some(r"[z-a]"), false);
        assert!(!section.is_valid());
        assert!(section.extract("Label: a\n").is_err());
    }

    #[test]
    fn test_capture_rule_without_group_is_malformed() {
        let rule = CaptureRule::new("nogroup", r"Weight", |s| s.to_string());
        let err = rule.extract("Weight 70").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::MalformedMatch {
                field: "nogroup".to_string(),
                group: "1".to_string(),
            }
        );
    }

    #[test]
    fn test_capture_rule_formats_value() {
        let rule = CaptureRule::new("weight", r"W:(\d+)", |s| format!("{} kg", s));
        assert_eq!(rule.extract("W:70").unwrap(), Some("70 kg".to_string()));
        assert_eq!(rule.extract("none").unwrap(), None);
    }
}
