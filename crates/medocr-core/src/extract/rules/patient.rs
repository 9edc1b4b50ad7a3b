//! Patient demographics: age, gender and weight.

use super::patterns::AGE_GENDER_RULES;
use super::{group, FieldExtractor, FieldResult, Pattern};

/// Age and gender found together by one pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgeGender {
    /// Age in years as written (1-3 digits).
    pub age: String,
    /// Gender token, case-normalized.
    pub gender: String,
}

/// Age/gender extractor trying each pattern in order; the first match wins.
pub struct AgeGenderExtractor {
    patterns: &'static [Pattern],
}

impl AgeGenderExtractor {
    pub fn new() -> Self {
        Self {
            patterns: &AGE_GENDER_RULES[..],
        }
    }
}

impl Default for AgeGenderExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AgeGenderExtractor {
    type Output = AgeGender;

    fn field(&self) -> &'static str {
        "patient.age_gender"
    }

    fn extract(&self, text: &str) -> FieldResult<AgeGender> {
        for pattern in self.patterns {
            if let Some(caps) = pattern.captures(text)? {
                let age = group(&caps, self.field(), "age")?.trim();
                let gender = group(&caps, self.field(), "gender")?;
                return Ok(Some(AgeGender {
                    age: age.to_string(),
                    gender: normalize_gender(gender),
                }));
            }
        }
        Ok(None)
    }
}

/// Extract age and gender from text.
pub fn extract_age_gender(text: &str) -> Option<AgeGender> {
    AgeGenderExtractor::new().extract(text).ok().flatten()
}

/// Normalize the case of a gender token: `m` → `M`, `FEMALE` → `Female`.
pub fn normalize_gender(token: &str) -> String {
    let token = token.trim();
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Format a captured weight as `"<digits> kg"`.
pub fn format_weight(digits: &str) -> String {
    format!("{} kg", digits.trim())
}
