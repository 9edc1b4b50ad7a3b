//! Date fields: follow-up visit and health card expiry.

use super::patterns::{FOLLOW_UP_RULE, HEALTH_CARD_RULE};
use super::FieldExtractor;

/// Extract the follow-up date, verbatim (`DD/MM/YYYY`, `DD-MM-YY`, ...).
pub fn extract_follow_up(text: &str) -> Option<String> {
    FOLLOW_UP_RULE.extract(text).ok().flatten()
}

/// Extract the health card expiry date as `YYYY-MM-DD`.
pub fn extract_health_card_expiry(text: &str) -> Option<String> {
    HEALTH_CARD_RULE.extract(text).ok().flatten()
}

/// Replace `/` date separators with `-`.
pub fn normalize_separators(date: &str) -> String {
    date.trim().replace('/', "-")
}

pub fn trim_value(value: &str) -> String {
    value.trim().to_string()
}
