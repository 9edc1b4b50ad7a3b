//! OCR text normalization.
//!
//! OCR engines emit irregular spacing: runs of spaces between columns, tabs,
//! non-breaking spaces and stacks of blank lines between paragraphs. The
//! field patterns are written against a stable shape instead, where a
//! horizontal gap is one space and a paragraph break is exactly one blank
//! line.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Horizontal whitespace: any Unicode whitespace except CR and LF.
    static ref HORIZONTAL_RUN: Regex = Regex::new(r"[^\S\r\n]+").unwrap();

    /// A line ending (with any CRs before it), whitespace-only content, and
    /// another newline.
    static ref BLANK_LINE_RUN: Regex = Regex::new(r"\r*\n\s*\n").unwrap();
}

/// Normalize raw OCR text for field extraction.
///
/// Every run of horizontal whitespace becomes a single space, and every run
/// of blank lines becomes exactly one blank line (`"\n\n"`). Total and
/// idempotent.
///
/// ```
/// use medocr_core::normalize;
///
/// assert_eq!(normalize("BP:\t120/80   mmHg"), "BP: 120/80 mmHg");
/// assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
/// ```
pub fn normalize(raw: &str) -> String {
    let collapsed = HORIZONTAL_RUN.replace_all(raw, " ");
    BLANK_LINE_RUN.replace_all(&collapsed, "\n\n").into_owned()
}

/// Collapse every whitespace run (newlines included) to one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_spaces_and_tabs() {
        assert_eq!(normalize("a   b"), "a b");
        assert_eq!(normalize("a\t \tb"), "a b");
        assert_eq!(normalize("Weight(Kg):\u{a0}\u{a0}72"), "Weight(Kg): 72");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalize("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(normalize("a\n  \n\t\n \nb"), "a\n\nb");
        assert_eq!(normalize("a\r\n\r\nb"), "a\n\nb");
        assert_eq!(normalize("x\r\r\n\nb"), "x\n\nb");
    }

    #[test]
    fn test_single_newlines_survive() {
        assert_eq!(normalize("line one\nline two"), "line one\nline two");
        assert_eq!(normalize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), " ");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            " ",
            "\n",
            "\n \n",
            " \n \n ",
            "PATIENT (F) / 45Y\n\n\n   Diagnosis :  Viral fever  \n \n",
            "a\r\n \r\n\tb",
            "1)  Tab  Dolo\n      650mg\n\n\n2) Syp  Ascoril",
            "\u{a0}\u{2003}x\u{a0}\n\u{a0}\n\u{a0}y",
            "x\r\r\n\nb",
            "a\r\r\r\n\r\n\rb",
            "\r",
            "a\rb",
            "\n\n\r",
            "a \r\n\r\r\n \r b",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Tab Dolo\n   650mg  "), "Tab Dolo 650mg");
        assert_eq!(collapse_whitespace("\n\n"), "");
    }
}
