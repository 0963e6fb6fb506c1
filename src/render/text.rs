//! Plain-text rendering for the terminal.

use super::{error_type_counts, RenderOptions, SPAN_SEPARATOR};
use crate::models::{AnalysisResult, ErrorLogEntry, Feedback, StudentId};

/// Neutralize terminal control sequences in backend text.
///
/// Every control character other than `\n` and `\t` (ESC, BEL, CR, C1
/// codes) becomes U+FFFD, so escape sequences print as inert text.
pub fn escape(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                char::REPLACEMENT_CHARACTER
            } else {
                c
            }
        })
        .collect()
}

pub fn analysis(result: &AnalysisResult, options: RenderOptions) -> String {
    let mut out = String::new();

    if options.show_original {
        out.push_str("Original Text:\n");
        out.push_str(&format!("  {}\n\n", escape(&result.original_text)));
    }

    out.push_str("Corrected Text:\n");
    out.push_str(&format!("  {}\n\n", escape(&result.corrected_text)));

    out.push_str(&format!("Detected Errors ({}):\n", result.errors.len()));
    if result.is_clean() {
        out.push_str("  (none)\n");
    }
    for (i, error) in result.errors.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} {} {} ({})\n",
            i + 1,
            escape(&error.original_span),
            SPAN_SEPARATOR,
            escape(&error.corrected_span),
            escape(&error.error_type)
        ));
    }

    out
}

pub fn feedback(feedback: &Feedback) -> String {
    let mut out = String::from("Feedback:\n");
    for line in feedback.lines() {
        out.push_str(&format!("  {}\n", escape(line)));
    }
    out
}

pub fn history(student_id: StudentId, entries: &[ErrorLogEntry]) -> String {
    let mut out = format!("Error History for Student {}:\n", student_id);

    if entries.is_empty() {
        out.push_str("  No errors recorded.\n");
        return out;
    }

    out.push_str("\n  By Type:\n");
    for (error_type, count) in error_type_counts(entries) {
        out.push_str(&format!("    - {}: {}\n", escape(&error_type), count));
    }

    out.push_str(&format!("\n  Entries ({}):\n", entries.len()));
    for entry in entries {
        out.push_str(&format!(
            "    #{} {} {} {} ({})\n",
            entry.id,
            escape(&entry.original_span),
            SPAN_SEPARATOR,
            escape(&entry.corrected_span),
            escape(&entry.error_type)
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GrammarError;

    #[test]
    fn test_analysis_lists_errors_in_order() {
        let result = AnalysisResult {
            original_text: "She go to store".to_string(),
            corrected_text: "She goes to the store".to_string(),
            errors: vec![
                GrammarError {
                    original_span: "go".to_string(),
                    corrected_span: "goes".to_string(),
                    error_type: "Verb Tense Error".to_string(),
                },
                GrammarError {
                    original_span: "store".to_string(),
                    corrected_span: "the store".to_string(),
                    error_type: "Determiner Error".to_string(),
                },
            ],
        };
        let text = analysis(&result, RenderOptions::default());
        assert!(text.contains("  She goes to the store\n"));
        assert!(text.contains("Detected Errors (2):"));
        assert!(text.contains("  1. go \u{2192} goes (Verb Tense Error)\n"));
        assert!(text.contains("  2. store \u{2192} the store (Determiner Error)\n"));
    }

    #[test]
    fn test_analysis_clean_result_keeps_section() {
        let result = AnalysisResult {
            original_text: "Hi.".to_string(),
            corrected_text: "Hi.".to_string(),
            errors: vec![],
        };
        let text = analysis(
            &result,
            RenderOptions {
                show_original: true,
            },
        );
        assert!(text.starts_with("Original Text:\n  Hi.\n"));
        assert!(text.contains("Detected Errors (0):\n  (none)\n"));
    }

    #[test]
    fn test_feedback_one_line_per_newline() {
        let text = feedback(&Feedback {
            feedback: "Line1\nLine2".to_string(),
        });
        assert_eq!(text, "Feedback:\n  Line1\n  Line2\n");
    }

    #[test]
    fn test_escape_neutralizes_control_sequences() {
        assert_eq!(escape("a\tb\nc"), "a\tb\nc");
        assert_eq!(escape("x\ry"), "x\u{FFFD}y");

        let text = feedback(&Feedback {
            feedback: "\x1b]0;pwned\x07\x1b[2JLine1".to_string(),
        });
        assert!(!text.contains('\x1b'));
        assert!(!text.contains('\x07'));
        assert_eq!(text, "Feedback:\n  \u{FFFD}]0;pwned\u{FFFD}\u{FFFD}[2JLine1\n");
    }

    #[test]
    fn test_analysis_escapes_backend_fields() {
        let result = AnalysisResult {
            original_text: "in\x1b[31m".to_string(),
            corrected_text: "out\x1b[2J".to_string(),
            errors: vec![GrammarError {
                original_span: "a\x07".to_string(),
                corrected_span: "b\u{9b}".to_string(),
                error_type: "Type\r".to_string(),
            }],
        };
        let text = analysis(
            &result,
            RenderOptions {
                show_original: true,
            },
        );
        assert!(!text.chars().any(|c| c.is_control() && c != '\n'));
        assert!(text.contains("  1. a\u{FFFD} \u{2192} b\u{FFFD} (Type\u{FFFD})\n"));
    }

    #[test]
    fn test_history_summary() {
        let entries = vec![ErrorLogEntry {
            id: 3,
            original_text: "teh cat".to_string(),
            corrected_text: "the cat".to_string(),
            error_type: "Spelling Error".to_string(),
            original_span: "teh".to_string(),
            corrected_span: "the".to_string(),
        }];
        let text = history(1, &entries);
        assert!(text.contains("- Spelling Error: 1"));
        assert!(text.contains("#3 teh \u{2192} the (Spelling Error)"));
    }
}
