//! Rendering of the analysis and feedback regions.
//!
//! Each region can be rendered as plain text for the terminal, as an HTML
//! fragment, or as JSON. HTML output escapes every piece of text that came
//! from the backend.

pub mod html;
pub mod text;

use crate::models::{AnalysisResult, ErrorLogEntry, Feedback, StudentId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Separator drawn between an original span and its correction.
pub const SPAN_SEPARATOR: &str = "\u{2192}";

/// Output format for rendered regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text (default)
    #[default]
    Text,
    /// HTML fragments with escaped content
    Html,
    /// Raw JSON as returned by the backend
    Json,
}

/// Options that affect how the analysis region is drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Show the submitted text above the corrected text.
    pub show_original: bool,
}

/// Render the analysis region.
pub fn render_analysis(
    format: OutputFormat,
    result: &AnalysisResult,
    options: RenderOptions,
) -> String {
    match format {
        OutputFormat::Text => text::analysis(result, options),
        OutputFormat::Html => html::analysis(result, options),
        OutputFormat::Json => serde_json::to_string_pretty(result).unwrap_or_default(),
    }
}

/// Render the feedback region.
pub fn render_feedback(format: OutputFormat, feedback: &Feedback) -> String {
    match format {
        OutputFormat::Text => text::feedback(feedback),
        OutputFormat::Html => html::feedback(feedback),
        OutputFormat::Json => serde_json::to_string_pretty(feedback).unwrap_or_default(),
    }
}

/// Render a student's error history.
pub fn render_history(
    format: OutputFormat,
    student_id: StudentId,
    entries: &[ErrorLogEntry],
) -> String {
    match format {
        OutputFormat::Text => text::history(student_id, entries),
        OutputFormat::Html => html::history(student_id, entries),
        OutputFormat::Json => serde_json::to_string_pretty(entries).unwrap_or_default(),
    }
}

/// Count history entries per error type, most frequent first.
///
/// Ties keep the order in which each type first appeared.
pub fn error_type_counts(entries: &[ErrorLogEntry]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for entry in entries {
        let count = counts.entry(entry.error_type.as_str()).or_insert(0);
        if *count == 0 {
            order.push(entry.error_type.as_str());
        }
        *count += 1;
    }

    let mut result: Vec<(String, usize)> = order
        .into_iter()
        .map(|t| (t.to_string(), counts[t]))
        .collect();
    result.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(error_type: &str) -> ErrorLogEntry {
        ErrorLogEntry {
            id: 1,
            original_text: "x".to_string(),
            corrected_text: "y".to_string(),
            error_type: error_type.to_string(),
            original_span: "x".to_string(),
            corrected_span: "y".to_string(),
        }
    }

    #[test]
    fn test_error_type_counts_ordering() {
        let entries = vec![
            entry("Spelling Error"),
            entry("Verb Tense Error"),
            entry("Verb Tense Error"),
            entry("Punctuation Error"),
        ];
        let counts = error_type_counts(&entries);
        assert_eq!(
            counts,
            vec![
                ("Verb Tense Error".to_string(), 2),
                ("Spelling Error".to_string(), 1),
                ("Punctuation Error".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_render_json_passthrough() {
        let feedback = Feedback {
            feedback: "Great job!".to_string(),
        };
        let json = render_feedback(OutputFormat::Json, &feedback);
        assert!(json.contains("\"feedback\""));
        assert!(json.contains("Great job!"));
    }

    #[test]
    fn test_output_format_from_toml_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let w: Wrapper = toml::from_str("format = \"html\"").unwrap();
        assert_eq!(w.format, OutputFormat::Html);
    }
}
