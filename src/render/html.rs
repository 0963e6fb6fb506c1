//! HTML rendering.
//!
//! Every string that originates from the backend goes through `escape`
//! before it is placed in markup.

use super::{error_type_counts, RenderOptions, SPAN_SEPARATOR};
use crate::models::{AnalysisResult, ErrorLogEntry, Feedback, GrammarError, StudentId};
use chrono::{DateTime, Utc};

/// Escape text for use in HTML element content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the analysis region as an HTML fragment.
///
/// The error list container is always emitted, even when empty.
pub fn analysis(result: &AnalysisResult, options: RenderOptions) -> String {
    let mut out = String::new();

    if options.show_original {
        out.push_str("<h3>Original Text:</h3>\n");
        out.push_str(&format!("<p>{}</p>\n", escape(&result.original_text)));
    }

    out.push_str("<h3>Corrected Text:</h3>\n");
    out.push_str(&format!("<p>{}</p>\n", escape(&result.corrected_text)));
    out.push_str("<h4>Detected Errors:</h4>\n");
    out.push_str("<div class=\"errors\">\n");
    for error in &result.errors {
        out.push_str(&error_block(error));
    }
    out.push_str("</div>\n");

    out
}

fn error_block(error: &GrammarError) -> String {
    format!(
        "<div><span class=\"error-span\">{}</span><span> {} </span><span class=\"corrected-span\">{}</span> <strong>({})</strong></div>\n",
        escape(&error.original_span),
        SPAN_SEPARATOR,
        escape(&error.corrected_span),
        escape(&error.error_type)
    )
}

/// Render the feedback region. Each newline becomes a `<br/>`.
pub fn feedback(feedback: &Feedback) -> String {
    let body = feedback
        .feedback
        .split('\n')
        .map(escape)
        .collect::<Vec<_>>()
        .join("<br/>");
    format!("<strong>Feedback:</strong><br/>{}\n", body)
}

/// Render a student's logged errors as a table with a per-type summary.
pub fn history(student_id: StudentId, entries: &[ErrorLogEntry]) -> String {
    let mut out = String::new();

    out.push_str(&format!("<h3>Error History for Student {}</h3>\n", student_id));

    if entries.is_empty() {
        out.push_str("<p>No errors recorded.</p>\n");
        return out;
    }

    out.push_str("<h4>By Type:</h4>\n<ul>\n");
    for (error_type, count) in error_type_counts(entries) {
        out.push_str(&format!("<li>{}: {}</li>\n", escape(&error_type), count));
    }
    out.push_str("</ul>\n");

    out.push_str("<table class=\"history\">\n");
    out.push_str("<tr><th>#</th><th>Original</th><th>Correction</th><th>Type</th></tr>\n");
    for entry in entries {
        out.push_str(&format!(
            "<tr><td>{}</td><td class=\"error-span\">{}</td><td class=\"corrected-span\">{}</td><td>{}</td></tr>\n",
            entry.id,
            escape(&entry.original_span),
            escape(&entry.corrected_span),
            escape(&entry.error_type)
        ));
    }
    out.push_str("</table>\n");

    out
}

/// Wrap rendered regions into a standalone page.
pub fn document(output: &str, feedback: Option<&str>, generated_at: DateTime<Utc>) -> String {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>GrammarBot</title>\n</head>\n<body>\n");
    page.push_str("<div id=\"output\">\n");
    page.push_str(output);
    page.push_str("</div>\n");
    if let Some(feedback) = feedback {
        page.push_str("<div id=\"feedback\">\n");
        page.push_str(feedback);
        page.push_str("</div>\n");
    }
    page.push_str(&format!(
        "<footer>Generated {}</footer>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    page.push_str("</body>\n</html>\n");

    page
}
