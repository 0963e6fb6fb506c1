//! Data models for the GrammarBot API.
//!
//! This module contains the request and response bodies exchanged with
//! the grammar analysis backend. Every field name matches the JSON wire
//! format exactly.

use serde::{Deserialize, Serialize};

/// Integer identifier the backend assigns to a student.
pub type StudentId = i64;

/// Body of `POST /students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
}

/// Successful response of `POST /students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identifier assigned by the backend.
    pub student_id: StudentId,
    /// Canonical name as stored by the backend.
    pub name: String,
}

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub student_id: StudentId,
    pub text: String,
}

/// A single grammar mistake detected in the submitted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarError {
    /// The erroring span as the student wrote it.
    pub original_span: String,
    /// The suggested replacement.
    pub corrected_span: String,
    /// Free-form category label, e.g. "Verb Tense Error".
    pub error_type: String,
}

/// Successful response of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub original_text: String,
    pub corrected_text: String,
    /// Detected errors in the order the backend reported them.
    #[serde(default)]
    pub errors: Vec<GrammarError>,
}

impl AnalysisResult {
    /// Returns true if the backend found nothing to correct.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Successful response of `GET /students/{id}/feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub feedback: String,
}

impl Feedback {
    /// Split the feedback into display lines.
    ///
    /// A single trailing newline does not produce an empty final line.
    pub fn lines(&self) -> Vec<&str> {
        self.feedback
            .strip_suffix('\n')
            .unwrap_or(&self.feedback)
            .split('\n')
            .collect()
    }
}

/// One row of `GET /students/{id}/errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    pub id: i64,
    pub original_text: String,
    pub corrected_text: String,
    pub error_type: String,
    pub original_span: String,
    pub corrected_span: String,
}

/// Body the backend sends alongside non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
