//! Backend API access.
//!
//! This module provides the `GrammarApi` seam and its HTTP implementation.

#[cfg(test)]
pub mod fake;
pub mod http;

pub use http::HttpApi;

use crate::error::ApiError;
use crate::models::{AnalysisResult, ErrorLogEntry, Feedback, Student, StudentId};
use async_trait::async_trait;

/// Operations the grammar backend exposes.
#[async_trait]
pub trait GrammarApi: Send + Sync {
    /// `POST /students`
    async fn create_student(&self, name: &str) -> Result<Student, ApiError>;

    /// `POST /analyze`
    async fn analyze(&self, student_id: StudentId, text: &str) -> Result<AnalysisResult, ApiError>;

    /// `GET /students/{id}/feedback`
    async fn feedback(&self, student_id: StudentId) -> Result<Feedback, ApiError>;

    /// `GET /students/{id}/errors`
    async fn error_history(&self, student_id: StudentId) -> Result<Vec<ErrorLogEntry>, ApiError>;
}
