//! In-process `GrammarApi` backed by scripted replies.

use super::GrammarApi;
use crate::client::lock;
use crate::error::ApiError;
use crate::models::{AnalysisResult, ErrorLogEntry, Feedback, Student, StudentId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted backend: each endpoint pops canned replies in call order.
#[derive(Default)]
pub struct FakeApi {
    students: Mutex<VecDeque<Result<Student, ApiError>>>,
    analyses: Mutex<VecDeque<(Duration, Result<AnalysisResult, ApiError>)>>,
    feedbacks: Mutex<VecDeque<Result<Feedback, ApiError>>>,
    histories: Mutex<VecDeque<Result<Vec<ErrorLogEntry>, ApiError>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn student(self, id: StudentId, name: &str) -> Self {
        lock(&self.students).push_back(Ok(Student {
            student_id: id,
            name: name.to_string(),
        }));
        self
    }

    pub fn student_err(self, err: ApiError) -> Self {
        lock(&self.students).push_back(Err(err));
        self
    }

    pub fn analysis(self, result: AnalysisResult) -> Self {
        self.delayed_analysis(Duration::ZERO, result)
    }

    pub fn delayed_analysis(self, delay: Duration, result: AnalysisResult) -> Self {
        lock(&self.analyses).push_back((delay, Ok(result)));
        self
    }

    pub fn analysis_err(self, err: ApiError) -> Self {
        lock(&self.analyses).push_back((Duration::ZERO, Err(err)));
        self
    }

    pub fn feedback(self, text: &str) -> Self {
        lock(&self.feedbacks).push_back(Ok(Feedback {
            feedback: text.to_string(),
        }));
        self
    }

    pub fn feedback_err(self, err: ApiError) -> Self {
        lock(&self.feedbacks).push_back(Err(err));
        self
    }

    pub fn history(self, entries: Vec<ErrorLogEntry>) -> Self {
        lock(&self.histories).push_back(Ok(entries));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: String) {
        lock(&self.calls).push(call);
    }
}

fn unscripted() -> ApiError {
    ApiError::Transport("no scripted response".into())
}

#[async_trait]
impl GrammarApi for FakeApi {
    async fn create_student(&self, name: &str) -> Result<Student, ApiError> {
        self.record(format!("create_student {}", name));
        lock(&self.students).pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn analyze(
        &self,
        student_id: StudentId,
        text: &str,
    ) -> Result<AnalysisResult, ApiError> {
        self.record(format!("analyze {} {}", student_id, text));
        let next = lock(&self.analyses).pop_front();
        match next {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Err(unscripted()),
        }
    }

    async fn feedback(&self, student_id: StudentId) -> Result<Feedback, ApiError> {
        self.record(format!("feedback {}", student_id));
        lock(&self.feedbacks).pop_front().unwrap_or_else(|| Err(unscripted()))
    }

    async fn error_history(
        &self,
        student_id: StudentId,
    ) -> Result<Vec<ErrorLogEntry>, ApiError> {
        self.record(format!("history {}", student_id));
        lock(&self.histories).pop_front().unwrap_or_else(|| Err(unscripted()))
    }
}
