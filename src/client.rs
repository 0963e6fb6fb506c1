//! The analysis client.
//!
//! `AnalysisClient` owns the session state and the two render regions,
//! and mediates every interaction with the backend:
//!
//! - Create Student: validate the name, create, record the new id
//! - Analyze Text: resolve the student id, analyze, render, then fetch
//!   feedback as a best-effort second step
//! - Feedback and error history on demand
//!
//! Each region carries a request ticket. A response whose ticket is no
//! longer the newest for its region is dropped instead of rendered, so
//! overlapping actions resolve as last-request-wins.

use crate::api::GrammarApi;
use crate::error::{Action, ClientError};
use crate::models::{ErrorLogEntry, Feedback, Student, StudentId};
use crate::render::{self, OutputFormat, RenderOptions};
use crate::session::SessionState;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, error, info, warn};

const EMPTY_NAME: &str = "Please enter a student name.";
const EMPTY_TEXT: &str = "Please enter some text.";
const NO_STUDENT: &str = "No valid student ID. Please create a student or enter an existing ID.";

/// The rendered contents of the two output regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    /// Corrected text and detected errors.
    pub analysis: Option<String>,
    /// Feedback for the active student.
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Region {
    Analysis,
    Feedback,
}

/// Monotonic request counters, one per region.
#[derive(Debug, Default)]
struct Tickets {
    analysis: AtomicU64,
    feedback: AtomicU64,
}

impl Tickets {
    fn counter(&self, region: Region) -> &AtomicU64 {
        match region {
            Region::Analysis => &self.analysis,
            Region::Feedback => &self.feedback,
        }
    }

    /// Issue the next ticket for a region.
    fn take(&self, region: Region) -> u64 {
        self.counter(region).fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, region: Region, ticket: u64) -> bool {
        self.counter(region).load(Ordering::SeqCst) == ticket
    }
}

/// What happened during a successful Analyze Text action.
#[derive(Debug, Clone)]
pub struct AnalyzeOutcome {
    pub student_id: StudentId,
    /// False if a newer analysis finished first and this one was discarded.
    pub rendered: bool,
    /// True if the chained feedback fetch updated the feedback region.
    pub feedback_rendered: bool,
}

/// Client for the grammar backend with its own session.
pub struct AnalysisClient {
    api: Arc<dyn GrammarApi>,
    session: Mutex<SessionState>,
    regions: Mutex<Regions>,
    tickets: Tickets,
    format: OutputFormat,
    options: RenderOptions,
    show_progress: bool,
}

impl AnalysisClient {
    pub fn new(api: Arc<dyn GrammarApi>) -> Self {
        Self {
            api,
            session: Mutex::new(SessionState::new()),
            regions: Mutex::new(Regions::default()),
            tickets: Tickets::default(),
            format: OutputFormat::default(),
            options: RenderOptions::default(),
            show_progress: false,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_session(self, session: SessionState) -> Self {
        *lock(&self.session) = session;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn active_student_id(&self) -> Option<StudentId> {
        lock(&self.session).active_student_id()
    }

    pub fn set_active_student_id(&self, id: StudentId) {
        lock(&self.session).set_active_student_id(id);
    }

    /// Snapshot of both regions.
    pub fn regions(&self) -> Regions {
        lock(&self.regions).clone()
    }

    /// Create a student and make it the active one.
    pub async fn create_student(&self, name: &str) -> Result<Student, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::validation(Action::CreateStudent, EMPTY_NAME));
        }

        let spinner = self.spinner(format!("Creating student {}...", name));
        let result = self.api.create_student(name).await;
        finish(spinner);

        let student = result.map_err(|e| report(Action::CreateStudent, e))?;

        self.set_active_student_id(student.student_id);
        info!(
            "Created student {} ({}), now active",
            student.student_id, student.name
        );
        Ok(student)
    }

    /// Make an existing student active, as typed by the user.
    pub fn use_student(&self, raw_id: &str) -> Result<StudentId, ClientError> {
        let id = parse_student_id(Action::AnalyzeText, raw_id)?;
        if id == 0 {
            return Err(ClientError::validation(Action::AnalyzeText, NO_STUDENT));
        }
        self.set_active_student_id(id);
        Ok(id)
    }

    /// Analyze text for the active student, render it, then fetch feedback.
    ///
    /// A non-empty `override_id` replaces the active student before the
    /// student check. Nothing is sent if the text is blank or no usable
    /// student id results.
    pub async fn analyze_text(
        &self,
        text: &str,
        override_id: Option<&str>,
    ) -> Result<AnalyzeOutcome, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::validation(Action::AnalyzeText, EMPTY_TEXT));
        }

        let student_id = self.resolve_student_id(override_id)?;

        let ticket = self.tickets.take(Region::Analysis);
        let spinner = self.spinner("Analyzing text...".to_string());
        let response = self.api.analyze(student_id, text).await;
        finish(spinner);

        let result = response.map_err(|e| report(Action::AnalyzeText, e))?;
        info!(
            "Analysis for student {}: {} error(s)",
            student_id,
            result.errors.len()
        );

        if !self.tickets.is_current(Region::Analysis, ticket) {
            debug!("Discarding stale analysis response (ticket {})", ticket);
            return Ok(AnalyzeOutcome {
                student_id,
                rendered: false,
                feedback_rendered: false,
            });
        }

        let rendered = render::render_analysis(self.format, &result, self.options);
        lock(&self.regions).analysis = Some(rendered);

        let feedback_rendered = self.refresh_feedback(student_id).await;

        Ok(AnalyzeOutcome {
            student_id,
            rendered: true,
            feedback_rendered,
        })
    }

    /// Fetch feedback as the second step of an analysis.
    ///
    /// Failures are logged and leave the feedback region untouched.
    async fn refresh_feedback(&self, student_id: StudentId) -> bool {
        let ticket = self.tickets.take(Region::Feedback);

        match self.api.feedback(student_id).await {
            Ok(feedback) => {
                if !self.tickets.is_current(Region::Feedback, ticket) {
                    debug!("Discarding stale feedback response (ticket {})", ticket);
                    return false;
                }
                let rendered = render::render_feedback(self.format, &feedback);
                lock(&self.regions).feedback = Some(rendered);
                true
            }
            Err(e) => {
                warn!("Could not fetch feedback for student {}: {}", student_id, e);
                false
            }
        }
    }

    /// Fetch and render feedback on demand. Unlike the chained fetch,
    /// failures are surfaced.
    pub async fn fetch_feedback(
        &self,
        student_id: Option<StudentId>,
    ) -> Result<Feedback, ClientError> {
        let student_id = self.target_student(Action::FetchFeedback, student_id)?;

        let ticket = self.tickets.take(Region::Feedback);
        let spinner = self.spinner("Fetching feedback...".to_string());
        let response = self.api.feedback(student_id).await;
        finish(spinner);

        let feedback = response.map_err(|e| report(Action::FetchFeedback, e))?;

        if self.tickets.is_current(Region::Feedback, ticket) {
            let rendered = render::render_feedback(self.format, &feedback);
            lock(&self.regions).feedback = Some(rendered);
        } else {
            debug!("Discarding stale feedback response (ticket {})", ticket);
        }
        Ok(feedback)
    }

    /// Fetch every error the backend has logged for a student.
    pub async fn fetch_history(
        &self,
        student_id: Option<StudentId>,
    ) -> Result<Vec<ErrorLogEntry>, ClientError> {
        let student_id = self.target_student(Action::FetchHistory, student_id)?;

        let spinner = self.spinner("Fetching error history...".to_string());
        let response = self.api.error_history(student_id).await;
        finish(spinner);

        let entries = response.map_err(|e| report(Action::FetchHistory, e))?;
        debug!("{} history entries for student {}", entries.len(), student_id);
        Ok(entries)
    }

    /// Apply an override (if any) and return the id to analyze for.
    ///
    /// The session is only updated when the resulting id is usable.
    fn resolve_student_id(&self, override_id: Option<&str>) -> Result<StudentId, ClientError> {
        let override_id = match override_id.map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(parse_student_id(Action::AnalyzeText, raw)?),
            _ => None,
        };

        let mut session = lock(&self.session);
        let candidate = override_id.or(session.active_student_id());

        match candidate {
            Some(id) if id != 0 => {
                if override_id.is_some() {
                    session.set_active_student_id(id);
                }
                Ok(id)
            }
            _ => Err(ClientError::validation(Action::AnalyzeText, NO_STUDENT)),
        }
    }

    fn target_student(
        &self,
        action: Action,
        explicit: Option<StudentId>,
    ) -> Result<StudentId, ClientError> {
        explicit
            .filter(|id| *id != 0)
            .or_else(|| lock(&self.session).usable_student_id())
            .ok_or_else(|| ClientError::validation(action, NO_STUDENT))
    }

    fn spinner(&self, message: String) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Confirmation shown after a student is created.
pub fn confirmation(student: &Student) -> String {
    format!(
        "Student created: ID = {}, name = {}",
        student.student_id, student.name
    )
}

fn parse_student_id(action: Action, raw: &str) -> Result<StudentId, ClientError> {
    let raw = raw.trim();
    raw.parse::<StudentId>().map_err(|_| {
        ClientError::validation(action, format!("Student ID must be an integer: {}", raw))
    })
}

/// Attribute an API failure to an action and log it with full detail.
fn report(action: Action, err: crate::error::ApiError) -> ClientError {
    error!("Failed to {}: {}", action, err);
    ClientError::from_api(action, err)
}

fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
