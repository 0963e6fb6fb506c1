//! Error taxonomy for client actions.
//!
//! Every error a user sees names the action that failed. Validation
//! errors are raised before any request is sent; transport and
//! application errors come back from the API.

use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Boxed cause of a transport failure.
pub type TransportSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A user-triggered action against the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateStudent,
    AnalyzeText,
    FetchFeedback,
    FetchHistory,
}

impl Action {
    /// Gerund phrase used in "Error ... :" notices.
    pub fn gerund(&self) -> &'static str {
        match self {
            Action::CreateStudent => "creating student",
            Action::AnalyzeText => "analyzing text",
            Action::FetchFeedback => "fetching feedback",
            Action::FetchHistory => "fetching error history",
        }
    }

    /// Infinitive phrase used in "Failed to ..." notices.
    pub fn infinitive(&self) -> &'static str {
        match self {
            Action::CreateStudent => "create student",
            Action::AnalyzeText => "analyze text",
            Action::FetchFeedback => "fetch feedback",
            Action::FetchHistory => "fetch error history",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.infinitive())
    }
}

/// Failure of a single API call, before it is attributed to an action.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or the response could not be read.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportSource),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
}

impl ApiError {
    /// The message shown to the user: the backend detail if present,
    /// otherwise the numeric status code.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(e) => e.to_string(),
            ApiError::Status { status, detail } => match detail {
                Some(d) if !d.trim().is_empty() => d.clone(),
                _ => status.as_u16().to_string(),
            },
        }
    }
}

/// Errors surfaced to the user by the analysis client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected locally; no request was sent.
    #[error("{message}")]
    Validation { action: Action, message: String },

    /// The request never completed.
    #[error("Failed to {action}.")]
    Transport {
        action: Action,
        #[source]
        source: TransportSource,
    },

    /// The backend rejected the request.
    #[error("Error {}: {message}", .action.gerund())]
    Application {
        action: Action,
        status: StatusCode,
        message: String,
    },
}

impl ClientError {
    pub fn validation(action: Action, message: impl Into<String>) -> Self {
        ClientError::Validation {
            action,
            message: message.into(),
        }
    }

    /// Attribute an API failure to the action that issued it.
    pub fn from_api(action: Action, err: ApiError) -> Self {
        match err {
            ApiError::Transport(source) => ClientError::Transport { action, source },
            ApiError::Status { status, .. } => {
                let message = err.user_message();
                ClientError::Application {
                    action,
                    status,
                    message,
                }
            }
        }
    }

    pub fn action(&self) -> Action {
        match self {
            ClientError::Validation { action, .. }
            | ClientError::Transport { action, .. }
            | ClientError::Application { action, .. } => *action,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation { .. })
    }

    /// Process exit code for a one-shot command that ended in this error.
    pub fn exit_code(&self) -> i32 {
        if self.is_validation() {
            2
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_error_uses_detail() {
        let err = ClientError::from_api(
            Action::CreateStudent,
            ApiError::Status {
                status: StatusCode::BAD_REQUEST,
                detail: Some("name taken".to_string()),
            },
        );
        assert_eq!(err.to_string(), "Error creating student: name taken");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_application_error_falls_back_to_status() {
        let err = ClientError::from_api(
            Action::AnalyzeText,
            ApiError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                detail: None,
            },
        );
        assert_eq!(err.to_string(), "Error analyzing text: 500");
    }

    #[test]
    fn test_blank_detail_falls_back_to_status() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            detail: Some("  ".to_string()),
        };
        assert_eq!(err.user_message(), "404");
    }

    #[test]
    fn test_transport_error_names_action() {
        let err = ClientError::from_api(
            Action::CreateStudent,
            ApiError::Transport("connection refused".into()),
        );
        assert_eq!(err.to_string(), "Failed to create student.");
        assert_eq!(err.action(), Action::CreateStudent);
    }

    #[test]
    fn test_validation_exit_code() {
        let err = ClientError::validation(Action::AnalyzeText, "Please enter some text.");
        assert!(err.is_validation());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Please enter some text.");
    }
}
