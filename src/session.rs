//! Session state for a single client run.
//!
//! Holds the active student identifier. It starts unset, is set by a
//! successful student creation or an explicit override, and lives as long
//! as the owning client. Nothing here is persisted.

use crate::models::StudentId;

/// The "who are we analyzing text for" slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    active_student_id: Option<StudentId>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session that already targets a student.
    pub fn with_student(id: StudentId) -> Self {
        Self {
            active_student_id: Some(id),
        }
    }

    /// The raw slot value, including a zero id set by an override.
    pub fn active_student_id(&self) -> Option<StudentId> {
        self.active_student_id
    }

    pub fn set_active_student_id(&mut self, id: StudentId) {
        self.active_student_id = Some(id);
    }

    /// The active id if it can be sent to the backend (set and non-zero).
    pub fn usable_student_id(&self) -> Option<StudentId> {
        self.active_student_id.filter(|id| *id != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_unset() {
        let session = SessionState::new();
        assert_eq!(session.active_student_id(), None);
        assert_eq!(session.usable_student_id(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let mut session = SessionState::with_student(42);
        session.set_active_student_id(7);
        assert_eq!(session.active_student_id(), Some(7));
    }

    #[test]
    fn test_zero_is_not_usable() {
        let mut session = SessionState::new();
        session.set_active_student_id(0);
        assert_eq!(session.active_student_id(), Some(0));
        assert_eq!(session.usable_student_id(), None);
    }
}
