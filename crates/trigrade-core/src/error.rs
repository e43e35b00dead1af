//! Session error types.
//!
//! Failures surfaced by the session store and quiz assembly. Missing
//! prerequisite state (grading before a quiz exists, analytics before any
//! records exist) is reported through the same enum but classified as
//! informational so front ends can show a notice instead of failing.

use thiserror::Error;

/// Errors that can occur while operating on a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Grading was requested before any quiz was generated.
    #[error("no quiz has been generated yet")]
    NoQuiz,

    /// Response analytics were requested before anything was graded.
    #[error("no graded responses yet")]
    NoResponses,

    /// Rubric analytics were requested before any rubric was saved.
    #[error("no rubric scores saved yet")]
    NoRubricScores,

    /// The student is not on the roster.
    #[error("unknown student: {0}")]
    UnknownStudent(String),

    /// The item is not part of the active quiz.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The task is not in the performance task bank.
    #[error("unknown performance task: {0}")]
    UnknownTask(String),

    /// A choice-based item received a value outside its choice list.
    #[error("'{value}' is not a choice of item {item_id}")]
    InvalidChoice { item_id: String, value: String },

    /// Quiz generation was requested with no topics selected.
    #[error("at least one topic must be selected")]
    EmptyTopicSelection,

    /// Requested item count is outside the supported range.
    #[error("item count {requested} is outside {min}..={max}")]
    ItemCount {
        requested: usize,
        min: usize,
        max: usize,
    },

    /// A composite record key could not be parsed.
    #[error("malformed record key: {0}")]
    InvalidKey(String),
}

impl SessionError {
    /// Returns `true` if this error only reports missing prerequisite state.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            SessionError::NoQuiz | SessionError::NoResponses | SessionError::NoRubricScores
        )
    }
}
