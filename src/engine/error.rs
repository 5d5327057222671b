use thiserror::Error;

use crate::models::QuestionIssue;

/// Broad class of an engine rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The arguments themselves are bad.
    InvalidInput,
    /// The operation is not legal in the current phase.
    InvalidTransition,
}

/// A rejected engine operation. State is never modified when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("question set is empty")]
    EmptyQuestionSet,
    #[error("question {id}: {issue}")]
    InvalidQuestion { id: u32, issue: QuestionIssue },
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("option {index} is out of range (question has {count} options)")]
    OptionOutOfRange { index: usize, count: usize },
    #[error("no option selected")]
    NothingSelected,
    #[error("answer already locked in")]
    AlreadyRevealed,
    #[error("no answer is being revealed")]
    NotRevealing,
    #[error("session already completed")]
    SessionCompleted,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::EmptyQuestionSet
            | EngineError::InvalidQuestion { .. }
            | EngineError::InvalidConfig(_)
            | EngineError::OptionOutOfRange { .. } => ErrorKind::InvalidInput,
            EngineError::NothingSelected
            | EngineError::AlreadyRevealed
            | EngineError::NotRevealing
            | EngineError::SessionCompleted => ErrorKind::InvalidTransition,
        }
    }
}
