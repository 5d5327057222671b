use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of answer options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A single multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_option: usize,
    pub explanation: String,
}

/// Reasons a question cannot be used in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuestionIssue {
    #[error("correct option {0} is outside 0..{max}", max = OPTION_COUNT)]
    CorrectOptionOutOfRange(usize),
    #[error("prompt is empty")]
    EmptyPrompt,
    #[error("id appears more than once")]
    DuplicateId,
}

impl Question {
    pub fn is_correct(&self, option: Option<usize>) -> bool {
        option == Some(self.correct_option)
    }

    pub fn validate(&self) -> Result<(), QuestionIssue> {
        if self.correct_option >= OPTION_COUNT {
            return Err(QuestionIssue::CorrectOptionOutOfRange(self.correct_option));
        }
        if self.prompt.trim().is_empty() {
            return Err(QuestionIssue::EmptyPrompt);
        }
        Ok(())
    }
}
