use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::engine::{EngineError, validate_questions};
use crate::models::Question;

const BUILTIN_QUESTIONS: &str = include_str!("../../questions.json");

/// Errors raised while loading a question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid question bank: {0}")]
    Invalid(#[from] EngineError),
}

/// The environmental question bank compiled into the binary.
pub fn builtin_questions() -> Result<Vec<Question>, LoadError> {
    parse_questions(BUILTIN_QUESTIONS)
}

pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Question>, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let questions = parse_questions(&json_content)?;
    info!(path = %path.display(), count = questions.len(), "loaded question bank");
    Ok(questions)
}

pub fn parse_questions(json: &str) -> Result<Vec<Question>, LoadError> {
    let questions: Vec<Question> = serde_json::from_str(json)?;
    validate_questions(&questions)?;
    Ok(questions)
}
