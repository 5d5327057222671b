//! Quiz session engine.
//!
//! `SessionState` holds one attempt and its transitions. `QuizEngine` owns the
//! state together with a `Scheduler` that drives the countdown and the reveal
//! delay.

mod error;
mod quiz;
mod scheduler;
mod session;
mod summary;

pub use error::{EngineError, ErrorKind};
pub use quiz::QuizEngine;
pub(crate) use quiz::validate_config;
pub use quiz::validate_questions;
pub use scheduler::{Fired, ManualScheduler, Scheduler, TimerId, TimerKind, TokioScheduler};
pub use session::{Phase, SessionState, Transition};
pub use summary::{AnswerResult, Summary, Tier};
