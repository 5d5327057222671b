//! # eco-quiz
//!
//! A timed environmental quiz: a session engine plus a terminal front end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use eco_quiz::{Quiz, QuizConfig, QuizError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Load questions from a JSON file
//!     let quiz = Quiz::from_json("questions.json", QuizConfig::default())?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The engine can also be driven without a terminal:
//!
//! ```rust
//! use std::time::Duration;
//!
//! use eco_quiz::{ManualScheduler, QuizConfig, QuizEngine, builtin_questions};
//!
//! let questions = builtin_questions().unwrap();
//! let mut engine =
//!     QuizEngine::start(questions, QuizConfig::default(), ManualScheduler::new()).unwrap();
//! engine.select_option(1).unwrap();
//! engine.submit_answer().unwrap();
//! engine.advance_clock(Duration::from_secs(2));
//! assert_eq!(engine.score(), 1);
//! assert_eq!(engine.state().current_index(), 1);
//! ```

mod app;
pub mod config;
mod data;
pub mod engine;
mod models;
pub mod telemetry;
pub mod terminal;
mod ui;

use std::io;
use std::path::Path;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;

pub use app::{App, Screen};
pub use config::{ConfigError, QuizConfig};
pub use data::{LoadError, builtin_questions, load_questions_from_json, parse_questions};
pub use engine::{
    EngineError, ErrorKind, Fired, ManualScheduler, Phase, QuizEngine, Scheduler, SessionState,
    Summary, Tier, TokioScheduler, validate_questions,
};
pub use models::{OPTION_COUNT, Question, QuestionIssue};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Quiz engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// A quiz that can be run in the terminal.
pub struct Quiz {
    questions: Vec<Question>,
    config: QuizConfig,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, config: QuizConfig) -> Result<Self, QuizError> {
        config.validate()?;
        validate_questions(&questions)?;
        Ok(Self { questions, config })
    }

    /// The built-in environmental question bank.
    pub fn builtin(config: QuizConfig) -> Result<Self, QuizError> {
        Self::new(builtin_questions()?, config)
    }

    /// Load a quiz from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use eco_quiz::{Quiz, QuizConfig};
    ///
    /// let quiz = Quiz::from_json("questions.json", QuizConfig::default()).expect("Failed to load quiz");
    /// ```
    pub fn from_json<P: AsRef<Path>>(path: P, config: QuizConfig) -> Result<Self, QuizError> {
        let questions = load_questions_from_json(path)?;
        Self::new(questions, config)
    }

    /// Run the quiz in the terminal.
    ///
    /// Takes over the terminal until the user quits. Must be awaited inside
    /// a tokio runtime, which drives the countdown timers.
    pub async fn run(self) -> Result<(), QuizError> {
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let mut app = App::new(self.questions, self.config, TokioScheduler::new(timer_tx))?;

        let mut term = terminal::init()?;
        let result = run_event_loop(&mut term, &mut app, timer_rx).await;
        terminal::restore()?;
        result
    }
}

/// Key presses and timer deliveries are handled one at a time on this task.
async fn run_event_loop(
    terminal: &mut terminal::QuizTerminal,
    app: &mut App<TokioScheduler>,
    mut timers: mpsc::UnboundedReceiver<Fired>,
) -> Result<(), QuizError> {
    let mut events = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        tokio::select! {
            Some(fired) = timers.recv() => app.handle_timer(fired),
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_input(app, key.code) {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input<S: Scheduler>(app: &mut App<S>, key: KeyCode) -> bool {
    match app.screen {
        Screen::Welcome => handle_welcome_input(app, key),
        Screen::Quiz => handle_quiz_input(app, key),
        Screen::Result => handle_result_input(app, key),
    }
}

fn handle_welcome_input<S: Scheduler>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_quiz_input<S: Scheduler>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_previous_option();
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next_option();
            false
        }
        KeyCode::Char(c @ '1'..='4') => {
            app.select_option(c as usize - '1' as usize);
            false
        }
        KeyCode::Char(c @ 'a'..='d') => {
            app.select_option(c as usize - 'a' as usize);
            false
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.submit_answer();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_result_input<S: Scheduler>(app: &mut App<S>, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_results_down();
            false
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_results_up();
            false
        }
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App<ManualScheduler> {
        App::new(
            builtin_questions().unwrap(),
            QuizConfig::default(),
            ManualScheduler::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_welcome_keys() {
        let mut app = app();
        assert!(!handle_input(&mut app, KeyCode::Char('x')));
        assert_eq!(app.screen, Screen::Welcome);
        assert!(!handle_input(&mut app, KeyCode::Enter));
        assert_eq!(app.screen, Screen::Quiz);
    }

    #[test]
    fn test_direct_selection_keys() {
        let mut app = app();
        handle_input(&mut app, KeyCode::Enter);

        handle_input(&mut app, KeyCode::Char('3'));
        assert_eq!(app.selected_option(), Some(2));
        handle_input(&mut app, KeyCode::Char('b'));
        assert_eq!(app.selected_option(), Some(1));

        handle_input(&mut app, KeyCode::Enter);
        let engine = app.engine().unwrap();
        assert_eq!(engine.state().phase(), Phase::Revealing);
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(handle_input(&mut app, KeyCode::Char('q')));
        handle_input(&mut app, KeyCode::Enter);
        assert!(handle_input(&mut app, KeyCode::Char('Q')));
    }

    #[test]
    fn test_quiz_rejects_zero_time_limit() {
        let config = QuizConfig {
            question_time_limit_secs: 0,
            ..QuizConfig::default()
        };
        assert!(matches!(
            Quiz::builtin(config),
            Err(QuizError::Config(ConfigError::Invalid(_)))
        ));
        assert!(matches!(
            Quiz::new(Vec::new(), QuizConfig::default()),
            Err(QuizError::Engine(EngineError::EmptyQuestionSet))
        ));
    }

    #[test]
    fn test_quiz_error_display() {
        let err = QuizError::from(EngineError::EmptyQuestionSet);
        assert_eq!(err.to_string(), "Quiz engine error: question set is empty");
    }
}
