use std::sync::Arc;

use tracing::warn;

use crate::config::QuizConfig;
use crate::engine::{
    EngineError, Fired, QuizEngine, Scheduler, validate_config, validate_questions,
};
use crate::models::{OPTION_COUNT, Question};

/// Which screen the terminal front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Quiz,
    Result,
}

/// Front-end state wrapped around the engine.
///
/// The engine is only started when the player leaves the welcome screen, so
/// no countdown runs before then.
pub struct App<S: Scheduler> {
    pub screen: Screen,
    questions: Arc<[Question]>,
    config: QuizConfig,
    scheduler: Option<S>,
    engine: Option<QuizEngine<S>>,
    result_scroll: usize,
}

impl<S: Scheduler> App<S> {
    pub fn new(
        questions: Vec<Question>,
        config: QuizConfig,
        scheduler: S,
    ) -> Result<Self, EngineError> {
        validate_questions(&questions)?;
        validate_config(&config)?;
        Ok(Self {
            screen: Screen::Welcome,
            questions: questions.into(),
            config,
            scheduler: Some(scheduler),
            engine: None,
            result_scroll: 0,
        })
    }

    pub fn engine(&self) -> Option<&QuizEngine<S>> {
        self.engine.as_ref()
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn start_quiz(&mut self) -> Result<(), EngineError> {
        if let Some(engine) = self.engine.as_mut() {
            engine.restart();
        } else if let Some(scheduler) = self.scheduler.take() {
            let engine =
                QuizEngine::start(Arc::clone(&self.questions), self.config.clone(), scheduler)?;
            self.engine = Some(engine);
        }
        self.result_scroll = 0;
        self.screen = Screen::Quiz;
        Ok(())
    }

    pub fn restart(&mut self) {
        if let Err(err) = self.start_quiz() {
            warn!(%err, "restart failed");
        }
    }

    pub fn select_option(&mut self, index: usize) {
        self.with_engine("select", |engine| engine.select_option(index));
    }

    pub fn select_next_option(&mut self) {
        let next = self
            .selected_option()
            .map_or(0, |current| (current + 1) % OPTION_COUNT);
        self.select_option(next);
    }

    pub fn select_previous_option(&mut self) {
        let previous = self
            .selected_option()
            .map_or(OPTION_COUNT - 1, |current| {
                (current + OPTION_COUNT - 1) % OPTION_COUNT
            });
        self.select_option(previous);
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.engine
            .as_ref()
            .and_then(|engine| engine.state().selected_option())
    }

    /// Ignored while nothing is selected, like a disabled submit button.
    pub fn submit_answer(&mut self) {
        if self.selected_option().is_none() {
            return;
        }
        self.with_engine("submit", QuizEngine::submit_answer);
    }

    pub fn handle_timer(&mut self, fired: Fired) {
        if let Some(engine) = self.engine.as_mut() {
            engine.fire(fired);
            if engine.is_completed() {
                self.screen = Screen::Result;
            }
        }
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.total_questions().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn with_engine(
        &mut self,
        action: &'static str,
        op: impl FnOnce(&mut QuizEngine<S>) -> Result<(), EngineError>,
    ) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        if let Err(err) = op(engine) {
            warn!(action, %err, "rejected by quiz engine");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::engine::{ManualScheduler, Phase};

    fn app(count: u32) -> App<ManualScheduler> {
        let questions = (0..count)
            .map(|id| Question {
                id,
                prompt: format!("Question {}", id),
                options: ["a", "b", "c", "d"].map(String::from),
                correct_option: 1,
                explanation: String::new(),
            })
            .collect();
        App::new(questions, QuizConfig::default(), ManualScheduler::new()).unwrap()
    }

    /// Drive due timers through the app the way the event loop does.
    fn advance(app: &mut App<ManualScheduler>, by: Duration) {
        let Some(engine) = app.engine.as_mut() else {
            return;
        };
        let deadline = engine.scheduler().now() + by;
        loop {
            let Some(engine) = app.engine.as_mut() else {
                return;
            };
            let Some(fired) = engine.scheduler_mut().pop_due(deadline) else {
                break;
            };
            app.handle_timer(fired);
        }
    }

    #[test]
    fn test_rejects_empty_bank() {
        let result = App::new(Vec::new(), QuizConfig::default(), ManualScheduler::new());
        assert!(matches!(result, Err(EngineError::EmptyQuestionSet)));
    }

    #[test]
    fn test_rejects_zero_time_limit() {
        let config = QuizConfig {
            question_time_limit_secs: 0,
            ..QuizConfig::default()
        };
        let questions = app(1).questions.to_vec();
        let result = App::new(questions, config, ManualScheduler::new());
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_no_engine_before_start() {
        let mut app = app(2);
        assert_eq!(app.screen, Screen::Welcome);
        assert!(app.engine().is_none());

        app.select_next_option();
        app.submit_answer();
        assert_eq!(app.selected_option(), None);
    }

    #[test]
    fn test_option_navigation_wraps() {
        let mut app = app(2);
        app.start_quiz().unwrap();
        assert_eq!(app.screen, Screen::Quiz);

        app.select_previous_option();
        assert_eq!(app.selected_option(), Some(3));
        app.select_next_option();
        assert_eq!(app.selected_option(), Some(0));
        app.select_next_option();
        assert_eq!(app.selected_option(), Some(1));
    }

    #[test]
    fn test_submit_without_selection_is_ignored() {
        let mut app = app(2);
        app.start_quiz().unwrap();
        app.submit_answer();
        let engine = app.engine().unwrap();
        assert_eq!(engine.state().phase(), Phase::Answering);
    }

    #[test]
    fn test_result_screen_after_last_reveal() {
        let mut app = app(2);
        app.start_quiz().unwrap();

        app.select_option(1);
        app.submit_answer();
        advance(&mut app, Duration::from_secs(2));
        assert_eq!(app.screen, Screen::Quiz);

        app.select_option(0);
        app.submit_answer();
        assert_eq!(app.screen, Screen::Quiz);
        advance(&mut app, Duration::from_secs(2));
        assert_eq!(app.screen, Screen::Result);

        let summary = app.engine().unwrap().summary().unwrap();
        assert_eq!(summary.score, 1);
    }

    #[test]
    fn test_restart_from_results() {
        let mut app = app(1);
        app.start_quiz().unwrap();
        advance(&mut app, Duration::from_secs(32));
        assert_eq!(app.screen, Screen::Result);
        app.scroll_results_down();

        app.restart();
        assert_eq!(app.screen, Screen::Quiz);
        assert_eq!(app.result_scroll(), 0);
        let engine = app.engine().unwrap();
        assert!(!engine.is_completed());
        assert_eq!(engine.state().time_remaining(), 30);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = app(3);
        app.scroll_results_up();
        assert_eq!(app.result_scroll(), 0);
        for _ in 0..10 {
            app.scroll_results_down();
        }
        assert_eq!(app.result_scroll(), 2);
    }
}
