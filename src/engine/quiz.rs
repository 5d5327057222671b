use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::{QuizConfig, TICK_INTERVAL};
use crate::models::{Question, QuestionIssue};

use super::error::EngineError;
use super::scheduler::{Fired, ManualScheduler, Scheduler, TimerId, TimerKind};
use super::session::{SessionState, Transition};
use super::summary::{Summary, Tier};

/// Drives one quiz attempt at a time over a fixed question list.
///
/// The engine owns its scheduler and keeps at most one timer armed: the next
/// countdown tick while answering, or the reveal delay while revealing. The
/// host must call every method from a single event loop.
pub struct QuizEngine<S: Scheduler> {
    questions: Arc<[Question]>,
    config: QuizConfig,
    state: SessionState,
    pending: Option<TimerId>,
    scheduler: S,
}

impl<S: Scheduler> QuizEngine<S> {
    /// Validate the question list and config, then begin the first attempt.
    pub fn start(
        questions: impl Into<Arc<[Question]>>,
        config: QuizConfig,
        scheduler: S,
    ) -> Result<Self, EngineError> {
        let questions = questions.into();
        validate_questions(&questions)?;
        validate_config(&config)?;

        let mut engine = Self {
            state: SessionState::new(config.question_time_limit_secs),
            questions,
            config,
            pending: None,
            scheduler,
        };
        engine.arm(TICK_INTERVAL, TimerKind::Tick);
        info!(
            session = %engine.state.id(),
            questions = engine.questions.len(),
            "quiz session started"
        );
        Ok(engine)
    }

    pub fn select_option(&mut self, index: usize) -> Result<(), EngineError> {
        self.state.select_option(index)?;
        Ok(())
    }

    pub fn submit_answer(&mut self) -> Result<(), EngineError> {
        let question = &self.questions[self.state.current_index()];
        let transition = self.state.submit_answer(question)?;
        self.after(transition);
        Ok(())
    }

    /// One second of the countdown elapsed.
    ///
    /// Driven by the engine's own tick timer; a host calling it directly
    /// restarts the one-second interval so no tick is counted twice.
    pub fn on_tick(&mut self) -> Result<(), EngineError> {
        let question = &self.questions[self.state.current_index()];
        let transition = self.state.tick(question)?;
        self.after(transition);
        Ok(())
    }

    /// Discard the current attempt, cancelling any armed timer.
    pub fn restart(&mut self) {
        self.disarm();
        let previous = self.state.id();
        self.state = SessionState::new(self.config.question_time_limit_secs);
        self.arm(TICK_INTERVAL, TimerKind::Tick);
        info!(%previous, session = %self.state.id(), "quiz session restarted");
    }

    /// Dispatch a delivered timer. Returns false for stale timers, which are
    /// ignored.
    pub fn fire(&mut self, fired: Fired) -> bool {
        if fired.session != self.state.id() || self.pending != Some(fired.id) {
            debug!(timer = ?fired.id, kind = ?fired.kind, "ignoring stale timer");
            return false;
        }
        self.pending = None;

        let result = match fired.kind {
            TimerKind::Tick => self.on_tick(),
            TimerKind::RevealElapsed => self.reveal_elapsed(),
        };
        if let Err(err) = result {
            // The pending timer always matches the phase.
            warn!(%err, kind = ?fired.kind, "timer rejected");
        }
        true
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.state.current_index()]
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn score(&self) -> usize {
        self.state.score()
    }

    pub fn is_completed(&self) -> bool {
        self.state.is_completed()
    }

    /// Correctness of the answer being shown, while revealing or completed.
    pub fn last_answer_correct(&self) -> Option<bool> {
        if !self.state.is_revealed() {
            return None;
        }
        let answer = self.state.last_answer()?;
        Some(self.current_question().is_correct(answer))
    }

    pub fn is_time_low(&self) -> bool {
        self.state.time_remaining() <= self.config.low_time_threshold_secs
    }

    pub fn summary_tier(&self) -> Option<Tier> {
        self.is_completed()
            .then(|| Tier::from_score(self.state.score(), self.questions.len()))
    }

    pub fn summary(&self) -> Option<Summary> {
        self.is_completed()
            .then(|| Summary::build(&self.state, &self.questions))
    }

    fn reveal_elapsed(&mut self) -> Result<(), EngineError> {
        let transition = self.state.advance(self.questions.len())?;
        self.after(transition);
        Ok(())
    }

    fn after(&mut self, transition: Transition) {
        let session = self.state.id();
        match transition {
            Transition::Selected(_) => {}
            Transition::Ticked { .. } => {
                self.disarm();
                self.arm(TICK_INTERVAL, TimerKind::Tick);
            }
            Transition::Revealed { correct, timed_out } => {
                self.disarm();
                self.arm(self.config.reveal_delay(), TimerKind::RevealElapsed);
                debug!(
                    %session,
                    question = self.state.current_index(),
                    correct,
                    timed_out,
                    "answer revealed"
                );
            }
            Transition::Advanced { index } => {
                self.disarm();
                self.arm(TICK_INTERVAL, TimerKind::Tick);
                debug!(%session, question = index, "advanced to next question");
            }
            Transition::Completed => {
                self.disarm();
                info!(
                    %session,
                    score = self.state.score(),
                    total = self.questions.len(),
                    tier = ?Tier::from_score(self.state.score(), self.questions.len()),
                    "quiz session completed"
                );
            }
        }
    }

    fn arm(&mut self, delay: Duration, kind: TimerKind) {
        let id = self.scheduler.schedule(delay, self.state.id(), kind);
        self.pending = Some(id);
    }

    fn disarm(&mut self) {
        if let Some(id) = self.pending.take() {
            self.scheduler.cancel(id);
        }
    }
}

impl QuizEngine<ManualScheduler> {
    /// Move virtual time forward, firing every timer that comes due,
    /// including timers armed along the way. Returns how many fired.
    pub fn advance_clock(&mut self, by: Duration) -> usize {
        let deadline = self.scheduler.now() + by;
        let mut fired = 0;
        while let Some(timer) = self.scheduler.pop_due(deadline) {
            if self.fire(timer) {
                fired += 1;
            }
        }
        self.scheduler.set_now(deadline);
        fired
    }

    pub fn scheduler(&self) -> &ManualScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut ManualScheduler {
        &mut self.scheduler
    }
}

pub(crate) fn validate_config(config: &QuizConfig) -> Result<(), EngineError> {
    match config.problem() {
        Some(reason) => Err(EngineError::InvalidConfig(reason)),
        None => Ok(()),
    }
}

/// Checks shared by the engine and the question bank loader.
pub fn validate_questions(questions: &[Question]) -> Result<(), EngineError> {
    if questions.is_empty() {
        return Err(EngineError::EmptyQuestionSet);
    }

    let mut seen = HashSet::with_capacity(questions.len());
    for question in questions {
        question
            .validate()
            .map_err(|issue| EngineError::InvalidQuestion {
                id: question.id,
                issue,
            })?;
        if !seen.insert(question.id) {
            return Err(EngineError::InvalidQuestion {
                id: question.id,
                issue: QuestionIssue::DuplicateId,
            });
        }
    }
    Ok(())
}
