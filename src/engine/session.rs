//! State of a single quiz attempt and its transitions.
//!
//! Every transition validates before it mutates, so a rejected call leaves
//! the state exactly as it was.

use uuid::Uuid;

use crate::models::{OPTION_COUNT, Question};

use super::error::EngineError;

/// Where the current attempt stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Countdown running, an option may be (re)selected.
    Answering,
    /// Answer locked in, feedback shown until the reveal delay elapses.
    Revealing,
    /// Every question answered or timed out.
    Completed,
}

/// Outcome of a successful transition, used by the engine to arm timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Selected(usize),
    Ticked { remaining: u32 },
    Revealed { correct: bool, timed_out: bool },
    Advanced { index: usize },
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    id: Uuid,
    current_index: usize,
    selected_option: Option<usize>,
    phase: Phase,
    time_limit: u32,
    time_remaining: u32,
    score: usize,
    answer_log: Vec<Option<usize>>,
}

impl SessionState {
    /// A fresh attempt positioned on the first question.
    pub fn new(time_limit: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            current_index: 0,
            selected_option: None,
            phase: Phase::Answering,
            time_limit,
            time_remaining: time_limit,
            score: 0,
            answer_log: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True once the current answer is locked in (and stays true on completion).
    pub fn is_revealed(&self) -> bool {
        !matches!(self.phase, Phase::Answering)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.phase, Phase::Completed)
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// One entry per finished question; `None` means no option was chosen.
    pub fn answer_log(&self) -> &[Option<usize>] {
        &self.answer_log
    }

    /// The answer log with `-1` standing in for "no answer".
    pub fn answer_log_signed(&self) -> Vec<i64> {
        self.answer_log
            .iter()
            .map(|answer| answer.map_or(-1, |index| index as i64))
            .collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answer_log.len()
    }

    /// The answer most recently locked in, if any question has finished.
    pub fn last_answer(&self) -> Option<Option<usize>> {
        self.answer_log.last().copied()
    }

    /// Score recomputed from the answer log. Always equal to `score()`.
    pub fn recount_score(&self, questions: &[Question]) -> usize {
        self.answer_log
            .iter()
            .zip(questions.iter())
            .filter(|(answer, question)| question.is_correct(**answer))
            .count()
    }

    pub fn select_option(&mut self, index: usize) -> Result<Transition, EngineError> {
        self.ensure_answering()?;
        if index >= OPTION_COUNT {
            return Err(EngineError::OptionOutOfRange {
                index,
                count: OPTION_COUNT,
            });
        }

        self.selected_option = Some(index);
        Ok(Transition::Selected(index))
    }

    pub fn submit_answer(&mut self, question: &Question) -> Result<Transition, EngineError> {
        self.ensure_answering()?;
        if self.selected_option.is_none() {
            return Err(EngineError::NothingSelected);
        }

        Ok(self.reveal(question, false))
    }

    /// One second elapsed. Reaching zero locks in whatever is selected.
    pub fn tick(&mut self, question: &Question) -> Result<Transition, EngineError> {
        self.ensure_answering()?;

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return Ok(self.reveal(question, true));
        }
        Ok(Transition::Ticked {
            remaining: self.time_remaining,
        })
    }

    /// Leave the reveal phase: move to the next question or finish.
    pub fn advance(&mut self, question_count: usize) -> Result<Transition, EngineError> {
        match self.phase {
            Phase::Revealing => {}
            Phase::Answering => return Err(EngineError::NotRevealing),
            Phase::Completed => return Err(EngineError::SessionCompleted),
        }

        if self.current_index + 1 >= question_count {
            self.phase = Phase::Completed;
            return Ok(Transition::Completed);
        }

        self.current_index += 1;
        self.selected_option = None;
        self.time_remaining = self.time_limit;
        self.phase = Phase::Answering;
        Ok(Transition::Advanced {
            index: self.current_index,
        })
    }

    fn ensure_answering(&self) -> Result<(), EngineError> {
        match self.phase {
            Phase::Answering => Ok(()),
            Phase::Revealing => Err(EngineError::AlreadyRevealed),
            Phase::Completed => Err(EngineError::SessionCompleted),
        }
    }

    fn reveal(&mut self, question: &Question, timed_out: bool) -> Transition {
        let correct = question.is_correct(self.selected_option);
        if correct {
            self.score += 1;
        }
        self.answer_log.push(self.selected_option);
        self.phase = Phase::Revealing;
        Transition::Revealed { correct, timed_out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct_option: usize) -> Question {
        Question {
            id: 1,
            prompt: "Which gas drives ocean acidification?".to_string(),
            options: ["O2", "CO2", "N2", "Ar"].map(String::from),
            correct_option,
            explanation: "CO2 forms carbonic acid.".to_string(),
        }
    }

    #[test]
    fn test_new_state() {
        let state = SessionState::new(30);
        assert_eq!(state.phase(), Phase::Answering);
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.time_remaining(), 30);
        assert_eq!(state.score(), 0);
        assert!(state.answer_log().is_empty());
        assert!(!state.is_revealed());
    }

    #[test]
    fn test_reselection_overwrites() {
        let q = question(1);
        let mut state = SessionState::new(30);
        state.select_option(0).unwrap();
        state.select_option(3).unwrap();
        state.select_option(1).unwrap();
        assert_eq!(state.selected_option(), Some(1));

        assert_eq!(
            state.submit_answer(&q),
            Ok(Transition::Revealed {
                correct: true,
                timed_out: false
            })
        );
        assert_eq!(state.answer_log(), &[Some(1)]);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_out_of_range_selection_leaves_state() {
        let mut state = SessionState::new(30);
        state.select_option(1).unwrap();
        let before = state.clone();

        assert_eq!(
            state.select_option(7),
            Err(EngineError::OptionOutOfRange { index: 7, count: 4 })
        );
        assert_eq!(state, before);
        assert_eq!(state.select_option(2), Ok(Transition::Selected(2)));
    }

    #[test]
    fn test_submit_without_selection_rejected() {
        let mut state = SessionState::new(30);
        let before = state.clone();
        assert_eq!(
            state.submit_answer(&question(0)),
            Err(EngineError::NothingSelected)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_double_submit_rejected() {
        let q = question(2);
        let mut state = SessionState::new(30);
        state.select_option(0).unwrap();
        state.submit_answer(&q).unwrap();
        let after_first = state.clone();

        let err = state.submit_answer(&q).unwrap_err();
        assert_eq!(err, EngineError::AlreadyRevealed);
        assert_eq!(state, after_first);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_timeout_without_selection() {
        let q = question(0);
        let mut state = SessionState::new(2);
        assert_eq!(state.tick(&q), Ok(Transition::Ticked { remaining: 1 }));
        assert_eq!(
            state.tick(&q),
            Ok(Transition::Revealed {
                correct: false,
                timed_out: true
            })
        );
        assert_eq!(state.answer_log(), &[None]);
        assert_eq!(state.answer_log_signed(), vec![-1]);
        assert_eq!(state.score(), 0);
        assert_eq!(state.time_remaining(), 0);
    }

    #[test]
    fn test_timeout_keeps_selection() {
        let q = question(3);
        let mut state = SessionState::new(1);
        state.select_option(3).unwrap();
        state.tick(&q).unwrap();
        assert_eq!(state.answer_log(), &[Some(3)]);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_first_option_is_logged() {
        let q = question(0);
        let mut state = SessionState::new(30);
        state.select_option(0).unwrap();
        state.submit_answer(&q).unwrap();
        assert_eq!(state.answer_log_signed(), vec![0]);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_tick_rejected_while_revealing() {
        let q = question(1);
        let mut state = SessionState::new(30);
        state.select_option(1).unwrap();
        state.submit_answer(&q).unwrap();
        let remaining = state.time_remaining();

        assert_eq!(state.tick(&q), Err(EngineError::AlreadyRevealed));
        assert_eq!(state.time_remaining(), remaining);
        assert_eq!(state.select_option(2), Err(EngineError::AlreadyRevealed));
    }

    #[test]
    fn test_advance_resets_question_state() {
        let q = question(1);
        let mut state = SessionState::new(30);
        assert_eq!(state.advance(2), Err(EngineError::NotRevealing));

        state.select_option(1).unwrap();
        state.tick(&q).unwrap();
        state.submit_answer(&q).unwrap();

        assert_eq!(state.advance(2), Ok(Transition::Advanced { index: 1 }));
        assert_eq!(state.phase(), Phase::Answering);
        assert_eq!(state.selected_option(), None);
        assert_eq!(state.time_remaining(), 30);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_completion_is_terminal() {
        let q = question(1);
        let mut state = SessionState::new(30);
        state.select_option(2).unwrap();
        state.submit_answer(&q).unwrap();
        assert_eq!(state.advance(1), Ok(Transition::Completed));
        assert!(state.is_completed());
        assert!(state.is_revealed());
        assert_eq!(state.current_index(), 0);

        let done = state.clone();
        assert_eq!(state.select_option(0), Err(EngineError::SessionCompleted));
        assert_eq!(state.submit_answer(&q), Err(EngineError::SessionCompleted));
        assert_eq!(state.tick(&q), Err(EngineError::SessionCompleted));
        assert_eq!(state.advance(1), Err(EngineError::SessionCompleted));
        assert_eq!(state, done);
    }

    #[test]
    fn test_new_states_have_distinct_ids() {
        assert_ne!(SessionState::new(30).id(), SessionState::new(30).id());
    }
}
