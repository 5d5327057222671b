use serde::Serialize;

use crate::models::{OPTION_COUNT, Question};

use super::session::SessionState;

/// Performance band derived from the final score ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Tier {
    /// Bands: at least 80% is excellent, at least 60% is good. Lower bounds
    /// are inclusive and compared exactly, without floating point.
    pub fn from_score(score: usize, total: usize) -> Self {
        if total == 0 {
            return Tier::NeedsImprovement;
        }
        if score * 5 >= total * 4 {
            Tier::Excellent
        } else if score * 5 >= total * 3 {
            Tier::Good
        } else {
            Tier::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::NeedsImprovement => "needs improvement",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Excellent => "Excellent! You're an eco-champion!",
            Tier::Good => "Good job! Keep learning!",
            Tier::NeedsImprovement => "Keep studying and try again!",
        }
    }
}

/// Result for a single finished question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerResult {
    pub question_id: u32,
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub your_answer: Option<usize>,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
    /// Whole-number percentage, rounded half up.
    pub percentage: u32,
    pub tier: Tier,
    pub results: Vec<AnswerResult>,
}

impl Summary {
    pub fn build(state: &SessionState, questions: &[Question]) -> Self {
        let score = state.score();
        let total = questions.len();

        let results = state
            .answer_log()
            .iter()
            .zip(questions.iter())
            .map(|(answer, question)| AnswerResult {
                question_id: question.id,
                prompt: question.prompt.clone(),
                options: question.options.clone(),
                your_answer: *answer,
                correct_answer: question.correct_option,
                is_correct: question.is_correct(*answer),
                explanation: question.explanation.clone(),
            })
            .collect();

        Self {
            score,
            total,
            percentage: percentage(score, total),
            tier: Tier::from_score(score, total),
            results,
        }
    }
}

fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bounds_are_inclusive() {
        assert_eq!(Tier::from_score(5, 5), Tier::Excellent);
        assert_eq!(Tier::from_score(4, 5), Tier::Excellent);
        assert_eq!(Tier::from_score(3, 5), Tier::Good);
        assert_eq!(Tier::from_score(2, 5), Tier::NeedsImprovement);
        assert_eq!(Tier::from_score(0, 5), Tier::NeedsImprovement);

        assert_eq!(Tier::from_score(8, 10), Tier::Excellent);
        assert_eq!(Tier::from_score(7, 10), Tier::Good);
        assert_eq!(Tier::from_score(6, 10), Tier::Good);
        assert_eq!(Tier::from_score(5, 10), Tier::NeedsImprovement);
    }

    #[test]
    fn test_tier_text() {
        assert_eq!(Tier::Good.label(), "good");
        assert_eq!(Tier::NeedsImprovement.label(), "needs improvement");
        assert_eq!(Tier::Excellent.message(), "Excellent! You're an eco-champion!");
    }

    #[test]
    fn test_percentage_rounds() {
        assert_eq!(percentage(4, 5), 80);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_build_summary() {
        let questions: Vec<Question> = (0..2)
            .map(|id| Question {
                id,
                prompt: format!("Q{}", id),
                options: ["a", "b", "c", "d"].map(String::from),
                correct_option: 1,
                explanation: format!("E{}", id),
            })
            .collect();

        let mut state = SessionState::new(30);
        state.select_option(1).unwrap();
        state.submit_answer(&questions[0]).unwrap();
        state.advance(2).unwrap();
        for _ in 0..30 {
            state.tick(&questions[1]).unwrap();
        }
        state.advance(2).unwrap();

        let summary = Summary::build(&state, &questions);
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.percentage, 50);
        assert_eq!(summary.tier, Tier::NeedsImprovement);
        assert!(summary.results[0].is_correct);
        assert_eq!(summary.results[1].your_answer, None);
        assert_eq!(summary.results[1].explanation, "E1");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"tier\":\"needs_improvement\""));
    }
}
