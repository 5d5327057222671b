mod question;

pub use question::{OPTION_COUNT, Question, QuestionIssue};
