mod loader;

pub use loader::{LoadError, builtin_questions, load_questions_from_json, parse_questions};
