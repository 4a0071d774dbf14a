pub mod quiz;

pub use quiz::{Question, QuizPayload, QuizSession, ResultCategory, OPTION_COUNT, QUESTION_COUNT};
