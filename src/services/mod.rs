pub mod generator;
pub mod topic_selector;

pub use generator::{GeminiClient, QuizSource};
pub use topic_selector::{TopicSelector, DEFAULT_TOPIC_CATALOG};
