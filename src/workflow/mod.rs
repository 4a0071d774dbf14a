pub mod session;

pub use session::{AnswerOutcome, QuizController, SessionState};
