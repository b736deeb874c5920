//! Game environment: feedback scoring and the episode state machine

pub mod environment;
pub mod feedback;

pub use environment::{GameRules, Outcome, StepOutcome, WordleEnvironment};
pub use feedback::{GuessResult, LetterFeedback, score_guess};
