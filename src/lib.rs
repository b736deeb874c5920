//! Tabular reinforcement learning for the word game Wordle
//!
//! This crate provides:
//! - A deterministic single-episode game environment with Wordle's
//!   duplicate-letter feedback rule
//! - A state abstraction that compresses feedback history into hashable
//!   constraint keys
//! - Pluggable guess-selection strategies forming the exploration action space
//! - Sarsa and Q-learning agents over a shared tabular value store
//! - A training orchestrator with convergence checkpoints and spread runs
//! - An evaluation harness comparing trained agents against Simple and Random
//!   baselines

pub mod agent;
pub mod analysis;
pub mod cli;
pub mod corpus;
pub mod error;
pub mod game;
pub mod ports;
pub mod state;
pub mod strategy;
pub mod training;

pub use agent::{
    ActionKey, ActionSpace, EpisodeSummary, Hyperparameters, QTable, RewardScheme, SavedAgent,
    StrategySolver, TableStats, TabularAgent, UpdateRule,
};
pub use corpus::{FrequencyTables, WORD_LEN, Word, WordCorpus};
pub use error::{Error, Result};
pub use game::{GameRules, GuessResult, LetterFeedback, Outcome, WordleEnvironment};
pub use ports::{Solver, TrainingObserver};
pub use state::{Constraints, StateKey};
pub use strategy::Strategy;
pub use training::{
    EvaluationConfig, EvaluationHarness, EvaluationReport, Trainer, TrainerConfig, TrainingRun,
};
