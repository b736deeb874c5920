//! Solver port - abstraction over guessing agents
//!
//! This port defines the interface that anything able to play an episode must
//! implement, allowing the evaluation harness to drive:
//! - Trained tabular agents (Sarsa, Q-learning)
//! - Heuristic baselines (Simple)
//! - Random baselines

use crate::{
    Result,
    corpus::Word,
    game::GuessResult,
};

/// Solver trait - unified interface for anything that plays episodes
///
/// The harness drives a solver through a strict call sequence per episode:
///
/// 1. `begin_episode()` - clear per-episode state
/// 2. Repeatedly: `next_guess()`, then `observe(guess, result)` with the
///    environment's feedback for that guess
///
/// Solvers never see the secret; the feedback passed to `observe` is the only
/// information channel.
pub trait Solver {
    /// Reset per-episode state (constraints, candidate set) for a fresh
    /// episode.
    fn begin_episode(&mut self);

    /// Produce the next guess given everything observed so far.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoCandidates`] if no consistent candidate
    /// remains - an internal-invariant violation, not masked.
    fn next_guess(&mut self) -> Result<Word>;

    /// Record the feedback the environment produced for `guess`.
    fn observe(&mut self, guess: Word, result: GuessResult);

    /// The solver's display name, used in reports and comparisons.
    fn name(&self) -> &str;

    /// Seed the solver's internal randomness for reproducible evaluation.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for deterministic solvers.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
