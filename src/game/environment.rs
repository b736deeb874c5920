//! Single-episode game environment
//!
//! The environment is the umpire of one episode: it holds the hidden secret,
//! scores guesses, and tracks termination. It is deterministic given the
//! secret and the guess sequence; the only randomness is the seeded draw of a
//! secret on reset.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::feedback::{GuessResult, score_guess};
use crate::{
    corpus::{Word, WordCorpus},
    error::{Error, Result},
};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The secret was guessed within the allowed attempts.
    Solved,
    /// All attempts were used without finding the secret.
    Exhausted,
}

/// Rules governing an episode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameRules {
    /// Maximum number of guesses per episode.
    pub max_guesses: usize,
    /// Reject guesses (and explicit secrets) outside the vocabulary.
    pub strict_vocabulary: bool,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_guesses: 6,
            strict_vocabulary: true,
        }
    }
}

/// Everything the umpire knows about the episode in progress.
///
/// The secret is hidden from agents; they only ever see the returned
/// feedback.
#[derive(Debug, Clone)]
struct EpisodeState {
    secret: Word,
    history: Vec<(Word, GuessResult)>,
    guesses_remaining: usize,
    outcome: Option<Outcome>,
}

/// Result of one environment transition.
#[derive(Debug, Clone, Copy)]
pub struct StepOutcome {
    pub feedback: GuessResult,
    pub done: bool,
    pub outcome: Option<Outcome>,
}

/// Stateful single-episode simulator.
pub struct WordleEnvironment {
    corpus: Arc<WordCorpus>,
    rules: GameRules,
    rng: StdRng,
    episode: Option<EpisodeState>,
}

impl WordleEnvironment {
    /// Create an environment over `corpus` with the given rules.
    pub fn new(corpus: Arc<WordCorpus>, rules: GameRules) -> Self {
        Self {
            corpus,
            rules,
            rng: StdRng::from_rng(&mut rand::rng()),
            episode: None,
        }
    }

    /// Seed the secret-drawing RNG for reproducible episodes.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The rules this environment enforces.
    pub fn rules(&self) -> GameRules {
        self.rules
    }

    /// Start a new episode.
    ///
    /// With `Some(secret)` the episode uses that word; under strict
    /// vocabulary it must come from the answer list. With `None` a secret is
    /// drawn uniformly from the answer list using the environment RNG.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSecret`] for an out-of-list explicit secret,
    /// or [`Error::InvalidConfiguration`] if the corpus has no answers.
    pub fn reset(&mut self, secret: Option<Word>) -> Result<()> {
        if self.rules.max_guesses == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_guesses must be positive".to_string(),
            });
        }

        let secret = match secret {
            Some(word) => {
                if self.rules.strict_vocabulary && !self.corpus.is_answer(word) {
                    return Err(Error::InvalidSecret {
                        word: word.to_string(),
                    });
                }
                word
            }
            None => *self
                .corpus
                .answers()
                .choose(&mut self.rng)
                .ok_or_else(|| Error::InvalidConfiguration {
                    message: "cannot draw a secret from an empty answer list".to_string(),
                })?,
        };

        self.episode = Some(EpisodeState {
            secret,
            history: Vec::with_capacity(self.rules.max_guesses),
            guesses_remaining: self.rules.max_guesses,
            outcome: None,
        });
        Ok(())
    }

    /// Score one guess and advance the episode.
    ///
    /// A rejected guess leaves the episode untouched: it is not recorded and
    /// does not consume an attempt.
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveEpisode`] before the first [`reset`](Self::reset)
    /// - [`Error::EpisodeTerminated`] once the episode is done
    /// - [`Error::InvalidGuess`] for out-of-vocabulary guesses under strict
    ///   vocabulary
    pub fn step(&mut self, guess: Word) -> Result<StepOutcome> {
        if self.rules.strict_vocabulary && !self.corpus.is_allowed(guess) {
            return Err(Error::InvalidGuess {
                word: guess.to_string(),
            });
        }

        let episode = self.episode.as_mut().ok_or(Error::NoActiveEpisode)?;
        if episode.outcome.is_some() {
            return Err(Error::EpisodeTerminated);
        }

        let feedback = score_guess(episode.secret, guess);
        episode.history.push((guess, feedback));
        episode.guesses_remaining -= 1;

        if feedback.is_solved() {
            episode.outcome = Some(Outcome::Solved);
        } else if episode.guesses_remaining == 0 {
            episode.outcome = Some(Outcome::Exhausted);
        }

        Ok(StepOutcome {
            feedback,
            done: episode.outcome.is_some(),
            outcome: episode.outcome,
        })
    }

    /// Guess/feedback pairs recorded so far this episode.
    pub fn history(&self) -> &[(Word, GuessResult)] {
        self.episode.as_ref().map_or(&[], |e| &e.history)
    }

    /// Attempts left in the current episode.
    pub fn guesses_remaining(&self) -> usize {
        self.episode.as_ref().map_or(0, |e| e.guesses_remaining)
    }

    /// Guesses consumed this episode.
    pub fn guesses_used(&self) -> usize {
        self.episode.as_ref().map_or(0, |e| e.history.len())
    }

    /// Terminal outcome, if the episode has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.episode.as_ref().and_then(|e| e.outcome)
    }

    /// Whether the current episode has terminated.
    pub fn is_done(&self) -> bool {
        self.outcome().is_some()
    }

    /// The hidden secret, for umpire-side reporting only. Agents must never
    /// consult this.
    pub fn secret(&self) -> Option<Word> {
        self.episode.as_ref().map(|e| e.secret)
    }

    /// Draw `count` secrets from a pool with this environment's RNG, for
    /// callers sequencing episodes over a partition.
    pub fn draw_secrets(&mut self, pool: &[Word], count: usize) -> Result<Vec<Word>> {
        if pool.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "cannot draw secrets from an empty pool".to_string(),
            });
        }
        Ok((0..count)
            .map(|_| pool[self.rng.random_range(0..pool.len())])
            .collect())
    }
}
