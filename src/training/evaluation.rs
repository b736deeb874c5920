//! Evaluation harness
//!
//! Plays trained agents and fixed baselines over fresh episodes and
//! aggregates win rates and guesses-to-solve distributions. Every solver sees
//! the same secret sequence, so differences in the reports reflect the
//! solvers, not the draw.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::{
    corpus::WordCorpus,
    error::{Error, Result},
    game::{GameRules, Outcome, WordleEnvironment},
    ports::Solver,
};

/// Configuration for an evaluation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Fresh episodes per solver.
    pub episodes: usize,

    /// Random seed for the shared secret sequence and solver seeding.
    pub seed: Option<u64>,

    /// Episode rules.
    pub rules: GameRules,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            seed: None,
            rules: GameRules::default(),
        }
    }
}

/// Aggregate evaluation results for one solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub name: String,
    pub episodes: usize,
    pub wins: usize,
    pub win_rate: f64,
    /// 95% normal-approximation confidence interval on the win rate.
    pub win_rate_ci: (f64, f64),
    /// Mean guesses used on solved episodes; 0.0 when nothing was solved.
    pub mean_guesses_to_solve: f64,
    /// Solved-episode counts indexed by guesses used (index 0 = one guess).
    pub guess_histogram: Vec<usize>,
}

/// Plays solvers over held-out episodes and reports their performance.
pub struct EvaluationHarness {
    corpus: Arc<WordCorpus>,
    config: EvaluationConfig,
}

impl EvaluationHarness {
    pub fn new(corpus: Arc<WordCorpus>, config: EvaluationConfig) -> Self {
        Self { corpus, config }
    }

    /// Evaluate every solver over the same secret sequence.
    ///
    /// # Errors
    ///
    /// Fails fast with [`Error::InvalidConfiguration`] on a zero episode
    /// count; episode-level errors from the environment or a solver abort the
    /// evaluation and surface unchanged.
    pub fn evaluate(&self, solvers: &mut [Box<dyn Solver>]) -> Result<Vec<EvaluationReport>> {
        if self.config.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "evaluation episode count must be positive".to_string(),
            });
        }

        let mut env = WordleEnvironment::new(self.corpus.clone(), self.config.rules);
        if let Some(seed) = self.config.seed {
            env = env.with_seed(seed);
        }
        let secrets = env.draw_secrets(self.corpus.answers(), self.config.episodes)?;

        let mut reports = Vec::with_capacity(solvers.len());
        for (index, solver) in solvers.iter_mut().enumerate() {
            if let Some(seed) = self.config.seed {
                solver.set_rng_seed(seed.wrapping_add(index as u64 + 1));
            }

            let mut wins = 0usize;
            let mut guesses_on_solved = 0usize;
            let mut histogram = vec![0usize; self.config.rules.max_guesses];

            for &secret in &secrets {
                env.reset(Some(secret))?;
                let (outcome, guesses_used) = play_episode(solver.as_mut(), &mut env)?;

                if outcome == Outcome::Solved {
                    wins += 1;
                    guesses_on_solved += guesses_used;
                    histogram[guesses_used - 1] += 1;
                }
            }

            let episodes = secrets.len();
            let win_rate = wins as f64 / episodes as f64;
            reports.push(EvaluationReport {
                name: solver.name().to_string(),
                episodes,
                wins,
                win_rate,
                win_rate_ci: win_rate_interval(wins, episodes),
                mean_guesses_to_solve: if wins > 0 {
                    guesses_on_solved as f64 / wins as f64
                } else {
                    0.0
                },
                guess_histogram: histogram,
            });
        }

        Ok(reports)
    }
}

/// Drive one solver through one episode of an already-reset environment.
///
/// Returns the outcome and the number of guesses consumed. This is the
/// playable-episode interface external consumers use to replay a trained
/// agent on specific secrets.
pub fn play_episode(
    solver: &mut dyn Solver,
    env: &mut WordleEnvironment,
) -> Result<(Outcome, usize)> {
    solver.begin_episode();

    loop {
        let guess = solver.next_guess()?;
        let step = env.step(guess)?;
        solver.observe(guess, step.feedback);

        if let Some(outcome) = step.outcome {
            return Ok((outcome, env.guesses_used()));
        }
    }
}

/// 95% normal-approximation confidence interval for a binomial proportion,
/// clamped to [0, 1].
fn win_rate_interval(wins: usize, episodes: usize) -> (f64, f64) {
    if episodes == 0 {
        return (0.0, 0.0);
    }
    let p = wins as f64 / episodes as f64;
    let z = Normal::new(0.0, 1.0)
        .map(|normal| normal.inverse_cdf(0.975))
        .unwrap_or(1.96);
    let half_width = z * (p * (1.0 - p) / episodes as f64).sqrt();
    ((p - half_width).max(0.0), (p + half_width).min(1.0))
}
