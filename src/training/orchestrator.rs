//! Training orchestration
//!
//! The trainer owns the episode loop: it draws secrets from the training
//! partition, drives the agent to termination once per episode, and samples a
//! convergence metric - the root-mean-square change in table values between
//! periodic checkpoints. Independent seeded repetitions of the same
//! configuration ("spread" runs) turn a single noisy learning curve into a
//! distribution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    agent::{Hyperparameters, TabularAgent, TableStats, UpdateRule},
    analysis::{CurveBand, aggregate_curves},
    corpus::{FrequencyTables, Word, WordCorpus},
    error::{Error, Result},
    game::{GameRules, Outcome, WordleEnvironment},
    ports::{Solver, TrainingObserver},
};

/// Configuration for one training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of training episodes.
    pub episodes: usize,

    /// Episodes between convergence checkpoints.
    pub checkpoint_interval: usize,

    /// Fraction of the answer list used for training; the rest is held out
    /// for the post-training test pass.
    pub train_fraction: f64,

    /// Random seed for the secret sequence and the agent.
    pub seed: Option<u64>,

    /// Episode rules.
    pub rules: GameRules,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            episodes: 500,
            checkpoint_interval: 50,
            train_fraction: 0.75,
            seed: None,
            rules: GameRules::default(),
        }
    }
}

/// One row of per-episode training data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub outcome: Outcome,
    pub guesses_used: usize,
    pub total_reward: f64,
    pub learning_delta: f64,
}

/// One convergence checkpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConvergenceSample {
    /// Episode count at which the sample was taken.
    pub episode: usize,
    /// RMS change in table values since the previous checkpoint.
    pub rms_delta: f64,
}

/// Greedy performance over the held-out partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSummary {
    pub episodes: usize,
    pub wins: usize,
    pub win_rate: f64,
    /// Mean guesses used on solved episodes; 0.0 when nothing was solved.
    pub avg_guesses_to_solve: f64,
}

/// Result of one full training session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingRun {
    pub rule: UpdateRule,
    pub params: Hyperparameters,
    pub episodes: usize,
    pub records: Vec<EpisodeRecord>,
    pub convergence: Vec<ConvergenceSample>,
    pub table_stats: TableStats,
    pub test: TestSummary,
}

/// Result of a spread: independent seeded repetitions of one configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadResult {
    pub runs: Vec<TrainingRun>,
    /// Mean and variance of the per-checkpoint RMS curves across runs.
    pub convergence_band: CurveBand,
}

/// Runs training sessions over a corpus split.
pub struct Trainer {
    corpus: Arc<WordCorpus>,
    tables: Arc<FrequencyTables>,
    config: TrainerConfig,
    observers: Vec<Box<dyn TrainingObserver>>,
}

impl Trainer {
    pub fn new(
        corpus: Arc<WordCorpus>,
        tables: Arc<FrequencyTables>,
        config: TrainerConfig,
    ) -> Self {
        Self {
            corpus,
            tables,
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the session.
    pub fn with_observer(mut self, observer: Box<dyn TrainingObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn frequency_tables(&self) -> &Arc<FrequencyTables> {
        &self.tables
    }

    /// Fail fast on configurations that cannot produce a meaningful run.
    fn validate(&self) -> Result<()> {
        if self.config.episodes == 0 {
            return Err(Error::InvalidConfiguration {
                message: "episode count must be positive".to_string(),
            });
        }
        if self.config.checkpoint_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint interval must be positive".to_string(),
            });
        }
        if !(self.config.train_fraction > 0.0 && self.config.train_fraction <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "train fraction {} outside (0, 1]",
                    self.config.train_fraction
                ),
            });
        }
        Ok(())
    }

    /// Train `agent` for the configured number of episodes, then measure it
    /// greedily on the held-out partition.
    pub fn run(&mut self, agent: &mut TabularAgent) -> Result<TrainingRun> {
        self.validate()?;
        let config = self.config.clone();
        self.run_with_config(agent, &config)
    }

    /// Run `repetitions` independent seeded copies of `template`.
    ///
    /// Each repetition clones the template, clears its learned state, and
    /// offsets the configured seed so the repetitions are statistically
    /// independent but reproducible. The repetitions share no mutable state.
    pub fn run_spread(
        &mut self,
        template: &TabularAgent,
        repetitions: usize,
    ) -> Result<SpreadResult> {
        self.validate()?;
        if repetitions == 0 {
            return Err(Error::InvalidConfiguration {
                message: "spread repetition count must be positive".to_string(),
            });
        }

        let mut runs = Vec::with_capacity(repetitions);
        for repetition in 0..repetitions {
            let mut config = self.config.clone();
            config.seed = self
                .config
                .seed
                .map(|seed| seed.wrapping_add(repetition as u64));

            let mut agent = template.clone();
            agent.reset();
            runs.push(self.run_with_config(&mut agent, &config)?);
        }

        let curves: Vec<Vec<f64>> = runs
            .iter()
            .map(|run| run.convergence.iter().map(|s| s.rms_delta).collect())
            .collect();

        Ok(SpreadResult {
            convergence_band: aggregate_curves(&curves),
            runs,
        })
    }

    fn run_with_config(
        &mut self,
        agent: &mut TabularAgent,
        config: &TrainerConfig,
    ) -> Result<TrainingRun> {
        let (train, test) = self.corpus.split(config.train_fraction);
        if train.is_empty() {
            return Err(Error::EmptyPartition {
                partition: "training",
            });
        }

        let mut env = WordleEnvironment::new(self.corpus.clone(), config.rules);
        if let Some(seed) = config.seed {
            env = env.with_seed(seed);
            agent.set_rng_seed(seed.wrapping_add(1));
        }

        let secrets = env.draw_secrets(&train, config.episodes)?;

        for observer in &mut self.observers {
            observer.on_training_start(config.episodes)?;
        }

        let mut records = Vec::with_capacity(config.episodes);
        let mut convergence = Vec::new();
        let mut snapshot = agent.table().snapshot();

        for (episode, &secret) in secrets.iter().enumerate() {
            env.reset(Some(secret))?;
            let summary = agent.play_episode(&mut env, true)?;

            let record = EpisodeRecord {
                episode,
                outcome: summary.outcome,
                guesses_used: summary.guesses_used,
                total_reward: summary.total_reward,
                learning_delta: summary.learning_delta,
            };
            for observer in &mut self.observers {
                observer.on_episode_end(&record)?;
            }
            records.push(record);

            if (episode + 1).is_multiple_of(config.checkpoint_interval) {
                let sample = ConvergenceSample {
                    episode: episode + 1,
                    rms_delta: agent.table().rms_delta(&snapshot),
                };
                snapshot = agent.table().snapshot();
                for observer in &mut self.observers {
                    observer.on_checkpoint(&sample)?;
                }
                convergence.push(sample);
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let test_summary = test_pass(agent, &test, &mut env)?;

        Ok(TrainingRun {
            rule: agent.rule(),
            params: agent.hyperparameters(),
            episodes: config.episodes,
            records,
            convergence,
            table_stats: agent.table_stats(),
            test: test_summary,
        })
    }
}

/// Play every held-out secret once, greedily, without learning.
fn test_pass(
    agent: &mut TabularAgent,
    held_out: &[Word],
    env: &mut WordleEnvironment,
) -> Result<TestSummary> {
    let mut wins = 0usize;
    let mut guesses_on_solved = 0usize;

    for &secret in held_out {
        env.reset(Some(secret))?;
        let summary = agent.play_episode(env, false)?;
        if summary.outcome == Outcome::Solved {
            wins += 1;
            guesses_on_solved += summary.guesses_used;
        }
    }

    let episodes = held_out.len();
    Ok(TestSummary {
        episodes,
        wins,
        win_rate: if episodes > 0 {
            wins as f64 / episodes as f64
        } else {
            0.0
        },
        avg_guesses_to_solve: if wins > 0 {
            guesses_on_solved as f64 / wins as f64
        } else {
            0.0
        },
    })
}
