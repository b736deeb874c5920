//! Learning-free baseline solvers
//!
//! Baselines play the same filter-then-pick loop the learning agents explore
//! with, but never consult a value table. They anchor evaluation: a trained
//! agent that cannot beat `random()` has learned nothing.

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    corpus::{FrequencyTables, Word, WordCorpus},
    error::Result,
    game::GuessResult,
    ports::Solver,
    state::Constraints,
    strategy::Strategy,
};

/// A solver that applies one fixed selection strategy to the candidate set it
/// narrows after every observation.
pub struct StrategySolver {
    name: String,
    strategy: Strategy,
    corpus: Arc<WordCorpus>,
    tables: Arc<FrequencyTables>,
    rng: StdRng,
    constraints: Constraints,
    candidates: Vec<Word>,
}

impl StrategySolver {
    pub fn new(
        name: impl Into<String>,
        strategy: Strategy,
        corpus: Arc<WordCorpus>,
        tables: Arc<FrequencyTables>,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            corpus,
            tables,
            rng: StdRng::from_rng(&mut rand::rng()),
            constraints: Constraints::new(),
            candidates: Vec::new(),
        }
    }

    /// The heuristic baseline: deterministic frequency-ranked picks.
    pub fn simple(corpus: Arc<WordCorpus>, tables: Arc<FrequencyTables>) -> Self {
        Self::new("Simple", Strategy::Educated, corpus, tables)
    }

    /// The random baseline: uniform picks from the narrowed candidates.
    pub fn random(corpus: Arc<WordCorpus>, tables: Arc<FrequencyTables>, seed: u64) -> Self {
        let mut solver = Self::new("Random", Strategy::Random, corpus, tables);
        solver.rng = StdRng::seed_from_u64(seed);
        solver
    }
}

impl Solver for StrategySolver {
    fn begin_episode(&mut self) {
        self.constraints = Constraints::new();
        self.candidates = self.corpus.allowed().to_vec();
    }

    fn next_guess(&mut self) -> Result<Word> {
        self.strategy
            .select(&self.candidates, &self.tables, &mut self.rng)
    }

    fn observe(&mut self, guess: Word, result: GuessResult) {
        self.constraints.observe(guess, result);
        let constraints = self.constraints;
        self.candidates.retain(|&word| constraints.allows(word));
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
