//! Sarsa and Q-learning agents
//!
//! Both algorithms share one agent type: epsilon-greedy selection, candidate
//! bookkeeping, and table plumbing are identical, and the update rule only
//! changes the bootstrap term. Q-learning bootstraps from the best available
//! next action (off-policy); Sarsa bootstraps from the action the policy
//! actually selects next (on-policy).

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::q_table::{ActionKey, QTable, TableStats};
use crate::{
    corpus::{FrequencyTables, Word, WordCorpus},
    error::{Error, Result},
    game::{Outcome, WordleEnvironment},
    ports::Solver,
    state::{Constraints, StateKey},
    strategy::Strategy,
};

/// Which temporal difference update the agent applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateRule {
    /// Off-policy TD control: bootstrap from max_a' Q(s',a').
    QLearning,
    /// On-policy TD control: bootstrap from Q(s',a') of the selected action.
    Sarsa,
}

impl UpdateRule {
    pub fn label(&self) -> &'static str {
        match self {
            UpdateRule::QLearning => "Q-Learning",
            UpdateRule::Sarsa => "Sarsa",
        }
    }
}

/// Training hyperparameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Step size alpha, in (0, 1].
    pub alpha: f64,
    /// Discount factor gamma, in [0, 1].
    pub gamma: f64,
    /// Exploration rate epsilon, in [0, 1].
    pub epsilon: f64,
    /// Multiplicative epsilon decay per episode; 1.0 keeps epsilon fixed.
    pub epsilon_decay: f64,
    /// Floor for decayed epsilon.
    pub min_epsilon: f64,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            gamma: 0.9,
            epsilon: 0.05,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
        }
    }
}

impl Hyperparameters {
    /// Validate ranges. Called eagerly at agent construction so bad
    /// configurations fail before any episode runs.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::InvalidHyperparameter {
                name: "alpha",
                value: self.alpha,
                expected: "(0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(Error::InvalidHyperparameter {
                name: "gamma",
                value: self.gamma,
                expected: "[0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(Error::InvalidHyperparameter {
                name: "epsilon",
                value: self.epsilon,
                expected: "[0, 1]",
            });
        }
        if !(self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0) {
            return Err(Error::InvalidHyperparameter {
                name: "epsilon_decay",
                value: self.epsilon_decay,
                expected: "(0, 1]",
            });
        }
        if !(0.0..=1.0).contains(&self.min_epsilon) {
            return Err(Error::InvalidHyperparameter {
                name: "min_epsilon",
                value: self.min_epsilon,
                expected: "[0, 1]",
            });
        }
        Ok(())
    }
}

/// Reward signal configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RewardScheme {
    /// Reward per newly-gained correct position (shaping).
    pub per_green: f64,
    /// Terminal bonus on a solved episode.
    pub solved_bonus: f64,
    /// Terminal penalty (typically negative) on an exhausted episode.
    pub exhausted_penalty: f64,
}

impl RewardScheme {
    /// Default scheme: shaped per-green reward plus terminal signal.
    pub fn shaped() -> Self {
        Self {
            per_green: 1.0,
            solved_bonus: 5.0,
            exhausted_penalty: -5.0,
        }
    }

    /// Ablation scheme: terminal signal only, no intermediate shaping.
    pub fn terminal_only() -> Self {
        Self {
            per_green: 0.0,
            ..Self::shaped()
        }
    }

    /// Reward for one transition: `newly_correct` positions gained this step,
    /// plus the terminal bonus or penalty when the episode ends.
    pub fn reward(&self, newly_correct: usize, outcome: Option<Outcome>) -> f64 {
        let shaping = self.per_green * newly_correct as f64;
        match outcome {
            Some(Outcome::Solved) => shaping + self.solved_bonus,
            Some(Outcome::Exhausted) => shaping + self.exhausted_penalty,
            None => shaping,
        }
    }
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self::shaped()
    }
}

/// How guesses are keyed in the value table.
///
/// `Words` keys by the literal guess, giving a fine-grained table over the
/// pre-filtered consistent candidates. `StrategyTable` keys by the index of
/// the selection heuristic that produced the guess, giving a small fixed
/// action space independent of vocabulary size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSpace {
    Words,
    StrategyTable(Vec<Strategy>),
}

impl ActionSpace {
    /// The action table the original exploration design used: an
    /// information-maximizing pick, a green-probability pick, and a random
    /// fallback.
    pub fn default_strategy_table() -> Self {
        ActionSpace::StrategyTable(vec![
            Strategy::Educated,
            Strategy::GreenProbability,
            Strategy::Random,
        ])
    }
}

/// Outcome data for one played episode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub outcome: Outcome,
    pub guesses_used: usize,
    pub total_reward: f64,
    /// Sum of absolute value-table changes applied during the episode; zero
    /// outside training.
    pub learning_delta: f64,
}

/// The selected action: its table key plus the concrete word to play.
#[derive(Debug, Clone, Copy)]
struct ChosenAction {
    key: ActionKey,
    word: Word,
}

/// Serializable agent state, excluding the shared corpus and tables which are
/// re-attached on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TabularAgentState {
    pub rule: UpdateRule,
    pub params: Hyperparameters,
    pub rewards: RewardScheme,
    pub exploration: Strategy,
    pub actions: ActionSpace,
    pub table: QTable,
    pub epsilon: f64,
    pub rng_seed: Option<u64>,
    pub name: String,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Tabular temporal-difference agent (Sarsa or Q-learning).
///
/// Owns exactly one value table. The exploration strategy is consulted for
/// epsilon draws and as the deterministic fallback when exploitation ties.
#[derive(Debug, Clone)]
pub struct TabularAgent {
    rule: UpdateRule,
    params: Hyperparameters,
    rewards: RewardScheme,
    exploration: Strategy,
    actions: ActionSpace,
    table: QTable,
    corpus: Arc<WordCorpus>,
    tables: Arc<FrequencyTables>,
    rng: StdRng,
    rng_seed: Option<u64>,
    /// Current (possibly decayed) exploration rate.
    epsilon: f64,
    name: String,

    // Per-episode working state.
    constraints: Constraints,
    candidates: Vec<Word>,
}

impl TabularAgent {
    /// Create a new agent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] for out-of-range parameters
    /// and [`Error::InvalidConfiguration`] for an empty strategy table.
    pub fn new(
        rule: UpdateRule,
        params: Hyperparameters,
        rewards: RewardScheme,
        exploration: Strategy,
        actions: ActionSpace,
        corpus: Arc<WordCorpus>,
        tables: Arc<FrequencyTables>,
    ) -> Result<Self> {
        params.validate()?;
        if let ActionSpace::StrategyTable(strategies) = &actions {
            if strategies.is_empty() || strategies.len() > u8::MAX as usize {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "strategy table must hold between 1 and {} entries, got {}",
                        u8::MAX,
                        strategies.len()
                    ),
                });
            }
        }

        Ok(Self {
            rule,
            epsilon: params.epsilon,
            params,
            rewards,
            exploration,
            actions,
            table: QTable::new(),
            corpus,
            tables,
            rng: build_rng(None),
            rng_seed: None,
            name: rule.label().to_string(),
            constraints: Constraints::new(),
            candidates: Vec::new(),
        })
    }

    /// Seed the agent's RNG for reproducible exploration.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Override the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the value table, e.g. with one rebuilt from an external
    /// key-value representation.
    pub fn with_table(mut self, table: QTable) -> Self {
        self.table = table;
        self
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    pub fn hyperparameters(&self) -> Hyperparameters {
        self.params
    }

    pub fn table(&self) -> &QTable {
        &self.table
    }

    pub fn table_stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Current exploration rate (after any decay).
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Clear learned state: empty table, restored epsilon, reseeded RNG.
    pub fn reset(&mut self) {
        self.table.reset();
        self.epsilon = self.params.epsilon;
        self.rng = build_rng(self.rng_seed);
    }

    /// Play one episode against `env`, which must have been reset.
    ///
    /// In training mode the agent acts epsilon-greedily and applies exactly
    /// one value update per environment step. Outside training it acts
    /// greedily and leaves the table untouched.
    pub fn play_episode(
        &mut self,
        env: &mut WordleEnvironment,
        training: bool,
    ) -> Result<EpisodeSummary> {
        self.begin_episode();

        let mut total_reward = 0.0;
        let mut learning_delta = 0.0;
        let mut best_correct = 0usize;

        let mut state = self.constraints.key();
        if training {
            self.table.visit(&state);
        }
        let mut action = self.select_action(&state, training)?;

        loop {
            let step = env.step(action.word)?;
            self.observe(action.word, step.feedback);

            let correct = step.feedback.correct_count();
            let newly_correct = correct.saturating_sub(best_correct);
            best_correct = best_correct.max(correct);

            let reward = self.rewards.reward(newly_correct, step.outcome);
            total_reward += reward;

            let next_state = self.constraints.key();

            if let Some(outcome) = step.outcome {
                if training {
                    // Terminal transition: no bootstrap.
                    learning_delta += self
                        .table
                        .td_update(
                            state,
                            action.key,
                            reward,
                            0.0,
                            self.params.alpha,
                            self.params.gamma,
                        )
                        .abs();
                    self.table.visit(&next_state);
                    self.decay_epsilon();
                }

                return Ok(EpisodeSummary {
                    outcome,
                    guesses_used: env.guesses_used(),
                    total_reward,
                    learning_delta,
                });
            }

            let next_action = self.select_action(&next_state, training)?;

            if training {
                let bootstrap = match self.rule {
                    UpdateRule::QLearning => self.max_available_q(&next_state),
                    UpdateRule::Sarsa => self.table.get(&next_state, next_action.key),
                };
                learning_delta += self
                    .table
                    .td_update(
                        state,
                        action.key,
                        reward,
                        bootstrap,
                        self.params.alpha,
                        self.params.gamma,
                    )
                    .abs();
                self.table.visit(&next_state);
            }

            state = next_state;
            action = next_action;
        }
    }

    /// Epsilon-greedy (or pure greedy) action selection.
    ///
    /// Exploitation ties are broken by running the exploration strategy over
    /// the tied set, which is deterministic for the ranking strategies and
    /// seeded for `Random` - never arbitrary.
    fn select_action(&mut self, state: &StateKey, epsilon_greedy: bool) -> Result<ChosenAction> {
        if self.candidates.is_empty() {
            return Err(Error::NoCandidates);
        }

        let explore = epsilon_greedy && self.rng.random::<f64>() < self.epsilon;

        match &self.actions {
            ActionSpace::Words => {
                if explore {
                    let word =
                        self.exploration
                            .select(&self.candidates, &self.tables, &mut self.rng)?;
                    return Ok(ChosenAction {
                        key: ActionKey::Word(word),
                        word,
                    });
                }

                let best_q = self.table.max_q(
                    state,
                    self.candidates.iter().map(|&word| ActionKey::Word(word)),
                );
                let tied: Vec<Word> = self
                    .candidates
                    .iter()
                    .copied()
                    .filter(|&word| self.table.get(state, ActionKey::Word(word)) == best_q)
                    .collect();

                let word = if tied.len() == 1 {
                    tied[0]
                } else {
                    self.exploration.select(&tied, &self.tables, &mut self.rng)?
                };
                Ok(ChosenAction {
                    key: ActionKey::Word(word),
                    word,
                })
            }

            ActionSpace::StrategyTable(strategies) => {
                let index = if explore {
                    self.rng.random_range(0..strategies.len())
                } else {
                    // Argmax over heuristic indices; ties resolve to the
                    // earliest table entry, which orders the fallback
                    // preference.
                    let mut best_index = 0usize;
                    let mut best_q = f64::NEG_INFINITY;
                    for index in 0..strategies.len() {
                        let q = self.table.get(state, ActionKey::Strategy(index as u8));
                        if q > best_q {
                            best_q = q;
                            best_index = index;
                        }
                    }
                    best_index
                };

                let word =
                    strategies[index].select(&self.candidates, &self.tables, &mut self.rng)?;
                Ok(ChosenAction {
                    key: ActionKey::Strategy(index as u8),
                    word,
                })
            }
        }
    }

    /// Best stored value over the actions available in `state`.
    fn max_available_q(&self, state: &StateKey) -> f64 {
        match &self.actions {
            ActionSpace::Words => self.table.max_q(
                state,
                self.candidates.iter().map(|&word| ActionKey::Word(word)),
            ),
            ActionSpace::StrategyTable(strategies) => self.table.max_q(
                state,
                (0..strategies.len() as u8).map(ActionKey::Strategy),
            ),
        }
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.params.epsilon_decay).max(self.params.min_epsilon);
    }

    pub(crate) fn export_state(&self) -> TabularAgentState {
        TabularAgentState {
            rule: self.rule,
            params: self.params,
            rewards: self.rewards,
            exploration: self.exploration.clone(),
            actions: self.actions.clone(),
            table: self.table.clone(),
            epsilon: self.epsilon,
            rng_seed: self.rng_seed,
            name: self.name.clone(),
        }
    }

    pub(crate) fn from_state(
        state: TabularAgentState,
        corpus: Arc<WordCorpus>,
        tables: Arc<FrequencyTables>,
    ) -> Self {
        Self {
            rule: state.rule,
            params: state.params,
            rewards: state.rewards,
            exploration: state.exploration,
            actions: state.actions,
            table: state.table,
            corpus,
            tables,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
            epsilon: state.epsilon,
            name: state.name,
            constraints: Constraints::new(),
            candidates: Vec::new(),
        }
    }
}

impl Solver for TabularAgent {
    fn begin_episode(&mut self) {
        self.constraints = Constraints::new();
        self.candidates = self.corpus.allowed().to_vec();
    }

    fn next_guess(&mut self) -> Result<Word> {
        let state = self.constraints.key();
        self.select_action(&state, false).map(|action| action.word)
    }

    fn observe(&mut self, guess: Word, result: crate::game::GuessResult) {
        self.constraints.observe(guess, result);
        let constraints = self.constraints;
        self.candidates.retain(|&word| constraints.allows(word));
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameRules;

    fn fixtures() -> (Arc<WordCorpus>, Arc<FrequencyTables>) {
        let corpus = Arc::new(WordCorpus::sample());
        let tables = Arc::new(FrequencyTables::from_corpus(&corpus));
        (corpus, tables)
    }

    fn agent(rule: UpdateRule, actions: ActionSpace) -> TabularAgent {
        let (corpus, tables) = fixtures();
        TabularAgent::new(
            rule,
            Hyperparameters::default(),
            RewardScheme::shaped(),
            Strategy::Educated,
            actions,
            corpus,
            tables,
        )
        .unwrap()
        .with_seed(13)
    }

    #[test]
    fn invalid_hyperparameters_are_rejected() {
        let (corpus, tables) = fixtures();
        let params = Hyperparameters {
            alpha: 0.0,
            ..Hyperparameters::default()
        };
        let result = TabularAgent::new(
            UpdateRule::QLearning,
            params,
            RewardScheme::shaped(),
            Strategy::Educated,
            ActionSpace::Words,
            corpus,
            tables,
        );
        assert!(matches!(
            result,
            Err(Error::InvalidHyperparameter { name: "alpha", .. })
        ));
    }

    #[test]
    fn empty_strategy_table_is_rejected() {
        let (corpus, tables) = fixtures();
        let result = TabularAgent::new(
            UpdateRule::Sarsa,
            Hyperparameters::default(),
            RewardScheme::shaped(),
            Strategy::Educated,
            ActionSpace::StrategyTable(Vec::new()),
            corpus,
            tables,
        );
        assert!(matches!(result, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn greedy_selection_picks_highest_valued_word() {
        let mut agent = agent(UpdateRule::QLearning, ActionSpace::Words);
        agent.begin_episode();

        let target = Word::parse("robot").unwrap();
        let state = StateKey::initial();
        agent.table.set(state, ActionKey::Word(target), 10.0);

        let guess = agent.next_guess().unwrap();
        assert_eq!(guess, target);
    }

    #[test]
    fn greedy_strategy_table_picks_highest_valued_index() {
        let mut agent = agent(UpdateRule::Sarsa, ActionSpace::default_strategy_table());
        agent.begin_episode();

        // Favor the random-fallback action (index 2); the greedy pick must
        // route word selection through it rather than index 0.
        agent.table.set(StateKey::initial(), ActionKey::Strategy(2), 3.0);

        let state = StateKey::initial();
        let action = agent.select_action(&state, false).unwrap();
        assert_eq!(action.key, ActionKey::Strategy(2));
    }

    #[test]
    fn reward_scheme_shapes_and_terminates() {
        let scheme = RewardScheme::shaped();
        assert_eq!(scheme.reward(2, None), 2.0);
        assert_eq!(scheme.reward(0, Some(Outcome::Solved)), 5.0);
        assert_eq!(scheme.reward(1, Some(Outcome::Exhausted)), -4.0);

        let ablation = RewardScheme::terminal_only();
        assert_eq!(ablation.reward(3, None), 0.0);
        assert_eq!(ablation.reward(3, Some(Outcome::Solved)), 5.0);
    }

    #[test]
    fn training_episode_updates_table_once_per_step() {
        let (corpus, tables) = fixtures();
        let mut agent = TabularAgent::new(
            UpdateRule::QLearning,
            Hyperparameters {
                epsilon: 0.0,
                ..Hyperparameters::default()
            },
            RewardScheme::shaped(),
            Strategy::Educated,
            ActionSpace::default_strategy_table(),
            corpus.clone(),
            tables,
        )
        .unwrap()
        .with_seed(5);

        let mut env =
            WordleEnvironment::new(corpus, GameRules::default()).with_seed(5);
        env.reset(Some(Word::parse("crane").unwrap())).unwrap();

        let summary = agent.play_episode(&mut env, true).unwrap();
        assert_eq!(summary.guesses_used, env.guesses_used());
        // One (state, action) entry per step taken.
        assert_eq!(agent.table().len(), summary.guesses_used);
        assert!(summary.learning_delta > 0.0);
    }

    #[test]
    fn evaluation_episode_leaves_table_untouched() {
        let (corpus, tables) = fixtures();
        let mut agent = TabularAgent::new(
            UpdateRule::Sarsa,
            Hyperparameters::default(),
            RewardScheme::shaped(),
            Strategy::Educated,
            ActionSpace::default_strategy_table(),
            corpus.clone(),
            tables,
        )
        .unwrap()
        .with_seed(5);

        let mut env =
            WordleEnvironment::new(corpus, GameRules::default()).with_seed(5);
        env.reset(Some(Word::parse("crane").unwrap())).unwrap();

        let summary = agent.play_episode(&mut env, false).unwrap();
        assert!(agent.table().is_empty());
        assert_eq!(summary.learning_delta, 0.0);
    }

    #[test]
    fn epsilon_decays_after_training_episode() {
        let (corpus, tables) = fixtures();
        let mut agent = TabularAgent::new(
            UpdateRule::QLearning,
            Hyperparameters {
                epsilon: 0.5,
                epsilon_decay: 0.5,
                min_epsilon: 0.1,
                ..Hyperparameters::default()
            },
            RewardScheme::shaped(),
            Strategy::Educated,
            ActionSpace::default_strategy_table(),
            corpus.clone(),
            tables,
        )
        .unwrap()
        .with_seed(5);

        let mut env = WordleEnvironment::new(corpus, GameRules::default()).with_seed(5);
        env.reset(Some(Word::parse("crane").unwrap())).unwrap();
        agent.play_episode(&mut env, true).unwrap();
        assert!((agent.epsilon() - 0.25).abs() < 1e-12);
    }
}
