//! Tabular temporal difference agents and baselines
//!
//! ## Algorithms
//!
//! - **Q-learning**: off-policy TD control, bootstraps from the best
//!   available next action
//! - **Sarsa**: on-policy TD control, bootstraps from the action the
//!   epsilon-greedy policy actually selects next
//!
//! Both share one agent type parameterized by [`UpdateRule`]; the baselines
//! share the [`crate::ports::Solver`] port with it so the evaluation harness
//! can drive all of them interchangeably.

pub mod baselines;
pub mod q_table;
pub mod serialization;
pub mod tabular;

pub use baselines::StrategySolver;
pub use q_table::{ActionKey, QTable, TableStats};
pub use serialization::SavedAgent;
pub use tabular::{
    ActionSpace, EpisodeSummary, Hyperparameters, RewardScheme, TabularAgent, UpdateRule,
};
