//! Statistical analysis of training runs and evaluations

pub mod stats;

pub use stats::{CurveBand, GuessDistribution, aggregate_curves};
