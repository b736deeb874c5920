//! Observer port - abstraction for training observation and data collection
//!
//! Observers let the orchestrator emit per-episode and per-checkpoint data
//! without coupling the training loop to any output format. Implementations
//! include progress bars, CSV datapoint writers, and in-memory metric
//! collectors.
//!
//! # Event Sequence
//!
//! 1. `on_training_start(total_episodes)` - once at the beginning
//! 2. `on_episode_end(record)` - after every episode
//! 3. `on_checkpoint(sample)` - after each convergence checkpoint
//! 4. `on_training_end()` - once at the end

use crate::{
    Result,
    training::{ConvergenceSample, EpisodeRecord},
};

/// Observer trait for monitoring training
///
/// All methods default to no-ops so implementations subscribe only to the
/// events they care about.
pub trait TrainingObserver {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _record: &EpisodeRecord) -> Result<()> {
        Ok(())
    }

    fn on_checkpoint(&mut self, _sample: &ConvergenceSample) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
