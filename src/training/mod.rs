//! Training orchestration and evaluation

pub mod evaluation;
pub mod observers;
pub mod orchestrator;

pub use evaluation::{EvaluationConfig, EvaluationHarness, EvaluationReport, play_episode};
pub use observers::{CsvDatapointObserver, MetricsObserver, ProgressObserver};
pub use orchestrator::{
    ConvergenceSample, EpisodeRecord, SpreadResult, TestSummary, Trainer, TrainerConfig,
    TrainingRun,
};
