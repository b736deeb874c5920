//! Training observers: progress bars, CSV datapoints, in-memory metrics

use std::{fs::File, path::Path};

use indicatif::{ProgressBar, ProgressStyle};

use super::orchestrator::{ConvergenceSample, EpisodeRecord};
use crate::{
    Result,
    error::Error,
    game::Outcome,
    ports::TrainingObserver,
};

/// Renders a progress bar over the training episodes.
pub struct ProgressObserver {
    bar: Option<ProgressBar>,
    solved: usize,
    played: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            bar: None,
            solved: 0,
            played: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingObserver for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
            .map_err(|e| Error::ProgressBarTemplate {
                message: e.to_string(),
            })?
            .progress_chars("=>-");

        let bar = ProgressBar::new(total_episodes as u64);
        bar.set_style(style);
        self.bar = Some(bar);
        self.solved = 0;
        self.played = 0;
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.played += 1;
        if record.outcome == Outcome::Solved {
            self.solved += 1;
        }
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(format!(
                "solve rate {:.2}",
                self.solved as f64 / self.played as f64
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
        Ok(())
    }
}

/// Streams per-episode records to a CSV file, one row per episode, for
/// external plotting tools.
pub struct CsvDatapointObserver {
    writer: csv::Writer<File>,
}

impl CsvDatapointObserver {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|source| Error::Io {
            operation: format!("create datapoint file {}", path.as_ref().display()),
            source,
        })?;
        Ok(Self {
            writer: csv::Writer::from_writer(file),
        })
    }
}

impl TrainingObserver for CsvDatapointObserver {
    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush().map_err(|source| Error::Io {
            operation: "flush datapoint file".to_string(),
            source,
        })?;
        Ok(())
    }
}

/// Collects windowed solve rates and the convergence series in memory.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    window: usize,
    solved_in_window: usize,
    seen_in_window: usize,
    pub solve_rate_history: Vec<f64>,
    pub convergence_history: Vec<f64>,
}

impl MetricsObserver {
    /// `window` is the number of episodes per solve-rate sample.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            ..Self::default()
        }
    }
}

impl TrainingObserver for MetricsObserver {
    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.seen_in_window += 1;
        if record.outcome == Outcome::Solved {
            self.solved_in_window += 1;
        }
        if self.seen_in_window == self.window {
            self.solve_rate_history
                .push(self.solved_in_window as f64 / self.window as f64);
            self.seen_in_window = 0;
            self.solved_in_window = 0;
        }
        Ok(())
    }

    fn on_checkpoint(&mut self, sample: &ConvergenceSample) -> Result<()> {
        self.convergence_history.push(sample.rms_delta);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(episode: usize, outcome: Outcome) -> EpisodeRecord {
        EpisodeRecord {
            episode,
            outcome,
            guesses_used: 3,
            total_reward: 1.0,
            learning_delta: 0.1,
        }
    }

    #[test]
    fn metrics_observer_windows_solve_rates() {
        let mut observer = MetricsObserver::new(2);
        observer.on_episode_end(&record(0, Outcome::Solved)).unwrap();
        observer
            .on_episode_end(&record(1, Outcome::Exhausted))
            .unwrap();
        observer.on_episode_end(&record(2, Outcome::Solved)).unwrap();
        observer.on_episode_end(&record(3, Outcome::Solved)).unwrap();

        assert_eq!(observer.solve_rate_history, vec![0.5, 1.0]);
    }

    #[test]
    fn metrics_observer_collects_checkpoints() {
        let mut observer = MetricsObserver::new(10);
        observer
            .on_checkpoint(&ConvergenceSample {
                episode: 10,
                rms_delta: 0.25,
            })
            .unwrap();
        assert_eq!(observer.convergence_history, vec![0.25]);
    }
}
