//! Statistical summaries of training and evaluation data

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Pointwise mean and variance of a family of learning curves.
///
/// Produced from spread runs: many independent seeded repetitions of the same
/// configuration, each contributing one curve. Ragged inputs are truncated to
/// the shortest curve so every point aggregates the same number of runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveBand {
    pub mean: Vec<f64>,
    pub variance: Vec<f64>,
}

/// Aggregate a family of curves pointwise.
pub fn aggregate_curves(curves: &[Vec<f64>]) -> CurveBand {
    let shortest = curves.iter().map(Vec::len).min().unwrap_or(0);
    if shortest == 0 {
        return CurveBand::default();
    }

    let mut mean = Vec::with_capacity(shortest);
    let mut variance = Vec::with_capacity(shortest);

    for point in 0..shortest {
        let column: Vec<f64> = curves.iter().map(|curve| curve[point]).collect();
        mean.push((&column).mean());
        variance.push(if column.len() > 1 {
            (&column).variance()
        } else {
            0.0
        });
    }

    CurveBand { mean, variance }
}

/// Summary of a guesses-to-solve histogram.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuessDistribution {
    /// Solved-episode counts indexed by guesses used (index 0 = one guess).
    pub histogram: Vec<usize>,
    pub solved: usize,
    pub mean_guesses: f64,
}

impl GuessDistribution {
    pub fn from_histogram(histogram: Vec<usize>) -> Self {
        let solved: usize = histogram.iter().sum();
        let total_guesses: usize = histogram
            .iter()
            .enumerate()
            .map(|(index, &count)| (index + 1) * count)
            .sum();

        Self {
            solved,
            mean_guesses: if solved > 0 {
                total_guesses as f64 / solved as f64
            } else {
                0.0
            },
            histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_handles_empty_input() {
        let band = aggregate_curves(&[]);
        assert!(band.mean.is_empty());
    }

    #[test]
    fn aggregate_means_pointwise() {
        let curves = vec![vec![1.0, 3.0], vec![3.0, 5.0]];
        let band = aggregate_curves(&curves);
        assert_eq!(band.mean, vec![2.0, 4.0]);
        assert_eq!(band.variance, vec![2.0, 2.0]);
    }

    #[test]
    fn aggregate_truncates_to_shortest_curve() {
        let curves = vec![vec![1.0, 2.0, 3.0], vec![1.0]];
        let band = aggregate_curves(&curves);
        assert_eq!(band.mean.len(), 1);
    }

    #[test]
    fn guess_distribution_mean() {
        // Two solves in 1 guess, one in 4 guesses.
        let distribution = GuessDistribution::from_histogram(vec![2, 0, 0, 1, 0, 0]);
        assert_eq!(distribution.solved, 3);
        assert!((distribution.mean_guesses - 2.0).abs() < 1e-12);
    }
}
