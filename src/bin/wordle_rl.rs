//! wordle-rl CLI - train and compare tabular Wordle agents
//!
//! This CLI provides a unified interface for:
//! - Training Sarsa and Q-learning agents over a word corpus
//! - Comparing trained agents against the Simple and Random baselines

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wordle-rl")]
#[command(version, about = "Tabular reinforcement learning for Wordle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a tabular agent (Sarsa or Q-learning)
    Train(wordle_rl::cli::commands::train::TrainArgs),

    /// Compare agents and baselines over held-out episodes
    Compare(wordle_rl::cli::commands::compare::CompareArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => wordle_rl::cli::commands::train::execute(args),
        Commands::Compare(args) => wordle_rl::cli::commands::compare::execute(args),
    }
}
