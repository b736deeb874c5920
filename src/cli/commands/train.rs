//! Train command - train a Sarsa or Q-learning agent

use std::{path::PathBuf, sync::Arc};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};

use crate::{
    agent::{ActionSpace, Hyperparameters, RewardScheme, SavedAgent, TabularAgent, UpdateRule},
    cli::{load_corpus, output},
    corpus::FrequencyTables,
    game::GameRules,
    strategy::Strategy,
    training::{CsvDatapointObserver, ProgressObserver, Trainer, TrainerConfig, TrainingRun},
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AgentKind {
    Sarsa,
    QLearning,
}

impl From<AgentKind> for UpdateRule {
    fn from(kind: AgentKind) -> Self {
        match kind {
            AgentKind::Sarsa => UpdateRule::Sarsa,
            AgentKind::QLearning => UpdateRule::QLearning,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RewardKind {
    /// Shaped per-green reward plus terminal signal
    Shaped,
    /// Terminal signal only (shaping ablation)
    TerminalOnly,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionSpaceKind {
    /// Value table keyed by the literal guessed word
    Words,
    /// Value table keyed by selection-heuristic index
    Strategies,
}

#[derive(Parser, Debug)]
#[command(about = "Train a tabular agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Learning algorithm to train
    #[arg(value_enum)]
    pub agent: AgentKind,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 500)]
    pub episodes: usize,

    /// Step size alpha
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Discount factor gamma
    #[arg(long, default_value_t = 0.9)]
    pub gamma: f64,

    /// Exploration rate epsilon
    #[arg(long, default_value_t = 0.05)]
    pub epsilon: f64,

    /// Multiplicative epsilon decay per episode
    #[arg(long, default_value_t = 1.0)]
    pub epsilon_decay: f64,

    /// Epsilon floor when decaying
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,

    /// Reward scheme
    #[arg(long, value_enum, default_value_t = RewardKind::Shaped)]
    pub reward: RewardKind,

    /// Action-space representation for the value table
    #[arg(long, value_enum, default_value_t = ActionSpaceKind::Strategies)]
    pub action_space: ActionSpaceKind,

    /// Answer word list file (one word per line)
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Allowed-guess word list file (one word per line)
    #[arg(long)]
    pub words: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Number of independent seeded repetitions
    #[arg(long, default_value_t = 1)]
    pub spread: usize,

    /// Episodes between convergence checkpoints
    #[arg(long, default_value_t = 50)]
    pub checkpoint_interval: usize,

    /// Fraction of answers used for training (rest is held out)
    #[arg(long, default_value_t = 0.75)]
    pub train_fraction: f64,

    /// Output file for the trained agent
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// CSV file for per-episode datapoints
    #[arg(long)]
    pub datapoints: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let corpus = Arc::new(load_corpus(args.answers.as_deref(), args.words.as_deref())?);
    let tables = Arc::new(FrequencyTables::from_corpus(&corpus));

    let params = Hyperparameters {
        alpha: args.alpha,
        gamma: args.gamma,
        epsilon: args.epsilon,
        epsilon_decay: args.epsilon_decay,
        min_epsilon: args.min_epsilon,
    };
    let rewards = match args.reward {
        RewardKind::Shaped => RewardScheme::shaped(),
        RewardKind::TerminalOnly => RewardScheme::terminal_only(),
    };
    let actions = match args.action_space {
        ActionSpaceKind::Words => ActionSpace::Words,
        ActionSpaceKind::Strategies => ActionSpace::default_strategy_table(),
    };

    let mut agent = TabularAgent::new(
        UpdateRule::from(args.agent),
        params,
        rewards,
        Strategy::Educated,
        actions,
        corpus.clone(),
        tables.clone(),
    )?;
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }

    let config = TrainerConfig {
        episodes: args.episodes,
        checkpoint_interval: args.checkpoint_interval,
        train_fraction: args.train_fraction,
        seed: args.seed,
        rules: GameRules::default(),
    };

    let mut trainer = Trainer::new(corpus, tables, config);
    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.datapoints {
        trainer = trainer.with_observer(Box::new(CsvDatapointObserver::create(path)?));
    }

    if args.spread > 1 {
        if args.output.is_some() {
            bail!("--output applies to single runs; rerun with --spread 1 to save an agent");
        }
        let spread = trainer.run_spread(&agent, args.spread)?;

        output::print_section(&format!(
            "{} spread over {} repetitions",
            UpdateRule::from(args.agent).label(),
            args.spread
        ));
        for (index, run) in spread.runs.iter().enumerate() {
            output::print_kv(
                &format!("run {index} test win rate"),
                &format!("{:.3}", run.test.win_rate),
            );
        }
        output::print_subsection("Convergence (RMS delta per checkpoint)");
        for (point, (mean, variance)) in spread
            .convergence_band
            .mean
            .iter()
            .zip(spread.convergence_band.variance.iter())
            .enumerate()
        {
            output::print_kv(
                &format!("checkpoint {point}"),
                &format!("mean {mean:.5}  var {variance:.6}"),
            );
        }

        return Ok(());
    }

    let run = trainer.run(&mut agent)?;
    print_run_summary(&run);

    if let Some(path) = &args.output {
        SavedAgent::from_agent(&agent).save_to_file(path)?;
        println!("\nSaved trained agent to {}", path.display());
    }

    Ok(())
}

fn print_run_summary(run: &TrainingRun) {
    output::print_section(&format!("{} training summary", run.rule.label()));
    output::print_kv("episodes", &run.episodes.to_string());
    output::print_kv(
        "alpha / gamma / epsilon",
        &format!(
            "{} / {} / {}",
            run.params.alpha, run.params.gamma, run.params.epsilon
        ),
    );
    output::print_kv("table entries", &run.table_stats.entries.to_string());
    output::print_kv(
        "states visited",
        &format!(
            "{} (avg {:.1} visits)",
            run.table_stats.states_visited, run.table_stats.avg_visits_per_state
        ),
    );

    if let Some(last) = run.convergence.last() {
        output::print_kv(
            "final RMS delta",
            &format!("{:.5} at episode {}", last.rms_delta, last.episode),
        );
    }

    output::print_subsection("Held-out test pass");
    output::print_kv("episodes", &run.test.episodes.to_string());
    output::print_kv("win rate", &format!("{:.3}", run.test.win_rate));
    output::print_kv(
        "avg guesses to solve",
        &format!("{:.2}", run.test.avg_guesses_to_solve),
    );
}
