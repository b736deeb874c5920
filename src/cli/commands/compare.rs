//! Compare command - evaluate trained agents against the fixed baselines

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    agent::{SavedAgent, StrategySolver},
    analysis::GuessDistribution,
    cli::{load_corpus, output},
    corpus::FrequencyTables,
    game::GameRules,
    ports::Solver,
    training::{EvaluationConfig, EvaluationHarness, EvaluationReport},
};

#[derive(Parser, Debug)]
#[command(about = "Compare agents and baselines over held-out episodes")]
pub struct CompareArgs {
    /// Saved agent files to compare (repeatable)
    #[arg(long = "agent", short = 'a')]
    pub agents: Vec<PathBuf>,

    /// Number of evaluation episodes per solver
    #[arg(long, short = 'n', default_value_t = 100)]
    pub episodes: usize,

    /// Random seed for the shared secret sequence
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Answer word list file (one word per line)
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Allowed-guess word list file (one word per line)
    #[arg(long)]
    pub words: Option<PathBuf>,

    /// CSV file for the comparison results
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Skip the Simple and Random baselines
    #[arg(long)]
    pub no_baselines: bool,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    let corpus = Arc::new(load_corpus(args.answers.as_deref(), args.words.as_deref())?);
    let tables = Arc::new(FrequencyTables::from_corpus(&corpus));

    let mut solvers: Vec<Box<dyn Solver>> = Vec::new();
    for path in &args.agents {
        let saved = SavedAgent::load_from_file(path)
            .with_context(|| format!("Failed to load agent from {}", path.display()))?;
        let agent = saved.into_agent(corpus.clone(), tables.clone())?;
        solvers.push(Box::new(agent));
    }
    if !args.no_baselines {
        solvers.push(Box::new(StrategySolver::simple(
            corpus.clone(),
            tables.clone(),
        )));
        solvers.push(Box::new(StrategySolver::random(
            corpus.clone(),
            tables.clone(),
            args.seed.unwrap_or(0),
        )));
    }
    if solvers.is_empty() {
        anyhow::bail!("nothing to compare: pass --agent files or drop --no-baselines");
    }

    let harness = EvaluationHarness::new(
        corpus,
        EvaluationConfig {
            episodes: args.episodes,
            seed: args.seed,
            rules: GameRules::default(),
        },
    );
    let reports = harness.evaluate(&mut solvers)?;

    print_reports(&reports);

    if let Some(path) = &args.output {
        export_csv(&reports, path)?;
        println!("\nWrote comparison data to {}", path.display());
    }

    Ok(())
}

fn print_reports(reports: &[EvaluationReport]) {
    output::print_section("Evaluation results");

    for report in reports {
        output::print_subsection(&report.name);
        output::print_kv(
            "win rate",
            &format!(
                "{:.3} ({}/{})  95% CI [{:.3}, {:.3}]",
                report.win_rate,
                report.wins,
                report.episodes,
                report.win_rate_ci.0,
                report.win_rate_ci.1
            ),
        );

        let distribution = GuessDistribution::from_histogram(report.guess_histogram.clone());
        output::print_kv(
            "mean guesses to solve",
            &format!("{:.2}", distribution.mean_guesses),
        );

        let max = distribution.histogram.iter().copied().max().unwrap_or(0);
        for (index, &count) in distribution.histogram.iter().enumerate() {
            output::print_kv(
                &format!("solved in {}", index + 1),
                &format!("{:5}  {}", count, output::histogram_bar(count, max, 30)),
            );
        }
    }
}

fn export_csv(reports: &[EvaluationReport], path: &PathBuf) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let max_guesses = reports
        .iter()
        .map(|r| r.guess_histogram.len())
        .max()
        .unwrap_or(0);

    let mut header = vec![
        "name".to_string(),
        "episodes".to_string(),
        "wins".to_string(),
        "win_rate".to_string(),
        "ci_low".to_string(),
        "ci_high".to_string(),
        "mean_guesses".to_string(),
    ];
    for guess in 1..=max_guesses {
        header.push(format!("solved_in_{guess}"));
    }
    writer.write_record(&header)?;

    for report in reports {
        let mut row = vec![
            report.name.clone(),
            report.episodes.to_string(),
            report.wins.to_string(),
            format!("{:.6}", report.win_rate),
            format!("{:.6}", report.win_rate_ci.0),
            format!("{:.6}", report.win_rate_ci.1),
            format!("{:.6}", report.mean_guesses_to_solve),
        ];
        for guess in 0..max_guesses {
            row.push(
                report
                    .guess_histogram
                    .get(guess)
                    .copied()
                    .unwrap_or(0)
                    .to_string(),
            );
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
