use std::cmp::Ordering;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::info;

mod calendar;
mod errors;
mod export;
mod ingest;
mod models;
mod report;
mod stats;
mod workload;

use export::ExportFormat;
use models::ScoredRecord;
use stats::TestOutcome;
use workload::{OutOfRangePolicy, ScoredLog};

#[derive(Parser)]
#[command(name = "workload-correlation")]
#[command(about = "Workload scoring and calorie correlation for daily study logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// CSV file with the daily activity log
    #[arg(long)]
    csv: PathBuf,
    /// Fill missing calorie values with the column mean before scoring
    #[arg(long)]
    impute_calories: bool,
    /// What to do with scores outside the level buckets
    #[arg(long, value_enum, default_value_t = OutOfRangePolicy::Unclassified)]
    out_of_range: OutOfRangePolicy,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every day and list the heaviest ones
    Score {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print correlations and hypothesis tests
    Stats {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write the scored table to a file
    Export {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
}

fn load_scored(input: &InputArgs) -> anyhow::Result<ScoredLog> {
    let mut records = ingest::load_records(&input.csv)?;
    if input.impute_calories {
        let filled = ingest::impute_missing_calories(&mut records);
        if filled > 0 {
            info!("imputed {filled} missing calorie values with the column mean");
        }
    }
    let log = workload::score_log(&records, input.out_of_range)
        .context("failed to score the activity log")?;
    Ok(log)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Score { input, limit } => {
            let log = load_scored(&input)?;
            if log.records.is_empty() {
                println!("No records found in the log.");
                return Ok(());
            }

            let mut ranked: Vec<&ScoredRecord> = log.records.iter().collect();
            ranked.sort_by(|a, b| {
                b.workload_score
                    .partial_cmp(&a.workload_score)
                    .unwrap_or(Ordering::Equal)
            });

            println!("Top days by workload score:");
            for day in ranked.iter().take(limit) {
                println!(
                    "- {} ({}, {}) score {:.2} [{}] base {:.2}, week fatigue {:.2}",
                    day.date,
                    day.day_of_week,
                    day.day_type.as_str(),
                    day.workload_score,
                    day.workload_level
                        .map(|level| level.as_str())
                        .unwrap_or("Unclassified"),
                    day.base_workload,
                    day.fatigue_factor
                );
            }
        }
        Commands::Stats { input } => {
            let log = load_scored(&input)?;
            if log.records.is_empty() {
                println!("No records found in the log.");
                return Ok(());
            }
            print_stats(&log);
        }
        Commands::Report { input, out } => {
            let log = load_scored(&input)?;
            let report = report::build_report(&log);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export { input, out, format } => {
            let log = load_scored(&input)?;
            match format {
                ExportFormat::Csv => export::write_csv(&out, &log.records)?,
                ExportFormat::Json => export::write_json(&out, &log.records)?,
            }
            println!(
                "Scored table ({} rows) written to {}.",
                log.records.len(),
                out.display()
            );
        }
    }

    Ok(())
}

fn print_stats(log: &ScoredLog) {
    println!("Correlations (Pearson r, pairwise-complete):");
    let matrix = stats::correlation_matrix(&log.records);
    for (name, row) in stats::CORRELATION_VARIABLES.iter().zip(matrix.iter()) {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Some(r) => format!("{r:>6.2}"),
                None => "   n/a".to_string(),
            })
            .collect();
        println!("  {:<15} {}", name, cells.join(" "));
    }

    println!();
    println!(
        "Welch t-test (calories, score <= {:.0} vs >= {:.0}):",
        stats::LOW_SCORE_CUTOFF,
        stats::HIGH_SCORE_CUTOFF
    );
    let (low, high) = stats::extreme_calorie_groups(&log.records);
    match stats::welch_t_test(&low, &high) {
        TestOutcome::Computed(result) => {
            println!("  low group size: {}", result.low_n);
            println!("  high group size: {}", result.high_n);
            println!("  t-statistic: {:.4}", result.t_statistic);
            println!("  p-value: {:.4}", result.p_value);
        }
        TestOutcome::Skipped { reason } => println!("  skipped: {reason}"),
    }

    println!();
    println!("One-way ANOVA (calories across Low/Medium/High):");
    match stats::one_way_anova(&stats::level_calorie_groups(&log.records)) {
        TestOutcome::Computed(result) => {
            println!("  group sizes: {:?}", result.group_sizes);
            println!("  F-statistic: {:.4}", result.f_statistic);
            println!("  p-value: {:.4}", result.p_value);
        }
        TestOutcome::Skipped { reason } => println!("  skipped: {reason}"),
    }
}
