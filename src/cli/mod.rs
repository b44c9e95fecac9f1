// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and delegates everything else to Layer 2.
//
//   1. `train`    — full pipeline, prints test-set error
//   2. `features` — feature table only, prints join losses

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, FeaturesArgs, TrainArgs};

use crate::application::{features_use_case::FeaturesUseCase, train_use_case::TrainUseCase};
use crate::domain::task_features::JoinReport;

#[derive(Parser, Debug)]
#[command(
    name = "tasktime",
    version,
    about = "Estimate warehouse task completion time from historical task data."
)]
pub struct Cli {
    /// The subcommand to run (train or features)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Features(args) => run_features(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let config   = (&args).into();
    let source   = args.source.into_source()?;
    let use_case = TrainUseCase::new(source, config);

    let report = use_case.execute()?;

    print_joins(&report.joins);
    println!(
        "Rows: {} train, {} validation, {} test ({} encoded features)",
        report.train_rows, report.val_rows, report.test_rows, report.feature_dim
    );
    println!("Test set Mean Squared Error: {:.4}", report.outcome.test.mse);
    println!("Test set Mean Absolute Error: {:.4}", report.outcome.test.mae);
    Ok(())
}

fn run_features(args: FeaturesArgs) -> Result<()> {
    let source   = args.source.into_source()?;
    let use_case = FeaturesUseCase::new(source, args.output);

    let table = use_case.execute()?;
    print_joins(&table.report);

    let n = table.rows.len() as f64;
    let mean_minutes = table.rows.iter().map(|r| r.completion_minutes).sum::<f64>() / n;
    println!("Mean completion time: {:.2} min", mean_minutes);
    Ok(())
}

fn print_joins(r: &JoinReport) {
    println!("Tasks loaded:              {}", r.tasks_in);
    println!("  no detail lines:         {}", r.dropped_no_details);
    println!("  unknown worker:          {}", r.dropped_unknown_worker);
    println!("  no known item:           {}", r.dropped_no_load);
    println!("  never completed:         {}", r.rejected_open);
    println!("  non-positive duration:   {}", r.rejected_non_positive);
    println!("  total dropped:           {}", r.total_dropped());
    println!("Orphaned item lines:       {}", r.orphaned_item_lines);
    println!("Feature rows:              {}", r.rows_out);
}
