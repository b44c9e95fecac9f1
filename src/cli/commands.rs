// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `train` and `features`, and all
// their configurable flags.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::data::{loader::SqlServerLoader, snapshot::SnapshotLoader};
use crate::domain::traits::WarehouseSource;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build features, train the regressor and report test-set error
    Train(TrainArgs),

    /// Build the feature table only and report join losses
    Features(FeaturesArgs),
}

/// Where the five warehouse tables come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// SQL Server connection string (ADO.NET format),
    /// e.g. "server=tcp:wms-db,1433;database=WMS;user=reader;password=..."
    #[arg(long, env = "TASKTIME_DB", hide_env_values = true)]
    pub db: Option<String>,

    /// JSON snapshot of the five tables
    #[arg(long, conflicts_with = "db")]
    pub snapshot: Option<PathBuf>,
}

impl SourceArgs {
    pub fn into_source(self) -> Result<Box<dyn WarehouseSource>> {
        match (self.snapshot, self.db) {
            (Some(path), None) => Ok(Box::new(SnapshotLoader::new(path))),
            (None, Some(cs))   => Ok(Box::new(SqlServerLoader::new(cs))),
            (Some(_), Some(_)) => bail!("two data sources: pass either --db or --snapshot, not both"),
            (None, None)       => bail!("no data source: pass --db, set TASKTIME_DB, or pass --snapshot"),
        }
    }
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Number of full passes over the training rows
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Rows per optimiser step
    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Share of all rows held out as the test partition
    #[arg(long, default_value_t = 0.2)]
    pub test_fraction: f64,

    /// Share of the training partition used for validation monitoring
    #[arg(long, default_value_t = 0.2)]
    pub validation_fraction: f64,

    /// Seed for the train/test partition and epoch shuffles
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Directory to append per-epoch metrics.csv to
    #[arg(long)]
    pub metrics_dir: Option<String>,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<&TrainArgs> for TrainConfig {
    fn from(a: &TrainArgs) -> Self {
        TrainConfig {
            epochs:              a.epochs,
            batch_size:          a.batch_size,
            lr:                  a.lr,
            test_fraction:       a.test_fraction,
            validation_fraction: a.validation_fraction,
            seed:                a.seed,
            metrics_dir:         a.metrics_dir.clone(),
        }
    }
}

/// All arguments for the `features` command
#[derive(Args, Debug)]
pub struct FeaturesArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the assembled rows to this file as JSON
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["tasktime", "train", "--snapshot", "s.json"]).unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = (&args).into();
        let def = TrainConfig::default();
        assert_eq!(cfg.epochs, def.epochs);
        assert_eq!(cfg.batch_size, def.batch_size);
        assert_eq!(cfg.lr, def.lr);
        assert_eq!(cfg.test_fraction, def.test_fraction);
        assert_eq!(cfg.validation_fraction, def.validation_fraction);
        assert_eq!(cfg.seed, def.seed);
    }

    #[test]
    fn test_both_sources_are_rejected() {
        let parsed = Cli::try_parse_from([
            "tasktime", "features", "--snapshot", "s.json", "--db", "server=tcp:x,1",
        ]);
        assert!(parsed.is_err());

        let src = SourceArgs {
            db:       Some("server=tcp:x,1433".into()),
            snapshot: Some("s.json".into()),
        };
        assert!(src.into_source().is_err());
    }

    #[test]
    fn test_snapshot_alone_selects_the_file_loader() {
        let src = SourceArgs { db: None, snapshot: Some("s.json".into()) };
        assert!(src.into_source().unwrap().describe().contains("snapshot"));
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let src = SourceArgs { db: None, snapshot: None };
        assert!(src.into_source().is_err());
    }
}
