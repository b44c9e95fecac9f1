// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the five tables          (Layer 4 - data)
//   Step 2: Assemble features + labels    (Layer 4 - data)
//   Step 3: Train / test split (seeded)   (Layer 4 - data)
//   Step 4: Fit preprocessor on train     (Layer 4 - data)
//   Step 5: Encode every partition        (Layer 4 - data)
//   Step 6: Hold out validation rows      (Layer 4 - data)
//   Step 7: Train and evaluate            (Layer 5 - ml)
//
// Step 3 comes before step 4 on purpose: scaling statistics and
// category vocabularies must never see a test row.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::data::{
    assembler::FeatureAssembler,
    dataset::{TaskDataset, TaskSample},
    preprocessor::Preprocessor,
    splitter::{split_tail, split_train_test},
};
use crate::domain::task_features::{JoinReport, TaskFeatures};
use crate::domain::traits::WarehouseSource;
use crate::infra::metrics::MetricsLogger;
use crate::ml::trainer::{run_training, TrainingOutcome};

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Logged as JSON at the
// start of every run so results can be traced back to settings.
// The data source is deliberately not part of it: connection
// strings carry credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub epochs:              usize,
    pub batch_size:          usize,
    pub lr:                  f64,
    pub test_fraction:       f64,
    pub validation_fraction: f64,
    pub seed:                u64,
    pub metrics_dir:         Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            epochs:              100,
            batch_size:          32,
            lr:                  1e-3,
            test_fraction:       0.2,
            validation_fraction: 0.2,
            seed:                42,
            metrics_dir:         None,
        }
    }
}

/// What a finished run hands back to the CLI
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub joins:       JoinReport,
    pub train_rows:  usize,
    pub val_rows:    usize,
    pub test_rows:   usize,
    pub feature_dim: usize,
    pub outcome:     TrainingOutcome,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    source: Box<dyn WarehouseSource>,
    config: TrainConfig,
    /// Reference time for worker experience
    now:    NaiveDateTime,
}

impl TrainUseCase {
    pub fn new(source: Box<dyn WarehouseSource>, config: TrainConfig) -> Self {
        Self { source, config, now: chrono::Local::now().naive_local() }
    }

    /// Pin the experience reference time (tests, reproducible reruns)
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainReport> {
        let cfg = &self.config;
        tracing::info!("Training config: {}", serde_json::to_string(cfg)?);

        // ── Step 1: Load ─────────────────────────────────────────────────────
        tracing::info!("Loading warehouse data from {}", self.source.describe());
        let snapshot = self.source.load_all()?;

        // ── Step 2: Assemble ─────────────────────────────────────────────────
        let table = FeatureAssembler::new(self.now)
            .assemble(&snapshot)
            .context("Feature assembly failed")?;

        // ── Step 3: Train / test split ───────────────────────────────────────
        let (train_rows, test_rows) = split_train_test(table.rows, cfg.test_fraction, cfg.seed);
        tracing::info!("Split: {} train, {} test", train_rows.len(), test_rows.len());

        // ── Step 4: Fit preprocessor on the training partition only ──────────
        let preprocessor = Preprocessor::fit(&train_rows)?;
        tracing::info!("Encoded feature width: {}", preprocessor.output_dim());
        tracing::debug!("Encoded columns: {}", preprocessor.feature_names().join(", "));

        // ── Step 5: Encode ───────────────────────────────────────────────────
        let train_samples = encode(&preprocessor, &train_rows);
        let test_samples  = encode(&preprocessor, &test_rows);

        // ── Step 6: Validation hold-out from the end of train ────────────────
        let (fit_samples, val_samples) = split_tail(train_samples, cfg.validation_fraction);

        let train_rows = fit_samples.len();
        let val_rows   = val_samples.len();
        let test_rows  = test_samples.len();

        // ── Step 7: Train and evaluate ───────────────────────────────────────
        let metrics = cfg
            .metrics_dir
            .as_deref()
            .map(MetricsLogger::new)
            .transpose()?;
        if let Some(logger) = &metrics {
            tracing::info!("Per-epoch metrics → '{}'", logger.csv_path().display());
        }

        let outcome = run_training(
            cfg,
            TaskDataset::new(fit_samples),
            TaskDataset::new(val_samples),
            TaskDataset::new(test_samples),
            metrics.as_ref(),
        )?;

        Ok(TrainReport {
            joins: table.report,
            train_rows,
            val_rows,
            test_rows,
            feature_dim: preprocessor.output_dim(),
            outcome,
        })
    }
}

/// Preprocessed features paired with their labels
fn encode(preprocessor: &Preprocessor, rows: &[TaskFeatures]) -> Vec<TaskSample> {
    preprocessor
        .transform(rows)
        .into_iter()
        .zip(rows)
        .map(|(features, r)| TaskSample { features, target: r.completion_minutes as f32 })
        .collect()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::assembler::tests::{now, synthetic_snapshot};
    use crate::domain::records::WarehouseSnapshot;

    /// Serves a prepared snapshot through the source trait
    pub(crate) struct InMemorySource(pub WarehouseSnapshot);

    impl WarehouseSource for InMemorySource {
        fn load_all(&self) -> Result<WarehouseSnapshot> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "in-memory snapshot".to_string()
        }
    }

    #[test]
    fn test_end_to_end_on_synthetic_tasks() {
        let dir = tempfile::tempdir().unwrap();
        let config = TrainConfig {
            epochs:      3,
            batch_size:  4,
            metrics_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..TrainConfig::default()
        };

        let report = TrainUseCase::new(Box::new(InMemorySource(synthetic_snapshot())), config)
            .with_now(now())
            .execute()
            .unwrap();

        assert_eq!(report.joins.rows_out, 10);
        // 10 rows → 2 test (ceil 20%), 8 train → 6 fit + 2 validation
        assert_eq!(report.test_rows, 2);
        assert_eq!(report.train_rows + report.val_rows, 8);
        assert_eq!(report.val_rows, 2);
        assert_eq!(report.outcome.history.len(), 3);
        assert!(report.outcome.test.mse.is_finite());

        let csv = std::fs::read_to_string(dir.path().join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_encoded_samples_carry_labels() {
        let table = FeatureAssembler::new(now()).assemble(&synthetic_snapshot()).unwrap();
        let pre   = Preprocessor::fit(&table.rows).unwrap();
        let s     = encode(&pre, &table.rows);
        assert_eq!(s.len(), 10);
        assert!(s.iter().all(|x| x.features.len() == pre.output_dim()));
        assert_eq!(s[0].target, table.rows[0].completion_minutes as f32);
        assert_eq!(s[3].features, pre.transform_row(&table.rows[3]));
        assert_eq!(pre.feature_names().len(), pre.output_dim());
    }

    #[test]
    fn test_assembly_failure_stops_the_run() {
        let mut snap = synthetic_snapshot();
        snap.workers.clear();
        let result = TrainUseCase::new(Box::new(InMemorySource(snap)), TrainConfig::default())
            .with_now(now())
            .execute();
        assert!(result.is_err());
    }
}
