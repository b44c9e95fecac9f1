// ============================================================
// Layer 5 — Training Loop and Evaluation
// ============================================================
// Mini-batch Adam on MSE, with a validation pass per epoch and a
// single evaluation on the untouched test partition at the end.
//
//   - Training uses TrainBackend (Autodiff<NdArray>) for gradients
//   - model.valid() returns the model on EvalBackend (NdArray),
//     which is what validation and test evaluation run on
//   - Fit rows are reshuffled every epoch from a seeded RNG
//   - A NaN or infinite batch loss aborts training
//
// Reference: Kingma & Ba (2015) Adam

use anyhow::{anyhow, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::dataset::Dataset,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::ElementConversion,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::TaskBatcher, dataset::{TaskDataset, TaskSample}};
use crate::domain::error::PipelineError;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{DurationRegressor, DurationRegressorConfig};

type TrainBackend = Autodiff<NdArray>;
type EvalBackend  = NdArray;

/// Error metrics of a set of predictions, in minutes² / minutes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub mse: f64,
    pub mae: f64,
}

/// Everything a training run reports back
#[derive(Debug, Clone, Serialize)]
pub struct TrainingOutcome {
    pub history: Vec<EpochMetrics>,
    pub test:    Evaluation,
}

pub fn run_training(
    cfg:     &TrainConfig,
    train:   TaskDataset,
    val:     TaskDataset,
    test:    TaskDataset,
    metrics: Option<&MetricsLogger>,
) -> Result<TrainingOutcome> {
    if train.is_empty() {
        return Err(PipelineError::EmptyDataset { stage: "train/validation split" }.into());
    }
    if test.is_empty() {
        return Err(PipelineError::EmptyDataset { stage: "train/test split" }.into());
    }

    let device = NdArrayDevice::default();

    // ── Build model ───────────────────────────────────────────────────────────
    let model_cfg = DurationRegressorConfig::new(train.feature_dim());
    let mut model: DurationRegressor<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} → {} → {} → 1",
        model_cfg.input_dim, model_cfg.hidden1, model_cfg.hidden2
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();
    let batcher   = TaskBatcher::<TrainBackend>::new(device.clone());

    let mut rng   = StdRng::seed_from_u64(cfg.seed);
    let mut order: Vec<usize> = (0..train.sample_count()).collect();

    let mut history = Vec::with_capacity(cfg.epochs);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0f64;
        let mut seen     = 0usize;

        for chunk in order.chunks(cfg.batch_size.max(1)) {
            let items: Vec<TaskSample> = chunk.iter().filter_map(|&i| train.get(i)).collect();
            let batch = batcher.batch(&items);

            let (loss, _) = model.forward_loss(batch.features, batch.targets);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            check_finite(epoch, loss_val)?;

            loss_sum += loss_val * items.len() as f64;
            seen     += items.len();

            // Backward pass + Adam update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
        }

        let train_loss = loss_sum / seen as f64;

        // ── Validation phase ──────────────────────────────────────────────────
        let val_eval = if val.is_empty() {
            Evaluation { mse: f64::NAN, mae: f64::NAN }
        } else {
            let eval_model: DurationRegressor<EvalBackend> = model.valid();
            evaluate(&eval_model, &val, &device)?
        };

        let m = EpochMetrics::new(epoch, train_loss, val_eval.mse, val_eval.mae);

        tracing::debug!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | val_mae={:.4}",
            epoch, cfg.epochs, train_loss, val_eval.mse, val_eval.mae,
        );
        if epoch % 10 == 0 || epoch == cfg.epochs {
            tracing::info!(
                "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4}",
                epoch, cfg.epochs, train_loss, val_eval.mse,
            );
        }

        if let Some(logger) = metrics {
            logger.log(&m)?;
        }
        history.push(m);
    }

    // ── Test evaluation ───────────────────────────────────────────────────────
    let eval_model: DurationRegressor<EvalBackend> = model.valid();
    let test_eval = evaluate(&eval_model, &test, &device)?;
    tracing::info!(
        "Test set: mse={:.4} mae={:.4} over {} rows",
        test_eval.mse, test_eval.mae, test.sample_count()
    );

    Ok(TrainingOutcome { history, test: test_eval })
}

/// Run the model over a whole dataset and score it.
pub fn evaluate<B: Backend>(
    model:   &DurationRegressor<B>,
    dataset: &TaskDataset,
    device:  &B::Device,
) -> Result<Evaluation> {
    if dataset.is_empty() {
        return Err(PipelineError::EmptyDataset { stage: "evaluation" }.into());
    }

    let batch = TaskBatcher::<B>::new(device.clone()).batch(dataset.samples());
    let predictions = model
        .forward(batch.features)
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read predictions: {e:?}"))?;

    let targets: Vec<f32> = dataset.samples().iter().map(|s| s.target).collect();
    Ok(regression_metrics(&predictions, &targets))
}

/// MSE and MAE of paired predictions and targets
pub fn regression_metrics(predictions: &[f32], targets: &[f32]) -> Evaluation {
    let n = predictions.len().min(targets.len()).max(1) as f64;
    let (sq, abs) = predictions
        .iter()
        .zip(targets)
        .fold((0.0f64, 0.0f64), |(sq, abs), (&p, &t)| {
            let err = p as f64 - t as f64;
            (sq + err * err, abs + err.abs())
        });
    Evaluation { mse: sq / n, mae: abs / n }
}

fn check_finite(epoch: usize, loss: f64) -> Result<(), PipelineError> {
    if loss.is_finite() {
        Ok(())
    } else {
        Err(PipelineError::TrainingDiverged { epoch, loss })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear_samples(n: usize) -> Vec<TaskSample> {
        // minutes = 10 + 5·x0 - 2·x1
        (0..n)
            .map(|i| {
                let x0 = (i % 7) as f32 / 3.0 - 1.0;
                let x1 = (i % 5) as f32 / 2.0 - 1.0;
                TaskSample { features: vec![x0, x1], target: 10.0 + 5.0 * x0 - 2.0 * x1 }
            })
            .collect()
    }

    fn small_config(epochs: usize) -> TrainConfig {
        TrainConfig { epochs, batch_size: 8, ..TrainConfig::default() }
    }

    #[test]
    fn test_regression_metrics_by_hand() {
        let m = regression_metrics(&[1.0, 2.0, 6.0], &[1.0, 4.0, 3.0]);
        // errors 0, -2, 3
        assert_relative_eq!(m.mse, 13.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(m.mae, 5.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_non_finite_loss_is_divergence() {
        assert!(check_finite(3, 12.5).is_ok());
        let err = check_finite(4, f64::NAN).unwrap_err();
        assert!(matches!(err, PipelineError::TrainingDiverged { epoch: 4, .. }));
        assert!(check_finite(1, f64::INFINITY).is_err());
    }

    #[test]
    fn test_short_run_reports_finite_metrics() {
        let samples = linear_samples(60);
        let train   = TaskDataset::new(samples[..40].to_vec());
        let val     = TaskDataset::new(samples[40..50].to_vec());
        let test    = TaskDataset::new(samples[50..].to_vec());

        let outcome = run_training(&small_config(5), train, val, test, None).unwrap();
        assert_eq!(outcome.history.len(), 5);
        assert!(outcome.history.iter().all(|m| m.train_loss.is_finite() && m.val_loss.is_finite()));
        assert!(outcome.test.mse.is_finite());
        assert!(outcome.test.mae >= 0.0);
    }

    #[test]
    fn test_training_reduces_loss() {
        let samples = linear_samples(64);
        let train   = TaskDataset::new(samples[..48].to_vec());
        let test    = TaskDataset::new(samples[48..].to_vec());

        let mut cfg = small_config(60);
        cfg.lr      = 0.01;
        let outcome = run_training(&cfg, train, TaskDataset::new(Vec::new()), test, None).unwrap();

        let first = outcome.history.first().unwrap().train_loss;
        let last  = outcome.history.last().unwrap().train_loss;
        assert!(last < first, "loss went from {first} to {last}");
        // no validation rows → NaN validation columns
        assert!(outcome.history[0].val_loss.is_nan());
    }

    #[test]
    fn test_empty_partitions_are_rejected() {
        let some = TaskDataset::new(linear_samples(4));
        let none = TaskDataset::new(Vec::new());
        assert!(run_training(&small_config(1), none, TaskDataset::new(Vec::new()), some, None).is_err());
    }
}
