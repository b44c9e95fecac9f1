// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw warehouse tables to tensor batches.
//
//   SQL Server / JSON snapshot
//       │
//       ▼
//   SqlServerLoader / SnapshotLoader  → five in-memory tables
//       │
//       ▼
//   travel / experience / temporal / load  → per-task features
//       │
//       ▼
//   FeatureAssembler  → one TaskFeatures row per task + label
//       │
//       ▼
//   split_train_test  → seeded 80 / 20 partition
//       │
//       ▼
//   Preprocessor      → fitted on train, applied to both
//       │
//       ▼
//   TaskDataset / TaskBatcher  → tensors for the training loop
//
// Each module does exactly one step.

/// Five read queries against SQL Server
pub mod loader;

/// The same five tables from a JSON file
pub mod snapshot;

/// Sequence-ordered pick path length per task
pub mod travel;

/// Worker tenure in average months
pub mod experience;

/// Day / hour / month features from timestamps
pub mod temporal;

/// Quantity, weight and volume totals per task
pub mod load;

/// Joins everything onto task headers and attaches the label
pub mod assembler;

/// One-hot + standardisation, fitted on the training partition
pub mod preprocessor;

/// Seeded train/test split and tail validation split
pub mod splitter;

/// Implements Burn's Dataset trait for preprocessed rows
pub mod dataset;

/// Stacks samples into tensor batches
pub mod batcher;
