// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn model and optimiser code.
// The data layer only builds tensors for it (batcher.rs).
//
// What's in this layer:
//
//   model.rs     — The duration regressor
//                  A small feed-forward network:
//                  input → 64 (ReLU) → 32 (ReLU) → 1
//
//   trainer.rs   — The training loop
//                  Shuffled mini-batches, Adam, MSE loss,
//                  per-epoch validation and final test
//                  evaluation (MSE and MAE)
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Feed-forward regression model
pub mod model;

/// Training loop with validation and test evaluation
pub mod trainer;
