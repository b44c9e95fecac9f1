// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   metrics.rs — Training metrics logging
//                Writes epoch-level metrics (train loss,
//                validation loss and MAE) to a CSV file for
//                later analysis and plotting.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Training metrics CSV logger
pub mod metrics;
