// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing the warehouse
// data and the features derived from it.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO database or file I/O
//   - Only plain data, error kinds and traits

// One struct per source table, plus the snapshot grouping them
pub mod records;

// An assembled training row and the join loss report
pub mod task_features;

// Named failure kinds
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
