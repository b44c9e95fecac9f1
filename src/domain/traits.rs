// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer loads data through WarehouseSource and
// never learns whether the rows came from SQL Server or a file.
//
//   - SqlServerLoader → five queries against the live store
//   - SnapshotLoader  → the same five tables from a JSON file

use anyhow::Result;
use crate::domain::records::WarehouseSnapshot;

// ─── WarehouseSource ──────────────────────────────────────────────────────────
/// Any component that can produce the five source tables.
pub trait WarehouseSource {
    /// Load every table fully into memory.
    fn load_all(&self) -> Result<WarehouseSnapshot>;

    /// Short human-readable description for log lines
    fn describe(&self) -> String;
}
