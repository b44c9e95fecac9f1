// ============================================================
// Layer 4 — Snapshot Loader
// ============================================================
// Reads all five tables from one JSON document instead of the
// database. Useful for offline runs against an exported extract,
// and for exercising the pipeline without a SQL Server.
//
// Expected shape:
//   {
//     "locations":    [{ "locn_id": "A-01", "x": 0.0, "y": 0.0 }, ...],
//     "items":        [{ "item_id": ..., "product_class": ..., "weight": ..., "volume": ... }],
//     "workers":      [{ "user_id": ..., "department_code": ..., "shift_id": ...,
//                        "hire_date": "2021-03-01T00:00:00" }],
//     "tasks":        [{ "task_id": ..., "task_type": ..., "user_id": ..., "equipment_id": ...,
//                        "created": "...", "completed": "..." | null }],
//     "task_details": [{ "task_dtl_id": ..., "task_id": ..., "seq_nbr": 1,
//                        "pull_locn_id": ..., "item_id": ..., "qty_pulled": 4.0 }]
//   }

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::records::WarehouseSnapshot;
use crate::domain::traits::WarehouseSource;

pub struct SnapshotLoader {
    path: PathBuf,
}

impl SnapshotLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl WarehouseSource for SnapshotLoader {
    fn load_all(&self) -> Result<WarehouseSnapshot> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read snapshot '{}'", self.path.display()))?;

        let snapshot: WarehouseSnapshot = serde_json::from_str(&json)
            .with_context(|| format!("Snapshot '{}' is not valid", self.path.display()))?;

        tracing::info!("Loaded from snapshot: {}", snapshot.summary());
        Ok(snapshot)
    }

    fn describe(&self) -> String {
        format!("snapshot file '{}'", self.path.display())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SMALL: &str = r#"{
        "locations":    [{ "locn_id": "A", "x": 0.0, "y": 0.0 }],
        "items":        [{ "item_id": "I1", "product_class": "BOX", "weight": 2.0, "volume": 0.5 }],
        "workers":      [{ "user_id": "U1", "department_code": "D1", "shift_id": "S1",
                           "hire_date": "2020-01-01T00:00:00" }],
        "tasks":        [{ "task_id": "T1", "task_type": "PICK", "user_id": "U1", "equipment_id": "E1",
                           "created": "2024-05-06T08:00:00", "completed": null }],
        "task_details": [{ "task_dtl_id": "D1", "task_id": "T1", "seq_nbr": 1,
                           "pull_locn_id": "A", "item_id": "I1", "qty_pulled": 3.0 }]
    }"#;

    #[test]
    fn test_reads_all_tables() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SMALL.as_bytes()).unwrap();

        let snap = SnapshotLoader::new(file.path()).load_all().unwrap();
        assert_eq!(snap.locations.len(), 1);
        assert_eq!(snap.items[0].weight, 2.0);
        assert_eq!(snap.workers[0].user_id, "U1");
        assert!(snap.tasks[0].completed.is_none());
        assert_eq!(snap.task_details[0].seq_nbr, 1);
    }

    #[test]
    fn test_measures_parse_to_the_nearest_double() {
        let json = SMALL.replace(r#""weight": 2.0"#, r#""weight": 0.9856465225158628"#);
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let snap = SnapshotLoader::new(file.path()).load_all().unwrap();
        assert_eq!(snap.items[0].weight, 0.9856465225158628);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let loader = SnapshotLoader::new("/definitely/not/here.json");
        let err = loader.load_all().unwrap_err();
        assert!(err.to_string().contains("Cannot read snapshot"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        assert!(SnapshotLoader::new(file.path()).load_all().is_err());
    }
}
