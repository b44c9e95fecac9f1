// ============================================================
// Layer 3 — Warehouse Record Types
// ============================================================
// One plain struct per source table. These are read-only
// snapshots for a single pipeline run; nothing here is ever
// written back to the store.
//
// Identifiers are kept as Strings. The loader casts every key
// column to NVARCHAR so integer and character keys look the same.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// LOCN_HDR — a pick location on the warehouse floor plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub locn_id: String,
    pub x:       f64,
    pub y:       f64,
}

impl Location {
    pub fn new(locn_id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { locn_id: locn_id.into(), x, y }
    }

    /// Straight-line distance to another location
    pub fn distance_to(&self, other: &Location) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// ITEMS — unit weight and volume of a stocked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id:       String,
    pub product_class: String,
    pub weight:        f64,
    pub volume:        f64,
}

/// USERS — a warehouse worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub user_id:         String,
    pub department_code: String,
    pub shift_id:        String,
    pub hire_date:       NaiveDateTime,
}

/// TASK_HDR — one unit of labor work.
///
/// `completed` is None for tasks that were never closed; those
/// cannot produce a label and are rejected during assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id:      String,
    pub task_type:    String,
    pub user_id:      String,
    pub equipment_id: String,
    pub created:      NaiveDateTime,
    pub completed:    Option<NaiveDateTime>,
}

/// TASK_DTL — one pick line within a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    pub task_dtl_id:  String,
    pub task_id:      String,
    pub seq_nbr:      i64,
    pub pull_locn_id: String,
    pub item_id:      String,
    pub qty_pulled:   f64,
}

/// All five tables, fully materialised in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseSnapshot {
    pub locations:    Vec<Location>,
    pub items:        Vec<Item>,
    pub workers:      Vec<Worker>,
    pub tasks:        Vec<Task>,
    pub task_details: Vec<TaskDetail>,
}

impl WarehouseSnapshot {
    /// One-line row count summary used in log output
    pub fn summary(&self) -> String {
        format!(
            "{} locations, {} items, {} workers, {} tasks, {} task details",
            self.locations.len(),
            self.items.len(),
            self.workers.len(),
            self.tasks.len(),
            self.task_details.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_euclidean() {
        let a = Location::new("A", 0.0, 0.0);
        let b = Location::new("B", 3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
    }

    #[test]
    fn test_summary_counts_rows() {
        let snap = WarehouseSnapshot {
            locations: vec![Location::new("A", 0.0, 0.0)],
            ..Default::default()
        };
        assert_eq!(
            snap.summary(),
            "1 locations, 0 items, 0 workers, 0 tasks, 0 task details"
        );
    }
}
