// ============================================================
// Layer 3 — TaskFeatures Domain Type
// ============================================================
// One fully assembled training row: the categorical and numerical
// features of a task plus its label (completion time in minutes).
//
// Column order matters to the preprocessor, so both column groups
// are exposed as fixed-size arrays in a fixed order. Numerical
// columns are listed alphabetically.

use serde::{Deserialize, Serialize};

/// Names of the categorical columns, in encoding order
pub const CATEGORICAL_COLUMNS: [&str; 5] = [
    "TASK_TYPE",
    "DayOfWeek",
    "DEPARTMENT_CODE",
    "SHIFT_ID",
    "EQUIPMENT_ID",
];

/// Names of the numerical columns, in encoding order
pub const NUMERICAL_COLUMNS: [&str; 7] = [
    "ExperienceMonths",
    "HourOfDay",
    "Month",
    "TotalQuantity",
    "TotalVolume",
    "TotalWeight",
    "TravelDistance",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskFeatures {
    pub task_id: String,

    // ── categorical ──
    pub task_type:       String,
    pub day_of_week:     String,
    pub department_code: String,
    pub shift_id:        String,
    pub equipment_id:    String,

    // ── numerical ──
    pub experience_months: f64,
    pub hour_of_day:       u32,
    pub month:             u32,
    pub total_quantity:    f64,
    pub total_volume:      f64,
    pub total_weight:      f64,
    pub travel_distance:   f64,

    /// Label: minutes between creation and completion
    pub completion_minutes: f64,
}

impl TaskFeatures {
    /// Categorical values in CATEGORICAL_COLUMNS order
    pub fn categorical(&self) -> [&str; 5] {
        [
            &self.task_type,
            &self.day_of_week,
            &self.department_code,
            &self.shift_id,
            &self.equipment_id,
        ]
    }

    /// Numerical values in NUMERICAL_COLUMNS order
    pub fn numerical(&self) -> [f64; 7] {
        [
            self.experience_months,
            self.hour_of_day as f64,
            self.month as f64,
            self.total_quantity,
            self.total_volume,
            self.total_weight,
            self.travel_distance,
        ]
    }
}

// ─── JoinReport ───────────────────────────────────────────────────────────────
/// How many rows each stage of assembly threw away, and why.
/// Every join in the pipeline is an inner join, so this is the
/// only place silent row loss becomes visible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinReport {
    /// Task headers before any join
    pub tasks_in: usize,
    /// Detail lines whose ITEM_ID had no ITEMS row
    pub orphaned_item_lines: usize,
    /// Tasks with no detail lines (no travel distance)
    pub dropped_no_details: usize,
    /// Tasks whose USER_ID had no USERS row
    pub dropped_unknown_worker: usize,
    /// Tasks with no detail line left after the item join
    pub dropped_no_load: usize,
    /// Tasks never completed
    pub rejected_open: usize,
    /// Tasks completed at or before their creation time
    pub rejected_non_positive: usize,
    /// Rows in the final feature table
    pub rows_out: usize,
}

impl JoinReport {
    pub fn total_dropped(&self) -> usize {
        self.dropped_no_details
            + self.dropped_unknown_worker
            + self.dropped_no_load
            + self.rejected_open
            + self.rejected_non_positive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskFeatures {
        TaskFeatures {
            task_id:            "T1".into(),
            task_type:          "PICK".into(),
            day_of_week:        "Monday".into(),
            department_code:    "D1".into(),
            shift_id:           "S1".into(),
            equipment_id:       "E1".into(),
            experience_months:  12.0,
            hour_of_day:        9,
            month:              3,
            total_quantity:     5.0,
            total_volume:       1.5,
            total_weight:       11.0,
            travel_distance:    7.0,
            completion_minutes: 30.0,
        }
    }

    #[test]
    fn test_column_accessors_follow_declared_order() {
        let f = sample();
        assert_eq!(f.categorical(), ["PICK", "Monday", "D1", "S1", "E1"]);
        assert_eq!(f.numerical(), [12.0, 9.0, 3.0, 5.0, 1.5, 11.0, 7.0]);
        assert_eq!(f.categorical().len(), CATEGORICAL_COLUMNS.len());
        assert_eq!(f.numerical().len(), NUMERICAL_COLUMNS.len());
    }

    #[test]
    fn test_total_dropped_sums_every_reason() {
        let r = JoinReport {
            tasks_in:               10,
            orphaned_item_lines:    4,
            dropped_no_details:     1,
            dropped_unknown_worker: 1,
            dropped_no_load:        1,
            rejected_open:          1,
            rejected_non_positive:  1,
            rows_out:               5,
        };
        // orphaned lines are lines, not tasks
        assert_eq!(r.total_dropped(), 5);
        assert_eq!(r.tasks_in - r.total_dropped(), r.rows_out);
    }
}
