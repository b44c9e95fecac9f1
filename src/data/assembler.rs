// ============================================================
// Layer 4 — Feature Assembler
// ============================================================
// Joins every derived feature back onto the task headers and
// attaches the label. Joins run in this order, all inner:
//
//   TASK_HDR
//     ⋈ travel distance   (task has ≥1 detail line)
//     ⋈ worker            (USER_ID exists in USERS)
//     ⋈ load totals       (task has ≥1 line matching ITEMS)
//     → label validation  (completed, and after created)
//
// A task failing any step is dropped; nothing is imputed. Every
// drop is counted in the JoinReport and surfaced as a warning.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::data::{experience, load, temporal, travel};
use crate::domain::error::PipelineError;
use crate::domain::records::{WarehouseSnapshot, Worker};
use crate::domain::task_features::{JoinReport, TaskFeatures};

/// Assembled rows plus the record of what was thrown away
#[derive(Debug, Clone)]
pub struct FeatureTable {
    pub rows:   Vec<TaskFeatures>,
    pub report: JoinReport,
}

pub struct FeatureAssembler {
    /// Reference time for worker experience
    now: NaiveDateTime,
}

impl FeatureAssembler {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn assemble(&self, snap: &WarehouseSnapshot) -> Result<FeatureTable, PipelineError> {
        let distances  = travel::travel_distances(&snap.task_details, &snap.locations)?;
        let experience = experience::experience_by_worker(&snap.workers, self.now);
        let loads      = load::aggregate_loads(&snap.task_details, &snap.items);
        let workers: HashMap<&str, &Worker> = snap
            .workers
            .iter()
            .map(|w| (w.user_id.as_str(), w))
            .collect();

        let mut report = JoinReport {
            tasks_in:            snap.tasks.len(),
            orphaned_item_lines: loads.orphaned_lines,
            ..Default::default()
        };
        let mut rows = Vec::with_capacity(snap.tasks.len());

        for task in &snap.tasks {
            let Some(&travel_distance) = distances.get(&task.task_id) else {
                report.dropped_no_details += 1;
                continue;
            };
            let Some(worker) = workers.get(task.user_id.as_str()) else {
                report.dropped_unknown_worker += 1;
                continue;
            };
            let Some(totals) = loads.totals.get(&task.task_id) else {
                report.dropped_no_load += 1;
                continue;
            };
            let Some(completed) = task.completed else {
                report.rejected_open += 1;
                continue;
            };
            let minutes = completion_minutes(task.created, completed);
            if minutes <= 0.0 {
                tracing::debug!("Task '{}' has non-positive duration {:.2} min", task.task_id, minutes);
                report.rejected_non_positive += 1;
                continue;
            }

            rows.push(TaskFeatures {
                task_id:            task.task_id.clone(),
                task_type:          task.task_type.clone(),
                day_of_week:        temporal::day_name(task.created).to_string(),
                department_code:    worker.department_code.clone(),
                shift_id:           worker.shift_id.clone(),
                equipment_id:       task.equipment_id.clone(),
                experience_months:  experience[&worker.user_id],
                hour_of_day:        temporal::hour_of_day(task.created),
                month:              temporal::month(completed),
                total_quantity:     totals.quantity,
                total_volume:       totals.volume,
                total_weight:       totals.weight,
                travel_distance,
                completion_minutes: minutes,
            });
        }

        report.rows_out = rows.len();
        log_report(&report);

        if rows.is_empty() {
            return Err(PipelineError::EmptyDataset { stage: "feature assembly" });
        }
        Ok(FeatureTable { rows, report })
    }
}

/// Label: elapsed minutes, millisecond precision
pub fn completion_minutes(created: NaiveDateTime, completed: NaiveDateTime) -> f64 {
    (completed - created).num_milliseconds() as f64 / 60_000.0
}

fn log_report(r: &JoinReport) {
    tracing::info!("Feature assembly: {} tasks in, {} rows out", r.tasks_in, r.rows_out);

    let warnings = [
        (r.orphaned_item_lines,    "detail lines reference an unknown item (dropped from load totals)"),
        (r.dropped_no_details,     "tasks have no detail lines"),
        (r.dropped_unknown_worker, "tasks reference an unknown worker"),
        (r.dropped_no_load,        "tasks have no detail line with a known item"),
        (r.rejected_open,          "tasks were never completed"),
        (r.rejected_non_positive,  "tasks completed at or before creation"),
    ];
    for (count, what) in warnings {
        if count > 0 {
            tracing::warn!("{} {}", count, what);
        }
    }
}
