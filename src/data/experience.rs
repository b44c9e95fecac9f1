// ============================================================
// Layer 4 — Experience Feature Deriver
// ============================================================
// Worker tenure in average-length months:
//
//   months = (now - hire_date) / 30.436875 days
//
// 30.436875 = 365.2425 / 12, the Gregorian mean month. This is a
// continuous approximation, not a calendar month count; fine as a
// model feature, wrong for anything payroll-like.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::domain::records::Worker;

pub const SECONDS_PER_MONTH: f64 = 30.436875 * 24.0 * 60.0 * 60.0;

/// Tenure in months at `now`. Negative for hire dates in the future.
pub fn experience_months(hire_date: NaiveDateTime, now: NaiveDateTime) -> f64 {
    (now - hire_date).num_seconds() as f64 / SECONDS_PER_MONTH
}

/// Tenure for every worker, keyed by USER_ID
pub fn experience_by_worker(workers: &[Worker], now: NaiveDateTime) -> HashMap<String, f64> {
    workers
        .iter()
        .map(|w| (w.user_id.clone(), experience_months(w.hire_date, now)))
        .collect()
}
