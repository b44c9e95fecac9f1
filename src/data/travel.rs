// ============================================================
// Layer 4 — Travel Distance Calculator
// ============================================================
// For each task, walks its pick locations in sequence order and
// sums the straight-line length of every leg.
//
//   stops:   L1 ── L2 ── L3 ── ... ── Ln
//   result:  |L1L2| + |L2L3| + ... + |Ln-1 Ln|
//
// Path length depends on visiting order, so detail lines are
// sorted by SEQ_NBR (TASK_DTL_ID breaks ties) before walking.
// Load order from the database is never trusted.

use std::collections::HashMap;

use crate::domain::error::PipelineError;
use crate::domain::records::{Location, TaskDetail};

/// Sum of consecutive leg lengths. Zero or one stop → 0.0.
pub fn path_length(stops: &[&Location]) -> f64 {
    stops
        .windows(2)
        .map(|leg| leg[0].distance_to(leg[1]))
        .sum()
}

/// Travel distance for every task that has at least one detail line.
///
/// Tasks without detail lines are absent from the result; the
/// assembler counts them when it joins. An unknown PULL_LOCN_ID is
/// fatal because there is no sensible distance to substitute.
pub fn travel_distances(
    details:   &[TaskDetail],
    locations: &[Location],
) -> Result<HashMap<String, f64>, PipelineError> {
    let by_id: HashMap<&str, &Location> = locations
        .iter()
        .map(|l| (l.locn_id.as_str(), l))
        .collect();

    let mut per_task: HashMap<&str, Vec<&TaskDetail>> = HashMap::new();
    for d in details {
        per_task.entry(d.task_id.as_str()).or_default().push(d);
    }

    let mut distances = HashMap::with_capacity(per_task.len());
    for (task_id, mut lines) in per_task {
        lines.sort_by(|a, b| {
            a.seq_nbr
                .cmp(&b.seq_nbr)
                .then_with(|| a.task_dtl_id.cmp(&b.task_dtl_id))
        });

        let stops = lines
            .iter()
            .map(|d| {
                by_id.get(d.pull_locn_id.as_str()).copied().ok_or_else(|| {
                    PipelineError::UnknownLocation {
                        task_id:     task_id.to_string(),
                        location_id: d.pull_locn_id.clone(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        distances.insert(task_id.to_string(), path_length(&stops));
    }

    tracing::debug!("Computed travel distance for {} tasks", distances.len());
    Ok(distances)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn detail(id: &str, task: &str, seq: i64, locn: &str) -> TaskDetail {
        TaskDetail {
            task_dtl_id:  id.into(),
            task_id:      task.into(),
            seq_nbr:      seq,
            pull_locn_id: locn.into(),
            item_id:      "I1".into(),
            qty_pulled:   1.0,
        }
    }

    fn grid() -> Vec<Location> {
        vec![
            Location::new("A", 0.0, 0.0),
            Location::new("B", 3.0, 4.0),
            Location::new("C", 3.0, 10.0),
            Location::new("D", 0.0, 10.0),
        ]
    }

    #[test]
    fn test_sums_consecutive_legs() {
        let details = vec![
            detail("1", "T1", 1, "A"),
            detail("2", "T1", 2, "B"),
            detail("3", "T1", 3, "C"),
            detail("4", "T1", 4, "D"),
        ];
        let d = travel_distances(&details, &grid()).unwrap();
        // 5 + 6 + 3
        assert_relative_eq!(d["T1"], 14.0);
    }

    #[test]
    fn test_single_stop_is_zero() {
        let details = vec![detail("1", "T1", 1, "B")];
        let d = travel_distances(&details, &grid()).unwrap();
        assert_eq!(d["T1"], 0.0);
    }

    #[test]
    fn test_sorts_by_sequence_before_walking() {
        // Loaded out of order: C, A, B. Sequence order is A, B, C.
        let details = vec![
            detail("3", "T1", 3, "C"),
            detail("1", "T1", 1, "A"),
            detail("2", "T1", 2, "B"),
        ];
        let d = travel_distances(&details, &grid()).unwrap();
        assert_relative_eq!(d["T1"], 11.0);
    }

    #[test]
    fn test_tasks_are_kept_separate() {
        let details = vec![
            detail("1", "T1", 1, "A"),
            detail("2", "T2", 1, "C"),
            detail("3", "T1", 2, "B"),
            detail("4", "T2", 2, "D"),
        ];
        let d = travel_distances(&details, &grid()).unwrap();
        assert_eq!(d.len(), 2);
        assert_relative_eq!(d["T1"], 5.0);
        assert_relative_eq!(d["T2"], 3.0);
    }

    #[test]
    fn test_unknown_location_is_fatal() {
        let details = vec![detail("1", "T1", 1, "A"), detail("2", "T1", 2, "ZZ")];
        let err = travel_distances(&details, &grid()).unwrap_err();
        match err {
            PipelineError::UnknownLocation { task_id, location_id } => {
                assert_eq!(task_id, "T1");
                assert_eq!(location_id, "ZZ");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_path_length_of_nothing_is_zero() {
        assert_eq!(path_length(&[]), 0.0);
    }
}
