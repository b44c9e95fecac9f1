// ============================================================
// Layer 4 — Load Aggregator
// ============================================================
// Per task totals over its detail lines, joined to ITEMS:
//
//   TotalQuantity = Σ qty
//   TotalWeight   = Σ item.weight × qty
//   TotalVolume   = Σ item.volume × qty
//
// The detail → item join is an inner join. A line whose ITEM_ID is
// not in ITEMS contributes nothing, which understates the totals of
// its task. Those lines are counted so the caller can warn about them.

use std::collections::HashMap;

use crate::domain::records::{Item, TaskDetail};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadTotals {
    pub quantity: f64,
    pub weight:   f64,
    pub volume:   f64,
}

#[derive(Debug, Default)]
pub struct LoadAggregation {
    /// Totals for every task with at least one matched line
    pub totals: HashMap<String, LoadTotals>,
    /// Lines dropped by the item join
    pub orphaned_lines: usize,
}

pub fn aggregate_loads(details: &[TaskDetail], items: &[Item]) -> LoadAggregation {
    let by_id: HashMap<&str, &Item> = items
        .iter()
        .map(|i| (i.item_id.as_str(), i))
        .collect();

    let mut agg = LoadAggregation::default();
    for line in details {
        let Some(item) = by_id.get(line.item_id.as_str()) else {
            tracing::debug!(
                "Detail '{}' of task '{}' references unknown item '{}'",
                line.task_dtl_id, line.task_id, line.item_id
            );
            agg.orphaned_lines += 1;
            continue;
        };

        let t = agg.totals.entry(line.task_id.clone()).or_default();
        t.quantity += line.qty_pulled;
        t.weight   += item.weight * line.qty_pulled;
        t.volume   += item.volume * line.qty_pulled;
    }
    agg
}
