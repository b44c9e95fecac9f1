// ============================================================
// Layer 4 — Feature Preprocessor
// ============================================================
// Turns TaskFeatures rows into fixed-width f32 vectors:
//
//   [ standardised numerical columns | one-hot block per categorical ]
//
// Numerical columns:   z = (x - mean) / std
//   mean and std (population) come from the TRAINING partition only.
//   A constant column has std 0 and is scaled by 1.0 instead.
//
// Categorical columns: one indicator per category seen in training,
//   categories sorted. A category never seen in training encodes as
//   an all-zero block.
//
// fit() must only ever see the training rows. transform() is then
// applied unchanged to train, validation and test rows alike.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::error::PipelineError;
use crate::domain::task_features::{TaskFeatures, CATEGORICAL_COLUMNS, NUMERICAL_COLUMNS};

const N_NUM: usize = NUMERICAL_COLUMNS.len();
const N_CAT: usize = CATEGORICAL_COLUMNS.len();

// ─── StandardScaler ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means:  [f64; N_NUM],
    pub scales: [f64; N_NUM],
}

impl StandardScaler {
    fn fit(rows: &[TaskFeatures]) -> Self {
        let n = rows.len() as f64;

        let mut means = [0.0; N_NUM];
        for r in rows {
            for (m, x) in means.iter_mut().zip(r.numerical()) {
                *m += x;
            }
        }
        means.iter_mut().for_each(|m| *m /= n);

        let mut scales = [0.0; N_NUM];
        for r in rows {
            for ((s, x), m) in scales.iter_mut().zip(r.numerical()).zip(means) {
                *s += (x - m).powi(2);
            }
        }
        for s in scales.iter_mut() {
            let std = (*s / n).sqrt();
            *s = if std > 0.0 { std } else { 1.0 };
        }

        Self { means, scales }
    }

    fn transform(&self, values: [f64; N_NUM]) -> impl Iterator<Item = f64> + '_ {
        values
            .into_iter()
            .zip(self.means.iter().zip(self.scales.iter()))
            .map(|(x, (m, s))| (x - m) / s)
    }
}

// ─── OneHotEncoder ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    /// Sorted training categories, one list per categorical column
    pub categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    fn fit(rows: &[TaskFeatures]) -> Self {
        let mut seen: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); N_CAT];
        for r in rows {
            for (set, value) in seen.iter_mut().zip(r.categorical()) {
                set.insert(value);
            }
        }
        let categories = seen
            .into_iter()
            .map(|set| set.into_iter().map(str::to_owned).collect())
            .collect();
        Self { categories }
    }

    fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    fn encode_into(&self, values: [&str; N_CAT], out: &mut Vec<f32>) {
        for (cats, value) in self.categories.iter().zip(values) {
            let start = out.len();
            out.resize(start + cats.len(), 0.0);
            // categories are sorted, so binary search finds the slot
            if let Ok(pos) = cats.binary_search_by(|c| c.as_str().cmp(value)) {
                out[start + pos] = 1.0;
            }
        }
    }
}

// ─── Preprocessor ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preprocessor {
    pub scaler:  StandardScaler,
    pub encoder: OneHotEncoder,
}

impl Preprocessor {
    /// Learn scaling and category vocabularies from training rows.
    pub fn fit(train_rows: &[TaskFeatures]) -> Result<Self, PipelineError> {
        if train_rows.is_empty() {
            return Err(PipelineError::EmptyDataset { stage: "preprocessor fit" });
        }
        let pre = Self {
            scaler:  StandardScaler::fit(train_rows),
            encoder: OneHotEncoder::fit(train_rows),
        };
        tracing::debug!(
            "Preprocessor fitted on {} rows → {} features",
            train_rows.len(),
            pre.output_dim()
        );
        Ok(pre)
    }

    /// Width of every transformed row
    pub fn output_dim(&self) -> usize {
        N_NUM + self.encoder.width()
    }

    pub fn transform_row(&self, row: &TaskFeatures) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.output_dim());
        out.extend(self.scaler.transform(row.numerical()).map(|z| z as f32));
        self.encoder.encode_into(row.categorical(), &mut out);
        out
    }

    pub fn transform(&self, rows: &[TaskFeatures]) -> Vec<Vec<f32>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }

    /// Output column names, e.g. `TravelDistance` or `TASK_TYPE=PICK`
    pub fn feature_names(&self) -> Vec<String> {
        let numerical = NUMERICAL_COLUMNS.iter().map(|c| c.to_string());
        let one_hot = CATEGORICAL_COLUMNS
            .iter()
            .zip(&self.encoder.categories)
            .flat_map(|(col, cats)| cats.iter().map(move |c| format!("{col}={c}")));
        numerical.chain(one_hot).collect()
    }
}
