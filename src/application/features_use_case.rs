// ============================================================
// Layer 2 — FeaturesUseCase
// ============================================================
// Runs only the data half of the pipeline (load → assemble) so an
// analyst can inspect the feature table and the join losses
// without training anything. Optionally writes the rows as JSON.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::{fs, path::PathBuf};

use crate::data::assembler::{FeatureAssembler, FeatureTable};
use crate::domain::traits::WarehouseSource;

pub struct FeaturesUseCase {
    source: Box<dyn WarehouseSource>,
    output: Option<PathBuf>,
    now:    NaiveDateTime,
}

impl FeaturesUseCase {
    pub fn new(source: Box<dyn WarehouseSource>, output: Option<PathBuf>) -> Self {
        Self { source, output, now: chrono::Local::now().naive_local() }
    }

    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    pub fn execute(&self) -> Result<FeatureTable> {
        tracing::info!("Loading warehouse data from {}", self.source.describe());
        let snapshot = self.source.load_all()?;

        let table = FeatureAssembler::new(self.now)
            .assemble(&snapshot)
            .context("Feature assembly failed")?;

        if let Some(path) = &self.output {
            let json = serde_json::to_string_pretty(&table.rows)?;
            fs::write(path, json)
                .with_context(|| format!("Cannot write features to '{}'", path.display()))?;
            tracing::info!("Wrote {} feature rows to '{}'", table.rows.len(), path.display());
        }

        Ok(table)
    }
}
