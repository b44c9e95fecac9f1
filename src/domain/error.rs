// ============================================================
// Layer 3 — Pipeline Error Kinds
// ============================================================
// The failures the pipeline knows how to name. Everything here
// is fatal; non-fatal integrity problems (orphaned lines, dropped
// joins, rejected labels) are counted in a JoinReport instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// The store could not be reached or refused the login
    #[error("cannot connect to the warehouse database: {0}")]
    Connection(String),

    /// One of the five load queries failed
    #[error("query '{query}' failed: {message}")]
    Query { query: &'static str, message: String },

    /// A required column came back NULL
    #[error("{table}.{column} is NULL in a row that requires it")]
    MissingValue { table: &'static str, column: &'static str },

    /// A task detail points at a location that LOCN_HDR does not have
    #[error("task '{task_id}' references unknown location '{location_id}'")]
    UnknownLocation { task_id: String, location_id: String },

    /// Nothing left to work with after a stage
    #[error("no rows left after {stage}")]
    EmptyDataset { stage: &'static str },

    /// Training loss became NaN or infinite
    #[error("training diverged at epoch {epoch}: loss = {loss}")]
    TrainingDiverged { epoch: usize, loss: f64 },
}
