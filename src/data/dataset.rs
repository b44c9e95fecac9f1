use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One preprocessed row: encoded features and the duration label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSample {
    pub features: Vec<f32>,
    /// Completion time in minutes
    pub target:   f32,
}

impl TaskSample {
    pub fn width(&self) -> usize {
        self.features.len()
    }
}

pub struct TaskDataset {
    samples: Vec<TaskSample>,
}

impl TaskDataset {
    pub fn new(samples: Vec<TaskSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn is_empty(&self) -> bool { self.samples.is_empty() }

    /// Width of the feature vectors, 0 for an empty dataset
    pub fn feature_dim(&self) -> usize {
        self.samples.first().map(TaskSample::width).unwrap_or(0)
    }

    pub fn samples(&self) -> &[TaskSample] { &self.samples }
}

impl Dataset<TaskSample> for TaskDataset {
    fn get(&self, index: usize) -> Option<TaskSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
