// ============================================================
// Layer 4 — Task Batcher
// ============================================================
// Stacks a slice of TaskSamples into the two tensors one
// optimiser step needs:
//
//   features: [batch_size, feature_dim]   (row-major flatten, then reshape)
//   targets:  [batch_size, 1]             (same shape as the model output)

use burn::{prelude::*, tensor::TensorData};

use crate::data::dataset::TaskSample;

#[derive(Debug, Clone)]
pub struct TaskBatch<B: Backend> {
    pub features: Tensor<B, 2>,
    pub targets:  Tensor<B, 2>,
}

/// Holds the device so tensors land where the model lives.
#[derive(Clone, Debug)]
pub struct TaskBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TaskBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// All samples must share one feature width; an empty slice
    /// is a caller bug.
    pub fn batch(&self, items: &[TaskSample]) -> TaskBatch<B> {
        let batch_size = items.len();
        let width      = items[0].features.len();

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let targets: Vec<f32> = items.iter().map(|s| s.target).collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, width]),
            &self.device,
        );
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(targets, [batch_size, 1]),
            &self.device,
        );

        TaskBatch { features, targets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_order() {
        let batcher = TaskBatcher::<NdArray>::new(Default::default());
        let items = vec![
            TaskSample { features: vec![1.0, 2.0], target: 10.0 },
            TaskSample { features: vec![3.0, 4.0], target: 20.0 },
            TaskSample { features: vec![5.0, 6.0], target: 30.0 },
        ];

        let batch = batcher.batch(&items);
        assert_eq!(batch.features.dims(), [3, 2]);
        assert_eq!(batch.targets.dims(), [3, 1]);

        let flat = batch.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let t = batch.targets.into_data().to_vec::<f32>().unwrap();
        assert_eq!(t, vec![10.0, 20.0, 30.0]);
    }
}
