use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct DurationRegressorConfig {
    pub input_dim: usize,
    #[config(default = 64)]
    pub hidden1:   usize,
    #[config(default = 32)]
    pub hidden2:   usize,
}

impl DurationRegressorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DurationRegressor<B> {
        DurationRegressor {
            hidden1: LinearConfig::new(self.input_dim, self.hidden1).init(device),
            hidden2: LinearConfig::new(self.hidden1, self.hidden2).init(device),
            output:  LinearConfig::new(self.hidden2, 1).init(device),
        }
    }
}

/// input → 64 ReLU → 32 ReLU → 1 (linear)
#[derive(Module, Debug)]
pub struct DurationRegressor<B: Backend> {
    pub hidden1: Linear<B>,
    pub hidden2: Linear<B>,
    pub output:  Linear<B>,
}

impl<B: Backend> DurationRegressor<B> {
    /// features: [batch, input_dim] → predicted minutes: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.hidden1.forward(features));
        let x = relu(self.hidden2.forward(x));
        self.output.forward(x)
    }

    /// Mean squared error against targets of shape [batch, 1]
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let predictions = self.forward(features);
        let loss = MseLoss::new().forward(predictions.clone(), targets, Reduction::Mean);
        (loss, predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_default_shape_is_64_32_1() {
        let cfg = DurationRegressorConfig::new(10);
        assert_eq!(cfg.hidden1, 64);
        assert_eq!(cfg.hidden2, 32);
    }

    #[test]
    fn test_forward_gives_one_prediction_per_row() {
        let device = Default::default();
        let model: DurationRegressor<NdArray> = DurationRegressorConfig::new(5).init(&device);
        let x = Tensor::<NdArray, 2>::zeros([4, 5], &device);
        assert_eq!(model.forward(x).dims(), [4, 1]);
    }

    #[test]
    fn test_loss_is_a_finite_scalar() {
        let device = Default::default();
        let model: DurationRegressor<NdArray> = DurationRegressorConfig::new(3).init(&device);
        let x = Tensor::<NdArray, 2>::ones([2, 3], &device);
        let y = Tensor::<NdArray, 2>::ones([2, 1], &device);
        let (loss, preds) = model.forward_loss(x, y);
        assert_eq!(loss.dims(), [1]);
        assert_eq!(preds.dims(), [2, 1]);
        let v = loss.into_data().to_vec::<f32>().unwrap();
        assert!(v[0].is_finite() && v[0] >= 0.0);
    }
}
