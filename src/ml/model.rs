use anyhow::{bail, ensure, Result};
use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};
use serde::{Deserialize, Serialize};

/// Nonlinearity applied after a stage's affine map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    Relu,
    Sigmoid,
    Identity,
}

/// One affine stage: `d_input → d_output`, then `activation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub d_input:    usize,
    pub d_output:   usize,
    pub activation: Activation,
}

impl StageConfig {
    pub fn new(d_input: usize, d_output: usize, activation: Activation) -> Self {
        Self { d_input, d_output, activation }
    }
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct AutoencoderConfig {
    /// Stages in forward order: relu encoder stages, one sigmoid
    /// bottleneck, relu decoder stages, one identity output stage.
    pub stages: Vec<StageConfig>,
}

/// Width of the Fashion-MNIST images, flattened.
pub const FASHION_WIDTH: usize = 28 * 28;

impl AutoencoderConfig {
    /// The image network: 784 → 28 → 250 → [10] → 250 → 500 → 784.
    pub fn shallow() -> Self {
        use Activation::*;
        Self::new(vec![
            StageConfig::new(FASHION_WIDTH, 28, Relu),
            StageConfig::new(28, 250, Relu),
            StageConfig::new(250, 10, Sigmoid),
            StageConfig::new(10, 250, Relu),
            StageConfig::new(250, 500, Relu),
            StageConfig::new(500, FASHION_WIDTH, Identity),
        ])
    }

    /// The wide-feature network:
    /// F → 1000 → 500 → 250 → [50] → 250 → 500 → 1000 → F.
    pub fn wide(d_features: usize) -> Self {
        use Activation::*;
        Self::new(vec![
            StageConfig::new(d_features, 1000, Relu),
            StageConfig::new(1000, 500, Relu),
            StageConfig::new(500, 250, Relu),
            StageConfig::new(250, 50, Sigmoid),
            StageConfig::new(50, 250, Relu),
            StageConfig::new(250, 500, Relu),
            StageConfig::new(500, 1000, Relu),
            StageConfig::new(1000, d_features, Identity),
        ])
    }

    /// Width the model expects at its input (and produces at its output).
    pub fn d_input(&self) -> usize {
        self.stages.first().map(|s| s.d_input).unwrap_or(0)
    }

    /// Index of the sigmoid bottleneck stage.
    pub fn latent_index(&self) -> Option<usize> {
        self.stages.iter().position(|s| s.activation == Activation::Sigmoid)
    }

    /// Check the shape contract. Widths are never inferred, so every
    /// mismatch has to be caught here before any tensor exists.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.stages.len() >= 2, "an autoencoder needs at least a bottleneck and an output stage");

        for (i, pair) in self.stages.windows(2).enumerate() {
            ensure!(
                pair[0].d_output == pair[1].d_input,
                "stage {} outputs {} features but stage {} expects {}",
                i, pair[0].d_output, i + 1, pair[1].d_input
            );
        }
        if let Some((i, _)) = self.stages.iter().enumerate().find(|(_, s)| s.d_output == 0) {
            bail!("stage {i} has zero output width");
        }

        let latent = match self.latent_index() {
            Some(idx) => idx,
            None      => bail!("no sigmoid bottleneck stage"),
        };
        let last = self.stages.len() - 1;
        ensure!(latent < last, "the bottleneck must be followed by an output stage");

        for (i, stage) in self.stages.iter().enumerate() {
            let expected = match i {
                i if i == latent => Activation::Sigmoid,
                i if i == last   => Activation::Identity,
                _                => Activation::Relu,
            };
            ensure!(
                stage.activation == expected,
                "stage {} uses {:?}, expected {:?}",
                i, stage.activation, expected
            );
        }

        ensure!(
            self.stages[last].d_output == self.d_input(),
            "output width {} does not match input width {}",
            self.stages[last].d_output,
            self.d_input()
        );
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> Result<Autoencoder<B>> {
        self.validate()?;
        let latent = self.latent_index().unwrap_or_default();
        let last   = self.stages.len() - 1;

        let linear = |s: &StageConfig| LinearConfig::new(s.d_input, s.d_output).init(device);

        Ok(Autoencoder {
            encoder: self.stages[..latent].iter().map(linear).collect(),
            latent:  linear(&self.stages[latent]),
            decoder: self.stages[latent + 1..last].iter().map(linear).collect(),
            output:  linear(&self.stages[last]),
        })
    }
}

#[derive(Module, Debug)]
pub struct Autoencoder<B: Backend> {
    pub encoder: Vec<Linear<B>>,
    pub latent:  Linear<B>,
    pub decoder: Vec<Linear<B>>,
    pub output:  Linear<B>,
}

impl<B: Backend> Autoencoder<B> {
    /// x: [batch, width] → reconstruction: [batch, width]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        self.decode(self.encode(x))
    }

    /// The latent view: [batch, width] → [batch, d_latent], values in (0, 1)
    pub fn encode(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = x;
        for layer in &self.encoder {
            x = relu(layer.forward(x));
        }
        sigmoid(self.latent.forward(x))
    }

    /// [batch, d_latent] → [batch, width]; the output stage has no activation.
    pub fn decode(&self, z: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = z;
        for layer in &self.decoder {
            x = relu(layer.forward(x));
        }
        self.output.forward(x)
    }

    /// Mean squared error between the reconstruction and the input itself.
    pub fn forward_loss(&self, x: Tensor<B, 2>) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(x.clone());
        let loss   = MseLoss::new().forward(output.clone(), x, Reduction::Mean);
        (loss, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_published_configs_are_valid() {
        AutoencoderConfig::shallow().validate().unwrap();
        AutoencoderConfig::wide(1500).validate().unwrap();
        AutoencoderConfig::wide(3).validate().unwrap();
    }

    #[test]
    fn test_shallow_reconstructs_full_image_width() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = AutoencoderConfig::shallow().init(&device).unwrap();

        let x = Tensor::<TestBackend, 2>::random([3, FASHION_WIDTH], burn::tensor::Distribution::Uniform(-1.0, 1.0), &device);
        assert_eq!(model.forward(x.clone()).dims(), [3, FASHION_WIDTH]);
        assert_eq!(model.encode(x).dims(), [3, 10]);
    }

    #[test]
    fn test_wide_reconstructs_feature_width() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = AutoencoderConfig::wide(1500).init(&device).unwrap();
        assert_eq!(model.encoder.len(), 3);
        assert_eq!(model.decoder.len(), 3);

        let x = Tensor::<TestBackend, 2>::zeros([2, 1500], &device);
        assert_eq!(model.forward(x).dims(), [2, 1500]);
    }

    #[test]
    fn test_latent_view_is_bounded_by_sigmoid() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = AutoencoderConfig::wide(8).init(&device).unwrap();
        let x = Tensor::<TestBackend, 2>::ones([4, 8], &device) * 100.0;
        let z = model.encode(x).into_data().to_vec::<f32>().unwrap();
        assert!(z.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_loss_is_finite_and_non_negative() {
        let device = Default::default();
        let model: Autoencoder<TestBackend> = AutoencoderConfig::wide(6).init(&device).unwrap();
        let x = Tensor::<TestBackend, 2>::ones([5, 6], &device);
        let (loss, output) = model.forward_loss(x);
        let loss: f64 = loss.into_scalar().elem();
        assert!(loss.is_finite() && loss >= 0.0);
        assert_eq!(output.dims(), [5, 6]);
    }

    #[test]
    fn test_broken_chain_is_rejected() {
        use Activation::*;
        let cfg = AutoencoderConfig::new(vec![
            StageConfig::new(10, 4, Relu),
            StageConfig::new(5, 2, Sigmoid),
            StageConfig::new(2, 10, Identity),
        ]);
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("stage 0 outputs 4 features but stage 1 expects 5"));
    }

    #[test]
    fn test_output_must_match_input_width() {
        use Activation::*;
        let cfg = AutoencoderConfig::new(vec![
            StageConfig::new(10, 2, Sigmoid),
            StageConfig::new(2, 9, Identity),
        ]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_stage_order_is_enforced() {
        use Activation::*;
        let no_bottleneck = AutoencoderConfig::new(vec![
            StageConfig::new(4, 2, Relu),
            StageConfig::new(2, 4, Identity),
        ]);
        assert!(no_bottleneck.validate().is_err());

        let activated_output = AutoencoderConfig::new(vec![
            StageConfig::new(4, 2, Sigmoid),
            StageConfig::new(2, 4, Relu),
        ]);
        assert!(activated_output.validate().is_err());

        let two_bottlenecks = AutoencoderConfig::new(vec![
            StageConfig::new(4, 2, Sigmoid),
            StageConfig::new(2, 2, Sigmoid),
            StageConfig::new(2, 4, Identity),
        ]);
        assert!(two_bottlenecks.validate().is_err());
    }

    #[test]
    fn test_config_survives_json() {
        let cfg  = AutoencoderConfig::shallow();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: AutoencoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stages, cfg.stages);
    }
}
