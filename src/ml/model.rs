// ============================================================
// Layer 5 — Generative Residual Convolutional Network
// ============================================================
// Maps an RGB-D image to four per-pixel grasp maps.
//
//   [N, in, H, W]
//      │  conv1  9x9 s1  → c      bn relu
//      │  conv2  4x4 s2  → 2c     bn relu      H/2
//      │  conv3  4x4 s2  → 4c     bn relu      H/4
//      │  residual × num_residual_blocks (4c)
//      │  conv4ᵀ 4x4 s2  → 2c     bn relu
//      │  conv5ᵀ 4x4 s2  → c      bn relu
//      │  conv6ᵀ 9x9 s1  → c
//      ├─► position 2x2 → out
//      ├─► cosine   2x2 → out
//      ├─► sine     2x2 → out
//      └─► width    2x2 → out      [N, out, H, W]
//
// The two up-sampling layers overshoot by one pixel and the 2x2
// heads take it back, so for H and W divisible by 4 the maps line up
// with the input pixel-for-pixel.
//
// Reference: Kumra et al. (2020) Antipodal Robotic Grasping using
//            Generative Residual Convolutional Neural Network

use anyhow::{ensure, Result};
use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig, ConvTranspose2d, ConvTranspose2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::relu,
};

use crate::ml::loss::{smooth_l1, GraspLossOutput, LossTerms};
use crate::ml::output::{GraspPrediction, GraspTargets};
use crate::ml::residual::{ResidualBlock, ResidualBlockConfig};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct GrConvNetConfig {
    /// Image channels (RGB-D = 4)
    #[config(default = 4)]
    pub input_channels: usize,
    /// Base feature width c; the bottleneck runs at 4c
    #[config(default = 32)]
    pub channel_size: usize,
    /// Channels per output head
    #[config(default = 1)]
    pub output_channels: usize,
    #[config(default = 5)]
    pub num_residual_blocks: usize,
}

impl GrConvNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> GrConvNet<B> {
        let c = self.channel_size;

        let conv1 = Conv2dConfig::new([self.input_channels, c], [9, 9])
            .with_padding(PaddingConfig2d::Explicit(4, 4))
            .init(device);
        let conv2 = Conv2dConfig::new([c, 2 * c], [4, 4])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);
        let conv3 = Conv2dConfig::new([2 * c, 4 * c], [4, 4])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .init(device);

        let residuals: Vec<ResidualBlock<B>> = (0..self.num_residual_blocks)
            .map(|_| ResidualBlockConfig::new(4 * c).init(device))
            .collect();

        let conv4 = ConvTranspose2dConfig::new([4 * c, 2 * c], [4, 4])
            .with_stride([2, 2])
            .with_padding([1, 1])
            .with_padding_out([1, 1])
            .init(device);
        let conv5 = ConvTranspose2dConfig::new([2 * c, c], [4, 4])
            .with_stride([2, 2])
            .with_padding([2, 2])
            .with_padding_out([1, 1])
            .init(device);
        let conv6 = ConvTranspose2dConfig::new([c, c], [9, 9])
            .with_padding([4, 4])
            .init(device);

        GrConvNet {
            conv1,
            bn1: BatchNormConfig::new(c).init(device),
            conv2,
            bn2: BatchNormConfig::new(2 * c).init(device),
            conv3,
            bn3: BatchNormConfig::new(4 * c).init(device),
            residuals,
            conv4,
            bn4: BatchNormConfig::new(2 * c).init(device),
            conv5,
            bn5: BatchNormConfig::new(c).init(device),
            conv6,
            position: self.head(device),
            cosine:   self.head(device),
            sine:     self.head(device),
            width:    self.head(device),
        }
    }

    fn head<B: Backend>(&self, device: &B::Device) -> Conv2d<B> {
        Conv2dConfig::new([self.channel_size, self.output_channels], [2, 2]).init(device)
    }

    /// Check an input shape before it reaches the network, where a
    /// mismatch would only surface as a backend panic.
    pub fn validate_input(&self, dims: [usize; 4]) -> Result<()> {
        let [batch, channels, height, width] = dims;
        ensure!(batch > 0, "Input batch is empty");
        ensure!(
            channels == self.input_channels,
            "Input has {} channels but the network expects {}",
            channels,
            self.input_channels,
        );
        ensure!(
            output_size(height, width).is_some(),
            "Input {}x{} is too small for the encoder",
            height,
            width,
        );
        Ok(())
    }

    /// Check that targets line up with the maps the network will
    /// produce for `image_dims`. Only inputs whose height and width are
    /// multiples of 4 come out at their own resolution.
    pub fn validate_targets(&self, image_dims: [usize; 4], target_dims: [usize; 4]) -> Result<()> {
        self.validate_input(image_dims)?;
        let [batch, _, height, width] = image_dims;
        let [t_batch, t_channels, t_height, t_width] = target_dims;

        ensure!(
            t_batch == batch && t_channels == self.output_channels,
            "Targets {:?} do not match batch {} with {} output channels",
            target_dims,
            batch,
            self.output_channels,
        );
        let produced = output_size(height, width);
        ensure!(
            produced == Some([t_height, t_width]),
            "Input {}x{} yields {:?} maps but targets are {}x{}; \
             use a height and width that are multiples of 4",
            height,
            width,
            produced,
            t_height,
            t_width,
        );
        Ok(())
    }

    /// One line per layer, in execution order.
    pub fn layer_plan(&self) -> Vec<String> {
        let c = self.channel_size;
        let mut plan = vec![
            format!("conv1    Conv2d          {:>4} → {:<4} k9 s1 p4      + BatchNorm + ReLU", self.input_channels, c),
            format!("conv2    Conv2d          {:>4} → {:<4} k4 s2 p1      + BatchNorm + ReLU", c, 2 * c),
            format!("conv3    Conv2d          {:>4} → {:<4} k4 s2 p1      + BatchNorm + ReLU", 2 * c, 4 * c),
        ];
        plan.extend((1..=self.num_residual_blocks).map(|i| {
            format!("res{i}     ResidualBlock   {:>4} → {:<4} k3", 4 * c, 4 * c)
        }));
        plan.extend([
            format!("conv4    ConvTranspose2d {:>4} → {:<4} k4 s2 p1 op1  + BatchNorm + ReLU", 4 * c, 2 * c),
            format!("conv5    ConvTranspose2d {:>4} → {:<4} k4 s2 p2 op1  + BatchNorm + ReLU", 2 * c, c),
            format!("conv6    ConvTranspose2d {:>4} → {:<4} k9 s1 p4", c, c),
        ]);
        for name in ["position", "cosine", "sine", "width"] {
            plan.push(format!("{name:<8} Conv2d          {:>4} → {:<4} k2", c, self.output_channels));
        }
        plan
    }
}

// ─── Shape arithmetic ─────────────────────────────────────────────────────────
// conv:  (x + 2p − k) / s + 1
// convᵀ: (x − 1)·s − 2p + k + output_padding
// Returns None as soon as any stage would produce an empty map.

fn conv_out(x: usize, kernel: usize, stride: usize, pad: usize) -> Option<usize> {
    (x + 2 * pad).checked_sub(kernel).map(|v| v / stride + 1)
}

fn conv_transpose_out(x: usize, kernel: usize, stride: usize, pad: usize, pad_out: usize) -> Option<usize> {
    let x = x.checked_sub(1)?;
    (x * stride + kernel + pad_out).checked_sub(2 * pad).filter(|&v| v > 0)
}

fn axis_out(x: usize) -> Option<usize> {
    let x = conv_out(x, 9, 1, 4)?;
    let x = conv_out(x, 4, 2, 1)?;
    let x = conv_out(x, 4, 2, 1)?;
    let x = conv_transpose_out(x, 4, 2, 1, 1)?;
    let x = conv_transpose_out(x, 4, 2, 2, 1)?;
    let x = conv_transpose_out(x, 9, 1, 4, 0)?;
    conv_out(x, 2, 1, 0)
}

/// Spatial size `[h, w]` of the output maps for an `height × width` input,
/// or None if the input is too small.
pub fn output_size(height: usize, width: usize) -> Option<[usize; 2]> {
    Some([axis_out(height)?, axis_out(width)?])
}

// ─── Network ──────────────────────────────────────────────────────────────────

#[derive(Module, Debug)]
pub struct GrConvNet<B: Backend> {
    pub conv1:     Conv2d<B>,
    pub bn1:       BatchNorm<B, 2>,
    pub conv2:     Conv2d<B>,
    pub bn2:       BatchNorm<B, 2>,
    pub conv3:     Conv2d<B>,
    pub bn3:       BatchNorm<B, 2>,
    pub residuals: Vec<ResidualBlock<B>>,
    pub conv4:     ConvTranspose2d<B>,
    pub bn4:       BatchNorm<B, 2>,
    pub conv5:     ConvTranspose2d<B>,
    pub bn5:       BatchNorm<B, 2>,
    pub conv6:     ConvTranspose2d<B>,
    pub position:  Conv2d<B>,
    pub cosine:    Conv2d<B>,
    pub sine:      Conv2d<B>,
    pub width:     Conv2d<B>,
}

impl<B: Backend> GrConvNet<B> {
    /// x: [batch, in, H, W] → four maps of [batch, out, H', W'],
    /// with (H', W') = output_size(H, W).
    pub fn forward(&self, x: Tensor<B, 4>) -> GraspPrediction<B> {
        let x = relu(self.bn1.forward(self.conv1.forward(x)));
        let x = relu(self.bn2.forward(self.conv2.forward(x)));
        let mut x = relu(self.bn3.forward(self.conv3.forward(x)));

        for block in &self.residuals {
            x = block.forward(x);
        }

        let x = relu(self.bn4.forward(self.conv4.forward(x)));
        let x = relu(self.bn5.forward(self.conv5.forward(x)));
        let x = self.conv6.forward(x);

        GraspPrediction {
            position: self.position.forward(x.clone()),
            cosine:   self.cosine.forward(x.clone()),
            sine:     self.sine.forward(x.clone()),
            width:    self.width.forward(x),
        }
    }

    /// The inference call: same as `forward`, maps keyed pos/cos/sin/width.
    pub fn predict(&self, x: Tensor<B, 4>) -> GraspPrediction<B> {
        self.forward(x)
    }

    /// Forward pass plus smooth-L1 against each target map.
    pub fn compute_loss(&self, x: Tensor<B, 4>, targets: GraspTargets<B>) -> GraspLossOutput<B> {
        let pred = self.forward(x);

        let losses = LossTerms {
            position: smooth_l1(pred.position.clone(), targets.position),
            cosine:   smooth_l1(pred.cosine.clone(),   targets.cosine),
            sine:     smooth_l1(pred.sine.clone(),     targets.sine),
            width:    smooth_l1(pred.width.clone(),    targets.width),
        };
        let loss = losses.total();

        tracing::trace!("compute_loss: batch dims {:?}", pred.dims());
        GraspLossOutput { loss, losses, pred }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{
        backend::Autodiff,
        module::AutodiffModule,
        tensor::Distribution,
    };

    type TestBackend     = burn::backend::NdArray;
    type TestAutodiff    = Autodiff<TestBackend>;

    /// Narrow network so the tests stay fast on the CPU backend
    fn small_config() -> GrConvNetConfig {
        GrConvNetConfig::new().with_channel_size(4).with_num_residual_blocks(2)
    }

    #[test]
    fn test_default_config_matches_reference_topology() {
        let cfg = GrConvNetConfig::new();
        assert_eq!(cfg.input_channels, 4);
        assert_eq!(cfg.channel_size, 32);
        assert_eq!(cfg.output_channels, 1);
        assert_eq!(cfg.num_residual_blocks, 5);
        // 3 encoder + 5 residual + 3 decoder + 4 heads
        assert_eq!(cfg.layer_plan().len(), 15);
    }

    #[test]
    fn test_output_size_matches_input_for_multiples_of_four() {
        for size in [4, 8, 32, 224, 300] {
            assert_eq!(output_size(size, size), Some([size, size]), "size {size}");
        }
        assert_eq!(output_size(224, 96), Some([224, 96]));
    }

    #[test]
    fn test_output_size_for_odd_inputs() {
        // 30 → 30 → 15 → 7 → 15 → 29 → 29 → 28
        assert_eq!(output_size(30, 30), Some([28, 28]));
        assert_eq!(output_size(1, 1), None);
    }

    #[test]
    fn test_validate_input() {
        let cfg = GrConvNetConfig::new();
        assert!(cfg.validate_input([2, 4, 224, 224]).is_ok());
        assert!(cfg.validate_input([2, 3, 224, 224]).is_err());
        assert!(cfg.validate_input([0, 4, 224, 224]).is_err());
        assert!(cfg.validate_input([1, 4, 1, 224]).is_err());
    }

    #[test]
    fn test_validate_targets_requires_matching_resolution() {
        let cfg = GrConvNetConfig::new();
        assert!(cfg.validate_targets([2, 4, 32, 32], [2, 1, 32, 32]).is_ok());

        // 30x30 passes the input check but comes out at 28x28
        assert!(cfg.validate_input([1, 4, 30, 30]).is_ok());
        let err = cfg.validate_targets([1, 4, 30, 30], [1, 1, 30, 30]).unwrap_err();
        assert!(format!("{err}").contains("multiples of 4"));

        assert!(cfg.validate_targets([2, 4, 32, 32], [1, 1, 32, 32]).is_err());
        assert!(cfg.validate_targets([2, 4, 32, 32], [2, 2, 32, 32]).is_err());
    }

    #[test]
    fn test_forward_shapes_default_network() {
        let device = Default::default();
        let model  = GrConvNetConfig::new().init::<TestBackend>(&device);

        let x    = Tensor::<TestBackend, 4>::random([2, 4, 32, 32], Distribution::Default, &device);
        let pred = model.predict(x);

        for (label, map) in pred.into_labeled() {
            assert_eq!(map.dims(), [2, 1, 32, 32], "head {label}");
        }
    }

    #[test]
    fn test_forward_shapes_follow_output_size() {
        let device = Default::default();
        let cfg    = small_config().with_output_channels(2);
        let model  = cfg.init::<TestBackend>(&device);

        let x    = Tensor::<TestBackend, 4>::random([1, 4, 30, 20], Distribution::Default, &device);
        let pred = model.forward(x);
        let [h, w] = output_size(30, 20).unwrap();
        assert_eq!(pred.dims(), [1, 2, h, w]);
        assert_eq!(pred.width.dims(), [1, 2, h, w]);
    }

    #[test]
    fn test_residual_block_count_follows_config() {
        let device = Default::default();
        let model  = GrConvNetConfig::new()
            .with_channel_size(4)
            .with_num_residual_blocks(3)
            .init::<TestBackend>(&device);
        assert_eq!(model.residuals.len(), 3);
        assert_eq!(model.conv1.weight.dims(), [4, 4, 9, 9]);
    }

    #[test]
    fn test_compute_loss_against_own_prediction_is_zero() {
        let device = Default::default();
        let model  = small_config().init::<TestBackend>(&device);

        let x       = Tensor::<TestBackend, 4>::random([1, 4, 16, 16], Distribution::Default, &device);
        let targets = model.predict(x.clone());
        let out     = model.compute_loss(x, targets);

        assert!(out.loss.into_scalar().elem::<f32>().abs() < 1e-6);
        assert_eq!(out.pred.dims(), [1, 1, 16, 16]);
    }

    #[test]
    fn test_compute_loss_total_is_sum_of_terms() {
        let device = Default::default();
        let model  = small_config().init::<TestBackend>(&device);

        let x       = Tensor::<TestBackend, 4>::random([2, 4, 16, 16], Distribution::Default, &device);
        let ones    = Tensor::<TestBackend, 4>::ones([2, 1, 16, 16], &device);
        let targets = GraspTargets {
            position: ones.clone(),
            cosine:   ones.clone() * -1.0,
            sine:     ones.zeros_like(),
            width:    ones * 0.5,
        };
        let out = model.compute_loss(x, targets);

        let total   = out.loss.into_scalar().elem::<f64>();
        let summary = out.losses.summary();
        assert!((total - summary.loss).abs() < 1e-5);
        for (_, term) in out.losses.labeled() {
            assert!(term.into_scalar().elem::<f32>() >= 0.0);
        }
    }

    #[test]
    fn test_gradients_reach_every_head() {
        let device = Default::default();
        let model  = small_config().init::<TestAutodiff>(&device);

        let x       = Tensor::<TestAutodiff, 4>::random([2, 4, 16, 16], Distribution::Default, &device);
        let targets = GraspTargets {
            position: Tensor::ones([2, 1, 16, 16], &device),
            cosine:   Tensor::ones([2, 1, 16, 16], &device),
            sine:     Tensor::ones([2, 1, 16, 16], &device),
            width:    Tensor::ones([2, 1, 16, 16], &device),
        };
        let out   = model.compute_loss(x, targets);
        let grads = out.loss.backward();

        for head in [&model.position, &model.cosine, &model.sine, &model.width] {
            let grad = head.weight.grad(&grads).expect("head weight has a gradient");
            assert_eq!(grad.dims(), [1, 4, 2, 2]);
        }
        assert!(model.conv1.weight.grad(&grads).is_some());
    }

    #[test]
    fn test_batch_norm_uses_batch_statistics_under_autodiff() {
        let device = Default::default();
        let bn: BatchNorm<TestAutodiff, 2> = BatchNormConfig::new(2).init(&device);
        // Taken before the training pass so its running stats stay at 0 / 1
        let bn_valid = bn.valid();

        let x = Tensor::<TestAutodiff, 4>::random([4, 2, 3, 3], Distribution::Uniform(4.0, 6.0), &device);

        // Training mode normalises with the batch mean: output centred on 0
        let trained = bn.forward(x.clone());
        let mean    = trained.mean().into_scalar().elem::<f32>();
        assert!(mean.abs() < 1e-3, "batch-normalised mean {mean}");

        // Inference mode uses running mean 0 / var 1: output ≈ input
        let x_inner  = x.inner();
        let inferred = bn_valid.forward(x_inner.clone());
        let diff     = (inferred - x_inner).abs().max().into_scalar().elem::<f32>();
        assert!(diff < 1e-3, "running-stat output deviates by {diff}");
    }

    #[test]
    fn test_autodiff_and_inference_forward_differ_on_fresh_model() {
        let device = Default::default();
        let model  = small_config().init::<TestAutodiff>(&device);
        let valid  = model.valid();

        let x = Tensor::<TestAutodiff, 4>::random([2, 4, 16, 16], Distribution::Uniform(2.0, 3.0), &device);
        let trained  = model.forward(x.clone()).position.inner();
        let inferred = valid.forward(x.inner()).position;

        let diff = (trained - inferred).abs().max().into_scalar().elem::<f32>();
        assert!(diff > 1e-4, "batch and running statistics gave the same maps");
    }

    #[test]
    fn test_valid_model_runs_on_inner_backend() {
        let device = Default::default();
        let model  = small_config().init::<TestAutodiff>(&device);
        let valid  = model.valid();

        let x = Tensor::<TestBackend, 4>::zeros([1, 4, 8, 8], &device);
        assert_eq!(valid.forward(x).dims(), [1, 1, 8, 8]);
    }
}
