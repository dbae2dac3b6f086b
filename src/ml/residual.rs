// ============================================================
// Layer 5 — Residual Block
// ============================================================
// The bottleneck of the network is a stack of identical residual
// blocks working at 4c channels and 1/4 resolution.
//
//   x_in ──► conv1 ─► bn1 ─► ReLU ─► conv2 ─► bn2 ──(+)──► out
//     │                                            ▲
//     └────────────────────────────────────────────┘
//
// There is no activation after the addition. Both convolutions pad
// by kernel_size / 2 so the block preserves its input shape, which
// is what makes the skip connection a plain element-wise add.
//
// Reference: He et al. (2016) Deep Residual Learning

use burn::{
    nn::{
        conv::{Conv2d, Conv2dConfig},
        BatchNorm, BatchNormConfig, PaddingConfig2d,
    },
    prelude::*,
    tensor::activation::relu,
};

#[derive(Config, Debug)]
pub struct ResidualBlockConfig {
    /// Input and output channel count (the block cannot change it)
    pub channels: usize,
    /// Square kernel size; odd sizes keep the spatial shape
    #[config(default = 3)]
    pub kernel_size: usize,
}

impl ResidualBlockConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ResidualBlock<B> {
        ResidualBlock {
            conv1: self.conv(device),
            bn1:   BatchNormConfig::new(self.channels).init(device),
            conv2: self.conv(device),
            bn2:   BatchNormConfig::new(self.channels).init(device),
        }
    }

    fn conv<B: Backend>(&self, device: &B::Device) -> Conv2d<B> {
        let pad = self.kernel_size / 2;
        Conv2dConfig::new([self.channels, self.channels], [self.kernel_size, self.kernel_size])
            .with_padding(PaddingConfig2d::Explicit(pad, pad))
            .init(device)
    }
}

#[derive(Module, Debug)]
pub struct ResidualBlock<B: Backend> {
    pub conv1: Conv2d<B>,
    pub bn1:   BatchNorm<B, 2>,
    pub conv2: Conv2d<B>,
    pub bn2:   BatchNorm<B, 2>,
}

impl<B: Backend> ResidualBlock<B> {
    /// x_in: [batch, channels, h, w] → [batch, channels, h, w]
    pub fn forward(&self, x_in: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = relu(self.bn1.forward(self.conv1.forward(x_in.clone())));
        let x = self.bn2.forward(self.conv2.forward(x));
        x + x_in
    }
}
