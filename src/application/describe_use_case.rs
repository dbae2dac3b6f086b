// ============================================================
// Layer 2 — DescribeUseCase
// ============================================================
// Builds the network from its config and reports what was built.

use anyhow::Result;
use burn::prelude::*;

use crate::ml::model::GrConvNetConfig;

#[derive(Debug, Clone)]
pub struct ModelSummary {
    pub layers:     Vec<String>,
    pub num_params: usize,
}

pub struct DescribeUseCase {
    config: GrConvNetConfig,
}

impl DescribeUseCase {
    pub fn new(config: GrConvNetConfig) -> Self {
        Self { config }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<ModelSummary> {
        let model      = self.config.init::<B>(device);
        let num_params = model.num_params();
        tracing::info!(
            "GrConvNet ready: {} residual blocks, channel_size={}, {} parameters",
            self.config.num_residual_blocks,
            self.config.channel_size,
            num_params,
        );

        Ok(ModelSummary { layers: self.config.layer_plan(), num_params })
    }
}
