// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Orchestrates one inference pass:
//
//   Step 1: Generate a synthetic batch    (Layer 4 - data)
//   Step 2: Validate the input shape      (Layer 5 - ml)
//   Step 3: Build the network             (Layer 5 - ml)
//   Step 4: Forward pass                  (Layer 5 - ml)
//   Step 5: Decode the best grasp         (Layer 5 - ml)

use anyhow::Result;
use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::application::SyntheticRun;
use crate::data::{batcher::GraspBatcher, synthetic::SyntheticGraspGenerator};
use crate::domain::grasp::Grasp;
use crate::ml::model::GrConvNetConfig;
use crate::ml::postprocess::GraspDecoder;

#[derive(Debug, Clone)]
pub struct PredictReport {
    /// `(label, [batch, channels, h, w])` for every head
    pub shapes: Vec<(&'static str, [usize; 4])>,
    /// Best decoded grasp per image
    pub grasps: Vec<Grasp>,
}

pub struct PredictUseCase {
    config: GrConvNetConfig,
    run:    SyntheticRun,
}

impl PredictUseCase {
    pub fn new(config: GrConvNetConfig, run: SyntheticRun) -> Self {
        Self { config, run }
    }

    pub fn execute<B: Backend>(&self, device: &B::Device) -> Result<PredictReport> {
        let run = &self.run;

        // ── Step 1: Synthetic input ───────────────────────────────────────────
        let samples = SyntheticGraspGenerator::new(
            run.seed, self.config.input_channels, run.height, run.width,
        ).samples(run.batch_size);
        let batch = GraspBatcher::<B>::new(device.clone()).batch(samples);

        // ── Step 2: Shape check ───────────────────────────────────────────────
        self.config.validate_input(batch.images.dims())?;

        // ── Step 3-4: Network + forward pass ──────────────────────────────────
        let model = self.config.init::<B>(device);
        let pred  = model.predict(batch.images);
        tracing::info!("Forward pass produced maps of shape {:?}", pred.dims());

        // ── Step 5: Decode ────────────────────────────────────────────────────
        let grasps = GraspDecoder::default().best_grasps(&pred)?;
        for (found, truth) in grasps.iter().zip(&batch.grasps) {
            tracing::debug!(
                "best grasp ({}, {}) vs synthetic ({}, {})",
                found.row, found.col, truth.row, truth.col,
            );
        }

        let shapes = pred
            .into_labeled()
            .into_iter()
            .map(|(label, t)| (label, t.dims()))
            .collect();

        Ok(PredictReport { shapes, grasps })
    }
}
