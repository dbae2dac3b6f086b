// ============================================================
// Layer 2 — LossUseCase
// ============================================================
// Orchestrates one loss evaluation on an autodiff backend:
//
//   Step 1: Generate a synthetic batch with targets  (Layer 4)
//   Step 2: compute_loss → total + per-head terms    (Layer 5)
//   Step 3: Backward pass, count parameter grads     (Layer 5)
//   Step 4: Optionally append the terms to a CSV     (Layer 6)

use anyhow::Result;
use burn::{
    data::dataloader::batcher::Batcher,
    optim::GradientsParams,
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::SyntheticRun;
use crate::data::{batcher::GraspBatcher, synthetic::SyntheticGraspGenerator};
use crate::infra::report::LossReportLogger;
use crate::ml::loss::LossSummary;
use crate::ml::model::GrConvNetConfig;

#[derive(Debug, Clone)]
pub struct LossReport {
    pub summary: LossSummary,
    /// Number of parameter tensors that received a gradient
    pub params_with_grads: usize,
}

pub struct LossUseCase {
    config:     GrConvNetConfig,
    run:        SyntheticRun,
    report_csv: Option<String>,
}

impl LossUseCase {
    pub fn new(config: GrConvNetConfig, run: SyntheticRun, report_csv: Option<String>) -> Self {
        Self { config, run, report_csv }
    }

    pub fn execute<B: AutodiffBackend>(&self, device: &B::Device) -> Result<LossReport> {
        let run = &self.run;

        // ── Step 1: Synthetic batch ───────────────────────────────────────────
        let samples = SyntheticGraspGenerator::new(
            run.seed, self.config.input_channels, run.height, run.width,
        ).samples(run.batch_size);
        let batch = GraspBatcher::<B>::new(device.clone()).batch(samples);
        self.config.validate_targets(batch.images.dims(), batch.targets.dims())?;

        // ── Step 2: Loss ──────────────────────────────────────────────────────
        let model  = self.config.init::<B>(device);
        let output = model.compute_loss(batch.images, batch.targets);
        let summary = output.losses.summary();
        tracing::debug!("Prediction maps {:?}", output.pred.dims());

        for (label, term) in output.losses.labeled() {
            tracing::debug!("{} = {:.6}", label, term.into_scalar().elem::<f64>());
        }

        // ── Step 3: Backward ──────────────────────────────────────────────────
        let grads = output.loss.backward();
        let grads = GradientsParams::from_grads(grads, &model);
        let params_with_grads = grads.len();
        tracing::info!(
            "loss={:.6}, {} parameter tensors received gradients",
            summary.loss,
            params_with_grads,
        );

        // ── Step 4: Report ────────────────────────────────────────────────────
        if let Some(path) = &self.report_csv {
            let logger = LossReportLogger::new(path)?;
            logger.log(&summary)?;
            tracing::info!("Appended loss report to '{}'", logger.csv_path().display());
        }

        Ok(LossReport { summary, params_with_grads })
    }
}
