// ============================================================
// Layer 5 — Grasp Loss
// ============================================================
// Every head is regressed independently with smooth-L1 (β = 1,
// mean over all elements) and the four terms are summed:
//
//   loss = SL1(pos) + SL1(cos) + SL1(sin) + SL1(width)
//
//   SL1(d) = 0.5·d²      if |d| < 1
//          = |d| − 0.5   otherwise
//
// Burn's HuberLoss with δ = 1 is exactly this function, so it is
// used directly instead of re-deriving the piecewise form.
//
// Reference: Girshick (2015) Fast R-CNN (smooth L1)
//            Burn Book §3 (Loss functions)

use burn::{
    nn::loss::{HuberLossConfig, Reduction},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::domain::head::GraspHead;
use crate::ml::output::GraspPrediction;

/// Mean smooth-L1 loss with β = 1.
pub fn smooth_l1<B: Backend, const D: usize>(
    pred:   Tensor<B, D>,
    target: Tensor<B, D>,
) -> Tensor<B, 1> {
    HuberLossConfig::new(1.0)
        .init()
        .forward(pred, target, Reduction::Mean)
}

/// The four per-head loss terms.
#[derive(Debug, Clone)]
pub struct LossTerms<B: Backend> {
    pub position: Tensor<B, 1>,
    pub cosine:   Tensor<B, 1>,
    pub sine:     Tensor<B, 1>,
    pub width:    Tensor<B, 1>,
}

impl<B: Backend> LossTerms<B> {
    pub fn get(&self, head: GraspHead) -> &Tensor<B, 1> {
        match head {
            GraspHead::Position => &self.position,
            GraspHead::Cosine   => &self.cosine,
            GraspHead::Sine     => &self.sine,
            GraspHead::Width    => &self.width,
        }
    }

    /// Sum of the four terms; this is what gets back-propagated.
    pub fn total(&self) -> Tensor<B, 1> {
        self.position.clone() + self.cosine.clone() + self.sine.clone() + self.width.clone()
    }

    /// `(label, term)` pairs keyed "p_loss", "cos_loss", "sin_loss", "width_loss".
    pub fn labeled(&self) -> [(&'static str, Tensor<B, 1>); 4] {
        GraspHead::ALL.map(|h| (h.loss_label(), self.get(h).clone()))
    }

    /// Pull the scalar values back to the host.
    pub fn summary(&self) -> LossSummary {
        let scalar = |t: &Tensor<B, 1>| t.clone().into_scalar().elem::<f64>();
        let p_loss     = scalar(&self.position);
        let cos_loss   = scalar(&self.cosine);
        let sin_loss   = scalar(&self.sine);
        let width_loss = scalar(&self.width);
        LossSummary {
            loss: p_loss + cos_loss + sin_loss + width_loss,
            p_loss,
            cos_loss,
            sin_loss,
            width_loss,
        }
    }
}

/// Everything `compute_loss` returns.
#[derive(Debug, Clone)]
pub struct GraspLossOutput<B: Backend> {
    /// Aggregate loss (sum of the four terms)
    pub loss:   Tensor<B, 1>,
    pub losses: LossTerms<B>,
    pub pred:   GraspPrediction<B>,
}

/// Host-side copy of one loss evaluation, used for logging and reports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossSummary {
    pub loss:       f64,
    pub p_loss:     f64,
    pub cos_loss:   f64,
    pub sin_loss:   f64,
    pub width_loss: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn scalar(t: Tensor<TestBackend, 1>) -> f32 {
        t.into_scalar().elem::<f32>()
    }

    #[test]
    fn test_identical_maps_have_zero_loss() {
        let device = Default::default();
        let x = Tensor::<TestBackend, 4>::ones([2, 1, 3, 3], &device) * 0.7;
        assert_eq!(scalar(smooth_l1(x.clone(), x)), 0.0);
    }

    #[test]
    fn test_quadratic_and_linear_regions() {
        let device = Default::default();
        // |d| = 0.5 → 0.125 (quadratic), |d| = 2 → 1.5 (linear)
        let pred   = Tensor::<TestBackend, 1>::from_floats([0.5, -2.0], &device);
        let target = Tensor::<TestBackend, 1>::zeros([2], &device);
        let loss   = scalar(smooth_l1(pred, target));
        assert!((loss - 0.8125).abs() < 1e-6, "got {loss}");
    }

    #[test]
    fn test_total_is_sum_of_terms() {
        let device = Default::default();
        let terms = LossTerms::<TestBackend> {
            position: Tensor::from_floats([0.25], &device),
            cosine:   Tensor::from_floats([0.5], &device),
            sine:     Tensor::from_floats([1.0], &device),
            width:    Tensor::from_floats([2.0], &device),
        };
        assert!((scalar(terms.total()) - 3.75).abs() < 1e-6);

        let summary = terms.summary();
        assert!((summary.loss - 3.75).abs() < 1e-6);
        assert!((summary.sin_loss - 1.0).abs() < 1e-6);

        let labels: Vec<&str> = terms.labeled().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["p_loss", "cos_loss", "sin_loss", "width_loss"]);
    }
}
