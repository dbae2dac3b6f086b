// ============================================================
// Layer 5 — Head Maps
// ============================================================
// The network's four outputs, and the targets they are trained
// against, share one shape: [batch, output_channels, H, W] per head.
// Both are represented by HeadMaps so predictions and ground truth
// can be indexed, labelled and decoded the same way.

use burn::prelude::*;

use crate::domain::head::GraspHead;

/// One tensor per grasp head, all of shape [batch, channels, H, W].
#[derive(Debug, Clone)]
pub struct HeadMaps<B: Backend> {
    pub position: Tensor<B, 4>,
    pub cosine:   Tensor<B, 4>,
    pub sine:     Tensor<B, 4>,
    pub width:    Tensor<B, 4>,
}

/// What the network returns from `forward` / `predict`.
pub type GraspPrediction<B> = HeadMaps<B>;

/// Ground-truth maps consumed by `compute_loss`.
pub type GraspTargets<B> = HeadMaps<B>;

impl<B: Backend> HeadMaps<B> {
    pub fn get(&self, head: GraspHead) -> &Tensor<B, 4> {
        match head {
            GraspHead::Position => &self.position,
            GraspHead::Cosine   => &self.cosine,
            GraspHead::Sine     => &self.sine,
            GraspHead::Width    => &self.width,
        }
    }

    /// Consume into `(label, tensor)` pairs keyed "pos", "cos", "sin", "width".
    pub fn into_labeled(self) -> [(&'static str, Tensor<B, 4>); 4] {
        [
            (GraspHead::Position.label(), self.position),
            (GraspHead::Cosine.label(),   self.cosine),
            (GraspHead::Sine.label(),     self.sine),
            (GraspHead::Width.label(),    self.width),
        ]
    }

    /// Shape shared by all four maps (taken from the position head)
    pub fn dims(&self) -> [usize; 4] {
        self.position.dims()
    }
}
