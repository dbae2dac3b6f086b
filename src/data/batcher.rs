// ============================================================
// Layer 4 — Grasp Batcher
// ============================================================
// Implements Burn's Batcher trait to stack GraspSamples into
// NCHW tensors.
//
//   Input:  Vec of N samples, each [C, H, W] image + 4 × [H, W] maps
//   Output: GraspBatch with images [N, C, H, W] and
//           targets [N, 1, H, W] per head
//
// All samples of a batch must share C, H and W.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::synthetic::GraspSample;
use crate::domain::grasp::Grasp;
use crate::ml::output::GraspTargets;

#[derive(Debug, Clone)]
pub struct GraspBatch<B: Backend> {
    /// [batch, channels, height, width]
    pub images:  Tensor<B, 4>,
    /// [batch, 1, height, width] per head
    pub targets: GraspTargets<B>,
    /// Ground-truth grasp of each sample, in batch order
    pub grasps:  Vec<Grasp>,
}

#[derive(Clone, Debug)]
pub struct GraspBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> GraspBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack(&self, items: &[GraspSample], shape: [usize; 4], field: fn(&GraspSample) -> &[f32]) -> Tensor<B, 4> {
        let flat: Vec<f32> = items.iter().flat_map(|s| field(s).iter().copied()).collect();
        Tensor::from_data(TensorData::new(flat, shape), &self.device)
    }
}

impl<B: Backend> Batcher<GraspSample, GraspBatch<B>> for GraspBatcher<B> {
    fn batch(&self, items: Vec<GraspSample>) -> GraspBatch<B> {
        let n = items.len();
        let (c, h, w) = items
            .first()
            .map(|s| (s.channels, s.height, s.width))
            .unwrap_or((0, 0, 0));

        let images  = self.stack(&items, [n, c, h, w], |s| s.image.as_slice());
        let targets = GraspTargets {
            position: self.stack(&items, [n, 1, h, w], |s| s.quality_map.as_slice()),
            cosine:   self.stack(&items, [n, 1, h, w], |s| s.cos_map.as_slice()),
            sine:     self.stack(&items, [n, 1, h, w], |s| s.sin_map.as_slice()),
            width:    self.stack(&items, [n, 1, h, w], |s| s.width_map.as_slice()),
        };

        GraspBatch {
            images,
            targets,
            grasps: items.iter().map(|s| s.grasp).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::synthetic::SyntheticGraspGenerator;
    use crate::ml::postprocess::GraspDecoder;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let samples = SyntheticGraspGenerator::new(1, 4, 8, 12).samples(3);
        let batch   = GraspBatcher::<TestBackend>::new(Default::default()).batch(samples);

        assert_eq!(batch.images.dims(), [3, 4, 8, 12]);
        assert_eq!(batch.targets.dims(), [3, 1, 8, 12]);
        assert_eq!(batch.targets.sine.dims(), [3, 1, 8, 12]);
        assert_eq!(batch.grasps.len(), 3);
    }

    #[test]
    fn test_targets_decode_back_to_ground_truth() {
        let samples = SyntheticGraspGenerator::new(5, 4, 16, 16).samples(2);
        let batch   = GraspBatcher::<TestBackend>::new(Default::default()).batch(samples);

        let decoded = GraspDecoder::default().best_grasps(&batch.targets).unwrap();
        for (got, want) in decoded.iter().zip(&batch.grasps) {
            assert_eq!((got.row, got.col), (want.row, want.col));
            assert!((got.angle - want.angle).abs() < 1e-4);
            assert!((got.width - want.width).abs() < 1e-2);
        }
    }
}
