// ============================================================
// Layer 5 — Output Decoding
// ============================================================
// Turns the four predicted maps into something a robot can act on.
//
//   quality = position map
//   angle   = atan2(sin, cos) / 2        (undo the 2θ encoding)
//   width   = width map × width_scale    (undo the normalisation)
//
// The best grasp of an image is the pixel with the highest quality.
// Only channel 0 of each head is decoded.

use anyhow::{anyhow, Result};
use burn::prelude::*;

use crate::domain::{grasp::Grasp, head::GraspHead};
use crate::ml::output::GraspPrediction;

/// Width maps are regressed as width / 150 px by default
pub const DEFAULT_WIDTH_SCALE: f32 = 150.0;

/// Host-side decoded maps for one image, row-major.
#[derive(Debug, Clone)]
pub struct GraspMaps {
    pub height:  usize,
    pub width:   usize,
    pub quality: Vec<f32>,
    pub angle:   Vec<f32>,
    pub opening: Vec<f32>,
}

impl GraspMaps {
    /// Grasp at the highest-quality pixel. None for an empty map.
    pub fn best_grasp(&self) -> Option<Grasp> {
        debug_assert_eq!(self.quality.len(), self.height * self.width);
        let (idx, &quality) = self
            .quality
            .iter()
            .enumerate()
            .filter(|(_, q)| !q.is_nan())
            .max_by(|a, b| a.1.total_cmp(b.1))?;

        Some(Grasp {
            row:   idx / self.width,
            col:   idx % self.width,
            quality,
            angle: self.angle[idx],
            width: self.opening[idx],
        })
    }
}

pub struct GraspDecoder {
    width_scale: f32,
}

impl Default for GraspDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH_SCALE)
    }
}

impl GraspDecoder {
    pub fn new(width_scale: f32) -> Self {
        Self { width_scale }
    }

    /// Decode every image of a batch.
    pub fn decode<B: Backend>(&self, pred: &GraspPrediction<B>) -> Result<Vec<GraspMaps>> {
        let [batch, channels, height, width] = pred.dims();
        let plane = height * width;

        let quality = to_host(pred.get(GraspHead::Position))?;
        let cosine  = to_host(pred.get(GraspHead::Cosine))?;
        let sine    = to_host(pred.get(GraspHead::Sine))?;
        let opening = to_host(pred.get(GraspHead::Width))?;

        let maps = (0..batch)
            .map(|n| {
                // channel 0 of sample n
                let range = n * channels * plane..(n * channels + 1) * plane;
                GraspMaps {
                    height,
                    width,
                    quality: quality[range.clone()].to_vec(),
                    angle: cosine[range.clone()]
                        .iter()
                        .zip(&sine[range.clone()])
                        .map(|(&c, &s)| Grasp::angle_from_encoding(c, s))
                        .collect(),
                    opening: opening[range].iter().map(|w| w * self.width_scale).collect(),
                }
            })
            .collect();

        Ok(maps)
    }

    /// Best grasp per image of the batch.
    pub fn best_grasps<B: Backend>(&self, pred: &GraspPrediction<B>) -> Result<Vec<Grasp>> {
        self.decode(pred)?
            .iter()
            .map(|m| m.best_grasp().ok_or_else(|| anyhow!("Empty grasp map")))
            .collect()
    }
}

fn to_host<B: Backend>(t: &Tensor<B, 4>) -> Result<Vec<f32>> {
    t.clone()
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| anyhow!("Cannot read tensor data: {e:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn map(values: [f32; 6]) -> Tensor<TestBackend, 4> {
        Tensor::<TestBackend, 1>::from_floats(values, &Default::default()).reshape([1, 1, 2, 3])
    }

    #[test]
    fn test_best_grasp_picks_peak_quality() {
        let (c, s) = Grasp::encode_angle(0.6);
        let pred = GraspPrediction {
            position: map([0.1, 0.2, 0.3, 0.4, 0.9, 0.5]),
            cosine:   map([1.0, 1.0, 1.0, 1.0, c, 1.0]),
            sine:     map([0.0, 0.0, 0.0, 0.0, s, 0.0]),
            width:    map([0.0, 0.0, 0.0, 0.0, 0.2, 0.0]),
        };

        let grasps = GraspDecoder::default().best_grasps(&pred).unwrap();
        assert_eq!(grasps.len(), 1);

        let g = grasps[0];
        assert_eq!((g.row, g.col), (1, 1));
        assert!((g.quality - 0.9).abs() < 1e-6);
        assert!((g.angle - 0.6).abs() < 1e-5);
        assert!((g.width - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_decode_splits_batch_and_ignores_extra_channels() {
        let device = Default::default();
        // batch 2, 2 channels; channel 1 holds a larger value that must be ignored
        let position = Tensor::<TestBackend, 1>::from_floats(
            [0.0, 1.0, 9.0, 9.0,   2.0, 0.0, 9.0, 9.0],
            &device,
        ).reshape([2, 2, 1, 2]);
        let zeros = position.zeros_like();
        let pred = GraspPrediction {
            position,
            cosine: zeros.ones_like(),
            sine:   zeros.clone(),
            width:  zeros,
        };

        let maps = GraspDecoder::new(100.0).decode(&pred).unwrap();
        assert_eq!(maps.len(), 2);
        assert_eq!(maps[0].quality, vec![0.0, 1.0]);
        assert_eq!(maps[1].quality, vec![2.0, 0.0]);
        assert_eq!(maps[0].best_grasp().unwrap().col, 1);
        assert_eq!(maps[1].best_grasp().unwrap().col, 0);
    }
}
