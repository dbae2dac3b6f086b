// ============================================================
// Layer 4 — Synthetic Grasp Samples
// ============================================================
// Builds (image, target maps) pairs in memory so the network can be
// exercised end to end without a dataset on disk.
//
// Each sample carries exactly one ground-truth grasp, encoded the
// way grasp datasets encode theirs:
//
//   quality  Gaussian blob centred on the grasp, peak 1.0
//   cos      cos(2θ) where quality > QUALITY_FLOOR, else 0
//   sin      sin(2θ) where quality > QUALITY_FLOOR, else 0
//   width    opening / 150 px where quality > QUALITY_FLOOR, else 0
//
// The image is uniform noise in [-1, 1) per channel with the blob
// added to channel 0 (depth), so it is at least loosely correlated
// with the targets.
//
// A seeded StdRng makes every run reproducible.

use std::f32::consts::FRAC_PI_2;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::domain::grasp::Grasp;
use crate::ml::postprocess::DEFAULT_WIDTH_SCALE;

const QUALITY_FLOOR: f32 = 0.1;

/// One image and its four target maps, all row-major.
#[derive(Debug, Clone)]
pub struct GraspSample {
    pub channels: usize,
    pub height:   usize,
    pub width:    usize,
    /// [channels, height, width]
    pub image:       Vec<f32>,
    pub quality_map: Vec<f32>,
    pub cos_map:     Vec<f32>,
    pub sin_map:     Vec<f32>,
    pub width_map:   Vec<f32>,
    /// The grasp the maps encode
    pub grasp: Grasp,
}

pub struct SyntheticGraspGenerator {
    rng:      StdRng,
    channels: usize,
    height:   usize,
    width:    usize,
}

impl SyntheticGraspGenerator {
    pub fn new(seed: u64, channels: usize, height: usize, width: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            channels,
            height,
            width,
        }
    }

    pub fn sample(&mut self) -> GraspSample {
        let (h, w) = (self.height, self.width);

        let row     = self.rng.gen_range(0..h.max(1));
        let col     = self.rng.gen_range(0..w.max(1));
        let angle   = Grasp::canonical_angle(self.rng.gen_range(-FRAC_PI_2..FRAC_PI_2));
        let opening = self.rng.gen_range(0.05_f32..0.5) * DEFAULT_WIDTH_SCALE;
        let sigma   = (h.min(w) as f32 / 8.0).max(1.0);

        let (cos_2t, sin_2t) = Grasp::encode_angle(angle);
        let plane = h * w;

        let mut quality_map = vec![0.0; plane];
        let mut cos_map     = vec![0.0; plane];
        let mut sin_map     = vec![0.0; plane];
        let mut width_map   = vec![0.0; plane];

        for r in 0..h {
            for c in 0..w {
                let dr = r as f32 - row as f32;
                let dc = c as f32 - col as f32;
                let q  = (-(dr * dr + dc * dc) / (2.0 * sigma * sigma)).exp();
                let i  = r * w + c;
                quality_map[i] = q;
                if q > QUALITY_FLOOR {
                    cos_map[i]   = cos_2t;
                    sin_map[i]   = sin_2t;
                    width_map[i] = opening / DEFAULT_WIDTH_SCALE;
                }
            }
        }

        let mut image: Vec<f32> = (0..self.channels * plane)
            .map(|_| self.rng.gen_range(-1.0_f32..1.0))
            .collect();
        if self.channels > 0 {
            for (px, q) in image[..plane].iter_mut().zip(&quality_map) {
                *px += q;
            }
        }

        GraspSample {
            channels: self.channels,
            height: h,
            width: w,
            image,
            quality_map,
            cos_map,
            sin_map,
            width_map,
            grasp: Grasp { row, col, quality: 1.0, angle, width: opening },
        }
    }

    pub fn samples(&mut self, count: usize) -> Vec<GraspSample> {
        (0..count).map(|_| self.sample()).collect()
    }
}
