// ============================================================
// Layer 3 — Grasp Domain Type
// ============================================================
// A planar grasp decoded from the network's output maps.
//
// The network never predicts θ directly: it predicts cos(2θ) and
// sin(2θ). Doubling the angle makes the encoding symmetric, since a
// parallel-jaw grasp at θ and θ + π is the same grasp. Decoding
// therefore halves atan2, which places θ in (-π/2, π/2].

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

/// A single grasp in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grasp {
    /// Row (y) of the grasp centre
    pub row: usize,
    /// Column (x) of the grasp centre
    pub col: usize,
    /// Value of the quality map at the centre
    pub quality: f32,
    /// Gripper rotation in radians, in (-π/2, π/2]
    pub angle: f32,
    /// Gripper opening in pixels
    pub width: f32,
}

impl Grasp {
    /// Recover θ from its (cos 2θ, sin 2θ) encoding.
    pub fn angle_from_encoding(cos_2t: f32, sin_2t: f32) -> f32 {
        Self::canonical_angle(sin_2t.atan2(cos_2t) / 2.0)
    }

    /// Fold -π/2 onto π/2; both describe the same grasp.
    pub fn canonical_angle(angle: f32) -> f32 {
        if angle <= -FRAC_PI_2 { angle + PI } else { angle }
    }

    /// Encode θ as (cos 2θ, sin 2θ).
    pub fn encode_angle(angle: f32) -> (f32, f32) {
        ((2.0 * angle).cos(), (2.0 * angle).sin())
    }

    /// Rotation in degrees, handy for logging
    pub fn angle_degrees(&self) -> f32 {
        self.angle.to_degrees()
    }
}
