// ============================================================
// Layer 3 — GraspHead
// ============================================================
// The network predicts four maps, one per head. Downstream
// consumers (training loops, evaluation scripts) look them up by
// fixed string labels, so the labels live next to the enum and
// nowhere else.
//
//   head      prediction label   loss label
//   ────────  ─────────────────  ──────────
//   Position  "pos"              "p_loss"
//   Cosine    "cos"              "cos_loss"
//   Sine      "sin"              "sin_loss"
//   Width     "width"            "width_loss"

/// One of the four output heads of the grasp network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GraspHead {
    /// Grasp quality: how likely a grasp centred on this pixel succeeds
    Position,
    /// cos(2θ) of the grasp angle
    Cosine,
    /// sin(2θ) of the grasp angle
    Sine,
    /// Normalised gripper opening
    Width,
}

impl GraspHead {
    /// All heads in output order (pos, cos, sin, width)
    pub const ALL: [GraspHead; 4] = [
        GraspHead::Position,
        GraspHead::Cosine,
        GraspHead::Sine,
        GraspHead::Width,
    ];

    /// Key under which the prediction map is reported
    pub fn label(self) -> &'static str {
        match self {
            GraspHead::Position => "pos",
            GraspHead::Cosine   => "cos",
            GraspHead::Sine     => "sin",
            GraspHead::Width    => "width",
        }
    }

    /// Key under which this head's loss term is reported
    pub fn loss_label(self) -> &'static str {
        match self {
            GraspHead::Position => "p_loss",
            GraspHead::Cosine   => "cos_loss",
            GraspHead::Sine     => "sin_loss",
            GraspHead::Width    => "width_loss",
        }
    }
}
