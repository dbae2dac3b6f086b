// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case wires the other layers together for one command.
// No printing here (that's Layer 1) and no network code (Layer 5).
//
// The use cases are generic over the Burn backend: the CLI runs
// them on Wgpu, the tests on NdArray.

// Topology summary and parameter count
pub mod describe_use_case;

// Forward pass + grasp decoding on a synthetic batch
pub mod predict_use_case;

// Loss evaluation + backward pass on a synthetic batch
pub mod loss_use_case;

use serde::{Deserialize, Serialize};

/// Shape of the synthetic batch a use case runs on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntheticRun {
    pub height:     usize,
    pub width:      usize,
    pub batch_size: usize,
    pub seed:       u64,
}

impl Default for SyntheticRun {
    fn default() -> Self {
        Self { height: 224, width: 224, batch_size: 1, seed: 42 }
    }
}
