// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn network code lives here.
//
//   model.rs       — GrConvNet: encoder, residual bottleneck,
//                    transposed-conv decoder, four output heads
//   residual.rs    — the residual block used at the bottleneck
//   output.rs      — HeadMaps: predictions / targets per head
//   loss.rs        — smooth-L1 per head, summed
//   postprocess.rs — decode maps into quality / angle / width
//   backend.rs     — backend aliases used by the CLI
//
// Reference: Burn Book §3 (Building Blocks)
//            Kumra et al. (2020) GR-ConvNet

/// Generative residual convolutional network
pub mod model;

/// Residual block
pub mod residual;

/// Per-head output / target maps
pub mod output;

/// Multi-head smooth-L1 loss
pub mod loss;

/// Grasp decoding from output maps
pub mod postprocess;

/// Backend aliases
pub mod backend;
