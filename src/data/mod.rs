// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Synthetic samples in, tensor batches out:
//
//   SyntheticGraspGenerator  → GraspSample (image + target maps)
//       │
//       ▼
//   GraspBatcher             → GraspBatch (NCHW tensors)
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Seeded in-memory grasp samples
pub mod synthetic;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
