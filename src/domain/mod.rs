// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that name the concepts of grasp prediction.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// The network itself lives in Layer 5 (ml); this layer only says
// what its outputs MEAN: four per-pixel maps (quality, cos 2θ,
// sin 2θ, width) and the single grasp decoded from them.
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

// The four output heads and their fixed labels
pub mod head;

// A decoded grasp rectangle (centre, angle, width)
pub mod grasp;
