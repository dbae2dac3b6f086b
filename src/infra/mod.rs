// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File I/O that the other layers should not care about:
//
//   config_store.rs — GrConvNetConfig ⇄ JSON, so a topology can be
//                     described once and rebuilt anywhere
//   report.rs       — loss evaluations appended to a CSV file
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Model config persistence
pub mod config_store;

/// Loss report CSV logger
pub mod report;
