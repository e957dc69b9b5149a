// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// File output used by the use cases:
//
//   prediction_store.rs — writes/reads test reconstructions as
//                         a single .npy array
//
//   figure.rs           — renders feature vectors as grayscale
//                         PNG figures
//
//   metrics.rs          — appends per-epoch losses to a CSV file
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Reconstruction array persistence
pub mod prediction_store;

/// Grayscale PNG output
pub mod figure;

/// Training metrics CSV logger
pub mod metrics;
