// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All model maths lives in Burn; this layer only wires Burn's
// building blocks together.
//
//   model.rs     — the autoencoder as an ordered list of affine
//                  stages: relu encoder, sigmoid bottleneck,
//                  relu decoder, linear output
//
//   trainer.rs   — fixed-epoch loop: forward, MSE, backward,
//                  Adam step, then evaluation each epoch
//
//   evaluator.rs — inference-only pass that collects every
//                  reconstruction in input order
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// Autoencoder stage configuration and module
pub mod model;

/// Training loop with per-epoch evaluation
pub mod trainer;

/// Reconstruction pass over held-out data
pub mod evaluator;
