// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal: a training run, or rendering sample figures.
//
// Rules for this layer:
//   - No model maths here (that's Layer 5)
//   - No argument parsing (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Load → train → evaluate → save reconstructions
pub mod train_use_case;

// Render sample inputs and a saved reconstruction as PNGs
pub mod plot_use_case;
