// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer only needs "something that gives me a
// train half and a test half". Both dataset variants implement
// this trait:
//   - FashionMnistSource   → one `data` array, label in column 0
//   - LabeledFeatureSource → separate `labels` and `data` arrays
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use crate::domain::sample::SampleSplit;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can load a normalised train/test split.
pub trait SampleSource {
    /// Load both halves. Missing files or malformed arrays are errors;
    /// there is no partial result.
    fn load_split(&self) -> Result<SampleSplit>;
}
