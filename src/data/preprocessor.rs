// ============================================================
// Layer 4 — Feature Normalisation
// ============================================================
// Maps raw array values to the values the model trains on.
//
// Two fixed schemes:
//   PixelRange — 8-bit pixel intensities [0, 255] → [-1, 1]
//                x' = (x / 255 - 0.5) / 0.5
//   Identity   — precomputed features are used as stored
//
// The scheme is chosen once per loader and the same instance is
// applied to both the train and the test array, so the two halves
// can never drift apart.
//
// The arithmetic is done in f64 and narrowed to f32 at the end.

use serde::{Deserialize, Serialize};

/// Rescaling applied to every raw feature value at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Pixel intensities in [0, 255] rescaled into [-1, 1]
    PixelRange,
    /// Values pass through unchanged
    Identity,
}

impl Normalization {
    /// Normalise one raw value.
    pub fn apply(&self, raw: f64) -> f32 {
        match self {
            Normalization::PixelRange => ((raw / 255.0 - 0.5) / 0.5) as f32,
            Normalization::Identity   => raw as f32,
        }
    }

    /// Normalise a whole row of raw values.
    pub fn apply_row(&self, raw: impl IntoIterator<Item = f32>) -> Vec<f32> {
        raw.into_iter().map(|x| self.apply(x as f64)).collect()
    }
}
