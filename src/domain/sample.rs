// ============================================================
// Layer 3 — Sample and Prediction Domain Types
// ============================================================
// A Sample is one row of the input data: a flat feature vector
// (28*28 pixels for Fashion-MNIST, or a wide precomputed feature
// row) plus the integer label that came with it.
//
// The autoencoder never looks at the label — its training target
// is the input itself — but the label is kept so the batches stay
// aligned with the original rows.
//
// A Prediction is the reconstructed feature vector the model
// produced for one Sample. It always has the same width as its
// input.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// One normalised input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Feature values after normalisation
    pub features: Vec<f32>,

    /// Class label from column 0 (image data) or the `labels` array
    pub label: i64,
}

impl Sample {
    pub fn new(features: Vec<f32>, label: i64) -> Self {
        Self { features, label }
    }

    /// Number of features in this row
    pub fn width(&self) -> usize {
        self.features.len()
    }
}

/// A reconstruction produced at evaluation time.
/// Held in memory only, in the same order as the input samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub values: Vec<f32>,
}

impl Prediction {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    pub fn width(&self) -> usize {
        self.values.len()
    }
}

/// The two halves produced by a loader: rows used for gradient
/// updates and held-out rows used for evaluation.
#[derive(Debug, Clone, Default)]
pub struct SampleSplit {
    pub train: Vec<Sample>,
    pub test:  Vec<Sample>,
}

impl SampleSplit {
    /// Feature width shared by every row in both halves.
    ///
    /// Returns `None` for an empty split or when any row disagrees
    /// with the first one — callers treat that as a fatal shape error.
    pub fn feature_width(&self) -> Option<usize> {
        let mut rows  = self.train.iter().chain(self.test.iter());
        let width     = rows.next()?.width();
        rows.all(|s| s.width() == width).then_some(width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_width_is_shared() {
        let split = SampleSplit {
            train: vec![Sample::new(vec![0.0; 4], 1), Sample::new(vec![1.0; 4], 2)],
            test:  vec![Sample::new(vec![0.5; 4], 3)],
        };
        assert_eq!(split.feature_width(), Some(4));
    }

    #[test]
    fn test_feature_width_rejects_ragged_rows() {
        let split = SampleSplit {
            train: vec![Sample::new(vec![0.0; 4], 1)],
            test:  vec![Sample::new(vec![0.0; 3], 1)],
        };
        assert_eq!(split.feature_width(), None);
    }

    #[test]
    fn test_empty_split_has_no_width() {
        assert_eq!(SampleSplit::default().feature_width(), None);
    }
}
