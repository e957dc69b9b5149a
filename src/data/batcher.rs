// ============================================================
// Layer 4 — Reconstruction Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<Sample>
// into tensors on the configured device.
//
// How batching works here:
//   Input:  Vec of N Samples, each with F features
//   Output: ReconstructionBatch with features [N, F]
//
//   We flatten all feature rows into one long Vec, then reshape:
//   [s1_f1, ..., s1_fF, s2_f1, ..., sN_fF] → [N, F]
//
// All rows share the same width (the loader reads them out of a
// single 2-D array), so no padding is needed. Labels stay on the
// Sample; the loss only ever compares a row with itself.
//
// Reference: Burn Book §4 (Batcher)

use std::sync::Arc;

use burn::{
    data::dataloader::{batcher::Batcher, DataLoader, DataLoaderBuilder},
    prelude::*,
};

use crate::data::dataset::SampleDataset;
use crate::domain::sample::Sample;

// ─── ReconstructionBatch ──────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct ReconstructionBatch<B: Backend> {
    /// Feature rows — shape: [batch_size, width]
    /// Also the training target: the model reconstructs its input
    pub features: Tensor<B, 2>,
}

// ─── ReconstructionBatcher ────────────────────────────────────────────────────
/// Holds the target device so tensors are created on the chosen
/// CPU/GPU backend.
#[derive(Clone, Debug)]
pub struct ReconstructionBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> ReconstructionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<Sample, ReconstructionBatch<B>> for ReconstructionBatcher<B> {
    fn batch(&self, items: Vec<Sample>) -> ReconstructionBatch<B> {
        let batch_size = items.len();
        let width      = items.first().map(Sample::width).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch_size, width]),
            &self.device,
        );

        ReconstructionBatch { features }
    }
}

/// Build a loader that walks `dataset` front to back in fixed-size
/// batches. No shuffling and a single worker, so every run sees the
/// same batch groupings; the last batch may be short.
pub fn sequential_loader<B: Backend>(
    dataset:    SampleDataset,
    batch_size: usize,
    device:     B::Device,
) -> Arc<dyn DataLoader<ReconstructionBatch<B>>> {
    DataLoaderBuilder::new(ReconstructionBatcher::<B>::new(device))
        .batch_size(batch_size)
        .build(dataset)
}

/// Number of batches `sequential_loader` yields for `samples` rows.
pub fn batch_count(samples: usize, batch_size: usize) -> usize {
    samples.div_ceil(batch_size.max(1))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn indexed_samples(n: usize, width: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let mut features = vec![0.5; width];
                features[0] = i as f32;
                Sample::new(features, (i % 10) as i64)
            })
            .collect()
    }

    #[test]
    fn test_batch_shapes() {
        let batcher = ReconstructionBatcher::<TestBackend>::new(Default::default());
        let batch   = batcher.batch(indexed_samples(4, 7));
        assert_eq!(batch.features.dims(), [4, 7]);

        let values = batch.features.into_data().to_vec::<f32>().unwrap();
        assert_eq!(&values[..7], &[0.0, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        assert_eq!(values[21], 3.0);
    }

    #[test]
    fn test_batch_count_rounds_up() {
        assert_eq!(batch_count(20, 10), 2);
        assert_eq!(batch_count(25, 10), 3);
        assert_eq!(batch_count(9, 10), 1);
        assert_eq!(batch_count(0, 10), 0);
    }

    #[test]
    fn test_loader_keeps_order_and_partitions_every_sample() {
        let loader = sequential_loader::<TestBackend>(
            SampleDataset::new(indexed_samples(25, 3)),
            10,
            Default::default(),
        );

        let mut sizes = Vec::new();
        let mut seen  = Vec::new();
        for batch in loader.iter() {
            let [rows, width] = batch.features.dims();
            sizes.push(rows);
            let values = batch.features.into_data().to_vec::<f32>().unwrap();
            seen.extend(values.chunks(width).map(|row| row[0] as usize));
        }

        assert_eq!(sizes, vec![10, 10, 5]);
        assert_eq!(sizes.len(), batch_count(25, 10));
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_two_passes_see_identical_batches() {
        let loader = sequential_loader::<TestBackend>(
            SampleDataset::new(indexed_samples(13, 2)),
            4,
            Default::default(),
        );
        let pass = || -> Vec<Vec<f32>> {
            loader
                .iter()
                .map(|b| b.features.into_data().to_vec::<f32>().unwrap())
                .collect()
        };
        assert_eq!(pass(), pass());
    }
}
