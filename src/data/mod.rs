// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from .npz archives on disk to tensor batches.
//
//   .npz archive
//       │
//       ▼
//   NpzArchive          → reads named arrays, any numeric dtype
//       │
//       ▼
//   Normalization       → fixed rescaling, same for train and test
//       │
//       ▼
//   SampleDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   ReconstructionBatcher → stacks rows into [batch, width] tensors
//       │
//       ▼
//   DataLoader          → in-order batches for the training loop
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads .npz archives into train/test samples
pub mod loader;

/// Fixed feature normalisation schemes
pub mod preprocessor;

/// Implements Burn's Dataset trait for samples
pub mod dataset;

/// Implements Burn's Batcher trait and builds in-order loaders
pub mod batcher;
