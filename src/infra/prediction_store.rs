// ============================================================
// Layer 6 — Prediction Store
// ============================================================
// Saves the final test-set reconstructions as a single .npy
// array so a later `plot` run can render one of them.
//
// File layout:
//   prediction.npy   f32, shape (N, F) — row i is the
//                    reconstruction of test row i
//
// A missing file is not an error when loading: plotting simply
// skips the prediction figure.
//
// Reference: ndarray-npy crate documentation

use anyhow::{ensure, Context, Result};
use ndarray::Array2;
use ndarray_npy::{read_npy, write_npy};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::sample::Prediction;

pub struct PredictionStore {
    path: PathBuf,
}

impl PredictionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Write all reconstructions as one (N, F) array.
    pub fn save(&self, predictions: &[Prediction]) -> Result<()> {
        let width = predictions.first().map(Prediction::width).unwrap_or(0);
        ensure!(
            predictions.iter().all(|p| p.width() == width),
            "reconstructions do not share one width"
        );

        let flat: Vec<f32> = predictions
            .iter()
            .flat_map(|p| p.values.iter().copied())
            .collect();
        let array = Array2::from_shape_vec((predictions.len(), width), flat)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        }

        write_npy(&self.path, &array)
            .with_context(|| format!("Cannot write predictions to '{}'", self.path.display()))?;

        tracing::info!("Saved {} reconstructions to '{}'", predictions.len(), self.path.display());
        Ok(())
    }

    /// Read the saved array, or `None` if no run has written it yet.
    pub fn load(&self) -> Result<Option<Array2<f32>>> {
        if !self.path.exists() {
            tracing::debug!("No prediction file at '{}'", self.path.display());
            return Ok(None);
        }

        let array: Array2<f32> = read_npy(&self.path)
            .with_context(|| format!("Cannot read predictions from '{}'", self.path.display()))?;
        Ok(Some(array))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_rows_load_back_in_order() {
        let dir   = tempfile::tempdir().unwrap();
        let store = PredictionStore::new(dir.path().join("out").join("prediction.npy"));
        let preds = vec![
            Prediction::new(vec![0.1, 0.2, 0.3]),
            Prediction::new(vec![-1.0, 0.0, 1.0]),
        ];
        store.save(&preds).unwrap();

        let array = store.load().unwrap().unwrap();
        assert_eq!(array.dim(), (2, 3));
        assert_eq!(array.row(1).to_vec(), vec![-1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let dir   = tempfile::tempdir().unwrap();
        let store = PredictionStore::new(dir.path().join("prediction.npy"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let dir   = tempfile::tempdir().unwrap();
        let store = PredictionStore::new(dir.path().join("prediction.npy"));
        let preds = vec![Prediction::new(vec![0.0; 3]), Prediction::new(vec![0.0; 2])];
        assert!(store.save(&preds).is_err());
    }
}
