// ============================================================
// Layer 2 — PlotUseCase
// ============================================================
// Writes one fixed sample from each set as a grayscale figure:
//
//   figure/train_sample.png   train row 1 (after normalisation)
//   figure/test_sample.png    test row 1 (after normalisation)
//   figure/pred_sample.png    row 1 of prediction.npy, if present
//
// The prediction figure is skipped when no training run has
// written prediction.npy yet, or when the file holds rows of a
// different width (a `features` run shares the default path).

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::loader::FashionMnistSource;
use crate::domain::traits::SampleSource;
use crate::infra::{
    figure::{FigureWriter, DEFAULT_SCALE},
    prediction_store::PredictionStore,
};

/// Row rendered from every set
const SAMPLE_INDEX: usize = 1;

pub struct PlotUseCase {
    train_path:      String,
    test_path:       String,
    figure_dir:      String,
    prediction_path: String,
}

impl PlotUseCase {
    pub fn new(
        train_path:      impl Into<String>,
        test_path:       impl Into<String>,
        figure_dir:      impl Into<String>,
        prediction_path: impl Into<String>,
    ) -> Self {
        Self {
            train_path:      train_path.into(),
            test_path:       test_path.into(),
            figure_dir:      figure_dir.into(),
            prediction_path: prediction_path.into(),
        }
    }

    /// Render the figures and return the paths that were written.
    pub fn execute(&self) -> Result<Vec<PathBuf>> {
        let split  = FashionMnistSource::new(&self.train_path, &self.test_path).load_split()?;
        let writer = FigureWriter::new(&self.figure_dir, DEFAULT_SCALE)?;

        let train = split
            .train
            .get(SAMPLE_INDEX)
            .with_context(|| format!("training set has no row {SAMPLE_INDEX}"))?;
        let test = split
            .test
            .get(SAMPLE_INDEX)
            .with_context(|| format!("test set has no row {SAMPLE_INDEX}"))?;

        let mut written = vec![
            writer.save_square("train_sample", &train.features)?,
            writer.save_square("test_sample", &test.features)?,
        ];

        if let Some(predictions) = PredictionStore::new(&self.prediction_path).load()? {
            if predictions.ncols() != train.width() {
                tracing::warn!(
                    "Skipping '{}': rows have {} values, images have {}",
                    self.prediction_path,
                    predictions.ncols(),
                    train.width()
                );
                return Ok(written);
            }
            let row = predictions
                .outer_iter()
                .nth(SAMPLE_INDEX)
                .with_context(|| format!("'{}' has no row {SAMPLE_INDEX}", self.prediction_path))?;
            written.push(writer.save_square("pred_sample", &row.to_vec())?);
        }

        Ok(written)
    }
}
