// ============================================================
// Layer 5 — Evaluator
// ============================================================
// Runs a model over held-out batches and collects every
// reconstruction, in input order.
//
// Callers pass the inference copy of the model (`model.valid()`),
// which lives on the inner backend: no autodiff graph is recorded,
// so nothing here can affect the parameters.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use burn::{data::dataloader::DataLoader, prelude::*};

use crate::data::batcher::ReconstructionBatch;
use crate::domain::sample::Prediction;
use crate::ml::model::Autoencoder;

/// Result of one pass over the evaluation set.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Mean of the per-batch reconstruction losses
    pub avg_loss: f64,

    /// One reconstruction per input row, same order as the loader
    pub predictions: Vec<Prediction>,
}

pub fn evaluate<B: Backend>(
    model:  &Autoencoder<B>,
    loader: &Arc<dyn DataLoader<ReconstructionBatch<B>>>,
) -> Result<Evaluation> {
    let mut loss_sum    = 0.0f64;
    let mut batches     = 0usize;
    let mut predictions = Vec::new();

    for batch in loader.iter() {
        let (loss, output) = model.forward_loss(batch.features);
        loss_sum += loss.into_scalar().elem::<f64>();
        batches  += 1;

        let [_, width] = output.dims();
        let values = output
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read reconstruction batch: {e:?}"))?;

        predictions.extend(
            values
                .chunks(width.max(1))
                .map(|row| Prediction::new(row.to_vec())),
        );
    }

    let avg_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    tracing::debug!("Evaluated {} batches, {} reconstructions", batches, predictions.len());

    Ok(Evaluation { avg_loss, predictions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::data::batcher::sequential_loader;
    use crate::data::dataset::SampleDataset;
    use crate::domain::sample::Sample;
    use crate::ml::model::AutoencoderConfig;

    type TestBackend = NdArray;

    fn samples(n: usize, width: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let row = (0..width).map(|j| ((i * 7 + j * 3) % 11) as f32 / 11.0).collect();
                Sample::new(row, i as i64)
            })
            .collect()
    }

    #[test]
    fn test_one_prediction_per_sample_in_order() {
        let device = Default::default();
        let model  = AutoencoderConfig::wide(5).init::<TestBackend>(&device).unwrap();
        let rows   = samples(7, 5);
        let loader = sequential_loader::<TestBackend>(SampleDataset::new(rows.clone()), 3, device);

        let eval = evaluate(&model, &loader).unwrap();
        assert_eq!(eval.predictions.len(), 7);
        assert!(eval.predictions.iter().all(|p| p.width() == 5));
        assert!(eval.avg_loss.is_finite() && eval.avg_loss >= 0.0);

        // Row k of the single-sample forward pass must match prediction k.
        let third = Tensor::<TestBackend, 2>::from_data(
            TensorData::new(rows[2].features.clone(), [1, 5]),
            &Default::default(),
        );
        let direct = model.forward(third).into_data().to_vec::<f32>().unwrap();
        for (a, b) in direct.iter().zip(&eval.predictions[2].values) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let device = Default::default();
        let model  = AutoencoderConfig::wide(4).init::<TestBackend>(&device).unwrap();
        let loader = sequential_loader::<TestBackend>(SampleDataset::new(samples(9, 4)), 4, device);

        let first  = evaluate(&model, &loader).unwrap();
        let second = evaluate(&model, &loader).unwrap();
        assert_eq!(first.predictions, second.predictions);
        assert_eq!(first.avg_loss.to_bits(), second.avg_loss.to_bits());
    }

    #[test]
    fn test_empty_set_has_no_predictions() {
        let device = Default::default();
        let model  = AutoencoderConfig::wide(4).init::<TestBackend>(&device).unwrap();
        let loader = sequential_loader::<TestBackend>(SampleDataset::new(Vec::new()), 4, device);

        let eval = evaluate(&model, &loader).unwrap();
        assert!(eval.predictions.is_empty());
        assert!(eval.avg_loss.is_nan());
    }
}
