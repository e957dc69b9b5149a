// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fixed-length train + evaluate loop using Burn's DataLoader
// and Adam.
//
// Per batch:
//   forward → MSE(reconstruction, input) → backward → Adam step
//
// Burn keeps no gradient buffers on the parameters: every call
// to loss.backward() returns a fresh Gradients container, so there
// is nothing to zero between steps.
//
// After each epoch the inference copy of the model (model.valid(),
// inner backend, no autodiff) is run over the test loader.
//
// No early stopping, no checkpoints, no learning-rate schedule.
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use std::time::Instant;

use anyhow::Result;
use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{batch_count, sequential_loader},
    dataset::SampleDataset,
};
use crate::domain::sample::Prediction;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::evaluator::evaluate;
use crate::ml::model::{Autoencoder, AutoencoderConfig};

/// What a finished run hands back to the caller.
#[derive(Debug, Clone)]
pub struct TrainReport {
    /// One entry per epoch, in order
    pub history: Vec<EpochMetrics>,

    /// Total number of Adam updates applied
    pub optimizer_steps: usize,

    /// Test-set reconstructions from the final epoch
    pub predictions: Vec<Prediction>,
}

impl TrainReport {
    pub fn final_train_loss(&self) -> Option<f64> {
        self.history.last().map(|m| m.train_loss)
    }

    pub fn final_test_loss(&self) -> Option<f64> {
        self.history.last().map(|m| m.test_loss)
    }
}

pub fn run_training<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &AutoencoderConfig,
    train_dataset: SampleDataset,
    test_dataset:  SampleDataset,
    device:        B::Device,
    metrics:       Option<&MetricsLogger>,
) -> Result<TrainReport> {

    // ── Build model ───────────────────────────────────────────────────────────
    B::seed(cfg.seed);
    let mut model: Autoencoder<B> = model_cfg.init(&device)?;
    tracing::info!(
        "Model ready: {} stages, {} parameters",
        model_cfg.stages.len(),
        model.num_params()
    );
    tracing::debug!("{}", model_cfg);

    // ── Adam optimiser ────────────────────────────────────────────────────────
    let mut optim = optimizer_config().init();

    // ── Loaders ───────────────────────────────────────────────────────────────
    // Training batches live on the autodiff backend; test batches on
    // the inner backend to match model.valid().
    let train_batches = batch_count(train_dataset.sample_count(), cfg.batch_size);
    let train_loader  = sequential_loader::<B>(train_dataset, cfg.batch_size, device.clone());
    let test_loader   = sequential_loader::<B::InnerBackend>(test_dataset, cfg.batch_size, device);

    let mut history         = Vec::with_capacity(cfg.epochs);
    let mut optimizer_steps = 0usize;
    let mut predictions     = Vec::new();

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.epochs {
        let started  = Instant::now();
        let progress = epoch_progress(epoch, train_batches)?;

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut batches        = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.features);

            train_loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches        += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.lr, model, grads);
            optimizer_steps += 1;

            tracing::debug!(
                "epoch {} [{}/{}] train_loss {:5.3}",
                epoch, batches, train_batches, train_loss_sum / batches as f64
            );
            progress.set_position(batches as u64);
            progress.set_message(format!("train_loss {:5.3}", train_loss_sum / batches as f64));
        }
        progress.finish_and_clear();

        let train_loss = if batches > 0 {
            train_loss_sum / batches as f64
        } else { f64::NAN };

        // ── Evaluation phase ──────────────────────────────────────────────────
        let evaluation = evaluate(&model.valid(), &test_loader)?;
        let seconds    = started.elapsed().as_secs_f64();

        println!(
            "epoch {:>2} [{:>3}/{:>3}] train_loss {:5.3} test_loss {:5.3} time {:5.2}",
            epoch, batches, train_batches, train_loss, evaluation.avg_loss, seconds,
        );

        let row = EpochMetrics::new(epoch, train_loss, evaluation.avg_loss, seconds);
        if let Some(logger) = metrics {
            logger.log(&row)?;
        }
        history.push(row);
        predictions = evaluation.predictions;
    }

    tracing::info!("Training complete after {} optimizer steps", optimizer_steps);
    Ok(TrainReport { history, optimizer_steps, predictions })
}

/// Adam with beta_1 0.9, beta_2 0.999 and epsilon 1e-8.
/// Burn's default epsilon is 1e-5, so it is set explicitly.
pub fn optimizer_config() -> AdamConfig {
    AdamConfig::new()
        .with_beta_1(0.9)
        .with_beta_2(0.999)
        .with_epsilon(1e-8)
}

fn epoch_progress(epoch: usize, batches: usize) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template("{prefix} [{pos:>3}/{len:>3}] {bar:30.cyan} {msg}")?;
    Ok(ProgressBar::new(batches as u64)
        .with_style(style)
        .with_prefix(format!("epoch {epoch:>2}").green().to_string()))
}
