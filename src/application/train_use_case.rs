// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run in order:
//
//   Step 1: Load train/test rows        (Layer 4 - data)
//   Step 2: Pick the model stack        (Layer 5 - ml)
//   Step 3: Check data width vs model   (Layer 5 - ml)
//   Step 4: Build datasets              (Layer 4 - data)
//   Step 5: Run training + evaluation   (Layer 5 - ml)
//   Step 6: Save test reconstructions   (Layer 6 - infra)
//
// The compute device is picked once here and handed down to
// every loader and to the model; nothing below this layer
// chooses a backend on its own.
//
// Reference: Burn Book §5 (Training)

use anyhow::{ensure, Context, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, Autodiff, NdArray, Wgpu},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::SampleDataset,
    loader::{FashionMnistSource, LabeledFeatureSource, FASHION_TEST_PATH, FASHION_TRAIN_PATH},
};
use crate::domain::traits::SampleSource;
use crate::infra::{metrics::MetricsLogger, prediction_store::PredictionStore};
use crate::ml::{
    model::AutoencoderConfig,
    trainer::{run_training, TrainReport},
};

// ─── Dataset selection ───────────────────────────────────────────────────────
/// Which input variant to train on. Each variant implies its model stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatasetSpec {
    /// Variant A: label + 784 pixels per row, shallow network
    FashionMnist { train_path: String, test_path: String },

    /// Variant B: separate labels/data arrays, wide network sized to the data
    Features { train_path: String },
}

impl DatasetSpec {
    fn source(&self) -> Box<dyn SampleSource> {
        match self {
            DatasetSpec::FashionMnist { train_path, test_path } => {
                Box::new(FashionMnistSource::new(train_path.as_str(), test_path.as_str()))
            }
            DatasetSpec::Features { train_path } => {
                Box::new(LabeledFeatureSource::new(train_path.as_str()))
            }
        }
    }

    fn model_config(&self, d_features: usize) -> AutoencoderConfig {
        match self {
            DatasetSpec::FashionMnist { .. } => AutoencoderConfig::shallow(),
            DatasetSpec::Features { .. }     => AutoencoderConfig::wide(d_features),
        }
    }
}

/// Where tensors live for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComputeDevice {
    /// NdArray backend on the host CPU
    Cpu,
    /// WGPU backend on the default adapter
    Wgpu,
}

// ─── Training Configuration ──────────────────────────────────────────────────
// All settings for a training run. Serialisable so the resolved
// configuration can be logged as JSON at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset:         DatasetSpec,
    pub batch_size:      usize,
    pub epochs:          usize,
    pub lr:              f64,
    pub seed:            u64,
    pub device:          ComputeDevice,
    pub prediction_path: String,
    pub metrics_csv:     Option<String>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetSpec::FashionMnist {
                train_path: FASHION_TRAIN_PATH.to_string(),
                test_path:  FASHION_TEST_PATH.to_string(),
            },
            batch_size:      100,
            epochs:          10,
            lr:              1e-3,
            seed:            42,
            device:          ComputeDevice::Cpu,
            prediction_path: "prediction.npy".to_string(),
            metrics_csv:     None,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end on the configured device.
    pub fn execute(&self) -> Result<TrainReport> {
        tracing::info!(
            "Resolved configuration: {}",
            serde_json::to_string(&self.config)?
        );

        match self.config.device {
            ComputeDevice::Cpu => {
                let device = NdArrayDevice::Cpu;
                tracing::info!("Using {:?} device.", device);
                self.execute_on::<Autodiff<NdArray>>(device)
            }
            ComputeDevice::Wgpu => {
                let device = WgpuDevice::default();
                tracing::info!("Using {:?} device.", device);
                self.execute_on::<Autodiff<Wgpu>>(device)
            }
        }
    }

    fn execute_on<B: AutodiffBackend>(&self, device: B::Device) -> Result<TrainReport> {
        let cfg = &self.config;
        ensure!(cfg.batch_size > 0, "batch size must be at least 1");

        // ── Step 1: Load rows ─────────────────────────────────────────────────
        let split = cfg.dataset.source().load_split()?;
        ensure!(!split.train.is_empty(), "the training set is empty");

        // ── Step 2 & 3: Model stack and width check ───────────────────────────
        let width = split
            .feature_width()
            .context("train and test rows do not share one feature width")?;
        let model_cfg = cfg.dataset.model_config(width);
        ensure!(
            model_cfg.d_input() == width,
            "data has {} features but the model expects {}",
            width,
            model_cfg.d_input()
        );

        // ── Step 4: Burn datasets ─────────────────────────────────────────────
        let train_dataset = SampleDataset::new(split.train);
        let test_dataset  = SampleDataset::new(split.test);

        // ── Step 5: Train and evaluate ────────────────────────────────────────
        let metrics = cfg
            .metrics_csv
            .as_deref()
            .map(MetricsLogger::new)
            .transpose()?;
        if let Some(logger) = &metrics {
            tracing::info!("Logging epoch metrics to '{}'", logger.csv_path().display());
        }

        let report = run_training::<B>(
            cfg,
            &model_cfg,
            train_dataset,
            test_dataset,
            device,
            metrics.as_ref(),
        )?;

        // ── Step 6: Persist reconstructions for plotting ──────────────────────
        PredictionStore::new(&cfg.prediction_path).save(&report.predictions)?;

        Ok(report)
    }
}
