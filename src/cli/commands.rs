// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `fashion`, `features` and
// `plot`, and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand, ValueEnum};

use crate::application::train_use_case::{ComputeDevice, DatasetSpec, TrainConfig};
use crate::data::loader::{FASHION_TEST_PATH, FASHION_TRAIN_PATH};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the shallow autoencoder on Fashion-MNIST, then plot samples
    Fashion(FashionArgs),

    /// Train the wide autoencoder on a labels/data feature archive
    Features(FeatureArgs),

    /// Render sample inputs and the saved reconstruction as PNGs
    Plot(PlotArgs),
}

/// Flags shared by both training commands.
#[derive(Args, Debug)]
pub struct TrainingArgs {
    /// Number of samples per gradient update
    #[arg(long, default_value_t = 100)]
    pub batch_size: usize,

    /// Number of full passes over the training set
    #[arg(long, default_value_t = 10)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Seed for parameter initialisation
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Compute backend, chosen once for the whole run
    #[arg(long, value_enum, default_value_t = DeviceArg::Cpu)]
    pub device: DeviceArg,

    /// Where the final test reconstructions are written
    #[arg(long, default_value = "prediction.npy")]
    pub prediction: String,

    /// Append per-epoch losses to this CSV file
    #[arg(long)]
    pub metrics_csv: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceArg {
    /// NdArray on the host CPU
    Cpu,
    /// WGPU on the default graphics adapter
    Wgpu,
}

impl From<DeviceArg> for ComputeDevice {
    fn from(d: DeviceArg) -> Self {
        match d {
            DeviceArg::Cpu  => ComputeDevice::Cpu,
            DeviceArg::Wgpu => ComputeDevice::Wgpu,
        }
    }
}

#[derive(Args, Debug)]
pub struct FashionArgs {
    /// Training archive with a `data` array, label in column 0
    #[arg(long, default_value = FASHION_TRAIN_PATH)]
    pub train: String,

    /// Test archive in the same layout
    #[arg(long, default_value = FASHION_TEST_PATH)]
    pub test: String,

    /// Directory the sample figures are written to
    #[arg(long, default_value = "figure")]
    pub figure_dir: String,

    #[command(flatten)]
    pub training: TrainingArgs,
}

#[derive(Args, Debug)]
pub struct FeatureArgs {
    /// Training archive with `labels` and `data` arrays; the test
    /// archive is found by replacing "train" with "test" in this path
    pub input: String,

    #[command(flatten)]
    pub training: TrainingArgs,
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    #[arg(long, default_value = FASHION_TRAIN_PATH)]
    pub train: String,

    #[arg(long, default_value = FASHION_TEST_PATH)]
    pub test: String,

    /// Directory the figures are written to
    #[arg(long, default_value = "figure")]
    pub figure_dir: String,

    /// Reconstruction array written by a training run
    #[arg(long, default_value = "prediction.npy")]
    pub prediction: String,
}

fn train_config(dataset: DatasetSpec, a: TrainingArgs) -> TrainConfig {
    TrainConfig {
        dataset,
        batch_size:      a.batch_size,
        epochs:          a.epochs,
        lr:              a.lr,
        seed:            a.seed,
        device:          a.device.into(),
        prediction_path: a.prediction,
        metrics_csv:     a.metrics_csv,
    }
}

/// Convert CLI args into the application-layer TrainConfig.
/// The application layer never sees clap types.
impl From<FashionArgs> for TrainConfig {
    fn from(a: FashionArgs) -> Self {
        let dataset = DatasetSpec::FashionMnist { train_path: a.train, test_path: a.test };
        train_config(dataset, a.training)
    }
}

impl From<FeatureArgs> for TrainConfig {
    fn from(a: FeatureArgs) -> Self {
        train_config(DatasetSpec::Features { train_path: a.input }, a.training)
    }
}
