// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap and routes to Layer 2 (application).
//
// Three commands are supported:
//   1. `fashion`  — train on Fashion-MNIST, then plot samples
//   2. `features` — train on a wide labels/data archive
//   3. `plot`     — render figures from existing files
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use commands::{Commands, FashionArgs, FeatureArgs, PlotArgs};

use crate::application::{
    plot_use_case::PlotUseCase,
    train_use_case::{TrainConfig, TrainUseCase},
};
use crate::ml::trainer::TrainReport;

#[derive(Parser, Debug)]
#[command(
    name = "dense-autoencoder",
    version,
    about = "Train fully-connected autoencoders on Fashion-MNIST or wide feature arrays."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Fashion(args)  => run_fashion(args),
            Commands::Features(args) => run_features(args),
            Commands::Plot(args)     => run_plot(args),
        }
    }
}

fn run_fashion(args: FashionArgs) -> Result<()> {
    let figure_dir = args.figure_dir.clone();
    let (train, test) = (args.train.clone(), args.test.clone());

    let config = TrainConfig::from(args);
    let prediction = config.prediction_path.clone();

    let report = TrainUseCase::new(config).execute()?;
    print_summary(&report);

    // Render samples as soon as training finishes
    let plot = PlotUseCase::new(train, test, figure_dir, prediction);
    print_figures(&plot.execute()?);
    Ok(())
}

fn run_features(args: FeatureArgs) -> Result<()> {
    tracing::info!("Starting training on features in: {}", args.input);
    let report = TrainUseCase::new(args.into()).execute()?;
    print_summary(&report);
    Ok(())
}

fn run_plot(args: PlotArgs) -> Result<()> {
    let plot = PlotUseCase::new(args.train, args.test, args.figure_dir, args.prediction);
    print_figures(&plot.execute()?);
    Ok(())
}

fn print_summary(report: &TrainReport) {
    println!(
        "{}: {} reconstructions after {} optimizer steps",
        "done".green(),
        report.predictions.len(),
        report.optimizer_steps,
    );
    if let (Some(train), Some(test)) = (report.final_train_loss(), report.final_test_loss()) {
        println!("{}: train_loss {:5.3} test_loss {:5.3}", "final".green(), train, test);
    }
}

fn print_figures(paths: &[std::path::PathBuf]) {
    for path in paths {
        println!("{}: {}", "figure".green(), path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{ComputeDevice, DatasetSpec};

    #[test]
    fn test_features_requires_an_input_path() {
        let err = Cli::try_parse_from(["dense-autoencoder", "features"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_features_args_become_train_config() {
        let cli = Cli::try_parse_from([
            "dense-autoencoder", "features", "data/wide_train.npz",
            "--batch-size", "10", "--epochs", "1", "--device", "wgpu",
        ])
        .unwrap();

        let Commands::Features(args) = cli.command else {
            panic!("expected the features command");
        };
        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.dataset, DatasetSpec::Features { train_path: "data/wide_train.npz".into() });
        assert_eq!(cfg.batch_size, 10);
        assert_eq!(cfg.epochs, 1);
        assert_eq!(cfg.device, ComputeDevice::Wgpu);
    }

    #[test]
    fn test_fashion_defaults() {
        let cli = Cli::try_parse_from(["dense-autoencoder", "fashion"]).unwrap();
        let Commands::Fashion(args) = cli.command else {
            panic!("expected the fashion command");
        };
        assert_eq!(args.figure_dir, "figure");

        let cfg = TrainConfig::from(args);
        assert_eq!(cfg.batch_size, 100);
        assert_eq!(cfg.epochs, 10);
        assert_eq!(cfg.lr, 1e-3);
        assert_eq!(cfg.prediction_path, "prediction.npy");
        assert_eq!(cfg.dataset, DatasetSpec::FashionMnist {
            train_path: "data/fashion-mnist_train.npz".into(),
            test_path:  "data/fashion-mnist_test.npz".into(),
        });
    }
}
