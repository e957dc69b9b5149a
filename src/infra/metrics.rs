// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records per-epoch losses to a CSV file.
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: mean reconstruction MSE over training batches
//   - test_loss:  mean reconstruction MSE over test batches
//   - seconds:    wall time for the epoch (train + evaluation)
//
// Example CSV output:
//   epoch,train_loss,test_loss,seconds
//   1,0.412300,0.389100,12.41
//   2,0.301200,0.297800,12.37
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average reconstruction loss over all training batches
    pub train_loss: f64,

    /// Average reconstruction loss over the test set
    pub test_loss: f64,

    /// Wall-clock seconds spent on the epoch
    pub seconds: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, test_loss: f64, seconds: f64) -> Self {
        Self { epoch, train_loss, test_loss, seconds }
    }
}

/// Appends epoch metrics to a CSV file.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet, so
    /// several runs can append to the same log.
    pub fn new(csv_path: impl AsRef<Path>) -> Result<Self> {
        let csv_path = csv_path.as_ref().to_path_buf();

        if let Some(dir) = csv_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("Cannot create '{}'", dir.display()))?;
        }

        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "epoch,train_loss,test_loss,seconds")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.2}",
            m.epoch,
            m.train_loss,
            m.test_loss,
            m.seconds,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, test_loss={:.4}",
            m.epoch,
            m.train_loss,
            m.test_loss,
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_appended_under_one_header() {
        let dir    = tempfile::tempdir().unwrap();
        let path   = dir.path().join("runs").join("metrics.csv");
        let logger = MetricsLogger::new(&path).unwrap();
        logger.log(&EpochMetrics::new(1, 0.5, 0.25, 1.0)).unwrap();

        // A second logger on the same file must not repeat the header
        let again = MetricsLogger::new(&path).unwrap();
        again.log(&EpochMetrics::new(2, 0.4, 0.2, 1.5)).unwrap();

        let text = fs::read_to_string(again.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![
            "epoch,train_loss,test_loss,seconds",
            "1,0.500000,0.250000,1.00",
            "2,0.400000,0.200000,1.50",
        ]);
    }
}
