// ============================================================
// Layer 4 — Array Loader
// ============================================================
// Loads train/test rows from numpy .npz archives using the
// ndarray-npy crate.
//
// How .npz files work:
//   An .npz file is a ZIP archive whose entries are .npy files,
//   one per array. numpy names each entry after the keyword it
//   was saved under, plus a ".npy" suffix:
//
//     fashion-mnist_train.npz
//       └── data.npy           (N, 1 + 784)  label in column 0
//
//     features_train.npz
//       ├── labels.npy         (N,)
//       └── data.npy           (N, F)
//
// The element type inside the .npy header is whatever the array
// was saved with, so we try the common numeric dtypes in turn and
// convert to f32 (features) or i64 (labels).
//
// Two sources implement the SampleSource trait from Layer 3:
//   FashionMnistSource   — image rows, pixels rescaled to [-1, 1]
//   LabeledFeatureSource — wide feature rows, values kept as-is
//
// Reference: ndarray-npy crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, ensure, Context, Result};
use ndarray::{Array, Array2, Dimension, Ix1, Ix2, OwnedRepr};
use ndarray_npy::NpzReader;
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::data::preprocessor::Normalization;
use crate::domain::sample::{Sample, SampleSplit};
use crate::domain::traits::SampleSource;

/// Default location of the Fashion-MNIST training archive
pub const FASHION_TRAIN_PATH: &str = "data/fashion-mnist_train.npz";

/// Default location of the Fashion-MNIST test archive
pub const FASHION_TEST_PATH: &str = "data/fashion-mnist_test.npz";

// Try each listed dtype until one matches the .npy header, then
// convert element-wise into the requested output type.
macro_rules! read_as {
    ($reader:expr, $name:expr, $dim:ty => $out:ty, [$($t:ty),+ $(,)?]) => {
        $(
            if let Ok(array) = $reader.by_name::<OwnedRepr<$t>, $dim>($name) {
                return Ok(array.mapv(|v| v as $out));
            }
        )+
    };
}

// ─── NpzArchive ───────────────────────────────────────────────────────────────
/// An opened .npz archive with its entry names cached.
pub struct NpzArchive {
    path:   PathBuf,
    reader: NpzReader<File>,
    names:  Vec<String>,
}

impl NpzArchive {
    /// Open an archive. A missing or non-zip file is an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let file = File::open(&path)
            .with_context(|| format!("Cannot open array file '{}'", path.display()))?;

        let mut reader = NpzReader::new(file)
            .with_context(|| format!("'{}' is not a valid .npz archive", path.display()))?;

        let names = reader
            .names()
            .with_context(|| format!("Cannot list arrays in '{}'", path.display()))?;

        tracing::debug!("Opened '{}' with arrays {:?}", path.display(), names);
        Ok(Self { path, reader, names })
    }

    /// Read a 2-D array as f32.
    pub fn matrix(&mut self, key: &str) -> Result<Array2<f32>> {
        self.read_f32::<Ix2>(key)
    }

    /// Read a 1-D array as integer labels.
    pub fn labels(&mut self, key: &str) -> Result<Vec<i64>> {
        Ok(self.read_i64::<Ix1>(key)?.to_vec())
    }

    fn read_f32<D: Dimension>(&mut self, key: &str) -> Result<Array<f32, D>> {
        let name = self.entry_name(key)?;
        read_as!(self.reader, &name, D => f32, [f32, f64, u8, i64, i32, i16, u16, u32]);
        bail!(
            "Array '{}' in '{}' must be a {}-D numeric array",
            key,
            self.path.display(),
            D::NDIM.unwrap_or(0)
        )
    }

    fn read_i64<D: Dimension>(&mut self, key: &str) -> Result<Array<i64, D>> {
        let name = self.entry_name(key)?;
        read_as!(self.reader, &name, D => i64, [i64, i32, i16, u8, u16, u32, f64, f32]);
        bail!(
            "Array '{}' in '{}' must be a {}-D integer array",
            key,
            self.path.display(),
            D::NDIM.unwrap_or(0)
        )
    }

    // numpy stores `data` as `data.npy`; accept either spelling.
    fn entry_name(&self, key: &str) -> Result<String> {
        let with_ext = format!("{key}.npy");
        self.names
            .iter()
            .find(|n| n.as_str() == key || n.as_str() == with_ext)
            .cloned()
            .with_context(|| {
                format!(
                    "Array '{}' not found in '{}' (available: {})",
                    key,
                    self.path.display(),
                    self.names.join(", ")
                )
            })
    }
}

// ─── FashionMnistSource ───────────────────────────────────────────────────────
/// Variant A: a single `data` array per file, label in column 0 and
/// 8-bit pixel intensities in the remaining columns.
pub struct FashionMnistSource {
    train_path:    String,
    test_path:     String,
    normalization: Normalization,
}

impl FashionMnistSource {
    pub fn new(train_path: impl Into<String>, test_path: impl Into<String>) -> Self {
        Self {
            train_path:    train_path.into(),
            test_path:     test_path.into(),
            normalization: Normalization::PixelRange,
        }
    }

    fn load_file(&self, path: &str) -> Result<Vec<Sample>> {
        let mut archive = NpzArchive::open(path)?;
        let data        = archive.matrix("data")?;

        ensure!(
            data.ncols() >= 2,
            "'{}' must have a label column plus at least one pixel column, got shape {:?}",
            path,
            data.shape()
        );

        Ok(data
            .outer_iter()
            .map(|row| {
                let label    = row[0] as i64;
                let features = self.normalization.apply_row(row.iter().skip(1).copied());
                Sample::new(features, label)
            })
            .collect())
    }
}

impl SampleSource for FashionMnistSource {
    fn load_split(&self) -> Result<SampleSplit> {
        let train = self.load_file(&self.train_path)?;
        let test  = self.load_file(&self.test_path)?;
        tracing::info!("train {} test {}", train.len(), test.len());
        Ok(SampleSplit { train, test })
    }
}

// ─── LabeledFeatureSource ─────────────────────────────────────────────────────
/// Variant B: separate `labels` and `data` arrays, no rescaling.
///
/// Only the training path is given; the test path is derived by
/// replacing "train" with "test" in it.
pub struct LabeledFeatureSource {
    train_path:    String,
    test_path:     String,
    normalization: Normalization,
}

impl LabeledFeatureSource {
    pub fn new(train_path: impl Into<String>) -> Self {
        let train_path = train_path.into();
        let test_path  = test_path_for(&train_path);
        if test_path == train_path {
            tracing::warn!(
                "'{}' does not contain \"train\"; evaluating on the training file",
                train_path
            );
        }
        Self { train_path, test_path, normalization: Normalization::Identity }
    }

    pub fn test_path(&self) -> &str {
        &self.test_path
    }

    fn load_file(&self, path: &str) -> Result<Vec<Sample>> {
        let mut archive = NpzArchive::open(path)?;
        let labels      = archive.labels("labels")?;
        let data        = archive.matrix("data")?;

        ensure!(
            labels.len() == data.nrows(),
            "'{}' has {} labels but {} data rows",
            path,
            labels.len(),
            data.nrows()
        );

        Ok(data
            .outer_iter()
            .zip(labels)
            .map(|(row, label)| {
                Sample::new(self.normalization.apply_row(row.iter().copied()), label)
            })
            .collect())
    }
}

impl SampleSource for LabeledFeatureSource {
    fn load_split(&self) -> Result<SampleSplit> {
        tracing::info!("Loading '{}' and '{}'", self.train_path, self.test_path());
        let train = self.load_file(&self.train_path)?;
        let test  = self.load_file(&self.test_path)?;
        tracing::info!("train {} test {}", train.len(), test.len());
        Ok(SampleSplit { train, test })
    }
}

/// Map a training file path to its test counterpart.
///
/// Example:
///   "data/features_train.npz" → "data/features_test.npz"
pub fn test_path_for(train_path: &str) -> String {
    train_path.replace("train", "test")
}
