// ============================================================
// Layer 6 — Figure Writer
// ============================================================
// Renders a flat feature vector as a grayscale PNG.
//
// Values are min-max scaled into 0..=255 per image (darkest
// value → black, brightest → white), which is how a gray
// colormap displays an unnormalised array. A constant image
// renders mid-gray.
//
// Each source pixel is drawn as a `scale × scale` block so the
// 28×28 samples are readable without an image viewer zoom.
//
// Reference: png crate documentation

use anyhow::{ensure, Context, Result};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Default upscaling factor for saved figures
pub const DEFAULT_SCALE: u32 = 8;

/// Writes grayscale figures into one output directory.
pub struct FigureWriter {
    dir:   PathBuf,
    scale: u32,
}

impl FigureWriter {
    /// Create the writer, creating `dir` if it doesn't exist yet.
    pub fn new(dir: impl AsRef<Path>, scale: u32) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create figure directory '{}'", dir.display()))?;
        Ok(Self { dir, scale: scale.max(1) })
    }

    /// Save `values` (row-major, `width × height`) as `{name}.png`.
    pub fn save_gray(&self, name: &str, values: &[f32], width: u32, height: u32) -> Result<PathBuf> {
        ensure!(
            values.len() == (width * height) as usize,
            "figure '{}' has {} values, expected {}×{}",
            name, values.len(), width, height
        );

        let path   = self.dir.join(format!("{name}.png"));
        let pixels = upscale(&to_gray(values), width, height, self.scale);

        let file = File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), width * self.scale, height * self.scale);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pixels)?;
        writer.finish()?;

        tracing::info!("Wrote figure '{}'", path.display());
        Ok(path)
    }

    /// Save a square image, inferring the side from the vector length.
    pub fn save_square(&self, name: &str, values: &[f32]) -> Result<PathBuf> {
        let side = square_side(values.len())
            .with_context(|| format!("figure '{}' has {} values, not a square image", name, values.len()))?;
        self.save_gray(name, values, side, side)
    }
}

fn square_side(len: usize) -> Option<u32> {
    let side = (len as f64).sqrt().round() as usize;
    (side > 0 && side * side == len).then_some(side as u32)
}

fn to_gray(values: &[f32]) -> Vec<u8> {
    let (lo, hi) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = hi - lo;

    values
        .iter()
        .map(|&v| {
            if range > 0.0 && range.is_finite() {
                (((v - lo) / range) * 255.0).round() as u8
            } else {
                128
            }
        })
        .collect()
}

fn upscale(gray: &[u8], width: u32, height: u32, scale: u32) -> Vec<u8> {
    let (w, h, s) = (width as usize, height as usize, scale as usize);
    let mut out = Vec::with_capacity(w * h * s * s);
    for y in 0..h * s {
        let row = &gray[(y / s) * w..(y / s + 1) * w];
        for &px in row {
            out.extend(std::iter::repeat(px).take(s));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_png(path: &Path) -> (u32, u32, Vec<u8>) {
        let decoder    = png::Decoder::new(File::open(path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf    = vec![0; reader.output_buffer_size()];
        let info       = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn test_gray_levels_span_black_to_white() {
        assert_eq!(to_gray(&[-1.0, 0.0, 1.0]), vec![0, 128, 255]);
        assert_eq!(to_gray(&[0.3, 0.3]), vec![128, 128]);
    }

    #[test]
    fn test_square_side() {
        assert_eq!(square_side(784), Some(28));
        assert_eq!(square_side(1500), None);
        assert_eq!(square_side(0), None);
    }

    #[test]
    fn test_creates_directory_and_scaled_png() {
        let dir    = tempfile::tempdir().unwrap();
        let target = dir.path().join("figure");
        let writer = FigureWriter::new(&target, 3).unwrap();

        let values = [0.0, 1.0, 1.0, 0.0];
        let path   = writer.save_square("sample", &values).unwrap();
        assert_eq!(path, target.join("sample.png"));

        let (w, h, pixels) = read_png(&path);
        assert_eq!((w, h), (6, 6));
        assert_eq!(&pixels[..6], &[0, 0, 0, 255, 255, 255]);
        assert_eq!(&pixels[30..], &[255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_non_square_vector_is_rejected() {
        let dir    = tempfile::tempdir().unwrap();
        let writer = FigureWriter::new(dir.path(), 1).unwrap();
        assert!(writer.save_square("wide", &[0.0; 1500]).is_err());
    }
}
