use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::error::{AnalysisError, Result};

/// Decoded raster: row-major, interleaved R,G,B[,A] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw bytes. `channels` must be 3 or 4 and `data` must hold exactly
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(AnalysisError::InvalidBuffer(format!(
                "expected 3 or 4 channels, got {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(AnalysisError::InvalidBuffer(format!(
                "{width}x{height}x{channels} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Solid-colour RGB buffer.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            channels: 3,
            data,
        }
    }

    pub fn from_image(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self {
                width,
                height,
                channels: 4,
                data: rgba.into_raw(),
            }
        } else {
            let rgb = img.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self {
                width,
                height,
                channels: 3,
                data: rgb.into_raw(),
            }
        }
    }

    /// Decode an encoded image (PNG, JPEG, ...) held in memory.
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).map_err(AnalysisError::DecodeMemory)?;
        Ok(Self::from_image(img))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Iterate pixels as `[r, g, b]`, ignoring alpha.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data
            .chunks_exact(self.channels as usize)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Single-channel luma plane (new allocation, same pixel order).
    pub fn luma(&self) -> Vec<f64> {
        self.rgb_pixels().map(luma).collect()
    }
}

/// Perceptual brightness of an RGB triple.
pub fn luma([r, g, b]: [u8; 3]) -> f64 {
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Decode an image file into a `PixelBuffer`.
pub fn decode(path: &Path) -> Result<PixelBuffer> {
    let decode_err = |source| AnalysisError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(decode_err)?;
    Ok(PixelBuffer::from_image(img))
}

/// Round half away from zero to one decimal place.
pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
