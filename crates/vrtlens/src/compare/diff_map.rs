use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::pixel::difference_intensity;
use crate::buffer::PixelBuffer;
use crate::error::{AnalysisError, Result};

pub const DIFF_MAP_FILE: &str = "difference-map.png";

/// Mean channel delta above which a pixel is painted red.
const HIGHLIGHT_THRESHOLD: u8 = 10;

/// Outcome of writing the difference map. Never affects scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffMapOutcome {
    pub created: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Red where the images diverge, dim grey proportional to the delta elsewhere.
pub fn render(reference: &PixelBuffer, test: &PixelBuffer) -> Result<RgbImage> {
    let intensity = difference_intensity(reference, test)?;
    let (w, h) = reference.dimensions();
    let data = intensity
        .iter()
        .flat_map(|&d| {
            if d > HIGHLIGHT_THRESHOLD {
                [255, 0, 0]
            } else {
                let g = d.saturating_mul(4);
                [g, g, g]
            }
        })
        .collect();
    RgbImage::from_raw(w, h, data)
        .ok_or_else(|| AnalysisError::InvalidBuffer("difference map size mismatch".into()))
}

/// Render and save `difference-map.png` into `dir`, creating it if needed.
pub fn write(reference: &PixelBuffer, test: &PixelBuffer, dir: &Path) -> Result<PathBuf> {
    let img = render(reference, test)?;
    let path = dir.join(DIFF_MAP_FILE);
    let write_err = |source| AnalysisError::Write {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(|e| write_err(image::ImageError::IoError(e)))?;
    img.save(&path).map_err(write_err)?;
    debug!(path = %path.display(), "difference map written");
    Ok(path)
}

/// Like [`write`], but folds failures into the outcome.
pub fn write_outcome(reference: &PixelBuffer, test: &PixelBuffer, dir: &Path) -> DiffMapOutcome {
    match write(reference, test, dir) {
        Ok(path) => DiffMapOutcome {
            created: true,
            path: Some(path),
            message: None,
        },
        Err(e) => {
            warn!("difference map not written: {e}");
            DiffMapOutcome {
                created: false,
                path: None,
                message: Some(e.to_string()),
            }
        }
    }
}
