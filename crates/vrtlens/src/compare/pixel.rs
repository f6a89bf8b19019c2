use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, round1};
use crate::error::{AnalysisError, Result};

/// Euclidean RGB distance above which a pixel counts as different.
pub const PIXEL_DISTANCE_THRESHOLD: f64 = 10.0;

/// Largest possible RGB distance: sqrt(3 * 255^2).
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelDifference {
    pub average_distance: f64,
    pub different_pixels: u64,
    pub total_pixels: u64,
    pub percentage_different: f64,
    /// 100 = identical, 0 = every pixel at maximum distance.
    pub similarity: f64,
}

pub(crate) fn ensure_same_dimensions(reference: &PixelBuffer, test: &PixelBuffer) -> Result<()> {
    if reference.dimensions() != test.dimensions() {
        return Err(AnalysisError::DimensionMismatch {
            reference_w: reference.width(),
            reference_h: reference.height(),
            test_w: test.width(),
            test_h: test.height(),
        });
    }
    if reference.is_empty() {
        return Err(AnalysisError::EmptyBuffer);
    }
    Ok(())
}

pub fn pixel_difference(reference: &PixelBuffer, test: &PixelBuffer) -> Result<PixelDifference> {
    ensure_same_dimensions(reference, test)?;

    let mut total_distance = 0f64;
    let mut different_pixels = 0u64;
    for (a, b) in reference.rgb_pixels().zip(test.rgb_pixels()) {
        let d = rgb_distance(a, b);
        total_distance += d;
        if d > PIXEL_DISTANCE_THRESHOLD {
            different_pixels += 1;
        }
    }

    let total_pixels = reference.pixel_count() as u64;
    let average_distance = total_distance / total_pixels as f64;
    Ok(PixelDifference {
        average_distance: round1(average_distance),
        different_pixels,
        total_pixels,
        percentage_different: round1(different_pixels as f64 / total_pixels as f64 * 100.0),
        similarity: round1((1.0 - average_distance / MAX_RGB_DISTANCE) * 100.0),
    })
}

/// Per-pixel mean absolute RGB delta (0–255), row-major.
pub fn difference_intensity(reference: &PixelBuffer, test: &PixelBuffer) -> Result<Vec<u8>> {
    ensure_same_dimensions(reference, test)?;
    Ok(reference
        .rgb_pixels()
        .zip(test.rgb_pixels())
        .map(|(a, b)| {
            let sum: u16 = (0..3).map(|c| a[c].abs_diff(b[c]) as u16).sum();
            (sum / 3) as u8
        })
        .collect())
}

pub fn rgb_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    (0..3)
        .map(|c| {
            let d = a[c] as f64 - b[c] as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_buffers_are_fully_similar() {
        let a = PixelBuffer::filled(4, 4, [255, 0, 0]);
        let r = pixel_difference(&a, &a.clone()).unwrap();
        assert_eq!(r.similarity, 100.0);
        assert_eq!(r.different_pixels, 0);
        assert_eq!(r.percentage_different, 0.0);
    }

    #[test]
    fn white_vs_black_is_maximally_different() {
        let white = PixelBuffer::filled(10, 10, [255, 255, 255]);
        let black = PixelBuffer::filled(10, 10, [0, 0, 0]);
        let r = pixel_difference(&white, &black).unwrap();
        assert_eq!(r.percentage_different, 100.0);
        assert_eq!(r.similarity, 0.0);
        assert_eq!(r.total_pixels, 100);
    }

    #[test]
    fn small_nudges_stay_under_threshold() {
        let a = PixelBuffer::filled(5, 5, [100, 100, 100]);
        let b = PixelBuffer::filled(5, 5, [105, 100, 100]);
        let r = pixel_difference(&a, &b).unwrap();
        assert_eq!(r.different_pixels, 0);
        assert!(r.similarity > 98.0 && r.similarity < 100.0);
    }

    #[test]
    fn dimension_mismatch_is_reported() {
        let a = PixelBuffer::filled(100, 100, [0, 0, 0]);
        let b = PixelBuffer::filled(50, 50, [0, 0, 0]);
        let err = pixel_difference(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DimensionMismatch {
                reference_w: 100,
                test_w: 50,
                ..
            }
        ));
        assert!(difference_intensity(&a, &b).is_err());
    }

    #[test]
    fn alpha_is_ignored() {
        let a = PixelBuffer::new(1, 1, 4, vec![10, 20, 30, 255]).unwrap();
        let b = PixelBuffer::new(1, 1, 3, vec![10, 20, 30]).unwrap();
        assert_eq!(pixel_difference(&a, &b).unwrap().similarity, 100.0);
    }

    #[test]
    fn intensity_is_mean_channel_delta() {
        let a = PixelBuffer::filled(2, 1, [0, 0, 0]);
        let b = PixelBuffer::filled(2, 1, [30, 60, 90]);
        assert_eq!(difference_intensity(&a, &b).unwrap(), vec![60, 60]);
    }
}
