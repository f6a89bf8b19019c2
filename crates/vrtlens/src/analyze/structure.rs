use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, round1};
use crate::error::{AnalysisError, Result};

/// Edge intensity above which a pixel counts as an edge.
pub const EDGE_THRESHOLD: u8 = 50;

/// High-pass kernel, row-major.
const EDGE_KERNEL: [f64; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Largest mean absolute difference of a mirrored pixel pair, per pixel.
const MAX_MIRROR_DIFF: f64 = 127.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symmetry {
    pub horizontal: f64,
    pub vertical: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralProfile {
    pub edge_count: u64,
    /// Percentage of pixels that are edges.
    pub edge_density: f64,
    pub complexity: f64,
    pub symmetry: Symmetry,
}

pub fn analyze_structure(buffer: &PixelBuffer) -> Result<StructuralProfile> {
    if buffer.is_empty() {
        return Err(AnalysisError::EmptyBuffer);
    }
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let gray = buffer.luma();
    let edges = convolve_edges(&gray, w, h);

    let total = edges.len() as f64;
    let edge_count = edges.iter().filter(|&&e| e > EDGE_THRESHOLD).count() as u64;
    let density = edge_count as f64 / total;

    let mean = edges.iter().map(|&e| e as f64).sum::<f64>() / total;
    let var = edges
        .iter()
        .map(|&e| {
            let d = e as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / total;
    let complexity = density * 50.0 + (var.sqrt() / 255.0) * 50.0;

    let horizontal = horizontal_symmetry(&gray, w, h);
    let vertical = vertical_symmetry(&gray, w, h);

    Ok(StructuralProfile {
        edge_count,
        edge_density: round1(density * 100.0),
        complexity: round1(complexity),
        symmetry: Symmetry {
            horizontal: round1(horizontal),
            vertical: round1(vertical),
            overall: round1((horizontal + vertical) / 2.0),
        },
    })
}

/// Apply the 3x3 high-pass kernel with replicated borders, clipping to 0–255.
fn convolve_edges(gray: &[f64], w: usize, h: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(gray.len());
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for ky in 0..3 {
                let sy = (y + ky).saturating_sub(1).min(h - 1);
                for kx in 0..3 {
                    let sx = (x + kx).saturating_sub(1).min(w - 1);
                    acc += EDGE_KERNEL[ky * 3 + kx] * gray[sy * w + sx];
                }
            }
            out.push(acc.clamp(0.0, 255.0).round() as u8);
        }
    }
    out
}

/// Left/right mirror score: 100 means every pixel equals its mirror.
fn horizontal_symmetry(gray: &[f64], w: usize, h: usize) -> f64 {
    let mut diff = 0.0;
    for y in 0..h {
        let row = &gray[y * w..(y + 1) * w];
        for x in 0..w / 2 {
            diff += (row[x] - row[w - 1 - x]).abs();
        }
    }
    mirror_score(diff, w * h)
}

/// Top/bottom mirror score.
fn vertical_symmetry(gray: &[f64], w: usize, h: usize) -> f64 {
    let mut diff = 0.0;
    for y in 0..h / 2 {
        let top = &gray[y * w..(y + 1) * w];
        let bottom = &gray[(h - 1 - y) * w..(h - y) * w];
        for x in 0..w {
            diff += (top[x] - bottom[x]).abs();
        }
    }
    mirror_score(diff, w * h)
}

fn mirror_score(diff: f64, total_pixels: usize) -> f64 {
    100.0 * (1.0 - diff / (total_pixels as f64 * MAX_MIRROR_DIFF))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_buffer(w: u32, h: u32, f: impl Fn(u32, u32) -> u8) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let v = f(x, y);
                data.extend_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(w, h, 3, data).unwrap()
    }

    #[test]
    fn uniform_image_has_no_edges() {
        let p = analyze_structure(&PixelBuffer::filled(16, 16, [90, 90, 90])).unwrap();
        assert_eq!(p.edge_count, 0);
        assert_eq!(p.complexity, 0.0);
        assert_eq!(p.symmetry.horizontal, 100.0);
        assert_eq!(p.symmetry.vertical, 100.0);
    }

    #[test]
    fn isolated_dot_is_an_edge() {
        let buf = gray_buffer(9, 9, |x, y| if x == 4 && y == 4 { 255 } else { 0 });
        let edges = convolve_edges(&buf.luma(), 9, 9);
        assert_eq!(edges[4 * 9 + 4], 255);
        // Neighbours see -255, clipped to 0.
        assert_eq!(edges[4 * 9 + 3], 0);
        let p = analyze_structure(&buf).unwrap();
        assert_eq!(p.edge_count, 1);
        assert!(p.complexity > 0.0);
    }

    #[test]
    fn left_right_mirrored_image_is_horizontally_symmetric() {
        let buf = gray_buffer(10, 6, |x, y| {
            let m = x.min(9 - x);
            (m * 40 + y * 7) as u8
        });
        let p = analyze_structure(&buf).unwrap();
        assert_eq!(p.symmetry.horizontal, 100.0);
        assert!(p.symmetry.vertical < 100.0);
    }

    #[test]
    fn half_black_half_white_has_zero_horizontal_symmetry() {
        let buf = gray_buffer(10, 10, |x, _| if x < 5 { 0 } else { 255 });
        let p = analyze_structure(&buf).unwrap();
        assert_eq!(p.symmetry.horizontal, 0.0);
        assert_eq!(p.symmetry.vertical, 100.0);
        assert_eq!(p.symmetry.overall, 50.0);
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let buf = PixelBuffer::new(0, 4, 3, Vec::new()).unwrap();
        assert!(matches!(
            analyze_structure(&buf),
            Err(AnalysisError::EmptyBuffer)
        ));
    }
}
