use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, luma, round1};
use crate::error::{AnalysisError, Result};

/// Every Nth pixel is sampled for dominant colours.
const DOMINANT_SAMPLE_STRIDE: usize = 10;

/// Bucket width used to coalesce near-identical colours.
const QUANTIZE_STEP: u8 = 32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub red: Vec<u64>,
    pub green: Vec<u64>,
    pub blue: Vec<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominantColor {
    pub rgb: [u8; 3],
    pub hex: String,
    pub frequency: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorVariance {
    pub channels: ChannelStats,
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorProfile {
    pub histogram: Histogram,
    pub means: ChannelStats,
    pub dominant_colors: Vec<DominantColor>,
    pub variance: ColorVariance,
    pub brightness: f64,
    pub contrast: f64,
}

pub fn analyze_colors(buffer: &PixelBuffer, max_colors: usize) -> Result<ColorProfile> {
    if buffer.is_empty() {
        return Err(AnalysisError::EmptyBuffer);
    }
    let n = buffer.pixel_count() as f64;

    let mut hist = [[0u64; 256]; 3];
    let mut sums = [0f64; 3];
    let mut luma_sum = 0f64;
    for px in buffer.rgb_pixels() {
        for c in 0..3 {
            hist[c][px[c] as usize] += 1;
            sums[c] += px[c] as f64;
        }
        luma_sum += luma(px);
    }
    let means = sums.map(|s| s / n);
    let brightness = luma_sum / n;

    let mut sq_dev = [0f64; 3];
    let mut luma_dev = 0f64;
    for px in buffer.rgb_pixels() {
        for c in 0..3 {
            let d = px[c] as f64 - means[c];
            sq_dev[c] += d * d;
        }
        let d = luma(px) - brightness;
        luma_dev += d * d;
    }
    let variances = sq_dev.map(|s| s / n);
    let contrast = (luma_dev / n).sqrt();

    let [red, green, blue] = hist;
    Ok(ColorProfile {
        histogram: Histogram {
            red: red.to_vec(),
            green: green.to_vec(),
            blue: blue.to_vec(),
        },
        means: stats(means),
        dominant_colors: dominant_colors(buffer, max_colors),
        variance: ColorVariance {
            channels: stats(variances),
            overall: round1(variances.iter().sum::<f64>() / 3.0),
        },
        brightness: round1(brightness),
        contrast: round1(contrast),
    })
}

fn stats([red, green, blue]: [f64; 3]) -> ChannelStats {
    ChannelStats {
        red: round1(red),
        green: round1(green),
        blue: round1(blue),
    }
}

/// Most frequent quantized colours among sampled pixels, descending by count.
///
/// Ties are broken by the quantized colour value so output is deterministic.
/// Percentages are truncated to one decimal so the list never sums past 100.
pub fn dominant_colors(buffer: &PixelBuffer, max_colors: usize) -> Vec<DominantColor> {
    let mut counts: HashMap<[u8; 3], u64> = HashMap::new();
    let mut sampled = 0u64;
    for px in buffer.rgb_pixels().step_by(DOMINANT_SAMPLE_STRIDE) {
        *counts.entry(px.map(quantize)).or_default() += 1;
        sampled += 1;
    }
    if sampled == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<([u8; 3], u64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(max_colors)
        .map(|(rgb, frequency)| DominantColor {
            rgb,
            hex: format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2]),
            frequency,
            percentage: (frequency * 1000 / sampled) as f64 / 10.0,
        })
        .collect()
}

fn quantize(v: u8) -> u8 {
    (v / QUANTIZE_STEP) * QUANTIZE_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped(width: u32, height: u32) -> PixelBuffer {
        // Left half black, right half white.
        let mut data = Vec::new();
        for _ in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(width, height, 3, data).unwrap()
    }

    #[test]
    fn solid_red_profile() {
        let p = analyze_colors(&PixelBuffer::filled(4, 4, [255, 0, 0]), 5).unwrap();
        assert_eq!(p.means.red, 255.0);
        assert_eq!(p.means.green, 0.0);
        assert_eq!(p.histogram.red[255], 16);
        assert_eq!(p.variance.overall, 0.0);
        assert_eq!(p.contrast, 0.0);
        assert_eq!(p.brightness, 76.2);
        assert_eq!(p.dominant_colors.len(), 1);
        assert_eq!(p.dominant_colors[0].rgb, [224, 0, 0]);
        assert_eq!(p.dominant_colors[0].hex, "#e00000");
        assert_eq!(p.dominant_colors[0].percentage, 100.0);
    }

    #[test]
    fn histogram_counts_every_pixel() {
        let buf = striped(10, 10);
        let p = analyze_colors(&buf, 5).unwrap();
        let total: u64 = p.histogram.green.iter().sum();
        assert_eq!(total, 100);
        assert_eq!(p.histogram.green[0], 50);
        assert_eq!(p.histogram.green[255], 50);
    }

    #[test]
    fn half_black_half_white_contrast() {
        let p = analyze_colors(&striped(10, 10), 5).unwrap();
        assert_eq!(p.brightness, 127.5);
        assert_eq!(p.contrast, 127.5);
        assert_eq!(p.variance.channels.red, 16256.3);
    }

    #[test]
    fn dominant_colors_sorted_and_bounded() {
        let mut data = Vec::new();
        for i in 0..400u32 {
            let rgb = match i % 4 {
                0 | 1 => [10, 10, 10],
                2 => [200, 40, 40],
                _ => [40, 200, 40],
            };
            data.extend_from_slice(&rgb);
        }
        let buf = PixelBuffer::new(20, 20, 3, data).unwrap();
        let colors = dominant_colors(&buf, 5);
        assert!(!colors.is_empty());
        assert!(colors.windows(2).all(|w| w[0].frequency >= w[1].frequency));
        let sum: f64 = colors.iter().map(|c| c.percentage).sum();
        assert!(sum <= 100.0 + 1e-9);
    }

    #[test]
    fn rare_colours_do_not_push_percentages_past_100() {
        // 80 samples: 76 black, four distinct singletons (1.25% each).
        let mut data = vec![0u8; 800 * 3];
        for (i, rgb) in [[255, 0, 0], [0, 255, 0], [0, 0, 255], [255, 255, 0]]
            .iter()
            .enumerate()
        {
            let x = (i + 1) * 10;
            data[x * 3..x * 3 + 3].copy_from_slice(rgb);
        }
        let buf = PixelBuffer::new(800, 1, 3, data).unwrap();
        let colors = dominant_colors(&buf, 5);

        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0].percentage, 95.0);
        assert!(colors[1..].iter().all(|c| c.percentage == 1.2));
        let sum: f64 = colors.iter().map(|c| c.percentage).sum();
        assert!(sum <= 100.0, "sum = {sum}");
    }

    #[test]
    fn max_colors_truncates() {
        let mut data = Vec::new();
        for i in 0..100u32 {
            let v = (i * 255 / 99) as u8;
            data.extend_from_slice(&[v, 255 - v, v / 2]);
        }
        let buf = PixelBuffer::new(100, 1, 3, data).unwrap();
        assert!(dominant_colors(&buf, 2).len() <= 2);
    }

    #[test]
    fn empty_buffer_is_an_error() {
        let buf = PixelBuffer::new(0, 0, 3, Vec::new()).unwrap();
        assert!(matches!(
            analyze_colors(&buf, 5),
            Err(AnalysisError::EmptyBuffer)
        ));
    }
}
