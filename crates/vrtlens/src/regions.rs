//! Connected-component extraction over single-channel intensity maps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    Layout,
    Typography,
    Imagery,
    Color,
}

impl RegionKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Typography => "typography",
            Self::Imagery => "imagery",
            Self::Color => "color",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub pixel_count: u64,
    pub average_intensity: f64,
    pub kind: RegionKind,
    /// 0–100.
    pub confidence: u8,
}

/// Bounding box accumulated during a flood fill.
struct Component {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
    pixels: u64,
    intensity_sum: u64,
}

/// Find 4-connected components of pixels brighter than `threshold`.
///
/// Regions come back in discovery order: the scan is row-major from the
/// top-left, and each fill starts at the first unvisited qualifying pixel.
/// Components with fewer than `min_size` pixels are dropped.
pub fn find_regions(
    intensity: &[u8],
    width: u32,
    height: u32,
    threshold: u8,
    min_size: usize,
) -> Vec<Region> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 || intensity.len() < w * h {
        return Vec::new();
    }

    let mut visited = vec![false; w * h];
    let mut stack: Vec<usize> = Vec::new();
    let mut regions = Vec::new();

    for start in 0..w * h {
        if visited[start] || intensity[start] <= threshold {
            continue;
        }

        let mut c = Component {
            min_x: start % w,
            min_y: start / w,
            max_x: start % w,
            max_y: start / w,
            pixels: 0,
            intensity_sum: 0,
        };
        visited[start] = true;
        stack.push(start);

        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            c.min_x = c.min_x.min(x);
            c.max_x = c.max_x.max(x);
            c.min_y = c.min_y.min(y);
            c.max_y = c.max_y.max(y);
            c.pixels += 1;
            c.intensity_sum += intensity[i] as u64;

            let mut visit = |n: usize| {
                if !visited[n] && intensity[n] > threshold {
                    visited[n] = true;
                    stack.push(n);
                }
            };
            if x > 0 {
                visit(i - 1);
            }
            if x + 1 < w {
                visit(i + 1);
            }
            if y > 0 {
                visit(i - w);
            }
            if y + 1 < h {
                visit(i + w);
            }
        }

        if c.pixels as usize >= min_size {
            regions.push(c.into_region());
        }
    }

    regions
}

impl Component {
    fn into_region(self) -> Region {
        let width = (self.max_x - self.min_x + 1) as u32;
        let height = (self.max_y - self.min_y + 1) as u32;
        let average_intensity = self.intensity_sum as f64 / self.pixels as f64;
        Region {
            x: self.min_x as u32,
            y: self.min_y as u32,
            width,
            height,
            pixel_count: self.pixels,
            average_intensity: crate::buffer::round1(average_intensity),
            kind: classify(width, height),
            confidence: confidence(self.pixels, average_intensity),
        }
    }
}

/// Shape heuristic: elongated boxes are layout, small ones text, large ones imagery.
pub fn classify(width: u32, height: u32) -> RegionKind {
    let aspect = width as f64 / height as f64;
    if !(0.33..=3.0).contains(&aspect) {
        RegionKind::Layout
    } else if width < 50 && height < 50 {
        RegionKind::Typography
    } else if width > 200 && height > 200 {
        RegionKind::Imagery
    } else {
        RegionKind::Color
    }
}

fn confidence(pixels: u64, average_intensity: f64) -> u8 {
    let size = (pixels as f64 / 1000.0).min(1.0);
    let strength = average_intensity / 255.0;
    ((size * 0.6 + strength * 0.4) * 100.0).round() as u8
}

/// Region count per kind.
pub fn summarize(regions: &[Region]) -> BTreeMap<RegionKind, usize> {
    let mut counts = BTreeMap::new();
    for r in regions {
        *counts.entry(r.kind).or_insert(0) += 1;
    }
    counts
}
