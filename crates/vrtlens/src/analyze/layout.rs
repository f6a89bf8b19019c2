use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, round1};
use crate::error::{AnalysisError, Result};

/// Luma above which a pixel counts as whitespace.
pub const WHITESPACE_LUMA: f64 = 240.0;

/// Share of content weight per cell of a 3x3 grid, in percent.
///
/// Cells are rounded independently, so the sum may drift slightly from 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionWeights {
    pub top_left: f64,
    pub top_center: f64,
    pub top_right: f64,
    pub middle_left: f64,
    pub center: f64,
    pub middle_right: f64,
    pub bottom_left: f64,
    pub bottom_center: f64,
    pub bottom_right: f64,
}

impl RegionWeights {
    fn from_grid(g: [f64; 9]) -> Self {
        Self {
            top_left: g[0],
            top_center: g[1],
            top_right: g[2],
            middle_left: g[3],
            center: g[4],
            middle_right: g[5],
            bottom_left: g[6],
            bottom_center: g[7],
            bottom_right: g[8],
        }
    }

    /// Cells in row-major order.
    pub fn values(&self) -> [f64; 9] {
        [
            self.top_left,
            self.top_center,
            self.top_right,
            self.middle_left,
            self.center,
            self.middle_right,
            self.bottom_left,
            self.bottom_center,
            self.bottom_right,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub horizontal: f64,
    pub vertical: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThirdsAdherence {
    Good,
    Poor,
}

/// Placeholder for alignment-guide detection; nothing is detected yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alignment {
    pub guides: Vec<u32>,
    pub centered: bool,
}

/// Placeholder for column-grid detection; nothing is detected yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridInfo {
    pub detected: bool,
    pub columns: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutProfile {
    pub regions: RegionWeights,
    pub balance: Balance,
    pub rule_of_thirds: ThirdsAdherence,
    pub whitespace_percentage: f64,
    /// 100 minus whitespace percentage.
    pub content_density: f64,
    pub alignment: Alignment,
    pub grid: GridInfo,
}

pub fn analyze_layout(buffer: &PixelBuffer) -> Result<LayoutProfile> {
    if buffer.is_empty() {
        return Err(AnalysisError::EmptyBuffer);
    }
    let (w, h) = (buffer.width() as usize, buffer.height() as usize);
    let (third_w, third_h) = (w / 3, h / 3);
    let gray = buffer.luma();

    let mut cells = [0f64; 9];
    let mut total = 0f64;
    let mut white = 0usize;
    for (i, &l) in gray.iter().enumerate() {
        let (x, y) = (i % w, i / w);
        let weight = 255.0 - l;
        cells[band(y, third_h) * 3 + band(x, third_w)] += weight;
        total += weight;
        if l > WHITESPACE_LUMA {
            white += 1;
        }
    }

    // Luma of pure white can land a hair under 255; treat that as no content.
    let pct = if total > 1e-6 {
        cells.map(|c| c / total * 100.0)
    } else {
        [0.0; 9]
    };

    let col = |c: usize| pct[c] + pct[c + 3] + pct[c + 6];
    let row = |r: usize| pct[r * 3] + pct[r * 3 + 1] + pct[r * 3 + 2];
    let horizontal = (col(0) - col(2)).abs();
    let vertical = (row(0) - row(2)).abs();

    let corners = pct[0] + pct[2] + pct[6] + pct[8];
    let rule_of_thirds = if corners > pct[4] {
        ThirdsAdherence::Good
    } else {
        ThirdsAdherence::Poor
    };

    let whitespace = white as f64 / gray.len() as f64 * 100.0;

    Ok(LayoutProfile {
        regions: RegionWeights::from_grid(pct.map(round1)),
        balance: Balance {
            horizontal: round1(horizontal),
            vertical: round1(vertical),
            overall: round1((horizontal + vertical) / 2.0),
        },
        rule_of_thirds,
        whitespace_percentage: round1(whitespace),
        content_density: round1(100.0 - whitespace),
        alignment: detect_alignment(buffer),
        grid: detect_grid(buffer),
    })
}

/// Grid band (0, 1, 2) of a coordinate; the last band absorbs any remainder.
fn band(v: usize, third: usize) -> usize {
    if v < third {
        0
    } else if v < 2 * third {
        1
    } else {
        2
    }
}

/// Always reports no guides; see [`Alignment`].
// TODO: detect vertical alignment guides from edge-column histograms.
fn detect_alignment(_buffer: &PixelBuffer) -> Alignment {
    Alignment::default()
}

/// Always reports no grid; see [`GridInfo`].
fn detect_grid(_buffer: &PixelBuffer) -> GridInfo {
    GridInfo::default()
}
