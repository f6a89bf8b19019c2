//! Pairwise comparison of a reference and a test image.

pub mod diff_map;
pub mod metrics;
pub mod pixel;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analyze::ImageAnalysis;
use crate::buffer::PixelBuffer;
use crate::config::EngineConfig;
use crate::regions::{self, Region, RegionKind};

pub use self::diff_map::DiffMapOutcome;
pub use self::metrics::{
    ColorDifference, LayoutDifference, StructuralSimilarity, color_difference, layout_difference,
    structural_similarity,
};
pub use self::pixel::{PixelDifference, pixel_difference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionMismatch {
    pub reference: (u32, u32),
    pub test: (u32, u32),
}

/// Every sub-result is optional: a stage that is disabled or fails leaves it
/// `None` and records why in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_difference: Option<PixelDifference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural_similarity: Option<StructuralSimilarity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_difference: Option<ColorDifference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_difference: Option<LayoutDifference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_map: Option<DiffMapOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension_mismatch: Option<DimensionMismatch>,
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub region_summary: BTreeMap<RegionKind, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl ComparisonResult {
    /// The four headline scores, in report order.
    pub fn scores(&self) -> [Option<f64>; 4] {
        [
            self.pixel_difference.map(|p| p.similarity),
            self.structural_similarity.map(|s| s.overall),
            self.color_difference.map(|c| c.overall_similarity),
            self.layout_difference.map(|l| l.layout_score),
        ]
    }

    fn skip(&mut self, stage: &str, reason: impl std::fmt::Display) {
        warn!(stage, "comparison stage skipped: {reason}");
        self.skipped.push(format!("{stage}: {reason}"));
    }
}

/// Compare two decoded images using their precomputed analyses.
///
/// Pixel-level stages (pixel difference, regions, difference map) need equal
/// dimensions; the profile-based stages always run when both profiles exist.
pub fn compare(
    reference: &PixelBuffer,
    test: &PixelBuffer,
    reference_analysis: &ImageAnalysis,
    test_analysis: &ImageAnalysis,
    config: &EngineConfig,
    output_dir: Option<&Path>,
) -> ComparisonResult {
    let mut result = ComparisonResult::default();
    let toggles = &config.analysis;

    if reference.dimensions() != test.dimensions() {
        result.dimension_mismatch = Some(DimensionMismatch {
            reference: reference.dimensions(),
            test: test.dimensions(),
        });
    }

    if toggles.enable_pixel_analysis {
        match pixel_difference(reference, test) {
            Ok(p) => result.pixel_difference = Some(p),
            Err(e) => result.skip("pixelDifference", e),
        }
        if result.pixel_difference.is_some() {
            if config.regions.enabled {
                detect_regions(reference, test, config, &mut result);
            }
            if let Some(dir) = output_dir {
                result.diff_map = Some(diff_map::write_outcome(reference, test, dir));
            }
        }
    }

    if toggles.enable_structural_similarity {
        match (&reference_analysis.structure, &test_analysis.structure) {
            (Some(a), Some(b)) => result.structural_similarity = Some(structural_similarity(a, b)),
            _ => result.skip("structuralSimilarity", "structure profile unavailable"),
        }
    }

    if toggles.enable_color_analysis {
        match (&reference_analysis.color, &test_analysis.color) {
            (Some(a), Some(b)) => result.color_difference = Some(color_difference(a, b)),
            _ => result.skip("colorDifference", "color profile unavailable"),
        }
    }

    if toggles.enable_layout_analysis {
        match (&reference_analysis.layout, &test_analysis.layout) {
            (Some(a), Some(b)) => result.layout_difference = Some(layout_difference(a, b)),
            _ => result.skip("layoutDifference", "layout profile unavailable"),
        }
    }

    debug!(
        regions = result.regions.len(),
        skipped = result.skipped.len(),
        "comparison finished"
    );
    result
}

fn detect_regions(
    reference: &PixelBuffer,
    test: &PixelBuffer,
    config: &EngineConfig,
    result: &mut ComparisonResult,
) {
    let intensity = match pixel::difference_intensity(reference, test) {
        Ok(i) => i,
        Err(e) => return result.skip("regions", e),
    };
    let regions = regions::find_regions(
        &intensity,
        reference.width(),
        reference.height(),
        config.regions.intensity_threshold,
        config.regions.min_size,
    );
    result.region_summary = regions::summarize(&regions);
    result.regions = regions;
}
