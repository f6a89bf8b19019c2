//! Per-image analysis: colour, structure and layout profiles.

pub mod color;
pub mod layout;
pub mod structure;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::buffer::PixelBuffer;
use crate::config::AnalysisToggles;

pub use self::color::{ColorProfile, DominantColor, analyze_colors};
pub use self::layout::{LayoutProfile, RegionWeights, ThirdsAdherence, analyze_layout};
pub use self::structure::{StructuralProfile, analyze_structure};

/// Everything derived from a single image.
///
/// A profile is `None` when its analysis is disabled or failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAnalysis {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructuralProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutProfile>,
}

impl ImageAnalysis {
    /// Run the enabled analyzers. Failures are logged and leave the profile empty.
    pub fn of(buffer: &PixelBuffer, toggles: &AnalysisToggles, max_colors: usize) -> Self {
        let color = toggles
            .enable_color_analysis
            .then(|| analyze_colors(buffer, max_colors))
            .and_then(|r| r.inspect_err(|e| warn!("color analysis skipped: {e}")).ok());
        let structure = toggles
            .enable_structural_similarity
            .then(|| analyze_structure(buffer))
            .and_then(|r| r.inspect_err(|e| warn!("structure analysis skipped: {e}")).ok());
        let layout = toggles
            .enable_layout_analysis
            .then(|| analyze_layout(buffer))
            .and_then(|r| r.inspect_err(|e| warn!("layout analysis skipped: {e}")).ok());

        Self {
            width: buffer.width(),
            height: buffer.height(),
            channels: buffer.channels(),
            color,
            structure,
            layout,
        }
    }
}
