use serde::{Deserialize, Serialize};

use super::pixel::{MAX_RGB_DISTANCE, rgb_distance};
use crate::analyze::{ColorProfile, LayoutProfile, StructuralProfile};
use crate::buffer::round1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralSimilarity {
    pub edge_similarity: f64,
    pub complexity_similarity: f64,
    pub overall: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorDifference {
    /// Frequency-weighted similarity of paired dominant colours, in percent.
    pub dominant_color_similarity: f64,
    pub brightness_difference: f64,
    pub contrast_difference: f64,
    pub overall_similarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDifference {
    /// Mean absolute delta across the nine grid cells.
    pub composition_difference: f64,
    pub whitespace_difference: f64,
    pub balance_difference: f64,
    pub layout_score: f64,
}

pub fn structural_similarity(
    reference: &StructuralProfile,
    test: &StructuralProfile,
) -> StructuralSimilarity {
    let max_edges = reference.edge_count.max(test.edge_count);
    let edge = if max_edges == 0 {
        1.0
    } else {
        1.0 - reference.edge_count.abs_diff(test.edge_count) as f64 / max_edges as f64
    };
    let complexity = 1.0 - (reference.complexity - test.complexity).abs() / 100.0;

    StructuralSimilarity {
        edge_similarity: round1(edge * 100.0),
        complexity_similarity: round1(complexity * 100.0),
        overall: round1((edge + complexity) / 2.0 * 100.0),
    }
}

pub fn color_difference(reference: &ColorProfile, test: &ColorProfile) -> ColorDifference {
    let mut weighted = 0f64;
    let mut weight_sum = 0f64;
    for (a, b) in reference
        .dominant_colors
        .iter()
        .zip(test.dominant_colors.iter())
    {
        let weight = (a.percentage + b.percentage) / 2.0 / 100.0;
        weighted += (1.0 - rgb_distance(a.rgb, b.rgb) / MAX_RGB_DISTANCE) * weight;
        weight_sum += weight;
    }
    let color_score = if weight_sum > 0.0 {
        weighted / weight_sum
    } else {
        1.0
    };

    let brightness = (reference.brightness - test.brightness).abs();
    let contrast = (reference.contrast - test.contrast).abs();
    let overall = (color_score + (1.0 - brightness / 255.0) + (1.0 - contrast / 255.0)) / 3.0;

    ColorDifference {
        dominant_color_similarity: round1(color_score * 100.0),
        brightness_difference: round1(brightness),
        contrast_difference: round1(contrast),
        overall_similarity: round1(overall * 100.0),
    }
}

pub fn layout_difference(reference: &LayoutProfile, test: &LayoutProfile) -> LayoutDifference {
    let composition = reference
        .regions
        .values()
        .iter()
        .zip(test.regions.values())
        .map(|(a, b)| (a - b).abs())
        .sum::<f64>()
        / 9.0;
    let whitespace = (reference.whitespace_percentage - test.whitespace_percentage).abs();
    let balance = (reference.balance.overall - test.balance.overall).abs();

    LayoutDifference {
        composition_difference: round1(composition),
        whitespace_difference: round1(whitespace),
        balance_difference: round1(balance),
        layout_score: round1((1.0 - (composition + whitespace) / 200.0) * 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::{analyze_colors, analyze_layout, analyze_structure};
    use crate::buffer::PixelBuffer;

    fn checker(w: u32, h: u32, cell: u32) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..h {
            for x in 0..w {
                let v = if (x / cell + y / cell) % 2 == 0 { 0 } else { 255 };
                data.extend_from_slice(&[v, v, v]);
            }
        }
        PixelBuffer::new(w, h, 3, data).unwrap()
    }

    #[test]
    fn flat_images_are_structurally_identical() {
        let a = analyze_structure(&PixelBuffer::filled(10, 10, [0, 0, 0])).unwrap();
        let b = analyze_structure(&PixelBuffer::filled(10, 10, [255, 255, 255])).unwrap();
        let s = structural_similarity(&a, &b);
        assert_eq!(s.edge_similarity, 100.0);
        assert_eq!(s.overall, 100.0);
    }

    #[test]
    fn busy_vs_flat_loses_edge_similarity() {
        let busy = analyze_structure(&checker(20, 20, 2)).unwrap();
        let flat = analyze_structure(&PixelBuffer::filled(20, 20, [0, 0, 0])).unwrap();
        let s = structural_similarity(&busy, &flat);
        assert_eq!(s.edge_similarity, 0.0);
        assert!(s.overall < 50.0);
    }

    #[test]
    fn identical_colors_score_100() {
        let p = analyze_colors(&PixelBuffer::filled(4, 4, [255, 0, 0]), 5).unwrap();
        let d = color_difference(&p, &p);
        assert_eq!(d.overall_similarity, 100.0);
        assert_eq!(d.brightness_difference, 0.0);
    }

    #[test]
    fn white_vs_black_brightness_delta() {
        let w = analyze_colors(&PixelBuffer::filled(10, 10, [255, 255, 255]), 5).unwrap();
        let b = analyze_colors(&PixelBuffer::filled(10, 10, [0, 0, 0]), 5).unwrap();
        let d = color_difference(&w, &b);
        assert_eq!(d.brightness_difference, 255.0);
        assert_eq!(d.contrast_difference, 0.0);
        assert!(d.overall_similarity < 40.0);
    }

    #[test]
    fn same_layout_scores_100() {
        let p = analyze_layout(&checker(30, 30, 5)).unwrap();
        let d = layout_difference(&p, &p);
        assert_eq!(d.layout_score, 100.0);
        assert_eq!(d.composition_difference, 0.0);
    }

    #[test]
    fn blank_vs_full_layout() {
        let white = analyze_layout(&PixelBuffer::filled(9, 9, [255, 255, 255])).unwrap();
        let gray = analyze_layout(&PixelBuffer::filled(9, 9, [100, 100, 100])).unwrap();
        let d = layout_difference(&white, &gray);
        assert_eq!(d.whitespace_difference, 100.0);
        assert!(d.layout_score < 50.0);
    }
}
