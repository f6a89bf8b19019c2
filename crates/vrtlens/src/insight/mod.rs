//! Scoring, grading and rule-based insights for a single comparison.

pub mod grade;
pub mod recommend;

use serde::{Deserialize, Serialize};

use crate::buffer::round1;
use crate::compare::ComparisonResult;
use crate::error::{AnalysisError, Result};
use crate::regions::RegionKind;

pub use self::grade::{Confidence, Grade};
pub use self::recommend::{Priority, Recommendation, Recommendations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pixel,
    Structure,
    Color,
    Layout,
    Typography,
    Imagery,
}

impl Category {
    /// Fixed remediation advice per category.
    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Pixel => {
                "Review the difference map for unintended rendering changes and update the reference if intended"
            }
            Self::Structure => "Check for added, removed or reshaped components and edges",
            Self::Color => "Verify theme variables, colour tokens and image assets",
            Self::Layout => "Inspect spacing, alignment and responsive breakpoints",
            Self::Typography => "Check font loading, font sizes and text content",
            Self::Imagery => "Confirm images and media load identically in both runs",
        }
    }
}

impl From<RegionKind> for Category {
    fn from(kind: RegionKind) -> Self {
        match kind {
            RegionKind::Layout => Self::Layout,
            RegionKind::Typography => Self::Typography,
            RegionKind::Imagery => Self::Imagery,
            RegionKind::Color => Self::Color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub category: Category,
    pub severity: Severity,
    pub message: String,
    pub recommendation: String,
}

impl Insight {
    fn new(category: Category, severity: Severity, message: String) -> Self {
        Self {
            category,
            severity,
            message,
            recommendation: category.recommendation().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub overall_score: f64,
    pub grade: Grade,
    pub grade_description: String,
    pub confidence: Confidence,
    pub available_scores: usize,
    pub specific_insights: Vec<Insight>,
}

/// Grade a comparison and derive threshold-triggered insights.
///
/// Fails with `NoComparisons` when none of the four headline scores exist.
pub fn generate_insights(comparison: &ComparisonResult) -> Result<Insights> {
    let scores: Vec<f64> = comparison.scores().into_iter().flatten().collect();
    if scores.is_empty() {
        return Err(AnalysisError::NoComparisons);
    }
    let overall_score = round1(scores.iter().sum::<f64>() / scores.len() as f64);
    let grade = Grade::from_score(overall_score);

    Ok(Insights {
        overall_score,
        grade,
        grade_description: grade.description().to_string(),
        confidence: Confidence::from_available(scores.len()),
        available_scores: scores.len(),
        specific_insights: specific_insights(comparison),
    })
}

fn specific_insights(c: &ComparisonResult) -> Vec<Insight> {
    let mut out = Vec::new();

    if let Some(p) = &c.pixel_difference
        && p.percentage_different > 5.0
    {
        let severity = if p.percentage_different > 15.0 {
            Severity::High
        } else {
            Severity::Medium
        };
        out.push(Insight::new(
            Category::Pixel,
            severity,
            format!("{}% of pixels differ from the reference", p.percentage_different),
        ));
    }

    if let Some(s) = &c.structural_similarity
        && s.overall < 80.0
    {
        out.push(Insight::new(
            Category::Structure,
            if s.overall < 60.0 {
                Severity::High
            } else {
                Severity::Medium
            },
            format!("Structural similarity is {}%", s.overall),
        ));
    }

    if let Some(col) = &c.color_difference {
        if col.brightness_difference > 30.0 {
            out.push(Insight::new(
                Category::Color,
                Severity::Medium,
                format!("Brightness shifted by {}", col.brightness_difference),
            ));
        }
        if col.contrast_difference > 40.0 {
            out.push(Insight::new(
                Category::Color,
                Severity::Medium,
                format!("Contrast shifted by {}", col.contrast_difference),
            ));
        }
    }

    if let Some(l) = &c.layout_difference
        && l.layout_score < 80.0
    {
        out.push(Insight::new(
            Category::Layout,
            if l.layout_score < 60.0 {
                Severity::High
            } else {
                Severity::Medium
            },
            format!("Layout score is {}", l.layout_score),
        ));
    }

    for (&kind, &count) in &c.region_summary {
        out.push(Insight::new(
            kind.into(),
            Severity::Low,
            format!("{count} changed {} region(s) detected", kind.label()),
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{ColorDifference, LayoutDifference, PixelDifference, StructuralSimilarity};

    fn pixel(similarity: f64, percentage_different: f64) -> PixelDifference {
        PixelDifference {
            average_distance: 0.0,
            different_pixels: 0,
            total_pixels: 100,
            percentage_different,
            similarity,
        }
    }

    fn structural(overall: f64) -> StructuralSimilarity {
        StructuralSimilarity {
            edge_similarity: overall,
            complexity_similarity: overall,
            overall,
        }
    }

    fn color(overall: f64, brightness: f64, contrast: f64) -> ColorDifference {
        ColorDifference {
            dominant_color_similarity: overall,
            brightness_difference: brightness,
            contrast_difference: contrast,
            overall_similarity: overall,
        }
    }

    fn layout(score: f64) -> LayoutDifference {
        LayoutDifference {
            composition_difference: 0.0,
            whitespace_difference: 0.0,
            balance_difference: 0.0,
            layout_score: score,
        }
    }

    fn full(p: f64, s: f64, c: f64, l: f64) -> ComparisonResult {
        ComparisonResult {
            pixel_difference: Some(pixel(p, 0.0)),
            structural_similarity: Some(structural(s)),
            color_difference: Some(color(c, 0.0, 0.0)),
            layout_difference: Some(layout(l)),
            ..ComparisonResult::default()
        }
    }

    #[test]
    fn score_of_exactly_90_is_a() {
        let i = generate_insights(&full(90.0, 90.0, 90.0, 90.0)).unwrap();
        assert_eq!(i.overall_score, 90.0);
        assert_eq!(i.grade, Grade::A);
        assert_eq!(i.confidence, Confidence::High);
    }

    #[test]
    fn score_of_exactly_95_is_a_plus() {
        let i = generate_insights(&full(100.0, 90.0, 95.0, 95.0)).unwrap();
        assert_eq!(i.overall_score, 95.0);
        assert_eq!(i.grade, Grade::APlus);
    }

    #[test]
    fn missing_scores_reduce_confidence() {
        let c = ComparisonResult {
            color_difference: Some(color(80.0, 0.0, 0.0)),
            layout_difference: Some(layout(60.0)),
            ..ComparisonResult::default()
        };
        let i = generate_insights(&c).unwrap();
        assert_eq!(i.overall_score, 70.0);
        assert_eq!(i.confidence, Confidence::Medium);
        assert_eq!(i.available_scores, 2);

        let c = ComparisonResult {
            layout_difference: Some(layout(60.0)),
            ..ComparisonResult::default()
        };
        assert_eq!(generate_insights(&c).unwrap().confidence, Confidence::Low);
    }

    #[test]
    fn nothing_to_score_is_an_error() {
        let err = generate_insights(&ComparisonResult::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoComparisons));
    }

    #[test]
    fn pixel_insight_severity_bands() {
        let mut c = ComparisonResult {
            pixel_difference: Some(pixel(90.0, 8.0)),
            ..ComparisonResult::default()
        };
        let i = generate_insights(&c).unwrap();
        assert_eq!(i.specific_insights.len(), 1);
        assert_eq!(i.specific_insights[0].category, Category::Pixel);
        assert_eq!(i.specific_insights[0].severity, Severity::Medium);

        c.pixel_difference = Some(pixel(70.0, 20.0));
        let i = generate_insights(&c).unwrap();
        assert_eq!(i.specific_insights[0].severity, Severity::High);

        c.pixel_difference = Some(pixel(99.0, 5.0));
        assert!(generate_insights(&c).unwrap().specific_insights.is_empty());
    }

    #[test]
    fn color_and_layout_rules() {
        let c = ComparisonResult {
            color_difference: Some(color(60.0, 31.0, 41.0)),
            layout_difference: Some(layout(55.0)),
            ..ComparisonResult::default()
        };
        let i = generate_insights(&c).unwrap();
        let color_count = i
            .specific_insights
            .iter()
            .filter(|x| x.category == Category::Color)
            .count();
        assert_eq!(color_count, 2);
        let layout = i
            .specific_insights
            .iter()
            .find(|x| x.category == Category::Layout)
            .unwrap();
        assert_eq!(layout.severity, Severity::High);
        assert_eq!(layout.recommendation, Category::Layout.recommendation());
    }

    #[test]
    fn regions_produce_low_severity_insights() {
        let mut c = full(100.0, 100.0, 100.0, 100.0);
        c.region_summary.insert(RegionKind::Typography, 3);
        let i = generate_insights(&c).unwrap();
        assert_eq!(i.specific_insights.len(), 1);
        assert_eq!(i.specific_insights[0].category, Category::Typography);
        assert_eq!(i.specific_insights[0].severity, Severity::Low);
        assert!(i.specific_insights[0].message.starts_with("3 changed typography"));
    }
}
