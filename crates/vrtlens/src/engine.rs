use std::path::Path;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analyze::ImageAnalysis;
use crate::buffer::{self, PixelBuffer};
use crate::compare::{self, ComparisonResult};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::insight::{Insights, generate_insights};

/// Full result for one reference/test pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub reference: ImageAnalysis,
    pub test: ImageAnalysis,
    pub comparison: ComparisonResult,
    pub insights: Insights,
}

/// Stateless pipeline: analyze both images, compare, grade.
///
/// Holds only configuration, so one engine can be shared across threads and
/// pairs processed in parallel.
#[derive(Debug, Clone, Default)]
pub struct VisualAnalysisEngine {
    config: EngineConfig,
}

impl VisualAnalysisEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn analyze(&self, buffer: &PixelBuffer) -> ImageAnalysis {
        ImageAnalysis::of(
            buffer,
            &self.config.analysis,
            self.config.colors.max_colors,
        )
    }

    /// Decode both files and compare them.
    ///
    /// A decode failure on either side is fatal, as is a comparison where no
    /// score could be computed; every other stage failure degrades the report.
    pub fn compare_files(
        &self,
        reference: &Path,
        test: &Path,
        output_dir: Option<&Path>,
    ) -> Result<Report> {
        let reference_buf = buffer::decode(reference)?;
        let test_buf = buffer::decode(test)?;
        self.compare(&reference_buf, &test_buf, output_dir)
    }

    pub fn compare(
        &self,
        reference: &PixelBuffer,
        test: &PixelBuffer,
        output_dir: Option<&Path>,
    ) -> Result<Report> {
        let start = Instant::now();
        debug!(
            reference = ?reference.dimensions(),
            test = ?test.dimensions(),
            "starting visual analysis"
        );

        let reference_analysis = self.analyze(reference);
        let test_analysis = self.analyze(test);
        let comparison = compare::compare(
            reference,
            test,
            &reference_analysis,
            &test_analysis,
            &self.config,
            output_dir,
        );
        let insights = generate_insights(&comparison)?;

        info!(
            score = insights.overall_score,
            grade = %insights.grade,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "visual analysis complete"
        );

        Ok(Report {
            reference: reference_analysis,
            test: test_analysis,
            comparison,
            insights,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisToggles;
    use crate::error::AnalysisError;
    use crate::insight::{Confidence, Grade};

    #[test]
    fn identical_red_squares_grade_a_plus() {
        let red = PixelBuffer::filled(4, 4, [255, 0, 0]);
        let report = VisualAnalysisEngine::default()
            .compare(&red, &red.clone(), None)
            .unwrap();
        let c = &report.comparison;
        assert_eq!(c.pixel_difference.unwrap().similarity, 100.0);
        assert_eq!(c.color_difference.unwrap().overall_similarity, 100.0);
        assert_eq!(report.insights.overall_score, 100.0);
        assert_eq!(report.insights.grade, Grade::APlus);
        assert_eq!(report.insights.confidence, Confidence::High);
        assert!(report.insights.specific_insights.is_empty());
    }

    #[test]
    fn white_vs_black_is_maximal() {
        let white = PixelBuffer::filled(10, 10, [255, 255, 255]);
        let black = PixelBuffer::filled(10, 10, [0, 0, 0]);
        let report = VisualAnalysisEngine::default()
            .compare(&white, &black, None)
            .unwrap();
        let c = &report.comparison;
        let p = c.pixel_difference.unwrap();
        assert_eq!(p.percentage_different, 100.0);
        assert!(p.similarity.abs() < 0.1);
        assert_eq!(c.color_difference.unwrap().brightness_difference, 255.0);
        assert_eq!(report.insights.grade, Grade::F);
    }

    #[test]
    fn mismatched_sizes_degrade_confidence() {
        let a = PixelBuffer::filled(100, 100, [40, 40, 40]);
        let b = PixelBuffer::filled(50, 50, [40, 40, 40]);
        let report = VisualAnalysisEngine::default().compare(&a, &b, None).unwrap();
        assert!(report.comparison.pixel_difference.is_none());
        assert!(report.comparison.color_difference.is_some());
        assert!(report.comparison.layout_difference.is_some());
        assert_eq!(report.insights.available_scores, 3);
        assert_eq!(report.insights.confidence, Confidence::Medium);
    }

    #[test]
    fn nothing_comparable_is_fatal() {
        let config = EngineConfig {
            analysis: AnalysisToggles {
                enable_structural_similarity: false,
                enable_color_analysis: false,
                enable_layout_analysis: false,
                ..AnalysisToggles::default()
            },
            ..EngineConfig::default()
        };
        let a = PixelBuffer::filled(10, 10, [0, 0, 0]);
        let b = PixelBuffer::filled(5, 5, [0, 0, 0]);
        let err = VisualAnalysisEngine::new(config)
            .compare(&a, &b, None)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoComparisons));
    }

    #[test]
    fn empty_images_are_fatal() {
        let empty = PixelBuffer::new(0, 0, 3, Vec::new()).unwrap();
        let err = VisualAnalysisEngine::default()
            .compare(&empty, &empty.clone(), None)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::NoComparisons));
    }

    #[test]
    fn compare_files_writes_difference_map() {
        let dir = tempfile::tempdir().unwrap();
        let ref_path = dir.path().join("reference.png");
        let test_path = dir.path().join("test.png");
        image::RgbImage::from_pixel(12, 12, image::Rgb([250, 250, 250]))
            .save(&ref_path)
            .unwrap();
        image::RgbImage::from_pixel(12, 12, image::Rgb([20, 20, 20]))
            .save(&test_path)
            .unwrap();

        let out = dir.path().join("out");
        let report = VisualAnalysisEngine::default()
            .compare_files(&ref_path, &test_path, Some(&out))
            .unwrap();
        let diff_map = report.comparison.diff_map.unwrap();
        assert!(diff_map.created);
        assert!(out.join(compare::diff_map::DIFF_MAP_FILE).exists());
    }

    #[test]
    fn undecodable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not-an-image.png");
        std::fs::write(&bogus, b"definitely not a png").unwrap();
        let err = VisualAnalysisEngine::default()
            .compare_files(&bogus, &bogus, None)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Decode { .. }));
    }

    #[test]
    fn report_serializes_camel_case() {
        let a = PixelBuffer::filled(6, 6, [9, 9, 9]);
        let report = VisualAnalysisEngine::default()
            .compare(&a, &a.clone(), None)
            .unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["comparison"]["pixelDifference"]["similarity"].is_number());
        assert_eq!(json["insights"]["grade"], "A+");
        assert!(json["reference"]["layout"]["ruleOfThirds"].is_string());
    }
}
