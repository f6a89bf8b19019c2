//! Analysis of a whole result set: many reference/test pairs at once.

pub mod plan;
pub mod runner;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::buffer::round1;
use crate::config::Thresholds;
use crate::engine::{Report, VisualAnalysisEngine};
use crate::insight::{Category, Grade};
use crate::insight::recommend::{Recommendations, recommend};

pub use self::plan::{PairJob, SuitePlan};
pub use self::runner::analyze_all;

/// Where a pair falls relative to the mismatch thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    Pass,
    Minor,
    Warning,
    Critical,
    Error,
}

impl PairStatus {
    /// Classify by percentage of differing pixels.
    ///
    /// Changed dimensions make the pixel comparison impossible and count as
    /// critical. When the pixel stage is switched off the grade decides.
    pub fn of(report: &Report, thresholds: &Thresholds) -> Self {
        let c = &report.comparison;
        if c.dimension_mismatch.is_some() {
            return Self::Critical;
        }
        let Some(p) = c.pixel_difference else {
            return Self::from_grade(report.insights.grade);
        };
        let pct = p.percentage_different;
        if pct > thresholds.critical {
            Self::Critical
        } else if pct > thresholds.warning {
            Self::Warning
        } else if pct > thresholds.minor {
            Self::Minor
        } else {
            Self::Pass
        }
    }

    fn from_grade(grade: Grade) -> Self {
        match grade {
            Grade::APlus | Grade::A => Self::Pass,
            Grade::B => Self::Minor,
            Grade::C | Grade::D => Self::Warning,
            Grade::F => Self::Critical,
        }
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Warning | Self::Critical | Self::Error)
    }
}

/// Result for one pair. `report` is absent when analysis failed outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairOutcome {
    pub id: String,
    pub status: PairStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Analyse one pair synchronously. Difference maps go to `output_dir/difference/<id>/`.
pub fn run_pair(
    engine: &VisualAnalysisEngine,
    job: &PairJob,
    output_dir: Option<&Path>,
) -> PairOutcome {
    let diff_dir = output_dir.map(|d| d.join("difference").join(&job.id));
    match engine.compare_files(&job.reference, &job.test, diff_dir.as_deref()) {
        Ok(report) => PairOutcome {
            id: job.id.clone(),
            status: PairStatus::of(&report, &engine.config().thresholds),
            report: Some(report),
            error: None,
        },
        Err(e) => PairOutcome {
            id: job.id.clone(),
            status: PairStatus::Error,
            report: None,
            error: Some(e.to_string()),
        },
    }
}

/// Pair counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    pub total: usize,
    pub passed: usize,
    pub minor: usize,
    pub warning: usize,
    pub critical: usize,
    pub errored: usize,
}

impl Tally {
    pub fn add(&mut self, status: PairStatus) {
        self.total += 1;
        match status {
            PairStatus::Pass => self.passed += 1,
            PairStatus::Minor => self.minor += 1,
            PairStatus::Warning => self.warning += 1,
            PairStatus::Critical => self.critical += 1,
            PairStatus::Error => self.errored += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.warning + self.critical + self.errored
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteSummary {
    #[serde(flatten)]
    pub tally: Tally,
    pub failed: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_score: Option<f64>,
    pub categories: BTreeMap<Category, usize>,
    pub missing: Vec<String>,
    pub new: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    pub summary: SuiteSummary,
    pub recommendations: Recommendations,
    pub results: Vec<PairOutcome>,
}

impl SuiteReport {
    /// Aggregate per-pair outcomes. Results are sorted by ID for stable output.
    pub fn build(
        mut results: Vec<PairOutcome>,
        missing: Vec<String>,
        new: Vec<String>,
        thresholds: &Thresholds,
    ) -> Self {
        results.sort_by(|a, b| a.id.cmp(&b.id));

        let mut tally = Tally::default();
        let mut categories = BTreeMap::new();
        let mut scores = Vec::new();
        for r in &results {
            tally.add(r.status);
            if let Some(report) = &r.report {
                scores.push(report.insights.overall_score);
                for insight in &report.insights.specific_insights {
                    *categories.entry(insight.category).or_insert(0) += 1;
                }
            }
        }
        let average_score =
            (!scores.is_empty()).then(|| round1(scores.iter().sum::<f64>() / scores.len() as f64));

        Self {
            summary: SuiteSummary {
                failed: tally.failed(),
                tally,
                average_score,
                categories,
                missing,
                new,
            },
            recommendations: recommend(&tally, thresholds),
            results,
        }
    }
}
