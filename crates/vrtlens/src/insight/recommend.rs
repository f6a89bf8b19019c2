use serde::{Deserialize, Serialize};

use crate::config::Thresholds;
use crate::suite::Tally;

/// Failed share of a suite above which process-level advice is added.
const LONG_TERM_FAILURE_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_time: String,
    pub impact: String,
}

impl Recommendation {
    fn new(
        title: &str,
        description: String,
        priority: Priority,
        estimated_time: &str,
        impact: &str,
    ) -> Self {
        Self {
            title: title.to_string(),
            description,
            priority,
            estimated_time: estimated_time.to_string(),
            impact: impact.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub immediate: Vec<Recommendation>,
    pub short_term: Vec<Recommendation>,
    pub long_term: Vec<Recommendation>,
    pub preventive: Vec<Recommendation>,
}

/// Bucket remediation advice by urgency for a whole result set.
pub fn recommend(tally: &Tally, thresholds: &Thresholds) -> Recommendations {
    let mut out = Recommendations::default();

    if tally.critical > 0 {
        out.immediate.push(Recommendation::new(
            "Fix critical visual regressions",
            format!(
                "{} scenario(s) differ by more than {}% of pixels. Review their difference maps before release.",
                tally.critical, thresholds.critical
            ),
            Priority::Critical,
            "1-2 hours",
            "Prevents visibly broken UI from shipping",
        ));
    }

    if tally.warning > 0 {
        out.short_term.push(Recommendation::new(
            "Review moderate differences",
            format!(
                "{} scenario(s) differ by {}-{}% of pixels. Confirm whether the changes are intended and approve or fix them.",
                tally.warning, thresholds.warning, thresholds.critical
            ),
            Priority::High,
            "30-60 minutes",
            "Keeps references in sync with intended design",
        ));
    }

    if tally.total > 0 && tally.failed() as f64 / tally.total as f64 > LONG_TERM_FAILURE_RATIO {
        out.long_term.push(Recommendation::new(
            "Stabilise the visual test suite",
            format!(
                "{} of {} scenarios failed. Look for shared causes such as fonts, animations or dynamic content, and consider hiding volatile regions.",
                tally.failed(),
                tally.total
            ),
            Priority::Medium,
            "1-2 days",
            "Reduces false positives and review fatigue",
        ));
    }

    out.preventive.push(Recommendation::new(
        "Set up continuous visual testing",
        "Run visual comparisons on every pull request so regressions are caught before merge."
            .to_string(),
        Priority::Low,
        "2-4 hours",
        "Catches regressions early",
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_suite_only_gets_preventive_advice() {
        let tally = Tally {
            total: 10,
            passed: 10,
            ..Tally::default()
        };
        let r = recommend(&tally, &Thresholds::default());
        assert!(r.immediate.is_empty());
        assert!(r.short_term.is_empty());
        assert!(r.long_term.is_empty());
        assert_eq!(r.preventive.len(), 1);
        assert_eq!(r.preventive[0].title, "Set up continuous visual testing");
    }

    #[test]
    fn critical_and_warning_buckets() {
        let tally = Tally {
            total: 20,
            passed: 18,
            critical: 1,
            warning: 1,
            ..Tally::default()
        };
        let r = recommend(&tally, &Thresholds::default());
        assert_eq!(r.immediate.len(), 1);
        assert_eq!(r.immediate[0].priority, Priority::Critical);
        assert_eq!(r.short_term.len(), 1);
        // 2 of 20 failed: 10%, below the long-term bar.
        assert!(r.long_term.is_empty());
    }

    #[test]
    fn widespread_failures_trigger_long_term() {
        let tally = Tally {
            total: 10,
            passed: 7,
            warning: 2,
            errored: 1,
            ..Tally::default()
        };
        let r = recommend(&tally, &Thresholds::default());
        assert_eq!(r.long_term.len(), 1);
    }

    #[test]
    fn exactly_twenty_percent_is_not_long_term() {
        let tally = Tally {
            total: 10,
            passed: 8,
            critical: 2,
            ..Tally::default()
        };
        assert!(recommend(&tally, &Thresholds::default()).long_term.is_empty());
    }
}
