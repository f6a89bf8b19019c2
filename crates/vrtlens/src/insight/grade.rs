use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 95.0 => Self::APlus,
            s if s >= 90.0 => Self::A,
            s if s >= 80.0 => Self::B,
            s if s >= 70.0 => Self::C,
            s if s >= 60.0 => Self::D,
            _ => Self::F,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::APlus => "Excellent - virtually identical to the reference",
            Self::A => "Very good - only minor differences",
            Self::B => "Good - noticeable but acceptable differences",
            Self::C => "Fair - significant differences worth reviewing",
            Self::D => "Poor - major visual differences",
            Self::F => "Failing - substantially different from the reference",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(s)
    }
}

/// How many of the four headline scores backed the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_available(n: usize) -> Self {
        match n {
            4.. => Self::High,
            2..=3 => Self::Medium,
            _ => Self::Low,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(Grade::from_score(95.0), Grade::APlus);
        assert_eq!(Grade::from_score(94.99), Grade::A);
        assert_eq!(Grade::from_score(90.0), Grade::A);
        assert_eq!(Grade::from_score(80.0), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::D);
        assert_eq!(Grade::from_score(59.9), Grade::F);
        assert_eq!(Grade::from_score(100.0), Grade::APlus);
    }

    #[test]
    fn a_plus_serializes_with_symbol() {
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        assert_eq!(Grade::APlus.to_string(), "A+");
    }

    #[test]
    fn confidence_by_available_scores() {
        assert_eq!(Confidence::from_available(4), Confidence::High);
        assert_eq!(Confidence::from_available(3), Confidence::Medium);
        assert_eq!(Confidence::from_available(2), Confidence::Medium);
        assert_eq!(Confidence::from_available(1), Confidence::Low);
        assert_eq!(Confidence::from_available(0), Confidence::Low);
    }
}
