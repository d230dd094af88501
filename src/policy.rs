// src/policy.rs
//! Scoring policies ("modes"): a closed, build-time table.
//!
//! A mode bundles the composite algorithm, per-signal weights, confidence
//! threshold, explanation style, and result cap. Modes are a closed set, so
//! the registry is total over [`Mode`]; only the string boundary can fail,
//! and it fails fast — a caller asking for an unknown mode is a programming
//! error, not a user-facing condition.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Named scoring policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Generic,
    Prism,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Generic => "generic",
            Mode::Prism => "prism",
        }
    }

    /// Human blurb shown next to the mode toggle.
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Generic => {
                "Balanced approach combining multiple factors including technology, \
                 purpose, and basic risk assessment. Good for general insights."
            }
            Mode::Prism => {
                "Advanced analysis using comprehensive PRISM framework evaluation. \
                 Slower but provides deep, structured insights into incident \
                 transferability."
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Mode::Generic),
            "prism" => Ok(Mode::Prism),
            other => bail!("unknown scoring mode `{other}`"),
        }
    }
}

/// Composite algorithm selected by a policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    /// Weighted sum over the three elementary signals; the composite-quality
    /// weight is ignored even when the policy carries one.
    Cosine,
    /// All four signals, then a semantic boost when the quality composite is
    /// strong.
    Dense,
    /// Blend of the two, shares summing to 1; dense dominates.
    Hybrid { cosine_share: f32, dense_share: f32 },
}

/// Per-signal weights. The vector is not normalized and the branches consume
/// it differently (see [`Algorithm`]); sums other than 1 are allowed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalWeights {
    pub technology_overlap: f32,
    pub purpose_alignment: f32,
    pub risk_domain_match: f32,
    pub quality_composite: f32,
}

/// How explanations are rendered for results surfaced under a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationStyle {
    Brief,
    Detailed,
}

/// One mode's full configuration. Read-only process-wide constants.
#[derive(Debug, Clone, Copy)]
pub struct ScoringPolicy {
    pub algorithm: Algorithm,
    pub weights: SignalWeights,
    pub confidence_threshold: f32,
    pub explanation_style: ExplanationStyle,
    pub max_results: usize,
}

static GENERIC: ScoringPolicy = ScoringPolicy {
    algorithm: Algorithm::Hybrid {
        cosine_share: 0.4,
        dense_share: 0.6,
    },
    weights: SignalWeights {
        technology_overlap: 0.4,
        purpose_alignment: 0.3,
        risk_domain_match: 0.2,
        quality_composite: 0.1,
    },
    confidence_threshold: 0.5,
    explanation_style: ExplanationStyle::Brief,
    max_results: 10,
};

static PRISM: ScoringPolicy = ScoringPolicy {
    algorithm: Algorithm::Dense,
    weights: SignalWeights {
        technology_overlap: 0.2,
        purpose_alignment: 0.2,
        risk_domain_match: 0.1,
        quality_composite: 0.5,
    },
    confidence_threshold: 0.6,
    explanation_style: ExplanationStyle::Detailed,
    max_results: 10,
};

/// Resolve a mode to its policy. Total; there is no fallback policy.
pub fn resolve(mode: Mode) -> &'static ScoringPolicy {
    match mode {
        Mode::Generic => &GENERIC,
        Mode::Prism => &PRISM,
    }
}
