// src/explain.rs
//! Natural-language rationales for surfaced candidates.
//!
//! Pure formatting over already-computed signals: the brief style is one
//! sentence citing technology overlap and the risk domain, the detailed
//! style breaks out four quality dimensions with canned interpretations
//! picked by fixed score bands.

use std::fmt::Write as _;

use crate::policy::{self, ExplanationStyle, Mode};
use crate::record::{IncidentRecord, ProductProfile};
use crate::scoring::technology_overlap;

/// Returned verbatim when the detailed style has no quality vector to read.
const SCORES_UNAVAILABLE: &str = "PRISM scores not available for detailed analysis.";

/// Score bands shared by all interpretation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    High,
    Medium,
    Low,
}

fn band(score: f32) -> Band {
    if score >= 0.7 {
        Band::High
    } else if score >= 0.4 {
        Band::Medium
    } else {
        Band::Low
    }
}

/// The four dimensions surfaced in the detailed breakdown.
#[derive(Debug, Clone, Copy)]
enum Dimension {
    LogicalCoherence,
    FactualAccuracy,
    ContextualRelevance,
    Impact,
}

impl Dimension {
    fn label(&self) -> &'static str {
        match self {
            Dimension::LogicalCoherence => "Logical Coherence",
            Dimension::FactualAccuracy => "Factual Accuracy",
            Dimension::ContextualRelevance => "Contextual Relevance",
            Dimension::Impact => "Impact Scale",
        }
    }

    fn interpret(&self, score: f32) -> &'static str {
        match (self, band(score)) {
            (Dimension::LogicalCoherence, Band::High) => {
                "Incident report is well-structured and internally consistent"
            }
            (Dimension::LogicalCoherence, Band::Medium) => {
                "Some minor logical gaps but generally coherent"
            }
            (Dimension::LogicalCoherence, Band::Low) => {
                "Significant logical inconsistencies in the report"
            }
            (Dimension::FactualAccuracy, Band::High) => {
                "Technical details are verifiable and accurate"
            }
            (Dimension::FactualAccuracy, Band::Medium) => {
                "Most claims appear accurate with some uncertainties"
            }
            (Dimension::FactualAccuracy, Band::Low) => "Factual claims require verification",
            (Dimension::ContextualRelevance, Band::High) => {
                "Highly relevant to similar AI deployment contexts"
            }
            (Dimension::ContextualRelevance, Band::Medium) => {
                "Moderately relevant with some contextual similarities"
            }
            (Dimension::ContextualRelevance, Band::Low) => {
                "Limited contextual relevance to your use case"
            }
            (Dimension::Impact, Band::High) => "Demonstrates significant potential impact",
            (Dimension::Impact, Band::Medium) => "Shows moderate impact on stakeholders",
            (Dimension::Impact, Band::Low) => "Limited scope of demonstrated impact",
        }
    }
}

fn percent(score: f32) -> i32 {
    (score * 100.0).round() as i32
}

/// Render the explanation for `incident` in the style the mode's policy
/// dictates.
pub fn generate_explanation(
    product: &ProductProfile,
    incident: &IncidentRecord,
    mode: Mode,
) -> String {
    let policy = policy::resolve(mode);
    match policy.explanation_style {
        ExplanationStyle::Brief => {
            let overlap = technology_overlap(product, incident);
            format!(
                "This incident is relevant because it involves similar technologies \
                 ({}% overlap) and addresses {} risks that may apply to your product.",
                percent(overlap),
                incident.risk_domain.to_lowercase()
            )
        }
        ExplanationStyle::Detailed => {
            let Some(scores) = &incident.prism_scores else {
                return SCORES_UNAVAILABLE.to_string();
            };

            let lines = [
                (Dimension::LogicalCoherence, scores.logical_coherence),
                (Dimension::FactualAccuracy, scores.factual_accuracy),
                (Dimension::ContextualRelevance, scores.contextual_relevance),
                (Dimension::Impact, scores.impact),
            ];

            let mut out = String::from("PRISM Analysis:\n");
            for (dim, score) in lines {
                let _ = writeln!(
                    out,
                    "{}: {}% - {}",
                    dim.label(),
                    percent(score),
                    dim.interpret(score)
                );
            }
            out.push_str(
                "\nThis incident provides valuable insights for your product due to \
                 its strong performance across multiple PRISM dimensions.",
            );
            out
        }
    }
}
