// src/record.rs
//! Caller-supplied subject/candidate records.
//!
//! These are plain data owned by the caller (in the surrounding system they
//! come from a persistence/API layer). The engine only reads them and hands
//! back new derived records. Serde defaults normalize missing upstream
//! fields to empty/zero so the core never sees partially-formed input.

use serde::{Deserialize, Serialize};

use crate::policy::Mode;

/// The subject of a ranking query: an AI product profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-text technology terms as entered by the user.
    #[serde(default)]
    pub technology: Vec<String>,
    /// Free-text purpose terms.
    #[serde(default)]
    pub purpose: Vec<String>,
}

/// A candidate for ranking: one recorded incident.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub risk_domain: String,
    /// Six-dimension quality vector; absent for unreviewed incidents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prism_scores: Option<PrismScores>,
}

/// Six bounded [0,1] sub-scores from the PRISM review framework.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PrismScores {
    #[serde(default)]
    pub logical_coherence: f32,
    #[serde(default)]
    pub factual_accuracy: f32,
    #[serde(default)]
    pub practical_implementability: f32,
    #[serde(default)]
    pub contextual_relevance: f32,
    #[serde(default)]
    pub impact: f32,
    #[serde(default)]
    pub exploitability: f32,
}

impl PrismScores {
    /// Dimension values in the fixed composite-weight order.
    pub(crate) fn as_array(&self) -> [f32; 6] {
        [
            self.logical_coherence,
            self.factual_accuracy,
            self.practical_implementability,
            self.contextual_relevance,
            self.impact,
            self.exploitability,
        ]
    }
}

/// A ranked incident: the candidate plus its attached score and the mode
/// it was scored under.
#[derive(Debug, Clone, Serialize)]
pub struct RankedIncident {
    #[serde(flatten)]
    pub incident: IncidentRecord,
    pub similarity_score: f32,
    pub mode: Mode,
}
