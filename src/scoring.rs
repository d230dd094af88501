// src/scoring.rs
//! Similarity scoring between a product profile and incident candidates.
//!
//! Four elementary signals in [0,1] are combined by the active policy's
//! algorithm (cosine / dense / hybrid). The elementary signals work on the
//! raw term lists; the taxonomy enters only through the six-dimension
//! quality composite carried by reviewed incidents.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::policy::{self, Algorithm, Mode, ScoringPolicy};
use crate::record::{IncidentRecord, ProductProfile, RankedIncident};

/// Fixed reference purpose vocabulary for the alignment signal.
///
/// TODO: score against the incident's own declared purposes once the
/// reference-set question is settled upstream; until then this placeholder
/// set is the contract.
const REFERENCE_PURPOSES: [&str; 4] = ["classification", "prediction", "generation", "recommendation"];

/// Risk domains that count as a full match; anything else gets the floor.
const RISK_DOMAIN_ALLOWLIST: [&str; 4] = ["safety", "privacy", "security", "ethics"];

/// Residual-uncertainty floor for unmatched risk domains — never exactly 0.
const RISK_DOMAIN_FLOOR: f32 = 0.3;

/// Composite weights over the six quality dimensions, in
/// [`crate::record::PrismScores::as_array`] order. Contextual relevance and
/// impact carry the most weight. Must sum to 1.0.
const PRISM_WEIGHTS: [f32; 6] = [0.15, 0.15, 0.15, 0.25, 0.25, 0.05];

/// Dense algorithm: boost applied when the quality composite exceeds the
/// floor — strong structured signal raises confidence in the rest.
const SEMANTIC_BOOST: f32 = 1.2;
const SEMANTIC_BOOST_FLOOR: f32 = 0.7;

/// Soft penalty multiplier for scores below the confidence threshold.
const BELOW_THRESHOLD_PENALTY: f32 = 0.5;

/// One-shot contract check: mis-calibrated composite weights should be loud,
/// not silently wrong.
static PRISM_WEIGHT_CHECK: Lazy<()> = Lazy::new(|| {
    let sum: f32 = PRISM_WEIGHTS.iter().sum();
    if (sum - 1.0).abs() > 1e-6 {
        warn!(
            target: "scoring",
            sum,
            "PRISM composite weights do not sum to 1.0"
        );
    }
});

/// Case-folded Jaccard similarity; 0 when the union is empty.
fn jaccard<'a, A, B>(a: A, b: B) -> f32
where
    A: IntoIterator<Item = &'a str>,
    B: IntoIterator<Item = &'a str>,
{
    let sa: HashSet<String> = a.into_iter().map(str::to_lowercase).collect();
    let sb: HashSet<String> = b.into_iter().map(str::to_lowercase).collect();
    let union = sa.union(&sb).count();
    if union == 0 {
        return 0.0;
    }
    sa.intersection(&sb).count() as f32 / union as f32
}

/// Jaccard over the two technology term lists.
pub fn technology_overlap(product: &ProductProfile, incident: &IncidentRecord) -> f32 {
    jaccard(
        product.technology.iter().map(String::as_str),
        incident.technologies.iter().map(String::as_str),
    )
}

/// Jaccard between the product's purposes and the fixed reference
/// vocabulary. The incident's declared purposes are not consulted.
pub fn purpose_alignment(product: &ProductProfile) -> f32 {
    jaccard(
        product.purpose.iter().map(String::as_str),
        REFERENCE_PURPOSES.iter().copied(),
    )
}

/// 1.0 for allow-listed risk domains, otherwise the fixed floor.
pub fn risk_domain_match(incident: &IncidentRecord) -> f32 {
    let domain = incident.risk_domain.to_lowercase();
    if RISK_DOMAIN_ALLOWLIST.contains(&domain.as_str()) {
        1.0
    } else {
        RISK_DOMAIN_FLOOR
    }
}

/// Weighted average of the six quality dimensions; 0 without a vector.
pub fn prism_composite(incident: &IncidentRecord) -> f32 {
    Lazy::force(&PRISM_WEIGHT_CHECK);
    match &incident.prism_scores {
        Some(scores) => scores
            .as_array()
            .iter()
            .zip(PRISM_WEIGHTS.iter())
            .map(|(s, w)| s * w)
            .sum(),
        None => 0.0,
    }
}

fn cosine_score(product: &ProductProfile, incident: &IncidentRecord, policy: &ScoringPolicy) -> f32 {
    let w = &policy.weights;
    technology_overlap(product, incident) * w.technology_overlap
        + purpose_alignment(product) * w.purpose_alignment
        + risk_domain_match(incident) * w.risk_domain_match
}

fn dense_score(product: &ProductProfile, incident: &IncidentRecord, policy: &ScoringPolicy) -> f32 {
    let w = &policy.weights;
    let composite = prism_composite(incident);
    let boost = if composite > SEMANTIC_BOOST_FLOOR {
        SEMANTIC_BOOST
    } else {
        1.0
    };
    (technology_overlap(product, incident) * w.technology_overlap
        + purpose_alignment(product) * w.purpose_alignment
        + risk_domain_match(incident) * w.risk_domain_match
        + composite * w.quality_composite)
        * boost
}

/// Pure dispatch over the policy's algorithm variant.
fn composite_score(
    product: &ProductProfile,
    incident: &IncidentRecord,
    policy: &ScoringPolicy,
) -> f32 {
    match policy.algorithm {
        Algorithm::Cosine => cosine_score(product, incident, policy),
        Algorithm::Dense => dense_score(product, incident, policy),
        Algorithm::Hybrid {
            cosine_share,
            dense_share,
        } => {
            cosine_score(product, incident, policy) * cosine_share
                + dense_score(product, incident, policy) * dense_share
        }
    }
}

/// Score one candidate under `mode`.
///
/// Scores at or above the policy's confidence threshold pass through
/// unchanged; anything below is halved rather than dropped, so weak
/// candidates stay orderable but sink.
pub fn calculate_similarity(
    product: &ProductProfile,
    incident: &IncidentRecord,
    mode: Mode,
) -> f32 {
    let policy = policy::resolve(mode);
    let raw = composite_score(product, incident, policy);
    let score = if raw >= policy.confidence_threshold {
        raw
    } else {
        raw * BELOW_THRESHOLD_PENALTY
    };
    debug!(
        target: "scoring",
        %mode,
        raw,
        score,
        incident = %incident.title,
        "similarity computed"
    );
    score
}

/// Score, filter, rank, and cap a candidate list under `mode`.
///
/// This is the stricter use of the confidence threshold: candidates whose
/// composite falls below it are excluded outright (the soft penalty inside
/// [`calculate_similarity`] only ever produces sub-threshold scores for
/// them, so the retain test removes exactly those). The sort is stable —
/// equal scores keep their input order.
pub fn filter_and_rank(
    product: &ProductProfile,
    incidents: &[IncidentRecord],
    mode: Mode,
) -> Vec<RankedIncident> {
    let policy = policy::resolve(mode);

    let mut ranked: Vec<RankedIncident> = incidents
        .iter()
        .map(|incident| RankedIncident {
            incident: incident.clone(),
            similarity_score: calculate_similarity(product, incident, mode),
            mode,
        })
        .collect();

    ranked.retain(|r| r.similarity_score >= policy.confidence_threshold);
    ranked.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    ranked.truncate(policy.max_results);

    debug!(
        target: "scoring",
        %mode,
        candidates = incidents.len(),
        surfaced = ranked.len(),
        "filter and rank"
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PrismScores;

    fn product(techs: &[&str], purposes: &[&str]) -> ProductProfile {
        ProductProfile {
            name: "Test Product".into(),
            technology: techs.iter().map(|s| s.to_string()).collect(),
            purpose: purposes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn incident(techs: &[&str], risk_domain: &str, prism: Option<PrismScores>) -> IncidentRecord {
        IncidentRecord {
            title: "Test Incident".into(),
            technologies: techs.iter().map(|s| s.to_string()).collect(),
            risk_domain: risk_domain.into(),
            prism_scores: prism,
            ..Default::default()
        }
    }

    fn uniform_prism(v: f32) -> PrismScores {
        PrismScores {
            logical_coherence: v,
            factual_accuracy: v,
            practical_implementability: v,
            contextual_relevance: v,
            impact: v,
            exploitability: v,
        }
    }

    #[test]
    fn jaccard_empty_union_is_zero() {
        let p = product(&[], &[]);
        let i = incident(&[], "bias", None);
        assert!((technology_overlap(&p, &i) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn technology_overlap_case_folds() {
        let p = product(&["Machine Learning"], &[]);
        let i = incident(&["machine learning", "API"], "bias", None);
        assert!((technology_overlap(&p, &i) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn risk_domain_floor_never_zero() {
        let hit = incident(&[], "Privacy", None);
        let miss = incident(&[], "weather", None);
        assert!((risk_domain_match(&hit) - 1.0).abs() < 1e-6);
        assert!((risk_domain_match(&miss) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn composite_weights_sum_to_one() {
        let sum: f32 = PRISM_WEIGHTS.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_prism_vector_averages_to_itself() {
        let i = incident(&[], "safety", Some(uniform_prism(0.8)));
        assert!((prism_composite(&i) - 0.8).abs() < 1e-6);
        let none = incident(&[], "safety", None);
        assert!((prism_composite(&none) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn dense_boost_fires_above_floor() {
        let p = product(&[], &[]);
        let strong = incident(&[], "weather", Some(uniform_prism(0.8)));
        let weak = incident(&[], "weather", Some(uniform_prism(0.6)));
        let policy = policy::resolve(Mode::Prism);
        // weak: 0.3*0.1 + 0.6*0.5 = 0.33; strong: (0.3*0.1 + 0.8*0.5) * 1.2
        assert!((dense_score(&p, &weak, policy) - 0.33).abs() < 1e-6);
        assert!((dense_score(&p, &strong, policy) - 0.43 * 1.2).abs() < 1e-6);
    }

    #[test]
    fn cosine_ignores_composite_weight() {
        let p = product(&[], &[]);
        let with_prism = incident(&[], "weather", Some(uniform_prism(0.9)));
        let without = incident(&[], "weather", None);
        let policy = policy::resolve(Mode::Generic);
        assert!(
            (cosine_score(&p, &with_prism, policy) - cosine_score(&p, &without, policy)).abs()
                < 1e-6
        );
    }

    #[test]
    fn soft_penalty_halves_below_threshold() {
        let p = product(&[], &[]);
        let i = incident(&[], "weather", None);
        // generic: cosine = 0.3*0.2 = 0.06, dense identical (no purposes, no
        // prism), hybrid = 0.06; below 0.5 -> 0.03.
        let s = calculate_similarity(&p, &i, Mode::Generic);
        assert!((s - 0.03).abs() < 1e-6);
    }
}
