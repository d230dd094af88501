// src/taxonomy/quality.rs
//! Quality critique of a subject's own term lists.
//!
//! Independent consumer of the matcher: instead of ranking candidates it
//! checks how well a product's technology/purpose terms line up with the
//! curated vocabulary and proposes canonical replacements.

use serde::Serialize;

use super::matcher::{match_term, MatchType, TaxonomyMatch};
use super::{TaxonomyGraph, Universe};

/// A best match only becomes a suggestion above this score.
const SUGGESTION_MIN_SCORE: f32 = 0.7;

/// Matches fetched per term when looking for suggestions.
const SUGGESTION_CANDIDATES: usize = 3;

/// Outcome of [`suggest_improvements`].
#[derive(Debug, Serialize)]
pub struct TermQualityReport<'a> {
    /// Replace-with-canonical-name suggestions for technology terms.
    pub technology_suggestions: Vec<TaxonomyMatch<'a>>,
    /// Same, for purpose terms.
    pub purpose_suggestions: Vec<TaxonomyMatch<'a>>,
    /// Average of the two per-universe best-match averages, in [0,1].
    /// An empty term list contributes 0 to its half, so a subject with no
    /// purposes scores at most 0.5 no matter how clean its technology list
    /// is. Missing categorization is itself a quality defect.
    pub quality_score: f32,
}

/// Critique `technologies` and `purposes` against the taxonomy.
pub fn suggest_improvements<'a>(
    graph: &'a TaxonomyGraph,
    technologies: &[String],
    purposes: &[String],
) -> TermQualityReport<'a> {
    let technology_suggestions = collect_suggestions(graph, technologies, Universe::Technology);
    let purpose_suggestions = collect_suggestions(graph, purposes, Universe::Purpose);

    let tech_quality = average_best_score(graph, technologies, Universe::Technology);
    let purpose_quality = average_best_score(graph, purposes, Universe::Purpose);
    let quality_score = (tech_quality + purpose_quality) / 2.0;

    tracing::debug!(
        target: "taxonomy",
        tech_terms = technologies.len(),
        purpose_terms = purposes.len(),
        quality = quality_score,
        "term quality report"
    );

    TermQualityReport {
        technology_suggestions,
        purpose_suggestions,
        quality_score,
    }
}

/// A term's best match is worth suggesting when it exists, is not already
/// exact, and clears the score floor.
fn collect_suggestions<'a>(
    graph: &'a TaxonomyGraph,
    terms: &[String],
    universe: Universe,
) -> Vec<TaxonomyMatch<'a>> {
    let mut out = Vec::new();
    for term in terms {
        let matches = match_term(graph, term, universe, SUGGESTION_CANDIDATES);
        if let Some(best) = matches.into_iter().next() {
            if best.match_type != MatchType::Exact && best.score > SUGGESTION_MIN_SCORE {
                out.push(best);
            }
        }
    }
    out
}

/// Average top-1 match score over `terms`; 0 for an empty list.
fn average_best_score(graph: &TaxonomyGraph, terms: &[String], universe: Universe) -> f32 {
    if terms.is_empty() {
        return 0.0;
    }
    let sum: f32 = terms
        .iter()
        .map(|t| {
            match_term(graph, t, universe, 1)
                .first()
                .map(|m| m.score)
                .unwrap_or(0.0)
        })
        .sum();
    sum / terms.len() as f32
}
