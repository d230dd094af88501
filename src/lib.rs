// src/lib.rs
//! Taxonomy-aware similarity & explanation engine for AI incident review.
//!
//! The engine normalizes free-text technology/purpose terms against curated
//! vocabularies, scores product/incident relevance under a selectable mode,
//! and renders explanations for surfaced candidates. Everything is
//! synchronous and pure: the taxonomy is built once from embedded data and
//! read-only afterwards, so calls are safe from any number of threads with
//! no coordination.

pub mod explain;
pub mod policy;
pub mod record;
pub mod scoring;
pub mod taxonomy;

// ---- Re-exports for stable public API ----
pub use crate::explain::generate_explanation;
pub use crate::policy::{
    resolve as resolve_policy, Algorithm, ExplanationStyle, Mode, ScoringPolicy, SignalWeights,
};
pub use crate::record::{IncidentRecord, PrismScores, ProductProfile, RankedIncident};
pub use crate::scoring::{calculate_similarity, filter_and_rank};
pub use crate::taxonomy::matcher::{
    find_purpose_matches, find_technology_matches, term_list_similarity, MatchType, TaxonomyMatch,
};
pub use crate::taxonomy::quality::TermQualityReport;
pub use crate::taxonomy::{TaxonomyGraph, TaxonomyNode, Universe};

/// Critique a product's own term lists against the global taxonomy.
/// See [`taxonomy::quality::suggest_improvements`] for the per-graph form.
pub fn suggest_improvements(
    technologies: &[String],
    purposes: &[String],
) -> TermQualityReport<'static> {
    taxonomy::quality::suggest_improvements(TaxonomyGraph::global(), technologies, purposes)
}
