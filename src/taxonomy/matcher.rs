// src/taxonomy/matcher.rs
//! Term matching against a taxonomy universe.
//!
//! Free text is untrusted and noisy, so matching runs a fixed ladder of
//! strategies per node, first rule that fires wins:
//! 1. exact name equality (case-folded)          -> score 1.0, confidence 1.0
//! 2. alias equality                             -> score 0.95, confidence 0.9
//! 3. substring containment (either direction)   -> 0.7 * length ratio
//! 4. token overlap ("semantic"), accepted only above a floor
//!
//! Every node in the target universe is evaluated; the sets are small and
//! static, so no index is needed. Results are ordered by score descending,
//! then confidence descending, and truncated to the caller's limit.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::{TaxonomyGraph, TaxonomyNode, Universe};

/// Token splitter shared by the semantic tier and string similarity.
static TOKEN_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_]+").expect("token split regex"));

/// Acceptance floor for the token-overlap tier.
const SEMANTIC_FLOOR: f32 = 0.3;

/// Which matching tier produced a match. Ordering reflects reliability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Alias,
    Partial,
    Semantic,
}

/// One matched taxonomy node. Produced fresh on every query, never cached.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyMatch<'a> {
    pub node: &'a TaxonomyNode,
    pub score: f32,
    pub match_type: MatchType,
    pub confidence: f32,
}

/// Match `term` against every node of `universe`, best matches first.
pub fn match_term<'a>(
    graph: &'a TaxonomyGraph,
    term: &str,
    universe: Universe,
    max_results: usize,
) -> Vec<TaxonomyMatch<'a>> {
    let forest = graph.forest(universe);
    let folded = term.trim().to_lowercase();
    if folded.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<TaxonomyMatch<'a>> = forest
        .iter()
        .filter_map(|node| match_node(&folded, node))
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(b.confidence.total_cmp(&a.confidence))
    });
    matches.truncate(max_results);

    tracing::debug!(
        target: "taxonomy",
        term = %folded,
        ?universe,
        results = matches.len(),
        "term match"
    );
    matches
}

/// Convenience wrappers over the global taxonomy.
pub fn find_technology_matches(term: &str, max_results: usize) -> Vec<TaxonomyMatch<'static>> {
    match_term(TaxonomyGraph::global(), term, Universe::Technology, max_results)
}

pub fn find_purpose_matches(term: &str, max_results: usize) -> Vec<TaxonomyMatch<'static>> {
    match_term(TaxonomyGraph::global(), term, Universe::Purpose, max_results)
}

/// Run the strategy ladder for a single node. `term` is already case-folded.
fn match_node<'a>(term: &str, node: &'a TaxonomyNode) -> Option<TaxonomyMatch<'a>> {
    let name = node.name.to_lowercase();

    // 1) Exact name.
    if name == term {
        return Some(TaxonomyMatch {
            node,
            score: 1.0,
            match_type: MatchType::Exact,
            confidence: 1.0,
        });
    }

    // 2) Alias equality.
    if node.aliases.iter().any(|a| a.to_lowercase() == term) {
        return Some(TaxonomyMatch {
            node,
            score: 0.95,
            match_type: MatchType::Alias,
            confidence: 0.9,
        });
    }

    // 3) Substring containment, either direction.
    if name.contains(term) || term.contains(&name) {
        let ratio = ratio_shorter_to_longer(term, &name);
        return Some(TaxonomyMatch {
            node,
            score: 0.7 * ratio,
            match_type: MatchType::Partial,
            confidence: 0.6 * ratio,
        });
    }

    // 4) Token overlap. A term token counts when it contains, or is
    //    contained by, some node token.
    let term_tokens = tokenize(term);
    let node_tokens = tokenize(&name);
    let overlap = term_tokens
        .iter()
        .filter(|t| node_tokens.iter().any(|n| n.contains(*t) || t.contains(*n)))
        .count();
    if overlap > 0 {
        let score = overlap as f32 / term_tokens.len().max(node_tokens.len()) as f32;
        if score > SEMANTIC_FLOOR {
            return Some(TaxonomyMatch {
                node,
                score: 0.5 * score,
                match_type: MatchType::Semantic,
                confidence: 0.4 * score,
            });
        }
    }

    None
}

fn tokenize(s: &str) -> Vec<&str> {
    TOKEN_SPLIT.split(s).filter(|t| !t.is_empty()).collect()
}

fn ratio_shorter_to_longer(a: &str, b: &str) -> f32 {
    let (la, lb) = (a.chars().count(), b.chars().count());
    la.min(lb) as f32 / la.max(lb) as f32
}

/* ----------------------------
Cross-list term similarity
---------------------------- */

/// Similarity of two free-text term lists in [0,1], averaged over `terms_a`.
///
/// Per term, the best of:
/// - direct string similarity (exact, containment ratio, word Jaccard),
/// - taxonomy-mediated similarity: 0.8 when both terms resolve to the same
///   node in either universe, 0.6 when their nodes share a parent.
pub fn term_list_similarity(graph: &TaxonomyGraph, terms_a: &[String], terms_b: &[String]) -> f32 {
    if terms_a.is_empty() || terms_b.is_empty() {
        return 0.0;
    }

    let mut total = 0.0f32;
    for a in terms_a {
        let a_matches: Vec<TaxonomyMatch> = match_term(graph, a, Universe::Technology, 1)
            .into_iter()
            .chain(match_term(graph, a, Universe::Purpose, 1))
            .collect();

        let mut best = 0.0f32;
        for b in terms_b {
            best = best.max(string_similarity(a, b));

            for am in &a_matches {
                let b_matches = match_term(graph, b, Universe::Technology, 1)
                    .into_iter()
                    .chain(match_term(graph, b, Universe::Purpose, 1));
                for bm in b_matches {
                    if am.node.universe != bm.node.universe {
                        continue;
                    }
                    if am.node.id == bm.node.id {
                        best = best.max(0.8);
                    } else if am.node.parent.is_some() && am.node.parent == bm.node.parent {
                        best = best.max(0.6);
                    }
                }
            }
        }
        total += best;
    }
    total / terms_a.len() as f32
}

/// Direct surface similarity: exact 1.0, containment length ratio,
/// else Jaccard over tokens.
fn string_similarity(a: &str, b: &str) -> f32 {
    let la = a.to_lowercase();
    let lb = b.to_lowercase();
    if la == lb {
        return 1.0;
    }
    if la.contains(&lb) || lb.contains(&la) {
        return ratio_shorter_to_longer(&la, &lb);
    }

    let ta: std::collections::HashSet<&str> = tokenize(&la).into_iter().collect();
    let tb: std::collections::HashSet<&str> = tokenize(&lb).into_iter().collect();
    let union = ta.union(&tb).count();
    if union == 0 {
        return 0.0;
    }
    ta.intersection(&tb).count() as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> &'static TaxonomyGraph {
        TaxonomyGraph::global()
    }

    #[test]
    fn exact_match_scores_one() {
        let m = find_technology_matches("machine learning", 5);
        assert_eq!(m[0].node.id, "ml-core");
        assert_eq!(m[0].match_type, MatchType::Exact);
        assert!((m[0].score - 1.0).abs() < 1e-6);
        assert!((m[0].confidence - 1.0).abs() < 1e-6);
    }

    #[test]
    fn alias_match_scores_095() {
        let m = find_technology_matches("convnet", 1);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].node.id, "cnn");
        assert_eq!(m[0].match_type, MatchType::Alias);
        assert!((m[0].score - 0.95).abs() < 1e-6);
        assert!((m[0].confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn partial_match_scales_by_length_ratio() {
        // "vision" (6) inside "computer vision" (15) -> ratio 0.4
        let m = match_term(graph(), "vision", Universe::Technology, 10);
        let cv = m
            .iter()
            .find(|x| x.node.id == "computer-vision")
            .expect("computer-vision matched");
        assert_eq!(cv.match_type, MatchType::Partial);
        assert!((cv.score - 0.7 * 0.4).abs() < 1e-6);
        assert!((cv.confidence - 0.6 * 0.4).abs() < 1e-6);
    }

    #[test]
    fn semantic_match_requires_floor() {
        // "learning models" vs "Language Models": one of two tokens overlaps,
        // 0.5 > 0.3, reported as 0.5 * 0.5 = 0.25.
        let m = match_term(graph(), "learning models", Universe::Technology, 20);
        let lm = m
            .iter()
            .find(|x| x.node.id == "language-models")
            .expect("language-models matched");
        assert_eq!(lm.match_type, MatchType::Semantic);
        assert!((lm.score - 0.25).abs() < 1e-6);
        assert!((lm.confidence - 0.2).abs() < 1e-6);
    }

    #[test]
    fn results_sorted_and_capped() {
        let m = find_technology_matches("learning", 3);
        assert!(m.len() <= 3);
        for pair in m.windows(2) {
            assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score
                        && pair[0].confidence >= pair[1].confidence)
            );
        }
    }

    #[test]
    fn no_match_is_empty_not_error() {
        assert!(find_technology_matches("zzzqqq", 5).is_empty());
        assert!(find_purpose_matches("   ", 5).is_empty());
    }

    #[test]
    fn string_similarity_ladder() {
        assert!((string_similarity("ChatBots", "chatbots") - 1.0).abs() < 1e-6);
        assert!((string_similarity("bots", "chatbots") - 0.5).abs() < 1e-6);
        // token Jaccard: {"fraud","detection"} vs {"fraud","prevention"} -> 1/3
        assert!((string_similarity("fraud detection", "fraud prevention") - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn term_list_similarity_uses_shared_node() {
        let g = graph();
        // Both resolve to the cnn node (name vs alias) -> at least 0.8.
        let a = vec!["Convolutional Neural Networks".to_string()];
        let b = vec!["convnet".to_string()];
        assert!(term_list_similarity(g, &a, &b) >= 0.8);
        assert!((term_list_similarity(g, &[], &b) - 0.0).abs() < 1e-6);
    }
}
