// tests/explanations.rs
// End-to-end explanation rendering through the public API.

use incident_similarity_engine::{
    generate_explanation, IncidentRecord, Mode, PrismScores, ProductProfile,
};

fn fixture() -> (ProductProfile, IncidentRecord) {
    let product = ProductProfile {
        name: "FaceGate".into(),
        technology: vec![
            "Facial Recognition".into(),
            "Neural Networks".into(),
            "Edge Computing".into(),
        ],
        purpose: vec!["classification".into()],
        ..Default::default()
    };
    let incident = IncidentRecord {
        title: "Biometric false positives at scale".into(),
        technologies: vec!["facial recognition".into()],
        risk_domain: "Privacy".into(),
        prism_scores: Some(PrismScores {
            logical_coherence: 0.92,
            factual_accuracy: 0.41,
            practical_implementability: 0.7,
            contextual_relevance: 0.55,
            impact: 0.75,
            exploitability: 0.3,
        }),
        ..Default::default()
    };
    (product, incident)
}

#[test]
fn generic_mode_renders_one_brief_sentence() {
    let (product, incident) = fixture();
    let s = generate_explanation(&product, &incident, Mode::Generic);
    // Jaccard: 1 shared term over a 3-term union -> 33%.
    assert!(s.contains("(33% overlap)"), "got: {s}");
    assert!(s.contains("addresses privacy risks"), "got: {s}");
    assert!(!s.contains('\n'));
}

#[test]
fn prism_mode_renders_banded_breakdown() {
    let (product, incident) = fixture();
    let s = generate_explanation(&product, &incident, Mode::Prism);
    assert!(s.starts_with("PRISM Analysis:\n"));
    assert!(s.contains("Logical Coherence: 92% - Incident report is well-structured"));
    assert!(s.contains("Factual Accuracy: 41% - Most claims appear accurate"));
    assert!(s.contains("Contextual Relevance: 55% - Moderately relevant"));
    assert!(s.contains("Impact Scale: 75% - Demonstrates significant potential impact"));
    // Only the four surfaced dimensions appear.
    assert!(!s.contains("Exploitability"));
    assert!(!s.contains("Practical"));
}

#[test]
fn prism_mode_without_vector_uses_fixed_string() {
    let (product, mut incident) = fixture();
    incident.prism_scores = None;
    assert_eq!(
        generate_explanation(&product, &incident, Mode::Prism),
        "PRISM scores not available for detailed analysis."
    );
}
