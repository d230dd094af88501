//! Demo that ranks a few sample incidents against a product profile in both
//! modes and prints scores, explanations, and taxonomy suggestions.

use incident_similarity_engine::{
    filter_and_rank, generate_explanation, suggest_improvements, IncidentRecord, Mode,
    ProductProfile,
};
use tracing_subscriber::EnvFilter;

fn sample_product() -> ProductProfile {
    serde_json::from_value(serde_json::json!({
        "name": "SupportPilot",
        "description": "LLM-backed customer support assistant",
        "technology": ["Large Language Models", "nlp", "convnet"],
        "purpose": ["classification", "generation"]
    }))
    .expect("sample product is well-formed")
}

fn sample_incidents() -> Vec<IncidentRecord> {
    serde_json::from_value(serde_json::json!([
        {
            "title": "Chatbot disclosed customer records",
            "technologies": ["large language models", "nlp"],
            "risk_domain": "Privacy",
            "prism_scores": {
                "logical_coherence": 0.85,
                "factual_accuracy": 0.8,
                "practical_implementability": 0.75,
                "contextual_relevance": 0.9,
                "impact": 0.8,
                "exploitability": 0.6
            }
        },
        {
            "title": "Vision model mislabeled pedestrians",
            "technologies": ["computer vision", "cnn"],
            "risk_domain": "Safety",
            "prism_scores": {
                "logical_coherence": 0.7,
                "factual_accuracy": 0.65,
                "practical_implementability": 0.5,
                "contextual_relevance": 0.4,
                "impact": 0.9,
                "exploitability": 0.3
            }
        },
        {
            "title": "Recommendation loop amplified spam",
            "technologies": ["recommendation"],
            "risk_domain": "quality"
        }
    ]))
    .expect("sample incidents are well-formed")
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let product = sample_product();
    let incidents = sample_incidents();

    let report = suggest_improvements(&product.technology, &product.purpose);
    println!("term quality: {:.2}", report.quality_score);
    for s in &report.technology_suggestions {
        println!("  suggest `{}` (score {:.2})", s.node.name, s.score);
    }

    for mode in [Mode::Generic, Mode::Prism] {
        println!("\n== mode: {mode} ==");
        let ranked = filter_and_rank(&product, &incidents, mode);
        if ranked.is_empty() {
            println!("(no candidates above threshold)");
        }
        for r in &ranked {
            println!("{:.3}  {}", r.similarity_score, r.incident.title);
            println!("{}\n", generate_explanation(&product, &r.incident, mode));
        }
    }
}
