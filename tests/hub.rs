//! Hub-backed integration tests. These download real checkpoints
//! (several hundred MB on first run).
//! Run with: cargo test --features hub-tests hub -- --nocapture

#![cfg(feature = "hub-tests")]

use std::sync::Arc;

use empath::error::Result;
use empath::{ClassifyRequest, EmotionPipeline, MemoryLogStore, PipelineConfig};

#[tokio::test]
async fn english_gratitude_scenario() -> Result<()> {
    let store = Arc::new(MemoryLogStore::new());
    let pipeline = EmotionPipeline::new(&PipelineConfig::default(), store)?;
    pipeline.warm_up()?;

    let response = pipeline
        .classify(
            ClassifyRequest::new("I am so grateful, thank you so much!!!"),
            None,
        )
        .await?;

    assert!(!response.sarcasm_detected);
    assert!(response
        .detected_emotions
        .iter()
        .any(|e| e == "gratitude"));
    assert_eq!(
        response.recommendation.as_deref(),
        Some("That’s wonderful to hear. Maybe note what you're thankful for to revisit later.")
    );

    for (label, score) in &response.confidence_scores {
        assert!(
            *score > 0.15,
            "{label} reported below the detection threshold"
        );
    }
    Ok(())
}

#[tokio::test]
async fn registry_reuses_loaded_models_across_requests() -> Result<()> {
    let pipeline =
        EmotionPipeline::new(&PipelineConfig::default(), Arc::new(MemoryLogStore::new()))?;
    pipeline.warm_up()?;

    // Second request must not reload anything; it should be fast and
    // produce a stable contract.
    for _ in 0..2 {
        let response = pipeline
            .classify(ClassifyRequest::new("What a wonderful surprise!"), None)
            .await?;
        assert_eq!(
            response.detected_emotions.len(),
            response.confidence_scores.len()
        );
    }
    Ok(())
}
