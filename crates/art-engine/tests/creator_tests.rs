//! ArtworkCreator seed creation

mod common;

use art_core::config::DEFAULT_FALLBACK_IMAGE;
use art_core::Creativity;
use art_engine::{ArtworkCreator, EngineError, ModificationEngine};
use common::{services, FakeGeneration, FakeRefinement};

#[tokio::test]
async fn test_create_refines_and_renders_seed() {
    let refinement = FakeRefinement::with_replies(vec![Ok("A luminous coral metropolis\n")]);
    let generation = FakeGeneration::working();
    let creator = ArtworkCreator::new(ModificationEngine::new(services(
        &refinement,
        &generation,
        None,
    )));

    let lineage = creator.create("  A surreal underwater city ").await.unwrap();

    assert_eq!(lineage.len(), 1);
    let seed = lineage.seed_iteration();
    assert_eq!(seed.index, 0);
    assert!(seed.strategy_label.is_none());
    assert_eq!(seed.concept, "A luminous coral metropolis");
    assert_eq!(seed.image_reference, "/tmp/generated_1.png");

    assert_eq!(refinement.creativity(0), Creativity::Measured);
    assert!(refinement.prompt(0).contains("A surreal underwater city"));
}

#[tokio::test]
async fn test_create_rejects_blank_idea() {
    let refinement = FakeRefinement::with_replies(vec![]);
    let generation = FakeGeneration::working();
    let creator = ArtworkCreator::new(ModificationEngine::new(services(
        &refinement,
        &generation,
        None,
    )));

    assert!(matches!(
        creator.create("   ").await,
        Err(EngineError::EmptyConcept)
    ));
    assert_eq!(refinement.call_count(), 0);
}

#[tokio::test]
async fn test_create_uses_fallback_when_render_fails() {
    let refinement = FakeRefinement::with_replies(vec![]);
    let generation = FakeGeneration::failing();
    let creator = ArtworkCreator::new(ModificationEngine::new(services(
        &refinement,
        &generation,
        None,
    )));

    let lineage = creator.create("Idea").await.unwrap();
    assert_eq!(lineage.latest().image_reference, DEFAULT_FALLBACK_IMAGE);
}

#[tokio::test]
async fn test_create_propagates_refinement_failure() {
    let refinement = FakeRefinement::with_replies(vec![Err("unauthorized")]);
    let generation = FakeGeneration::working();
    let creator = ArtworkCreator::new(ModificationEngine::new(services(
        &refinement,
        &generation,
        None,
    )));

    assert!(matches!(
        creator.create("Idea").await,
        Err(EngineError::Refinement(_))
    ));
    assert_eq!(generation.call_count(), 0);
}
