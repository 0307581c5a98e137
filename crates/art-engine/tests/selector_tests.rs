//! StrategySelector behaviour against a recording refinement fake

mod common;

use art_core::{Creativity, Lineage, ModificationStrategy};
use art_engine::{SelectionFallback, StrategySelector};
use common::FakeRefinement;

fn two_step_lineage() -> Lineage {
    let mut lineage = Lineage::seed("Seed", "/tmp/seed.png");
    lineage.append(
        ModificationStrategy::QuantitativeModification,
        "Bigger seed",
        "/tmp/1.png",
        "",
        Some("stored analysis".to_string()),
    );
    lineage
}

#[tokio::test]
async fn test_seed_only_lineage_makes_no_calls() {
    let refinement = FakeRefinement::with_replies(vec![Ok("5")]);
    let selector = StrategySelector::new(refinement.clone());

    for _ in 0..3 {
        let selection = selector
            .select(&Lineage::seed("Seed", "/tmp/seed.png"), Some("analysis"), "feedback")
            .await;
        assert_eq!(selection.strategy, ModificationStrategy::NoModification);
        assert!(selection.fallback.is_none());
    }
    assert_eq!(refinement.call_count(), 0);
}

#[tokio::test]
async fn test_selects_numbered_strategy_with_precise_creativity() {
    let refinement = FakeRefinement::with_replies(vec![Ok("Strategy 6 would suit this")]);
    let selector = StrategySelector::new(refinement.clone());

    let selection = selector
        .select(&two_step_lineage(), Some("fresh analysis"), "")
        .await;

    assert_eq!(
        selection.strategy,
        ModificationStrategy::SubjectWithMethodRefinement
    );
    assert_eq!(refinement.creativity(0), Creativity::Precise);
    let prompt = refinement.prompt(0);
    assert!(prompt.contains("Current image analysis: fresh analysis"));
    assert!(prompt.contains("- Iteration 1: quantitative_modification"));
}

#[tokio::test]
async fn test_stored_analysis_used_when_none_given() {
    let refinement = FakeRefinement::with_replies(vec![Ok("2")]);
    let selector = StrategySelector::new(refinement.clone());

    selector.select(&two_step_lineage(), None, "").await;

    assert!(refinement
        .prompt(0)
        .contains("Current image analysis: stored analysis"));
}

#[tokio::test]
async fn test_fallbacks_never_raise() {
    let cases: Vec<(Result<&str, &str>, fn(&SelectionFallback) -> bool)> = vec![
        (Ok("none of them"), |f| matches!(f, SelectionFallback::NoDigits(_))),
        (Ok("9"), |f| matches!(f, SelectionFallback::OutOfRange(_))),
        (Ok("0 or 3"), |f| matches!(f, SelectionFallback::OutOfRange(_))),
        (Err("timeout"), |f| matches!(f, SelectionFallback::ServiceFailure(_))),
    ];

    for (reply, expected) in cases {
        let refinement = FakeRefinement::with_replies(vec![reply]);
        let selector = StrategySelector::new(refinement);

        let selection = selector.select(&two_step_lineage(), None, "").await;

        assert_eq!(selection.strategy, ModificationStrategy::SubjectModification);
        let fallback = selection.fallback.expect("fallback reason");
        assert!(expected(&fallback), "unexpected fallback {fallback:?}");
    }
}
