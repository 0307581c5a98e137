use std::fmt;
use std::sync::Arc;

use art_core::{Creativity, Lineage, ModificationStrategy};
use art_llm::RefinementService;
use log::{debug, warn};
use regex::Regex;

use crate::prompts::selection_prompt;

/// Strategy used whenever the model's answer cannot be used.
pub const FALLBACK_STRATEGY: ModificationStrategy = ModificationStrategy::SubjectModification;

/// Why the selector did not use the model's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionFallback {
    /// The reply contained no digits.
    NoDigits(String),
    /// The first number in the reply was not a strategy number.
    OutOfRange(String),
    /// The refinement call itself failed.
    ServiceFailure(String),
}

impl fmt::Display for SelectionFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDigits(reply) => write!(f, "no strategy number in reply {reply:?}"),
            Self::OutOfRange(number) => write!(f, "strategy number {number} is out of range"),
            Self::ServiceFailure(reason) => write!(f, "selection request failed: {reason}"),
        }
    }
}

/// Outcome of automatic selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub strategy: ModificationStrategy,
    pub fallback: Option<SelectionFallback>,
}

impl Selection {
    fn chosen(strategy: ModificationStrategy) -> Self {
        Self {
            strategy,
            fallback: None,
        }
    }

    fn fallback(reason: SelectionFallback) -> Self {
        warn!("[selector] Strategy selection fell back to {}: {}", FALLBACK_STRATEGY, reason);
        Self {
            strategy: FALLBACK_STRATEGY,
            fallback: Some(reason),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Map a free-text reply to a strategy using the first run of digits.
pub fn parse_strategy_number(reply: &str) -> Result<ModificationStrategy, SelectionFallback> {
    let digits = Regex::new(r"\d+")
        .ok()
        .and_then(|re| re.find(reply))
        .ok_or_else(|| SelectionFallback::NoDigits(reply.trim().to_string()))?
        .as_str();

    digits
        .parse::<u64>()
        .ok()
        .and_then(ModificationStrategy::from_number)
        .ok_or_else(|| SelectionFallback::OutOfRange(digits.to_string()))
}

/// Picks the next strategy by asking the refinement model.
#[derive(Clone)]
pub struct StrategySelector {
    refinement: Arc<dyn RefinementService>,
}

impl StrategySelector {
    pub fn new(refinement: Arc<dyn RefinementService>) -> Self {
        Self { refinement }
    }

    /// Choose the strategy for the next iteration.
    ///
    /// A lineage holding only the seed always yields `no_modification`
    /// without calling the model. Any unusable answer falls back to
    /// [`FALLBACK_STRATEGY`]; selection itself never fails.
    pub async fn select(&self, lineage: &Lineage, analysis: Option<&str>, feedback: &str) -> Selection {
        if lineage.len() <= 1 {
            return Selection::chosen(ModificationStrategy::NoModification);
        }

        let analysis = analysis
            .or(lineage.latest().analysis.as_deref())
            .unwrap_or_default();
        let prompt = selection_prompt(lineage, analysis, feedback);

        let reply = match self.refinement.refine(&prompt, Creativity::Precise).await {
            Ok(reply) => reply,
            Err(e) => return Selection::fallback(SelectionFallback::ServiceFailure(e.to_string())),
        };
        debug!("[selector] Model replied: {}", reply);

        match parse_strategy_number(&reply) {
            Ok(strategy) => Selection::chosen(strategy),
            Err(reason) => Selection::fallback(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_number_in_reply() {
        assert_eq!(
            parse_strategy_number("3"),
            Ok(ModificationStrategy::IdeaBasedChange)
        );
        assert_eq!(
            parse_strategy_number("I recommend strategy 7 then 2"),
            Ok(ModificationStrategy::StructureModification)
        );
        assert_eq!(
            parse_strategy_number("Option 8."),
            Ok(ModificationStrategy::ConceptModification)
        );
    }

    #[test]
    fn reply_without_digits_is_rejected() {
        assert!(matches!(
            parse_strategy_number("concept modification"),
            Err(SelectionFallback::NoDigits(_))
        ));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        assert_eq!(
            parse_strategy_number("0"),
            Err(SelectionFallback::OutOfRange("0".into()))
        );
        assert_eq!(
            parse_strategy_number("strategy 12"),
            Err(SelectionFallback::OutOfRange("12".into()))
        );
        let huge = "9".repeat(40);
        assert_eq!(
            parse_strategy_number(&huge),
            Err(SelectionFallback::OutOfRange(huge.clone()))
        );
    }
}
