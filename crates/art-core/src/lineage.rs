//! Iterations and the lineage they form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LineageError;
use crate::strategy::ModificationStrategy;

/// One artwork state at a position in a lineage.
///
/// Field names on the wire follow the collection metadata format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Iteration {
    /// Ordinal position, 0 for the initial creation
    #[serde(rename = "iteration")]
    pub index: u32,

    /// Strategy that produced this iteration, `None` only for the seed
    #[serde(rename = "modification_type")]
    pub strategy_label: Option<ModificationStrategy>,

    /// Refined descriptive text
    pub concept: String,

    /// Opaque handle (path or URL) to the rendered image
    #[serde(rename = "image_url")]
    pub image_reference: String,

    /// Free-text guidance supplied for this transformation
    #[serde(rename = "feedback", default)]
    pub user_feedback: String,

    /// Critique of the previous iteration's image
    #[serde(rename = "image_analysis", default)]
    pub analysis: Option<String>,

    pub timestamp: DateTime<Utc>,
}

impl Iteration {
    pub fn is_seed(&self) -> bool {
        self.index == 0
    }

    /// Same iteration pointing at a different image handle.
    pub fn with_image_reference(mut self, image_reference: impl Into<String>) -> Self {
        self.image_reference = image_reference.into();
        self
    }
}

/// Ordered, append-only history of an artwork.
///
/// A lineage always holds at least the seed iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Iteration>", into = "Vec<Iteration>")]
pub struct Lineage {
    iterations: Vec<Iteration>,
}

impl Lineage {
    /// Start a lineage from the initial creation.
    pub fn seed(concept: impl Into<String>, image_reference: impl Into<String>) -> Self {
        Self {
            iterations: vec![Iteration {
                index: 0,
                strategy_label: None,
                concept: concept.into(),
                image_reference: image_reference.into(),
                user_feedback: String::new(),
                analysis: None,
                timestamp: Utc::now(),
            }],
        }
    }

    /// Rebuild a lineage from stored iterations, checking every invariant.
    pub fn from_iterations(iterations: Vec<Iteration>) -> Result<Self, LineageError> {
        let lineage = Self { iterations };
        lineage.validate()?;
        Ok(lineage)
    }

    pub fn validate(&self) -> Result<(), LineageError> {
        let seed = self.iterations.first().ok_or(LineageError::Empty)?;
        if seed.strategy_label.is_some() {
            return Err(LineageError::SeedHasStrategy { index: seed.index });
        }
        if seed.index != 0 {
            return Err(LineageError::NonIncreasingIndex {
                previous: 0,
                index: seed.index,
            });
        }

        for pair in self.iterations.windows(2) {
            let (previous, current) = (&pair[0], &pair[1]);
            if current.index <= previous.index {
                return Err(LineageError::NonIncreasingIndex {
                    previous: previous.index,
                    index: current.index,
                });
            }
            if current.strategy_label.is_none() {
                return Err(LineageError::MissingStrategy {
                    index: current.index,
                });
            }
            if current.timestamp < previous.timestamp {
                return Err(LineageError::TimestampRegression {
                    index: current.index,
                });
            }
        }

        Ok(())
    }

    pub fn iterations(&self) -> &[Iteration] {
        &self.iterations
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// The seed iteration.
    pub fn seed_iteration(&self) -> &Iteration {
        &self.iterations[0]
    }

    /// Concept of the seed iteration.
    pub fn original_concept(&self) -> &str {
        &self.seed_iteration().concept
    }

    pub fn latest(&self) -> &Iteration {
        // Non-empty by construction.
        &self.iterations[self.iterations.len() - 1]
    }

    /// Up to `n` most recent iterations, oldest first.
    pub fn recent(&self, n: usize) -> &[Iteration] {
        let start = self.iterations.len().saturating_sub(n);
        &self.iterations[start..]
    }

    /// Up to `n` most recent concepts, oldest first.
    pub fn recent_concepts(&self, n: usize) -> Vec<&str> {
        self.recent(n).iter().map(|it| it.concept.as_str()).collect()
    }

    /// Append the next iteration and return it.
    ///
    /// The index is `latest.index + 1` and the timestamp never goes backwards.
    pub fn append(
        &mut self,
        strategy: ModificationStrategy,
        concept: impl Into<String>,
        image_reference: impl Into<String>,
        user_feedback: impl Into<String>,
        analysis: Option<String>,
    ) -> &Iteration {
        let latest = self.latest();
        let index = latest.index + 1;
        let timestamp = Utc::now().max(latest.timestamp);

        self.iterations.push(Iteration {
            index,
            strategy_label: Some(strategy),
            concept: concept.into(),
            image_reference: image_reference.into(),
            user_feedback: user_feedback.into(),
            analysis,
            timestamp,
        });
        self.latest()
    }

    /// One display entry per iteration, seed first.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        self.iterations
            .iter()
            .map(|it| TimelineEntry {
                index: it.index,
                title: match it.strategy_label {
                    Some(strategy) => strategy.display_name(),
                    None => "Initial Creation".to_string(),
                },
                strategy: it.strategy_label,
                timestamp: it.timestamp,
            })
            .collect()
    }
}

impl TryFrom<Vec<Iteration>> for Lineage {
    type Error = LineageError;

    fn try_from(iterations: Vec<Iteration>) -> Result<Self, Self::Error> {
        Self::from_iterations(iterations)
    }
}

impl From<Lineage> for Vec<Iteration> {
    fn from(lineage: Lineage) -> Self {
        lineage.iterations
    }
}

/// Evolution timeline entry.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEntry {
    pub index: u32,
    pub title: String,
    pub strategy: Option<ModificationStrategy>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn seeded() -> Lineage {
        Lineage::seed("A surreal underwater city", "images/seed.png")
    }

    #[test]
    fn test_seed_has_no_strategy() {
        let lineage = seeded();
        assert_eq!(lineage.len(), 1);
        assert_eq!(lineage.latest().index, 0);
        assert!(lineage.latest().strategy_label.is_none());
        assert!(lineage.latest().analysis.is_none());
        assert_eq!(lineage.original_concept(), "A surreal underwater city");
    }

    #[test]
    fn test_append_assigns_next_index() {
        let mut lineage = seeded();
        let index = lineage
            .append(
                ModificationStrategy::UnsystematicChange,
                "chaos",
                "images/1.png",
                "",
                None,
            )
            .index;
        assert_eq!(index, 1);

        let next = lineage.append(
            ModificationStrategy::ConceptModification,
            "leap",
            "images/2.png",
            "go bolder",
            Some("calm blues".to_string()),
        );
        assert_eq!(next.index, 2);
        assert_eq!(next.user_feedback, "go bolder");
        assert!(lineage.validate().is_ok());
    }

    #[test]
    fn test_append_never_moves_time_backwards() {
        let mut lineage = seeded();
        let future = Utc::now() + Duration::hours(1);
        lineage.iterations[0].timestamp = future;

        let appended = lineage.append(
            ModificationStrategy::NoModification,
            "same",
            "images/1.png",
            "",
            None,
        );
        assert!(appended.timestamp >= future);
    }

    #[test]
    fn test_from_iterations_rejects_empty() {
        assert_eq!(Lineage::from_iterations(vec![]), Err(LineageError::Empty));
    }

    #[test]
    fn test_from_iterations_rejects_labelled_seed() {
        let mut seed = seeded().seed_iteration().clone();
        seed.strategy_label = Some(ModificationStrategy::SubjectModification);
        assert_eq!(
            Lineage::from_iterations(vec![seed]),
            Err(LineageError::SeedHasStrategy { index: 0 })
        );
    }

    #[test]
    fn test_from_iterations_rejects_unlabelled_follow_up() {
        let seed = seeded().seed_iteration().clone();
        let mut next = seed.clone();
        next.index = 1;
        assert_eq!(
            Lineage::from_iterations(vec![seed, next]),
            Err(LineageError::MissingStrategy { index: 1 })
        );
    }

    #[test]
    fn test_from_iterations_rejects_repeated_index() {
        let seed = seeded().seed_iteration().clone();
        let mut next = seed.clone();
        next.strategy_label = Some(ModificationStrategy::NoModification);
        assert_eq!(
            Lineage::from_iterations(vec![seed, next]),
            Err(LineageError::NonIncreasingIndex {
                previous: 0,
                index: 0
            })
        );
    }

    #[test]
    fn test_recent_concepts_caps_at_n() {
        let mut lineage = seeded();
        for (i, strategy) in [
            ModificationStrategy::UnsystematicChange,
            ModificationStrategy::SubjectModification,
            ModificationStrategy::StructureModification,
        ]
        .into_iter()
        .enumerate()
        {
            lineage.append(strategy, format!("concept {}", i + 1), "img", "", None);
        }

        assert_eq!(
            lineage.recent_concepts(3),
            vec!["concept 1", "concept 2", "concept 3"]
        );
        assert_eq!(lineage.recent(10).len(), 4);
    }

    #[test]
    fn test_wire_format_field_names() {
        let lineage = seeded();
        let json = serde_json::to_value(&lineage).unwrap();
        let first = &json[0];
        assert_eq!(first["iteration"], 0);
        assert!(first["modification_type"].is_null());
        assert_eq!(first["image_url"], "images/seed.png");
        assert_eq!(first["feedback"], "");
        assert!(first["image_analysis"].is_null());
    }

    #[test]
    fn test_deserialize_validates() {
        let result: Result<Lineage, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn test_timeline_titles() {
        let mut lineage = seeded();
        lineage.append(
            ModificationStrategy::QuantitativeModification,
            "bigger",
            "img",
            "",
            None,
        );
        let titles: Vec<String> = lineage.timeline().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Initial Creation", "Quantitative Modification"]);
    }
}
