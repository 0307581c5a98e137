//! Modification strategies applied between iterations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownStrategyError;

/// The eight process modification strategies.
///
/// The serialized form is the stable wire tag stored in collection metadata.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModificationStrategy {
    NoModification,
    UnsystematicChange,
    IdeaBasedChange,
    QuantitativeModification,
    SubjectModification,
    SubjectWithMethodRefinement,
    StructureModification,
    ConceptModification,
}

impl ModificationStrategy {
    /// All strategies in selector order (1-8).
    pub const ALL: [ModificationStrategy; 8] = [
        Self::NoModification,
        Self::UnsystematicChange,
        Self::IdeaBasedChange,
        Self::QuantitativeModification,
        Self::SubjectModification,
        Self::SubjectWithMethodRefinement,
        Self::StructureModification,
        Self::ConceptModification,
    ];

    /// Wire tag, e.g. `quantitative_modification`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoModification => "no_modification",
            Self::UnsystematicChange => "unsystematic_change",
            Self::IdeaBasedChange => "idea_based_change",
            Self::QuantitativeModification => "quantitative_modification",
            Self::SubjectModification => "subject_modification",
            Self::SubjectWithMethodRefinement => "subject_with_method_refinement",
            Self::StructureModification => "structure_modification",
            Self::ConceptModification => "concept_modification",
        }
    }

    /// Selector number in the fixed 1-8 table.
    pub fn number(&self) -> u8 {
        match self {
            Self::NoModification => 1,
            Self::UnsystematicChange => 2,
            Self::IdeaBasedChange => 3,
            Self::QuantitativeModification => 4,
            Self::SubjectModification => 5,
            Self::SubjectWithMethodRefinement => 6,
            Self::StructureModification => 7,
            Self::ConceptModification => 8,
        }
    }

    pub fn from_number(number: u64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| u64::from(strategy.number()) == number)
    }

    /// Title-cased tag, e.g. "Quantitative Modification"
    pub fn display_name(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Menu line used when asking a model to pick a strategy.
    pub fn menu_label(&self) -> &'static str {
        match self {
            Self::NoModification => "No modification (reproduction of previous work)",
            Self::UnsystematicChange => "Unsystematic change (random modifications)",
            Self::IdeaBasedChange => "Changing subjects and methods based on prior ideas",
            Self::QuantitativeModification => {
                "Quantitative modification (changing size, material, etc.)"
            }
            Self::SubjectModification => {
                "Subject modification (applying the same method to new subjects)"
            }
            Self::SubjectWithMethodRefinement => {
                "Subject modification with minor methodological refinements"
            }
            Self::StructureModification => {
                "Structure modification (developing new methodology aligned with concept)"
            }
            Self::ConceptModification => {
                "Concept modification (forming new art concepts guided by creative vision)"
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NoModification => "Reproduce the existing work with minimal changes.",
            Self::UnsystematicChange => {
                "Introduce random, unpredictable changes to explore new possibilities."
            }
            Self::IdeaBasedChange => {
                "Develop new directions based on ideas from previous iterations."
            }
            Self::QuantitativeModification => {
                "Modify aspects such as size, scale, proportions, or materials while keeping the core concept."
            }
            Self::SubjectModification => {
                "Keep the same artistic approach but apply it to a new subject."
            }
            Self::SubjectWithMethodRefinement => {
                "Change the subject while making minor refinements to the methodology."
            }
            Self::StructureModification => {
                "Develop a new methodological structure while retaining the core concept."
            }
            Self::ConceptModification => {
                "Create a new artistic concept that marks a significant evolution."
            }
        }
    }

    /// Creativity requested from the refinement service, `None` when the
    /// strategy does not refine at all.
    pub fn creativity(&self) -> Option<Creativity> {
        match self {
            Self::NoModification => None,
            Self::UnsystematicChange => Some(Creativity::Wild),
            Self::QuantitativeModification => Some(Creativity::Balanced),
            Self::ConceptModification => Some(Creativity::Bold),
            Self::IdeaBasedChange
            | Self::SubjectModification
            | Self::SubjectWithMethodRefinement
            | Self::StructureModification => Some(Creativity::Inventive),
        }
    }
}

impl fmt::Display for ModificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationStrategy {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == tag)
            .ok_or_else(|| UnknownStrategyError(tag.to_string()))
    }
}

/// A requested strategy, or the auto sentinel that lets the selector decide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyChoice {
    #[default]
    Auto,
    Explicit(ModificationStrategy),
}

impl StrategyChoice {
    pub const AUTO_TAG: &'static str = "auto";
}

impl From<ModificationStrategy> for StrategyChoice {
    fn from(strategy: ModificationStrategy) -> Self {
        Self::Explicit(strategy)
    }
}

impl fmt::Display for StrategyChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str(Self::AUTO_TAG),
            Self::Explicit(strategy) => strategy.fmt(f),
        }
    }
}

impl FromStr for StrategyChoice {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == Self::AUTO_TAG {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Explicit)
    }
}

/// Relative intensity knob passed to the refinement service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Creativity {
    Precise,
    Measured,
    Balanced,
    Inventive,
    Bold,
    Wild,
}

impl Creativity {
    /// Sampling temperature used by HTTP adapters.
    pub fn temperature(&self) -> f32 {
        match self {
            Self::Precise => 0.2,
            Self::Measured => 0.5,
            Self::Balanced => 0.6,
            Self::Inventive => 0.7,
            Self::Bold => 0.8,
            Self::Wild => 0.9,
        }
    }
}
