//! art_core - Core types for the artwork evolution system
//!
//! This crate provides the foundational types used across all art crates:
//! - `strategy` - ModificationStrategy, StrategyChoice, Creativity
//! - `lineage` - Iteration, Lineage and the evolution timeline
//! - `collection` - Collection and CollectionSummary metadata
//! - `config` - Config loading (file + environment)
//! - `paths` - data directory layout

pub mod collection;
pub mod config;
pub mod error;
pub mod lineage;
pub mod paths;
pub mod strategy;

// Re-export commonly used types
pub use collection::{Collection, CollectionSummary};
pub use config::{AnalysisConfig, Config, GenerationConfig, RefinementConfig};
pub use error::{ConfigError, LineageError, UnknownStrategyError};
pub use lineage::{Iteration, Lineage, TimelineEntry};
pub use strategy::{Creativity, ModificationStrategy, StrategyChoice};
