//! Narrative Structure Analyzer core library
//!
//! Structure catalogue, text segmentation and the keyword analysis engine
//! behind the `/analyze` endpoint and the `narr` CLI.

pub mod analysis;
pub mod config;
pub mod error;
pub mod input;
pub mod segment;
pub mod structure;

pub use analysis::model::{AnalysisMetadata, AnalysisResult, StructureReport};
pub use analysis::Analyzer;
pub use config::Settings;
pub use error::{NarrError, NarrResult};
pub use structure::{NarrativeStructure, StructureInfo, StructureRegistry, StructureType};
