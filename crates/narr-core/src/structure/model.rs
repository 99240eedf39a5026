//! Structure catalogue types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::NarrError;

/// Narrative structures known to the analyzer, in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    ThreeAct,
    HarmonCircle,
    VoglerHeroJourney,
}

impl StructureType {
    pub const ALL: [StructureType; 3] = [
        StructureType::ThreeAct,
        StructureType::HarmonCircle,
        StructureType::VoglerHeroJourney,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeAct => "three_act",
            Self::HarmonCircle => "harmon_circle",
            Self::VoglerHeroJourney => "vogler_hero_journey",
        }
    }

    /// Human-readable label shown in the result panel.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ThreeAct => "Three-Act",
            Self::HarmonCircle => "Dan Harmon's Story Circle",
            Self::VoglerHeroJourney => "Chris Vogler's Hero's Journey",
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StructureType {
    type Err = NarrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "three_act" => Ok(Self::ThreeAct),
            "harmon_circle" => Ok(Self::HarmonCircle),
            "vogler_hero_journey" => Ok(Self::VoglerHeroJourney),
            _ => Err(NarrError::UnknownStructure(s.to_string())),
        }
    }
}

/// Coarse position of a unit within the story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Act {
    Beginning,
    Middle,
    End,
}

impl Act {
    pub const ALL: [Act; 3] = [Act::Beginning, Act::Middle, Act::End];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Beginning => "Beginning",
            Self::Middle => "Middle",
            Self::End => "End",
        }
    }
}

/// Listing entry for the page select box and `GET /api/structures`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructureInfo {
    pub slug: String,
    pub display_name: String,
    /// Number of steps, stages or acts the structure divides a story into.
    pub units: usize,
}
