//! Analysis result models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

use crate::structure::harmon::HarmonReport;
use crate::structure::three_act::ThreeActReport;
use crate::structure::vogler::VoglerReport;
use crate::structure::StructureType;

pub const ENGINE_NAME: &str = "narr-keyword";

/// Structure-specific findings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructureReport {
    ThreeAct(ThreeActReport),
    HarmonCircle(HarmonReport),
    VoglerHeroJourney(VoglerReport),
}

impl StructureReport {
    /// Overall fit of the text to the structure, in `[0, 1]`.
    pub fn overall_score(&self) -> f64 {
        let score = match self {
            Self::ThreeAct(r) => r.overall.score,
            Self::HarmonCircle(r) => r.overall.score,
            Self::VoglerHeroJourney(r) => r.overall.completeness,
        };
        score.clamp(0.0, 1.0)
    }

    pub fn structure_type(&self) -> StructureType {
        match self {
            Self::ThreeAct(_) => StructureType::ThreeAct,
            Self::HarmonCircle(_) => StructureType::HarmonCircle,
            Self::VoglerHeroJourney(_) => StructureType::VoglerHeroJourney,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub id: String,
    pub engine: String,
    pub engine_version: String,
    pub confidence: f64,
    pub processing_time_ms: u64,
    pub structure_type: StructureType,
    pub display_name: String,
    pub auto_detected: bool,
    pub analyzed_at: DateTime<Utc>,
}

/// Outcome of analysing one text against one structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub structure_type: StructureType,
    /// Display name of the structure.
    pub structure: String,
    pub summary: String,
    /// Newline-delimited explanation.
    pub analysis: String,
    pub report: StructureReport,
    /// HTML fragment, styles included.
    pub visualization: String,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    pub(crate) fn build(
        report: StructureReport,
        analysis: String,
        visualization: String,
        started: Instant,
    ) -> Self {
        let structure_type = report.structure_type();
        let display_name = structure_type.display_name().to_string();
        let confidence = report.overall_score();
        let summary = format!(
            "Analysis of narrative structure using {}: {:.0}% fit",
            display_name,
            confidence * 100.0
        );

        Self {
            structure_type,
            structure: display_name.clone(),
            summary,
            analysis,
            report,
            visualization,
            metadata: AnalysisMetadata {
                id: Uuid::new_v4().to_string(),
                engine: ENGINE_NAME.to_string(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                confidence,
                processing_time_ms: started.elapsed().as_millis() as u64,
                structure_type,
                display_name,
                auto_detected: false,
                analyzed_at: Utc::now(),
            },
        }
    }

    pub fn score(&self) -> f64 {
        self.report.overall_score()
    }
}
