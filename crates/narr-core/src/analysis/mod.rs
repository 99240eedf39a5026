//! Analysis entry point.
//!
//! Runs a text through one structure, or through every registered
//! structure when none is requested and keeps the best fit.

pub mod model;

use tracing::{debug, info};

use crate::error::{NarrError, NarrResult};
use crate::structure::{StructureRegistry, StructureType};
use model::AnalysisResult;

/// Analyses texts against the structures of a registry.
#[derive(Clone)]
pub struct Analyzer {
    registry: StructureRegistry,
}

impl Analyzer {
    pub fn new(registry: StructureRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    /// Analyse `text` against `structure`, or auto-detect when `None`.
    pub fn analyze(&self, text: &str, structure: Option<StructureType>) -> NarrResult<AnalysisResult> {
        if text.trim().is_empty() {
            return Err(NarrError::EmptyInput);
        }

        match structure {
            Some(structure_type) => {
                let structure = self
                    .registry
                    .get(structure_type)
                    .ok_or_else(|| NarrError::UnknownStructure(structure_type.to_string()))?;
                let result = structure.analyze(text)?;
                info!(
                    structure = %structure_type,
                    score = result.score(),
                    chars = text.chars().count(),
                    "Analysis complete"
                );
                Ok(result)
            }
            None => self.auto_detect(text),
        }
    }

    /// Run every structure and keep the highest scoring result. Ties keep
    /// the structure registered first.
    fn auto_detect(&self, text: &str) -> NarrResult<AnalysisResult> {
        let mut best: Option<AnalysisResult> = None;

        for structure in self.registry.iter() {
            let candidate = structure.analyze(text)?;
            debug!(
                structure = %candidate.structure_type,
                score = candidate.score(),
                "Auto-detect candidate"
            );
            let better = best
                .as_ref()
                .map_or(true, |current| candidate.score() > current.score());
            if better {
                best = Some(candidate);
            }
        }

        let mut result = best.ok_or_else(|| NarrError::config("no structures registered"))?;
        result.metadata.auto_detected = true;
        info!(
            structure = %result.structure_type,
            score = result.score(),
            "Auto-detected structure"
        );
        Ok(result)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(StructureRegistry::with_builtins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_rejected() {
        let analyzer = Analyzer::default();
        assert!(matches!(analyzer.analyze("   \n", None), Err(NarrError::EmptyInput)));
        assert!(matches!(
            analyzer.analyze("", Some(StructureType::ThreeAct)),
            Err(NarrError::EmptyInput)
        ));
    }

    #[test]
    fn test_explicit_structure() {
        let analyzer = Analyzer::default();
        let result = analyzer
            .analyze("Once upon a time.", Some(StructureType::HarmonCircle))
            .unwrap();
        assert_eq!(result.structure_type, StructureType::HarmonCircle);
        assert_eq!(result.metadata.structure_type, StructureType::HarmonCircle);
        assert!(!result.metadata.auto_detected);
        assert!((0.0..=1.0).contains(&result.metadata.confidence));
    }

    #[test]
    fn test_unregistered_structure() {
        let analyzer = Analyzer::new(StructureRegistry::new());
        let err = analyzer.analyze("text", Some(StructureType::ThreeAct)).unwrap_err();
        assert!(matches!(err, NarrError::UnknownStructure(_)));
    }

    #[test]
    fn test_auto_detect_prefers_best_fit() {
        let text = [
            "Every morning Ana walked the same routine path through her village home.",
            "She longed for more; her dream was to see the sea.",
            "The journey led her to a strange, unknown port.",
            "She had to learn the sailors' ways and struggle through every trial.",
            "At last she found the ship of her dreams and finally succeeded.",
            "But the price was high: she lost her brother at sea, a terrible sacrifice.",
            "She came back to the village, a quiet homecoming.",
            "Ana was changed, wiser, and never the same again.",
        ]
        .join(" ");

        let analyzer = Analyzer::default();
        let result = analyzer.analyze(&text, None).unwrap();
        assert_eq!(result.structure_type, StructureType::HarmonCircle);
        assert!(result.metadata.auto_detected);
    }

    #[test]
    fn test_auto_detect_tie_keeps_catalogue_order() {
        let analyzer = Analyzer::default();
        let result = analyzer.analyze("zzz zzz zzz", None).unwrap();
        assert_eq!(result.structure_type, StructureType::ThreeAct);
        assert_eq!(result.score(), 0.0);
    }
}
