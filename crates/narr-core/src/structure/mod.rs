//! Narrative structure catalogue.
//!
//! Each structure divides a story into units (acts, steps or stages),
//! assigns a contiguous segment of the text to every unit and looks for
//! the unit's keywords in it. Structures also render an HTML
//! visualization of their findings and a prompt describing themselves.

pub mod harmon;
pub mod model;
pub mod three_act;
pub mod vogler;

use askama::Template;
use std::sync::Arc;

use crate::analysis::model::AnalysisResult;
use crate::error::{NarrError, NarrResult};

pub use model::{Act, StructureInfo, StructureType};

/// A narrative pattern a story can be analysed against.
pub trait NarrativeStructure: Send + Sync {
    fn structure_type(&self) -> StructureType;

    fn display_name(&self) -> &'static str {
        self.structure_type().display_name()
    }

    /// Number of units the text is divided into.
    fn units(&self) -> usize;

    /// Analyse `text`. The text is expected to be non-empty.
    fn analyze(&self, text: &str) -> NarrResult<AnalysisResult>;

    /// Prompt describing the structure, for use with an external model.
    fn prompt(&self) -> String;

    fn info(&self) -> StructureInfo {
        StructureInfo {
            slug: self.structure_type().as_str().to_string(),
            display_name: self.display_name().to_string(),
            units: self.units(),
        }
    }
}

/// Immutable set of available structures.
#[derive(Clone)]
pub struct StructureRegistry {
    structures: Vec<Arc<dyn NarrativeStructure>>,
}

impl StructureRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self { structures: Vec::new() }
    }

    /// Registry holding every built-in structure in catalogue order.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(three_act::ThreeAct));
        registry.register(Arc::new(harmon::HarmonStoryCircle));
        registry.register(Arc::new(vogler::VoglerHeroJourney));
        registry
    }

    /// Add a structure, replacing one of the same type.
    pub fn register(&mut self, structure: Arc<dyn NarrativeStructure>) {
        let st = structure.structure_type();
        if let Some(slot) = self.structures.iter_mut().find(|s| s.structure_type() == st) {
            *slot = structure;
        } else {
            self.structures.push(structure);
        }
    }

    pub fn get(&self, structure_type: StructureType) -> Option<&Arc<dyn NarrativeStructure>> {
        self.structures.iter().find(|s| s.structure_type() == structure_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn NarrativeStructure>> {
        self.structures.iter()
    }

    pub fn list(&self) -> Vec<StructureInfo> {
        self.structures.iter().map(|s| s.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl Default for StructureRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Render a visualization template.
pub(crate) fn render_fragment<T: Template>(template: &T) -> NarrResult<String> {
    template
        .render()
        .map_err(|e| NarrError::Template(e.to_string()))
}

/// Presence label shared by the textual analyses.
pub(crate) fn presence_label(present: bool) -> &'static str {
    if present { "present" } else { "missing" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_in_catalogue_order() {
        let registry = StructureRegistry::with_builtins();
        let slugs: Vec<String> = registry.list().into_iter().map(|i| i.slug).collect();
        assert_eq!(slugs, vec!["three_act", "harmon_circle", "vogler_hero_journey"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_replaces_same_type() {
        let mut registry = StructureRegistry::with_builtins();
        registry.register(Arc::new(harmon::HarmonStoryCircle));
        assert_eq!(registry.len(), 3);
        assert!(registry.get(StructureType::HarmonCircle).is_some());
    }

    #[test]
    fn test_info_units() {
        let registry = StructureRegistry::with_builtins();
        let units: Vec<usize> = registry.list().iter().map(|i| i.units).collect();
        assert_eq!(units, vec![3, 8, 12]);
    }
}
