//! Classic three-act structure: setup, confrontation, resolution.

use askama::Template;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{presence_label, render_fragment, NarrativeStructure, StructureType};
use crate::analysis::model::{AnalysisResult, StructureReport};
use crate::error::NarrResult;
use crate::segment::{matched_keywords, split_weighted};

#[derive(Debug, Clone, Copy)]
pub struct Beat {
    pub name: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct ActSpec {
    pub number: u8,
    pub name: &'static str,
    /// Relative share of the story.
    pub weight: u32,
    pub color: &'static str,
    pub beats: &'static [Beat],
}

pub const ACTS: [ActSpec; 3] = [
    ActSpec {
        number: 1,
        name: "Setup",
        weight: 1,
        color: "#3498db",
        beats: &[
            Beat {
                name: "Inciting Incident",
                description: "An event upsets the protagonist's world",
                keywords: &["suddenly", "one day", "until", "news", "arrived", "discovered"],
            },
            Beat {
                name: "First Plot Point",
                description: "The protagonist commits to the central conflict",
                keywords: &["decided", "agreed", "set out", "no choice", "must", "left"],
            },
        ],
    },
    ActSpec {
        number: 2,
        name: "Confrontation",
        weight: 2,
        color: "#e67e22",
        beats: &[
            Beat {
                name: "Midpoint",
                description: "A reversal raises the stakes",
                keywords: &["realized", "revealed", "truth", "betrayed", "secret", "turned"],
            },
            Beat {
                name: "Second Plot Point",
                description: "All seems lost",
                keywords: &["lost", "failed", "defeat", "despair", "alone", "captured"],
            },
        ],
    },
    ActSpec {
        number: 3,
        name: "Resolution",
        weight: 1,
        color: "#27ae60",
        beats: &[
            Beat {
                name: "Climax",
                description: "The decisive confrontation",
                keywords: &["final", "battle", "faced", "confronted", "fought", "showdown"],
            },
            Beat {
                name: "Resolution",
                description: "A new equilibrium",
                keywords: &["peace", "ever after", "home", "at last", "healed", "together"],
            },
        ],
    },
];

struct BeatView {
    name: String,
    state: &'static str,
}

struct ActView {
    number: u8,
    name: &'static str,
    color: &'static str,
    width: String,
    beats: Vec<BeatView>,
}

#[derive(Template)]
#[template(path = "visualizations/three_act.html")]
struct ActsTemplate {
    acts: Vec<ActView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatAnalysis {
    pub name: String,
    pub present: bool,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActAnalysis {
    pub number: u8,
    pub name: String,
    /// Characters of text assigned to the act.
    pub length: usize,
    pub beats: Vec<BeatAnalysis>,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeActEvaluation {
    /// Share of beats present across all acts.
    pub score: f64,
    pub missing_beats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeActReport {
    pub acts: Vec<ActAnalysis>,
    pub overall: ThreeActEvaluation,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeAct;

impl ThreeAct {
    fn analyze_act(act: &ActSpec, segment: &str) -> ActAnalysis {
        let beats: Vec<BeatAnalysis> = act
            .beats
            .iter()
            .map(|beat| {
                let matched = matched_keywords(segment, beat.keywords);
                BeatAnalysis {
                    name: beat.name.to_string(),
                    present: !matched.is_empty(),
                    matched_keywords: matched.into_iter().map(String::from).collect(),
                }
            })
            .collect();

        let present = beats.iter().filter(|b| b.present).count();
        let score = if beats.is_empty() { 0.0 } else { present as f64 / beats.len() as f64 };

        ActAnalysis {
            number: act.number,
            name: act.name.to_string(),
            length: segment.chars().count(),
            beats,
            score,
        }
    }

    fn evaluate_overall(acts: &[ActAnalysis]) -> ThreeActEvaluation {
        let beats: Vec<&BeatAnalysis> = acts.iter().flat_map(|a| a.beats.iter()).collect();
        let present = beats.iter().filter(|b| b.present).count();

        ThreeActEvaluation {
            score: if beats.is_empty() { 0.0 } else { present as f64 / beats.len() as f64 },
            missing_beats: beats
                .iter()
                .filter(|b| !b.present)
                .map(|b| b.name.clone())
                .collect(),
        }
    }

    fn describe(report: &ThreeActReport) -> String {
        let mut lines = Vec::new();
        for act in &report.acts {
            lines.push(format!("Act {} - {} ({} chars)", act.number, act.name, act.length));
            for beat in &act.beats {
                let mut line = format!("   {}: {}", beat.name, presence_label(beat.present));
                if !beat.matched_keywords.is_empty() {
                    line.push_str(&format!(" - matched: {}", beat.matched_keywords.join(", ")));
                }
                lines.push(line);
            }
        }
        if !report.overall.missing_beats.is_empty() {
            lines.push(format!("Missing beats: {}", report.overall.missing_beats.join(", ")));
        }
        lines.join("\n")
    }

    fn visualize(report: &ThreeActReport) -> NarrResult<String> {
        let total_weight: u32 = ACTS.iter().map(|a| a.weight).sum();
        let acts = ACTS
            .iter()
            .zip(&report.acts)
            .map(|(spec, act)| ActView {
                number: spec.number,
                name: spec.name,
                color: spec.color,
                width: format!("{:.1}", f64::from(spec.weight) / f64::from(total_weight) * 100.0),
                beats: act
                    .beats
                    .iter()
                    .map(|beat| BeatView {
                        name: beat.name.clone(),
                        state: presence_label(beat.present),
                    })
                    .collect(),
            })
            .collect();

        render_fragment(&ActsTemplate { acts })
    }
}

impl NarrativeStructure for ThreeAct {
    fn structure_type(&self) -> StructureType {
        StructureType::ThreeAct
    }

    fn units(&self) -> usize {
        ACTS.len()
    }

    fn analyze(&self, text: &str) -> NarrResult<AnalysisResult> {
        let started = Instant::now();
        let weights: Vec<u32> = ACTS.iter().map(|a| a.weight).collect();
        let segments = split_weighted(text, &weights);

        let acts: Vec<ActAnalysis> = ACTS
            .iter()
            .zip(segments)
            .map(|(act, segment)| Self::analyze_act(act, segment))
            .collect();
        let overall = Self::evaluate_overall(&acts);
        let report = ThreeActReport { acts, overall };

        let analysis = Self::describe(&report);
        let visualization = Self::visualize(&report)?;
        Ok(AnalysisResult::build(StructureReport::ThreeAct(report), analysis, visualization, started))
    }

    fn prompt(&self) -> String {
        let mut parts = vec![
            "Analyze the following narrative structure based on the classic Three-Act structure:\n".to_string(),
        ];
        for act in &ACTS {
            parts.push(format!("\nAct {} - {}:", act.number, act.name));
            for beat in act.beats {
                parts.push(format!("   - {} ({})", beat.name, beat.description));
            }
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_of(text: &str) -> ThreeActReport {
        match ThreeAct.analyze(text).unwrap().report {
            StructureReport::ThreeAct(r) => r,
            other => panic!("unexpected report {:?}", other.structure_type()),
        }
    }

    #[test]
    fn test_acts_split_quarter_half_quarter() {
        let report = report_of(&"x".repeat(400));
        let lengths: Vec<usize> = report.acts.iter().map(|a| a.length).collect();
        assert_eq!(lengths, vec![100, 200, 100]);
        assert_eq!(report.overall.score, 0.0);
        assert_eq!(report.overall.missing_beats.len(), 6);
    }

    #[test]
    fn test_beats_found_in_their_act() {
        let setup = "One day news arrived and she decided to go. ";
        let confrontation = "She realized the truth, yet she failed and was captured. ";
        let resolution = "The final battle ended in peace. ";
        // Pad so each act lands in its own segment.
        let text = format!(
            "{:<100}{:<200}{:<100}",
            setup, confrontation, resolution
        );
        let report = report_of(&text);
        assert!(report.acts.iter().all(|a| a.score == 1.0), "{:?}", report.acts);
        assert_eq!(report.overall.score, 1.0);
        assert!(report.overall.missing_beats.is_empty());
    }

    #[test]
    fn test_analysis_text_and_visualization() {
        let result = ThreeAct.analyze("One day it began.").unwrap();
        assert_eq!(result.structure, "Three-Act");
        assert!(result.analysis.starts_with("Act 1 - Setup"));
        assert!(result.visualization.contains("width: 25.0%"));
        assert!(result.visualization.contains("width: 50.0%"));
        assert!(result.visualization.contains("<div class='beat missing'>Climax</div>"));

        let html = ThreeAct.analyze(&format!("{:<400}", "One day it began.")).unwrap().visualization;
        assert!(html.contains("<div class='beat present'>Inciting Incident</div>"));
    }

    #[test]
    fn test_prompt_lists_beats() {
        let prompt = ThreeAct.prompt();
        assert!(prompt.contains("Act 2 - Confrontation:"));
        assert!(prompt.contains("   - Climax (The decisive confrontation)"));
    }
}
