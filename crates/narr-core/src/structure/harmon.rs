//! Dan Harmon's Story Circle.
//!
//! Eight steps around a circle: a character leaves a comfort zone, finds
//! what they wanted, pays for it and comes back changed.

use askama::Template;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{presence_label, render_fragment, Act, NarrativeStructure, StructureType};
use crate::analysis::model::{AnalysisResult, StructureReport};
use crate::error::NarrResult;
use crate::segment::{matched_keywords, split_even};

const CIRCLE_RADIUS_PX: f64 = 150.0;
const CIRCLE_SIZE_PX: f64 = 400.0;
const STEP_WIDTH_PX: f64 = 100.0;
const STEP_HEIGHT_PX: f64 = 40.0;

/// One step of the circle.
#[derive(Debug, Clone, Copy)]
pub struct StoryStep {
    pub number: u8,
    pub name: &'static str,
    pub short: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub act: Act,
    pub criteria: &'static [&'static str],
    pub keywords: &'static [&'static str],
}

pub const STORY_STEPS: [StoryStep; 8] = [
    StoryStep {
        number: 1,
        name: "Comfort Zone",
        short: "You",
        description: "A character is in a zone of comfort",
        color: "#e74c3c",
        act: Act::Beginning,
        criteria: &["character establishment", "initial world state", "status quo"],
        keywords: &["home", "ordinary", "everyday", "routine", "usual", "comfortable", "village", "every morning"],
    },
    StoryStep {
        number: 2,
        name: "Need or Desire",
        short: "Need",
        description: "But they want something",
        color: "#3498db",
        act: Act::Beginning,
        criteria: &["motivation clarity", "stakes establishment", "goal definition"],
        keywords: &["want", "wish", "desire", "need", "dream", "longed", "hoped", "goal"],
    },
    StoryStep {
        number: 3,
        name: "Unfamiliar Situation",
        short: "Go",
        description: "They enter an unfamiliar situation",
        color: "#2ecc71",
        act: Act::Middle,
        criteria: &["comfort zone departure", "new challenges", "initial adaptation"],
        keywords: &["strange", "unknown", "unfamiliar", "foreign", "journey", "arrived", "left home", "new world"],
    },
    StoryStep {
        number: 4,
        name: "Search and Adaptation",
        short: "Search",
        description: "Adapt to it",
        color: "#f39c12",
        act: Act::Middle,
        criteria: &["challenge handling", "skill development", "world exploration"],
        keywords: &["search", "adapt", "learn", "struggle", "train", "explore", "trial", "challenge"],
    },
    StoryStep {
        number: 5,
        name: "Getting What They Wanted",
        short: "Find",
        description: "Get what they wanted",
        color: "#9b59b6",
        act: Act::Middle,
        criteria: &["goal achievement", "price recognition", "consequence understanding"],
        keywords: &["found", "achieved", "won", "finally", "succeeded", "treasure", "victory", "reached"],
    },
    StoryStep {
        number: 6,
        name: "Paying the Price",
        short: "Take",
        description: "Pay a heavy price for it",
        color: "#e67e22",
        act: Act::Middle,
        criteria: &["sacrifice measurement", "cost evaluation", "change catalyst"],
        keywords: &["price", "cost", "sacrifice", "lost", "paid", "death", "wound", "consequence"],
    },
    StoryStep {
        number: 7,
        name: "Return to Familiar",
        short: "Return",
        description: "Then return to their familiar situation",
        color: "#1abc9c",
        act: Act::End,
        criteria: &["integration of change", "world comparison", "growth recognition"],
        keywords: &["return", "came back", "went home", "back home", "homecoming", "familiar"],
    },
    StoryStep {
        number: 8,
        name: "Changed State",
        short: "Change",
        description: "Having changed",
        color: "#34495e",
        act: Act::End,
        criteria: &["character evolution", "lesson application", "new normal"],
        keywords: &["changed", "transformed", "grew", "never the same", "lesson", "new life", "wiser"],
    },
];

#[derive(Template)]
#[template(path = "visualizations/harmon_circle.html")]
struct CircleTemplate {
    steps: Vec<StepView>,
}

/// View model for one step on the circle.
struct StepView {
    number: u8,
    name: &'static str,
    description: &'static str,
    color: &'static str,
    state: &'static str,
    left: String,
    top: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Strong,
    Medium,
    Weak,
}

impl Strength {
    fn from_hits(hits: usize) -> Self {
        match hits {
            0 => Self::Weak,
            1 | 2 => Self::Medium,
            _ => Self::Strong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Medium => "medium",
            Self::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Balance {
    WellBalanced,
    Unbalanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepAnalysis {
    pub number: u8,
    pub name: String,
    pub act: Act,
    pub presence: bool,
    pub strength: Strength,
    pub matched_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub criteria_met: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CircleEvaluation {
    pub circle_completion: bool,
    pub balance: Balance,
    /// Share of steps present.
    pub score: f64,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarmonReport {
    pub steps: Vec<StepAnalysis>,
    pub overall: CircleEvaluation,
}

/// Dan Harmon's Story Circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonStoryCircle;

impl HarmonStoryCircle {
    fn analyze_step(step: &StoryStep, segment: &str) -> StepAnalysis {
        let matched = matched_keywords(segment, step.keywords);
        let presence = !matched.is_empty();

        let suggestions = if presence {
            Vec::new()
        } else {
            vec![format!(
                "Strengthen '{}': {}",
                step.name,
                step.description.to_lowercase()
            )]
        };
        let criteria_met = if presence {
            step.criteria.iter().map(|c| c.to_string()).collect()
        } else {
            Vec::new()
        };

        StepAnalysis {
            number: step.number,
            name: step.name.to_string(),
            act: step.act,
            presence,
            strength: Strength::from_hits(matched.len()),
            matched_keywords: matched.into_iter().map(String::from).collect(),
            suggestions,
            criteria_met,
        }
    }

    fn evaluate_overall(steps: &[StepAnalysis]) -> CircleEvaluation {
        let present = steps.iter().filter(|s| s.presence).count();
        let every_act_covered = Act::ALL
            .iter()
            .all(|act| steps.iter().any(|s| s.act == *act && s.presence));

        let suggestions = steps
            .iter()
            .filter(|s| !s.presence)
            .map(|s| format!("Step {} ({}) is not clearly present", s.number, s.name))
            .collect();

        CircleEvaluation {
            circle_completion: present == steps.len(),
            balance: if every_act_covered { Balance::WellBalanced } else { Balance::Unbalanced },
            score: if steps.is_empty() { 0.0 } else { present as f64 / steps.len() as f64 },
            suggestions,
        }
    }

    /// Offset of a step from the circle centre, in pixels.
    pub fn step_position(step_number: u8, radius: f64) -> (f64, f64) {
        let angle = (f64::from(step_number) - 1.0) * 45.0 - 90.0;
        let radians = angle.to_radians();
        (radius * radians.cos(), radius * radians.sin())
    }

    fn describe(report: &HarmonReport) -> String {
        let present = report.steps.iter().filter(|s| s.presence).count();
        let mut lines = vec![
            format!("Steps identified: {}/{}", present, report.steps.len()),
        ];

        let mut current_act = None;
        for step in &report.steps {
            if current_act != Some(step.act) {
                current_act = Some(step.act);
                lines.push(format!("Act - {}:", step.act.label()));
            }
            let mut line = format!(
                "{}. {}: {} ({})",
                step.number,
                step.name,
                presence_label(step.presence),
                step.strength.label()
            );
            if !step.matched_keywords.is_empty() {
                line.push_str(&format!(" - matched: {}", step.matched_keywords.join(", ")));
            }
            lines.push(line);
        }

        lines.push(format!(
            "Circle completion: {}",
            if report.overall.circle_completion { "complete" } else { "incomplete" }
        ));
        lines.push(format!(
            "Balance: {}",
            match report.overall.balance {
                Balance::WellBalanced => "well balanced",
                Balance::Unbalanced => "unbalanced",
            }
        ));
        for suggestion in report.steps.iter().flat_map(|s| s.suggestions.iter()) {
            lines.push(format!("Suggestion: {}", suggestion));
        }

        lines.join("\n")
    }

    fn visualize(report: &HarmonReport) -> NarrResult<String> {
        let center = CIRCLE_SIZE_PX / 2.0;
        let steps = STORY_STEPS
            .iter()
            .zip(&report.steps)
            .map(|(step, analysis)| {
                let (x, y) = Self::step_position(step.number, CIRCLE_RADIUS_PX);
                StepView {
                    number: step.number,
                    name: step.name,
                    description: step.description,
                    color: step.color,
                    state: presence_label(analysis.presence),
                    left: format!("{:.1}", center + x - STEP_WIDTH_PX / 2.0),
                    top: format!("{:.1}", center + y - STEP_HEIGHT_PX / 2.0),
                }
            })
            .collect();

        render_fragment(&CircleTemplate { steps })
    }
}

impl NarrativeStructure for HarmonStoryCircle {
    fn structure_type(&self) -> StructureType {
        StructureType::HarmonCircle
    }

    fn units(&self) -> usize {
        STORY_STEPS.len()
    }

    fn analyze(&self, text: &str) -> NarrResult<AnalysisResult> {
        let started = Instant::now();
        let segments = split_even(text, STORY_STEPS.len());

        let steps: Vec<StepAnalysis> = STORY_STEPS
            .iter()
            .zip(segments)
            .map(|(step, segment)| Self::analyze_step(step, segment))
            .collect();
        let overall = Self::evaluate_overall(&steps);
        let report = HarmonReport { steps, overall };

        let analysis = Self::describe(&report);
        let visualization = Self::visualize(&report)?;
        Ok(AnalysisResult::build(
            StructureReport::HarmonCircle(report),
            analysis,
            visualization,
            started,
        ))
    }

    fn prompt(&self) -> String {
        let mut parts = vec![
            "Analyze the following narrative structure based on Dan Harmon's Story Circle:\n".to_string(),
        ];

        let mut current_act = None;
        for step in &STORY_STEPS {
            if current_act != Some(step.act) {
                current_act = Some(step.act);
                parts.push(format!("\nAct - {}:", step.act.label()));
            }
            parts.push(format!("{}. {} ({})", step.number, step.name, step.description));
            parts.push(format!("   Criteria: {}", step.criteria.join(", ")));
        }

        parts.join("\n")
    }
}
