//! Chris Vogler's Hero's Journey.
//!
//! Twelve stages split between the Ordinary World and the Special World.
//! Each stage carries weighted elements; an element is present when one
//! of its keywords occurs in the stage's segment of the text.

use askama::Template;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{render_fragment, Act, NarrativeStructure, StructureType};
use crate::analysis::model::{AnalysisResult, StructureReport};
use crate::error::NarrResult;
use crate::segment::{keyword_hits, split_even};

const JOURNEY_RADIUS_PX: f64 = 400.0;
/// Characters of text counted as one length unit.
const WORLD_LENGTH_UNIT: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldType {
    Ordinary,
    Special,
}

impl WorldType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ordinary => "Ordinary World",
            Self::Special => "Special World",
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary-world",
            Self::Special => "special-world",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StageElement {
    pub name: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    /// 1-10
    pub importance: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub number: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub act: Act,
    pub world: WorldType,
    pub elements: &'static [StageElement],
    /// Position on the circular diagram, in degrees.
    pub angle: u16,
    pub color: &'static str,
}

pub const STAGES: [Stage; 12] = [
    Stage {
        number: 1,
        name: "Ordinary World",
        description: "Hero's starting point",
        act: Act::Beginning,
        world: WorldType::Ordinary,
        elements: &[
            StageElement {
                name: "Initial State",
                description: "Hero's life before the adventure",
                keywords: &["normal", "routine", "ordinary", "everyday"],
                importance: 9,
            },
            StageElement {
                name: "Character Establishment",
                description: "Introduction of hero's character",
                keywords: &["personality", "traits", "background", "life"],
                importance: 8,
            },
        ],
        angle: 0,
        color: "#e6f3ff",
    },
    Stage {
        number: 2,
        name: "Call to Adventure",
        description: "A challenge disrupts the ordinary world",
        act: Act::Beginning,
        world: WorldType::Ordinary,
        elements: &[
            StageElement {
                name: "Inciting Event",
                description: "Something arrives that demands action",
                keywords: &["message", "letter", "news", "call", "summons"],
                importance: 9,
            },
            StageElement {
                name: "Stakes",
                description: "What happens if the hero does nothing",
                keywords: &["danger", "threat", "must", "or else"],
                importance: 7,
            },
        ],
        angle: 30,
        color: "#d9ecff",
    },
    Stage {
        number: 3,
        name: "Refusal of the Call",
        description: "The hero hesitates",
        act: Act::Beginning,
        world: WorldType::Ordinary,
        elements: &[
            StageElement {
                name: "Hesitation",
                description: "Fear or doubt holds the hero back",
                keywords: &["refuse", "hesitate", "afraid", "fear", "doubt"],
                importance: 8,
            },
            StageElement {
                name: "Reason to Stay",
                description: "Ties that bind the hero to home",
                keywords: &["duty", "family", "cannot leave", "too old"],
                importance: 6,
            },
        ],
        angle: 60,
        color: "#cce5ff",
    },
    Stage {
        number: 4,
        name: "Meeting with the Mentor",
        description: "Guidance, training or a gift",
        act: Act::Beginning,
        world: WorldType::Ordinary,
        elements: &[
            StageElement {
                name: "Mentor Figure",
                description: "Someone who prepares the hero",
                keywords: &["mentor", "teacher", "old man", "wise", "guide"],
                importance: 9,
            },
            StageElement {
                name: "Gift",
                description: "Advice or an object for the road",
                keywords: &["gift", "advice", "sword", "map", "amulet"],
                importance: 7,
            },
        ],
        angle: 90,
        color: "#bfdfff",
    },
    Stage {
        number: 5,
        name: "Crossing the First Threshold",
        description: "The hero commits and enters the special world",
        act: Act::Beginning,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Commitment",
                description: "The hero decides to go",
                keywords: &["decided", "set out", "left", "departed", "crossed"],
                importance: 9,
            },
            StageElement {
                name: "Threshold",
                description: "A boundary between the worlds",
                keywords: &["gate", "border", "door", "bridge", "threshold"],
                importance: 6,
            },
        ],
        angle: 120,
        color: "#e8f5e9",
    },
    Stage {
        number: 6,
        name: "Tests, Allies, Enemies",
        description: "The hero learns the rules of the special world",
        act: Act::Middle,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Tests",
                description: "Challenges that build skill",
                keywords: &["test", "trial", "challenge", "fight"],
                importance: 8,
            },
            StageElement {
                name: "Allies and Enemies",
                description: "Who stands with the hero and who against",
                keywords: &["friend", "ally", "enemy", "rival", "companion"],
                importance: 8,
            },
        ],
        angle: 150,
        color: "#dcefdc",
    },
    Stage {
        number: 7,
        name: "Approach to the Inmost Cave",
        description: "Preparation for the central ordeal",
        act: Act::Middle,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Preparation",
                description: "Plans are made",
                keywords: &["plan", "prepare", "approach", "gather"],
                importance: 7,
            },
            StageElement {
                name: "Dread",
                description: "The dangerous place draws near",
                keywords: &["cave", "fortress", "lair", "dark", "deep"],
                importance: 6,
            },
        ],
        angle: 180,
        color: "#d0e9d0",
    },
    Stage {
        number: 8,
        name: "The Ordeal",
        description: "The hero faces the greatest challenge",
        act: Act::Middle,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Crisis",
                description: "A brush with death",
                keywords: &["ordeal", "battle", "death", "died", "nearly", "crisis"],
                importance: 10,
            },
            StageElement {
                name: "Confrontation",
                description: "The hero meets the opposing force",
                keywords: &["faced", "confront", "dragon", "villain", "monster"],
                importance: 8,
            },
        ],
        angle: 210,
        color: "#fff3e0",
    },
    Stage {
        number: 9,
        name: "Reward",
        description: "The hero seizes the prize",
        act: Act::Middle,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Prize",
                description: "What was won in the ordeal",
                keywords: &["reward", "treasure", "prize", "elixir", "won"],
                importance: 8,
            },
            StageElement {
                name: "Celebration",
                description: "A moment of relief",
                keywords: &["celebrate", "feast", "joy", "relief"],
                importance: 5,
            },
        ],
        angle: 240,
        color: "#ffe8cc",
    },
    Stage {
        number: 10,
        name: "The Road Back",
        description: "The hero turns toward home",
        act: Act::End,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Pursuit",
                description: "Consequences give chase",
                keywords: &["chase", "pursued", "escape", "fled", "road back"],
                importance: 7,
            },
            StageElement {
                name: "Recommitment",
                description: "The decision to return",
                keywords: &["home", "return", "journey back"],
                importance: 6,
            },
        ],
        angle: 270,
        color: "#fce4ec",
    },
    Stage {
        number: 11,
        name: "Resurrection",
        description: "A final test purifies the hero",
        act: Act::End,
        world: WorldType::Special,
        elements: &[
            StageElement {
                name: "Final Test",
                description: "The climactic confrontation",
                keywords: &["final", "last battle", "rose", "resurrection", "reborn"],
                importance: 10,
            },
            StageElement {
                name: "Transformation",
                description: "The hero emerges changed",
                keywords: &["changed", "transformed", "new man", "new woman", "purified"],
                importance: 8,
            },
        ],
        angle: 300,
        color: "#f8d7e3",
    },
    Stage {
        number: 12,
        name: "Return with the Elixir",
        description: "The hero brings something back",
        act: Act::End,
        world: WorldType::Ordinary,
        elements: &[
            StageElement {
                name: "Homecoming",
                description: "Arrival in the ordinary world",
                keywords: &["returned", "came home", "back home", "village"],
                importance: 8,
            },
            StageElement {
                name: "Shared Boon",
                description: "The prize benefits others",
                keywords: &["shared", "healed", "saved", "gift", "elixir"],
                importance: 8,
            },
        ],
        angle: 330,
        color: "#e6f3ff",
    },
];

struct StageView {
    number: u8,
    name: &'static str,
    description: &'static str,
    world_class: &'static str,
    x: String,
    y: String,
    background: String,
}

#[derive(Template)]
#[template(path = "visualizations/vogler_journey.html")]
struct JourneyTemplate {
    stages: Vec<StageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementCheck {
    pub name: String,
    pub importance: u8,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageAnalysis {
    pub number: u8,
    pub name: String,
    pub act: Act,
    pub world: WorldType,
    pub elements_present: Vec<ElementCheck>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Share of elements present.
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldAnalysis {
    pub world: WorldType,
    /// Text length spent in this world, in thousands of characters.
    /// A length measure, not a quality score.
    pub length_units: f64,
    /// Share of stages set in this world.
    pub balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyEvaluation {
    /// Mean stage score.
    pub completeness: f64,
    /// Ratio of the shorter world's length to the longer one's.
    pub balance: f64,
    /// Share of adjacent stage pairs that are both developed.
    pub flow: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoglerReport {
    pub stages: Vec<StageAnalysis>,
    pub ordinary_world: WorldAnalysis,
    pub special_world: WorldAnalysis,
    pub overall: JourneyEvaluation,
}

/// Chris Vogler's Hero's Journey.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoglerHeroJourney;

impl VoglerHeroJourney {
    fn analyze_stage(stage: &Stage, segment: &str) -> StageAnalysis {
        let mut elements_present = Vec::with_capacity(stage.elements.len());
        let mut strengths = Vec::new();
        let mut weaknesses = Vec::new();

        for element in stage.elements {
            let present = keyword_hits(segment, element.keywords) > 0;
            if present {
                strengths.push(format!("{} is well established", element.name));
            } else {
                weaknesses.push(format!("{} needs more development", element.name));
            }
            elements_present.push(ElementCheck {
                name: element.name.to_string(),
                importance: element.importance,
                present,
            });
        }

        let present = elements_present.iter().filter(|e| e.present).count();
        let score = if stage.elements.is_empty() {
            0.0
        } else {
            present as f64 / stage.elements.len() as f64
        };

        StageAnalysis {
            number: stage.number,
            name: stage.name.to_string(),
            act: stage.act,
            world: stage.world,
            elements_present,
            strengths,
            weaknesses,
            score,
        }
    }

    fn analyze_world(world: WorldType, segments: &[&str]) -> WorldAnalysis {
        let chars: usize = STAGES
            .iter()
            .zip(segments)
            .filter(|(stage, _)| stage.world == world)
            .map(|(_, segment)| segment.chars().count())
            .sum();
        let stages = STAGES.iter().filter(|s| s.world == world).count();

        WorldAnalysis {
            world,
            length_units: chars as f64 / WORLD_LENGTH_UNIT,
            balance: stages as f64 / STAGES.len() as f64,
        }
    }

    fn evaluate_overall(
        stages: &[StageAnalysis],
        ordinary: &WorldAnalysis,
        special: &WorldAnalysis,
    ) -> JourneyEvaluation {
        let completeness = if stages.is_empty() {
            0.0
        } else {
            stages.iter().map(|s| s.score).sum::<f64>() / stages.len() as f64
        };

        let longer = ordinary.length_units.max(special.length_units);
        let balance = if longer > 0.0 {
            ordinary.length_units.min(special.length_units) / longer
        } else {
            0.0
        };

        let pairs = stages.len().saturating_sub(1);
        let flow = if pairs == 0 {
            0.0
        } else {
            let connected = stages
                .windows(2)
                .filter(|w| w[0].score > 0.0 && w[1].score > 0.0)
                .count();
            connected as f64 / pairs as f64
        };

        JourneyEvaluation { completeness, balance, flow }
    }

    /// Background colour for a stage: greener as the score rises.
    pub fn color_for_score(score: f64) -> String {
        let green = (score.clamp(0.0, 1.0) * 255.0) as u8;
        format!("rgb(200, {}, 200)", green)
    }

    fn describe(report: &VoglerReport) -> String {
        let mut lines = vec![format!(
            "Completeness: {:.0}%, world balance: {:.2}, flow: {:.2}",
            report.overall.completeness * 100.0,
            report.overall.balance,
            report.overall.flow
        )];

        let mut current_world = None;
        for stage in &report.stages {
            if current_world != Some(stage.world) {
                current_world = Some(stage.world);
                lines.push(format!("{}:", stage.world.label()));
            }
            lines.push(format!("{}. {} - score {:.2}", stage.number, stage.name, stage.score));
            for strength in &stage.strengths {
                lines.push(format!("   + {}", strength));
            }
            for weakness in &stage.weaknesses {
                lines.push(format!("   - {}", weakness));
            }
        }

        lines.join("\n")
    }

    fn visualize(report: &VoglerReport) -> NarrResult<String> {
        let stages = STAGES
            .iter()
            .zip(&report.stages)
            .map(|(stage, analysis)| {
                let radians = f64::from(stage.angle).to_radians();
                StageView {
                    number: stage.number,
                    name: stage.name,
                    description: stage.description,
                    world_class: stage.world.css_class(),
                    x: format!("{:.1}", JOURNEY_RADIUS_PX * radians.cos()),
                    y: format!("{:.1}", JOURNEY_RADIUS_PX * radians.sin()),
                    background: Self::color_for_score(analysis.score),
                }
            })
            .collect();

        render_fragment(&JourneyTemplate { stages })
    }
}

impl NarrativeStructure for VoglerHeroJourney {
    fn structure_type(&self) -> StructureType {
        StructureType::VoglerHeroJourney
    }

    fn units(&self) -> usize {
        STAGES.len()
    }

    fn analyze(&self, text: &str) -> NarrResult<AnalysisResult> {
        let started = Instant::now();
        let segments = split_even(text, STAGES.len());

        let stages: Vec<StageAnalysis> = STAGES
            .iter()
            .zip(&segments)
            .map(|(stage, segment)| Self::analyze_stage(stage, segment))
            .collect();
        let ordinary_world = Self::analyze_world(WorldType::Ordinary, &segments);
        let special_world = Self::analyze_world(WorldType::Special, &segments);
        let overall = Self::evaluate_overall(&stages, &ordinary_world, &special_world);

        let report = VoglerReport { stages, ordinary_world, special_world, overall };
        let analysis = Self::describe(&report);
        let visualization = Self::visualize(&report)?;
        Ok(AnalysisResult::build(
            StructureReport::VoglerHeroJourney(report),
            analysis,
            visualization,
            started,
        ))
    }

    fn prompt(&self) -> String {
        let mut parts = vec![
            "Analyze the following narrative structure based on Chris Vogler's Hero's Journey:\n".to_string(),
        ];

        let mut current_act = None;
        let mut current_world = None;
        for stage in &STAGES {
            if current_act != Some(stage.act) {
                current_act = Some(stage.act);
                parts.push(format!("\nAct - {}:", stage.act.label()));
            }
            if current_world != Some(stage.world) {
                current_world = Some(stage.world);
                parts.push(format!("\n{}:", stage.world.label()));
            }

            parts.push(format!("\n{}. {}", stage.number, stage.name));
            parts.push(format!("   Description: {}", stage.description));
            for element in stage.elements {
                parts.push(format!(
                    "   - {} (Importance: {}/10): {}",
                    element.name, element.importance, element.description
                ));
            }
        }

        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_of(text: &str) -> VoglerReport {
        match VoglerHeroJourney.analyze(text).unwrap().report {
            StructureReport::VoglerHeroJourney(r) => r,
            other => panic!("unexpected report {:?}", other.structure_type()),
        }
    }

    #[test]
    fn test_stage_catalogue() {
        assert_eq!(STAGES.len(), 12);
        for (i, stage) in STAGES.iter().enumerate() {
            assert_eq!(stage.number as usize, i + 1);
            assert_eq!(stage.angle as usize, i * 30);
            assert!(!stage.elements.is_empty());
            assert!(stage.elements.iter().all(|e| (1..=10).contains(&e.importance)));
        }
        let ordinary = STAGES.iter().filter(|s| s.world == WorldType::Ordinary).count();
        assert_eq!(ordinary, 5);
    }

    #[test]
    fn test_keywordless_text() {
        let report = report_of(&"zz ".repeat(200));
        assert_eq!(report.overall.completeness, 0.0);
        assert_eq!(report.overall.flow, 0.0);
        assert!(report.stages.iter().all(|s| s.strengths.is_empty()));
        assert_eq!(report.stages[0].weaknesses[0], "Initial State needs more development");
    }

    #[test]
    fn test_uniform_keywords_everywhere() {
        // Every segment contains a keyword of each stage's first element.
        let chunk = "normal message fear mentor decided test plan ordeal reward chase final returned ";
        let report = report_of(&chunk.repeat(24));
        assert!(report.stages.iter().all(|s| s.score >= 0.5));
        assert_eq!(report.overall.flow, 1.0);
        assert!(report.overall.completeness >= 0.5);
        assert_eq!(report.stages[0].strengths[0], "Initial State is well established");
    }

    #[test]
    fn test_world_analysis() {
        let text = "a".repeat(1200);
        let report = report_of(&text);
        // 5 ordinary stages of 100 chars, 7 special stages of 100 chars.
        assert!((report.ordinary_world.length_units - 0.5).abs() < 1e-9);
        assert!((report.special_world.length_units - 0.7).abs() < 1e-9);
        assert!((report.ordinary_world.balance - 5.0 / 12.0).abs() < 1e-9);
        assert!((report.overall.balance - 0.5 / 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_color_for_score() {
        assert_eq!(VoglerHeroJourney::color_for_score(0.0), "rgb(200, 0, 200)");
        assert_eq!(VoglerHeroJourney::color_for_score(1.0), "rgb(200, 255, 200)");
        assert_eq!(VoglerHeroJourney::color_for_score(0.5), "rgb(200, 127, 200)");
    }

    #[test]
    fn test_prompt() {
        let prompt = VoglerHeroJourney.prompt();
        assert!(prompt.contains("Chris Vogler's Hero's Journey"));
        assert!(prompt.contains("Ordinary World:"));
        assert!(prompt.contains("Special World:"));
        assert!(prompt.contains("   - Initial State (Importance: 9/10)"));
        assert!(prompt.contains("12. Return with the Elixir"));
    }

    #[test]
    fn test_visualization_has_every_stage() {
        let result = VoglerHeroJourney.analyze("A normal life.").unwrap();
        for stage in &STAGES {
            assert!(result.visualization.contains(&format!("stage-{}'", stage.number)));
        }
        assert!(result.visualization.contains("special-world"));
        assert!(result.visualization.contains("<style>"));
    }

    #[test]
    fn test_visualization_escapes_descriptions() {
        let html = VoglerHeroJourney.analyze("A normal life.").unwrap().visualization;
        assert!(!html.contains("Hero's starting point"));
        assert!(
            html.contains("Hero&#x27;s starting point") || html.contains("Hero&#39;s starting point")
        );
    }
}
