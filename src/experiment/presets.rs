//! Ready-made experimental conditions from the visual search literature
//!
//! Each preset pairs a salience profile with the conditions it sweeps.
//! Set sizes count distractors; a set size of 0 is the target alone.

use crate::core::config::{ModelConfig, SalienceProfile};
use crate::core::error::{Result, SearchError};
use crate::experiment::suite::Condition;
use crate::search::features::PartSpec;

pub const PRESET_NAMES: &[&str] = &[
    "treisman-gelade",
    "wolfe",
    "buetti",
    "treisman-souther",
    "pomerantz",
    "relations-multicolor",
    "relations-monocolor",
    "emergent-multicolor",
    "emergent-multicolor-reduced",
    "emergent-monocolor",
];

#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub salience: SalienceProfile,
    pub conditions: Vec<Condition>,
}

impl Preset {
    /// `base` with this preset's salience applied
    pub fn configure(&self, base: &ModelConfig) -> Result<ModelConfig> {
        let mut config = base.clone();
        config.set_salience(self.salience)?;
        Ok(config)
    }

    /// Override the run count of every condition
    pub fn with_runs(mut self, runs: u32) -> Self {
        for condition in &mut self.conditions {
            condition.runs = runs;
        }
        self
    }
}

fn plain(color: &str, shape: &str) -> Vec<PartSpec> {
    vec![PartSpec::plain(color, shape)]
}

/// Two-part "upper above lower" item
fn pair(upper: (&str, &str), lower: (&str, &str)) -> Vec<PartSpec> {
    vec![
        PartSpec::new(upper.0, upper.1, "above"),
        PartSpec::new(lower.0, lower.1, "below"),
    ]
}

fn salience(color: f64, shape: f64, emergent: f64) -> SalienceProfile {
    SalienceProfile { color, shape, emergent }
}

const RELATION_SET_SIZES: &[u32] = &[0, 1, 3, 7, 15];

/// Three relational conditions sharing one target
fn relation_conditions(
    prefix: &str,
    target: Vec<PartSpec>,
    lures: [Vec<PartSpec>; 3],
) -> Vec<Condition> {
    let names = ["relation only", "relation + color", "color only"];
    names
        .iter()
        .zip(lures)
        .map(|(name, lure)| {
            Condition::new(&format!("{}: {}", prefix, name), target.clone(), vec![lure])
                .with_set_sizes(RELATION_SET_SIZES)
                .with_runs(52)
        })
        .collect()
}

/// Look up a preset by name
pub fn preset(name: &str) -> Result<Preset> {
    let preset = match name {
        "treisman-gelade" => Preset {
            name: "treisman-gelade",
            description: "Treisman & Gelade (1980): feature vs conjunction search",
            salience: SalienceProfile::default(),
            conditions: vec![
                Condition::new(
                    "Feature",
                    plain("blue", "X"),
                    vec![plain("dkgrn", "X"), plain("brown", "T1")],
                ),
                Condition::new(
                    "Conjunction",
                    plain("dkgrn", "T1"),
                    vec![plain("dkgrn", "X"), plain("brown", "T1")],
                ),
            ]
            .into_iter()
            .map(|c| c.with_set_sizes(&[0, 4, 14, 29]).with_runs(52))
            .collect(),
        },
        "wolfe" => Preset {
            name: "wolfe",
            description: "Wolfe, Cave & Franzel (1989): color x orientation",
            salience: SalienceProfile::default(),
            conditions: vec![
                Condition::new("Feature", plain("green", "horizontal"), vec![plain("red", "vertical")]),
                Condition::new(
                    "Conjunction",
                    plain("green", "horizontal"),
                    vec![plain("green", "vertical"), plain("red", "horizontal")],
                ),
            ]
            .into_iter()
            .map(|c| c.with_set_sizes(&[0, 2, 4, 8, 16, 24, 36]).with_runs(52))
            .collect(),
        },
        "buetti" => Preset {
            name: "buetti",
            description: "Buetti et al. (2016): target-distractor similarity",
            salience: salience(1.0, 1.5, 1.0),
            conditions: [("Dissimilar", "ltblue", "horizontal"), ("Medium", "yel2ow", "vertical"), ("Similar", "orange", "vertical")]
                .into_iter()
                .map(|(label, color, shape)| {
                    Condition::new(label, plain("red", "vertical"), vec![plain(color, shape)])
                        .with_set_sizes(&[0, 1, 4, 9, 19, 31])
                        .with_runs(52)
                })
                .collect(),
        },
        "treisman-souther" => Preset {
            name: "treisman-souther",
            description: "Treisman & Souther (1985): search asymmetry, Q among O and O among Q",
            salience: SalienceProfile::default(),
            conditions: vec![
                Condition::new("Q among O", plain("white", "Q"), vec![plain("white", "O")]),
                Condition::new("O among Q", plain("white", "O"), vec![plain("white", "Q")]),
            ]
            .into_iter()
            .map(|c| c.with_set_sizes(&[0, 5, 11]).with_runs(100))
            .collect(),
        },
        "pomerantz" => Preset {
            name: "pomerantz",
            description: "Pomerantz, Sager & Stoever (1977): configural superiority",
            salience: SalienceProfile::default(),
            conditions: vec![
                Condition::new("Diagonals", plain("red", "DORN2"), vec![plain("red", "DORN6")]),
                Condition::new("Parentheses", plain("red", "P1"), vec![plain("red", "P2")]),
                Condition::new("Arrows", plain("red", "arrow"), vec![plain("red", "triangle")]),
            ]
            .into_iter()
            .map(|c| c.with_set_sizes(&[1, 3, 5]).with_runs(100))
            .collect(),
        },
        "relations-multicolor" => Preset {
            name: "relations-multicolor",
            description: "Spatial relations (after Logan, 1994) with two-color items",
            salience: SalienceProfile::default(),
            conditions: relation_conditions(
                "Multicolor",
                pair(("red", "nocheatX"), ("green", "nocheatO")),
                [
                    pair(("green", "nocheatO"), ("red", "nocheatX")),
                    pair(("green", "nocheatO"), ("orange", "nocheatX")),
                    pair(("orange", "nocheatX"), ("green", "nocheatO")),
                ],
            ),
        },
        "relations-monocolor" => Preset {
            name: "relations-monocolor",
            description: "Spatial relations (after Logan, 1994) with single-color items",
            salience: SalienceProfile::default(),
            conditions: relation_conditions(
                "Monocolor",
                pair(("red", "nocheatX"), ("red", "nocheatO")),
                [
                    pair(("red", "nocheatO"), ("red", "nocheatX")),
                    pair(("orange", "nocheatO"), ("orange", "nocheatX")),
                    pair(("orange", "nocheatX"), ("orange", "nocheatO")),
                ],
            ),
        },
        "emergent-multicolor" | "emergent-multicolor-reduced" => {
            let reduced = name == "emergent-multicolor-reduced";
            Preset {
                name: if reduced { "emergent-multicolor-reduced" } else { "emergent-multicolor" },
                description: if reduced {
                    "Two-color relations with a weak emergent relation feature"
                } else {
                    "Two-color relations with an emergent relation feature"
                },
                salience: salience(1.0, 1.0, if reduced { 0.33 } else { 1.0 }),
                conditions: relation_conditions(
                    "Emergent multicolor",
                    pair(("red", "cheatXabove"), ("green", "cheatObelow")),
                    [
                        pair(("green", "cheatOabove"), ("red", "cheatXbelow")),
                        pair(("green", "cheatOabove"), ("orange", "cheatXbelow")),
                        pair(("orange", "cheatXabove"), ("green", "cheatObelow")),
                    ],
                ),
            }
        }
        "emergent-monocolor" => Preset {
            name: "emergent-monocolor",
            description: "Single-color relations with an emergent relation feature",
            salience: SalienceProfile::default(),
            conditions: relation_conditions(
                "Emergent monocolor",
                pair(("red", "cheatXabove"), ("red", "cheatObelow")),
                [
                    pair(("red", "cheatOabove"), ("red", "cheatXbelow")),
                    pair(("orange", "cheatOabove"), ("orange", "cheatXbelow")),
                    pair(("orange", "cheatXabove"), ("orange", "cheatObelow")),
                ],
            ),
        },
        other => return Err(SearchError::UnknownPreset(other.to_string())),
    };
    Ok(preset)
}

pub fn all_presets() -> Vec<Preset> {
    PRESET_NAMES.iter().filter_map(|name| preset(name).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::features::FeatureTables;

    #[test]
    fn test_every_name_resolves() {
        for name in PRESET_NAMES {
            let preset = preset(name).unwrap();
            assert_eq!(&preset.name, name);
            assert!(!preset.conditions.is_empty());
        }
        assert_eq!(all_presets().len(), PRESET_NAMES.len());
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(preset("nope"), Err(SearchError::UnknownPreset(_))));
    }

    #[test]
    fn test_preset_items_encode() {
        let tables = FeatureTables::standard();
        for preset in all_presets() {
            for condition in &preset.conditions {
                assert!(tables.encode_parts(&condition.target).is_ok(), "{}", condition.label);
                for lure in &condition.distractor_types {
                    assert!(tables.encode_parts(lure).is_ok(), "{}", condition.label);
                }
            }
        }
    }

    #[test]
    fn test_configure_applies_salience() {
        let base = ModelConfig::default();
        let config = preset("emergent-multicolor-reduced").unwrap().configure(&base).unwrap();
        assert_eq!(config.salience.emergent, 0.33);
        assert_eq!(config.rejection_threshold, base.rejection_threshold);

        let buetti = preset("buetti").unwrap().with_runs(3);
        assert!(buetti.conditions.iter().all(|c| c.runs == 3));
        assert_eq!(buetti.configure(&base).unwrap().salience.shape, 1.5);
    }
}
