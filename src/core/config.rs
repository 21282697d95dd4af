//! Search model configuration with documented constants
//!
//! All tunable numbers of the model are collected here with explanations of
//! their purpose and how they interact with each other. A configuration is
//! immutable during a run; changes go through the validating setters.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, SearchError};
use crate::core::types::Point;
use crate::search::features::FeatureLayout;

/// Shape dimensions shared by every shape family; anything past this index
/// in the shape band is an emergent-feature unit.
pub const BASE_SHAPE_DIMENSIONS: usize = 27;

/// How distance from fixation attenuates sampling fidelity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DistanceCost {
    /// `weight = max(0, 1 - distance / distance_at_zero)`
    Linear { distance_at_zero: f64 },
    /// `weight = 1 / (1 + falloff_rate * distance / display_radius)`
    Asymptotic { falloff_rate: f64 },
}

impl Default for DistanceCost {
    fn default() -> Self {
        // Weight reaches zero at four display radii
        DistanceCost::Linear { distance_at_zero: 800.0 }
    }
}

/// Arrangement of candidate item locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    Cartesian,
    Polar,
    PolarDense,
}

/// Geometry of the simulated search display (screen units)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Center of the display; also where fixation starts every run
    pub center: Point,

    /// Half-width of the display. Also the `DISPLAY_RADIUS` used by the
    /// asymptotic distance cost.
    pub radius: f64,

    /// Radius of a single item (half the side of a square item)
    pub item_radius: f64,

    /// Spacing between adjacent item locations; should exceed
    /// `2 * item_radius` so items never overlap
    pub item_distance: f64,

    pub layout: GridLayout,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            center: Point::new(300.0, 300.0),
            radius: 200.0,
            item_radius: 10.0,
            item_distance: 22.0,
            layout: GridLayout::Cartesian,
        }
    }
}

/// Per-band multipliers on how strongly a dimension contributes to matching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalienceProfile {
    pub color: f64,
    pub shape: f64,
    /// Shape dimensions beyond the shared base band (emergent features)
    pub emergent: f64,
}

impl Default for SalienceProfile {
    fn default() -> Self {
        Self { color: 1.0, shape: 1.0, emergent: 1.0 }
    }
}

impl SalienceProfile {
    /// Expand to one salience value per dimension of `layout`
    ///
    /// Relation dimensions get zero; they never take part in parallel
    /// matching.
    pub fn expand(&self, layout: &FeatureLayout) -> Vec<f64> {
        let mut salience = Vec::with_capacity(layout.total());
        salience.extend(std::iter::repeat(self.color).take(layout.color));
        for i in 0..layout.shape {
            salience.push(if i < BASE_SHAPE_DIMENSIONS { self.shape } else { self.emergent });
        }
        salience.extend(std::iter::repeat(0.0).take(layout.role));
        salience
    }
}

/// Configuration for the search model
///
/// The defaults reproduce the reference parameterisation used for the
/// feature and conjunction search simulations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    // === REJECTION ===
    /// Integrator value below which an item is rejected during parallel
    /// processing.
    ///
    /// Should sit above `min_selection_priority`. At or below the floor no
    /// item is ever rejected in parallel and only serial scrutiny can reject.
    pub rejection_threshold: f64,

    /// Iterations added when the model concludes the target is absent
    pub target_absent_cost: u64,

    /// Proportion of each integrator lost per iteration (`1 - decay` is kept)
    pub item_integrator_decay: f64,

    /// Spread of the initial integrator: `1 + U[0,1) * noise`. Breaks ties
    /// between identical items at the start of a run.
    pub exogenous_cue_noise: f64,

    // === PARALLEL SAMPLING ===
    /// Probability of sampling a relevant dimension on a given iteration
    pub p_relevant_sampling: f64,

    /// Probability of sampling an irrelevant dimension.
    ///
    /// 0.3 lets irrelevant dimensions swamp high target-distractor
    /// similarity; 0.1 flattens medium and high similarity together.
    pub p_irrelevant_sampling: f64,

    /// Floor for the integrator (and so the selection priority) of viable
    /// items. Must be positive.
    pub min_selection_priority: f64,

    /// Multiplier on the normalised parallel match
    pub match_weight: f64,

    /// Weight of a sampled dimension present in the template
    pub in_template_weight: f64,

    /// Penalty for an item feature the template does not have
    pub out_of_template_weight: f64,

    pub salience: SalienceProfile,

    // === ATTENTION AND EYES ===
    /// Iterations between selecting an item and scrutinising it
    pub attention_shift_cost: u32,

    /// Whether selecting an item may move fixation onto it
    pub permit_eye_movements: bool,

    /// Iterations spent on a saccade; all processing is suspended
    pub eye_movement_time_cost: u64,

    pub distance_cost: DistanceCost,

    pub display: DisplayConfig,

    // === SAFETY VALVE ===
    /// Optional hard cap on iterations per run. `None` reproduces the
    /// unbounded reference behaviour.
    pub max_iterations: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            rejection_threshold: 0.001,
            target_absent_cost: 20,
            item_integrator_decay: 0.5,
            exogenous_cue_noise: 0.1,

            p_relevant_sampling: 0.85,
            p_irrelevant_sampling: 0.15,
            min_selection_priority: 0.0001,
            match_weight: 3.0,
            in_template_weight: 3.0,
            out_of_template_weight: 0.1,
            salience: SalienceProfile::default(),

            attention_shift_cost: 2,
            permit_eye_movements: true,
            eye_movement_time_cost: 30,
            distance_cost: DistanceCost::default(),
            display: DisplayConfig::default(),

            max_iterations: None,
        }
    }
}

fn check_probability(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(SearchError::InvalidConfig(format!(
            "{} ({}) must be within [0, 1]",
            name, value
        )));
    }
    Ok(())
}

fn check_nonnegative(name: &str, value: f64) -> Result<()> {
    if !(value >= 0.0) || !value.is_finite() {
        return Err(SearchError::InvalidConfig(format!(
            "{} ({}) must be finite and nonnegative",
            name, value
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) || !value.is_finite() {
        return Err(SearchError::InvalidConfig(format!(
            "{} ({}) must be finite and positive",
            name, value
        )));
    }
    Ok(())
}

impl ModelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document; missing fields take defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ModelConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        check_nonnegative("rejection_threshold", self.rejection_threshold)?;
        check_probability("item_integrator_decay", self.item_integrator_decay)?;
        check_nonnegative("exogenous_cue_noise", self.exogenous_cue_noise)?;
        check_probability("p_relevant_sampling", self.p_relevant_sampling)?;
        check_probability("p_irrelevant_sampling", self.p_irrelevant_sampling)?;
        check_positive("min_selection_priority", self.min_selection_priority)?;
        check_nonnegative("match_weight", self.match_weight)?;
        check_nonnegative("in_template_weight", self.in_template_weight)?;
        check_nonnegative("out_of_template_weight", self.out_of_template_weight)?;
        check_nonnegative("salience.color", self.salience.color)?;
        check_nonnegative("salience.shape", self.salience.shape)?;
        check_nonnegative("salience.emergent", self.salience.emergent)?;

        match self.distance_cost {
            DistanceCost::Linear { distance_at_zero } => {
                check_positive("distance_at_zero", distance_at_zero)?
            }
            DistanceCost::Asymptotic { falloff_rate } => {
                check_nonnegative("falloff_rate", falloff_rate)?
            }
        }

        check_positive("display.radius", self.display.radius)?;
        check_positive("display.item_radius", self.display.item_radius)?;
        check_positive("display.item_distance", self.display.item_distance)?;
        if !self.display.center.x.is_finite() || !self.display.center.y.is_finite() {
            return Err(SearchError::InvalidConfig("display.center must be finite".into()));
        }

        if self.max_iterations == Some(0) {
            return Err(SearchError::InvalidConfig("max_iterations must be positive".into()));
        }

        Ok(())
    }

    /// Apply `change` to a copy and commit it only if the result validates
    pub fn update(&mut self, change: impl FnOnce(&mut ModelConfig)) -> Result<()> {
        let mut candidate = self.clone();
        change(&mut candidate);
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    pub fn set_rejection_threshold(&mut self, threshold: f64) -> Result<()> {
        self.update(|c| c.rejection_threshold = threshold)
    }

    pub fn set_target_absent_cost(&mut self, cost: u64) -> Result<()> {
        self.update(|c| c.target_absent_cost = cost)
    }

    pub fn set_integrator_decay(&mut self, decay: f64) -> Result<()> {
        self.update(|c| c.item_integrator_decay = decay)
    }

    pub fn set_sampling(&mut self, relevant: f64, irrelevant: f64) -> Result<()> {
        self.update(|c| {
            c.p_relevant_sampling = relevant;
            c.p_irrelevant_sampling = irrelevant;
        })
    }

    pub fn set_min_selection_priority(&mut self, floor: f64) -> Result<()> {
        self.update(|c| c.min_selection_priority = floor)
    }

    pub fn set_match_weights(&mut self, matched: f64, in_template: f64, out_of_template: f64) -> Result<()> {
        self.update(|c| {
            c.match_weight = matched;
            c.in_template_weight = in_template;
            c.out_of_template_weight = out_of_template;
        })
    }

    pub fn set_salience(&mut self, salience: SalienceProfile) -> Result<()> {
        self.update(|c| c.salience = salience)
    }

    pub fn set_attention_shift_cost(&mut self, cost: u32) -> Result<()> {
        self.update(|c| c.attention_shift_cost = cost)
    }

    pub fn set_permit_eye_movements(&mut self, permit: bool) -> Result<()> {
        self.update(|c| c.permit_eye_movements = permit)
    }

    pub fn set_eye_movement_time_cost(&mut self, cost: u64) -> Result<()> {
        self.update(|c| c.eye_movement_time_cost = cost)
    }

    pub fn set_distance_cost(&mut self, cost: DistanceCost) -> Result<()> {
        self.update(|c| c.distance_cost = cost)
    }

    pub fn set_display(&mut self, display: DisplayConfig) -> Result<()> {
        self.update(|c| c.display = display)
    }

    pub fn set_max_iterations(&mut self, cap: Option<u64>) -> Result<()> {
        self.update(|c| c.max_iterations = cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ModelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejection_sits_above_priority_floor() {
        let config = ModelConfig::default();
        assert!(config.rejection_threshold > config.min_selection_priority);
    }

    #[test]
    fn test_invalid_setter_leaves_config_untouched() {
        let mut config = ModelConfig::default();
        let err = config.set_rejection_threshold(-1.0);
        assert!(matches!(err, Err(SearchError::InvalidConfig(_))));
        assert_eq!(config.rejection_threshold, 0.001);

        assert!(config.set_sampling(1.5, 0.1).is_err());
        assert_eq!(config.p_relevant_sampling, 0.85);
        assert_eq!(config.p_irrelevant_sampling, 0.15);
    }

    #[test]
    fn test_valid_setter_commits() {
        let mut config = ModelConfig::default();
        config.set_sampling(0.95, 0.1).unwrap();
        assert_eq!(config.p_relevant_sampling, 0.95);
        config.set_distance_cost(DistanceCost::Asymptotic { falloff_rate: 1.0 }).unwrap();
        assert_eq!(config.distance_cost, DistanceCost::Asymptotic { falloff_rate: 1.0 });
    }

    #[test]
    fn test_zero_priority_floor_rejected() {
        let mut config = ModelConfig::default();
        assert!(config.set_min_selection_priority(0.0).is_err());
    }

    #[test]
    fn test_zero_iteration_cap_rejected() {
        let mut config = ModelConfig::default();
        assert!(config.set_max_iterations(Some(0)).is_err());
        assert!(config.set_max_iterations(Some(10_000)).is_ok());
    }

    #[test]
    fn test_toml_partial_override() {
        let text = r#"
            rejection_threshold = 0.002
            attention_shift_cost = 4

            [distance_cost]
            model = "asymptotic"
            falloff_rate = 2.0

            [salience]
            emergent = 0.33

            [display]
            layout = "polar"
        "#;
        let config = ModelConfig::from_toml_str(text).unwrap();
        assert_eq!(config.rejection_threshold, 0.002);
        assert_eq!(config.attention_shift_cost, 4);
        assert_eq!(config.distance_cost, DistanceCost::Asymptotic { falloff_rate: 2.0 });
        assert_eq!(config.salience.emergent, 0.33);
        assert_eq!(config.salience.color, 1.0);
        assert_eq!(config.display.layout, GridLayout::Polar);
        assert_eq!(config.display.radius, 200.0);
        assert_eq!(config.p_relevant_sampling, 0.85);
    }

    #[test]
    fn test_sample_config_file_matches_defaults() {
        let config = ModelConfig::from_toml_str(include_str!("../../config/search.toml")).unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_toml_invalid_values_rejected() {
        let text = "p_irrelevant_sampling = 2.0";
        assert!(matches!(
            ModelConfig::from_toml_str(text),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_salience_expand_bands() {
        let layout = FeatureLayout { color: 18, shape: 29, role: 4 };
        let profile = SalienceProfile { color: 1.0, shape: 1.5, emergent: 0.33 };
        let salience = profile.expand(&layout);
        assert_eq!(salience.len(), 51);
        assert_eq!(salience[0], 1.0);
        assert_eq!(salience[18], 1.5);
        assert_eq!(salience[18 + 26], 1.5);
        assert_eq!(salience[18 + 27], 0.33);
        assert_eq!(salience[18 + 28], 0.33);
        assert_eq!(salience[47], 0.0);
    }
}
