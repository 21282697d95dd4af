//! Distance-from-fixation cost models

use crate::core::config::{DistanceCost, ModelConfig};

impl DistanceCost {
    /// Map a distance from fixation to a sampling weight in [0, 1]
    pub fn weight(&self, distance: f64, display_radius: f64) -> f64 {
        let distance = distance.max(0.0);
        let weight = match *self {
            DistanceCost::Linear { distance_at_zero } => 1.0 - distance / distance_at_zero,
            DistanceCost::Asymptotic { falloff_rate } => {
                1.0 / (1.0 + falloff_rate * distance / display_radius)
            }
        };
        weight.clamp(0.0, 1.0)
    }
}

/// Sample the active cost curve from 0 out to the display diameter
///
/// Returns `steps + 1` (distance, weight) pairs, evenly spaced.
pub fn distance_cost_table(config: &ModelConfig, steps: usize) -> Vec<(f64, f64)> {
    let steps = steps.max(1);
    let diameter = config.display.radius * 2.0;
    (0..=steps)
        .map(|i| {
            let distance = diameter * i as f64 / steps as f64;
            (distance, config.distance_cost.weight(distance, config.display.radius))
        })
        .collect()
}
