//! Visual items and the search template
//!
//! Items are passive data holders. Only `SearchModel` mutates them.

use crate::core::types::{FeatureVector, ItemId, Point};
use crate::search::features::PartSpec;

/// A display item (target or distractor)
#[derive(Debug, Clone)]
pub struct VisualItem {
    pub id: ItemId,
    pub name: String,
    pub is_target: bool,
    /// Encoded parts, one feature vector per part
    pub parts: Vec<FeatureVector>,
    /// Symbolic properties the parts were built from
    pub properties: Vec<PartSpec>,

    // Per-run state, reset by `reset`
    pub location: Option<Point>,
    pub fixation_distance: f64,
    /// Multiplier on evidence accumulation from distance to fixation, [0, 1]
    pub distance_weight: f64,
    pub integrator: f64,
    pub rejected: bool,
    pub currently_selected: bool,
    /// Selection priority; pinned to 0 once rejected
    pub priority: f64,
    /// Slice of [0, 1) owned by this item in the last selection draw
    pub subrange: (f64, f64),
}

impl VisualItem {
    pub fn new(
        id: ItemId,
        name: String,
        is_target: bool,
        parts: Vec<FeatureVector>,
        properties: Vec<PartSpec>,
    ) -> Self {
        Self {
            id,
            name,
            is_target,
            parts,
            properties,
            location: None,
            fixation_distance: 0.0,
            distance_weight: 1.0,
            integrator: 1.0,
            rejected: false,
            currently_selected: false,
            priority: 1.0,
            subrange: (0.0, 0.0),
        }
    }

    /// Clear per-run state; `integrator` is the starting evidence
    pub fn reset(&mut self, integrator: f64) {
        self.location = None;
        self.fixation_distance = 0.0;
        self.distance_weight = 1.0;
        self.integrator = integrator;
        self.rejected = false;
        self.currently_selected = false;
        self.priority = 1.0;
        self.subrange = (0.0, 0.0);
    }

    /// Permanently remove from play
    pub fn reject(&mut self) {
        self.rejected = true;
        self.priority = 0.0;
        self.currently_selected = false;
    }

    pub fn is_viable(&self) -> bool {
        !self.rejected
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Weight this item carries in a selection draw
    pub fn selection_mass(&self) -> f64 {
        if self.rejected {
            return 0.0;
        }
        (self.priority * self.distance_weight).max(0.0)
    }
}

/// The pattern being searched for; never placed in the display
#[derive(Debug, Clone)]
pub struct SearchTemplate {
    pub parts: Vec<FeatureVector>,
    pub properties: Vec<PartSpec>,
}

impl SearchTemplate {
    pub fn new(parts: Vec<FeatureVector>, properties: Vec<PartSpec>) -> Self {
        Self { parts, properties }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// True if `part` equals some template part on every dimension
    pub fn matches_part(&self, part: &[i8]) -> bool {
        self.parts.iter().any(|t| t.as_slice() == part)
    }
}
