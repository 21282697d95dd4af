//! The search state machine
//!
//! A `SearchModel` owns the item population, the template, its config and
//! one random generator. Each call to `run_search_step` is one discrete
//! iteration: decay, parallel pass, selection or serial comparison, then
//! the termination check.

use ahash::AHashMap;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::ModelConfig;
use crate::core::error::{Result, SearchError};
use crate::core::types::{ItemId, Iteration, Point};
use crate::display;
use crate::search::features::{FeatureLayout, FeatureTables, ItemSpec};
use crate::search::item::{SearchTemplate, VisualItem};
use crate::search::parallel::{accumulate, MatchContext};
use crate::search::relevance::Relevance;
use crate::search::selection::{assign_subranges, pick};
use crate::search::trace::TraceLog;

/// Countdown between selecting an item and comparing it serially
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttentionTimer {
    /// Nothing selected
    #[default]
    Idle,
    /// Attention is moving; comparison happens once this reaches zero
    Shifting(u32),
    /// The selected item has already been compared
    Processed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchOutcome {
    #[default]
    InProgress,
    TargetFound(ItemId),
    TargetAbsent,
    /// Stopped by `max_iterations` without a conclusion
    IterationCap,
}

impl SearchOutcome {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchOutcome::InProgress)
    }
}

/// Per-run statistics, as returned by `run_whole_search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub iterations: Iteration,
    pub target_present: bool,
    pub target_found: bool,
    pub correct: bool,
    pub num_attended: u32,
    pub num_eye_movements: u32,
    pub num_auto_rejections: u32,
    pub outcome: SearchOutcome,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{}: {} iterations, {} ({} selections, {} eye movements, {} auto-rejections)",
            self.label,
            self.iterations,
            if self.correct { "correct" } else { "ERROR" },
            self.num_attended,
            self.num_eye_movements,
            self.num_auto_rejections,
        )
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct SearchModel {
    config: ModelConfig,
    rng: ChaCha8Rng,
    tables: FeatureTables,

    // Built by create_simulation
    layout: Option<FeatureLayout>,
    template: Option<SearchTemplate>,
    items: Vec<VisualItem>,
    index: AHashMap<ItemId, usize>,
    relevance: Relevance,
    salience: Vec<f64>,

    // Per-run state, reset by init_search
    viable: Vec<ItemId>,
    rejected: Vec<ItemId>,
    selected: Option<ItemId>,
    timer: AttentionTimer,
    fixation: Point,
    iteration: Iteration,
    target_found: bool,
    found_target: Option<ItemId>,
    correct: bool,
    num_attended: u32,
    num_eye_movements: u32,
    num_auto_rejections: u32,
    outcome: SearchOutcome,
    label: String,
    log: TraceLog,
}

impl SearchModel {
    /// Model seeded from system entropy
    pub fn new(config: ModelConfig) -> Result<Self> {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Model with a reproducible random stream
    pub fn with_seed(config: ModelConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: ModelConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let fixation = config.display.center;
        Ok(Self {
            config,
            rng,
            tables: FeatureTables::standard(),
            layout: None,
            template: None,
            items: Vec::new(),
            index: AHashMap::new(),
            relevance: Relevance::default(),
            salience: Vec::new(),
            viable: Vec::new(),
            rejected: Vec::new(),
            selected: None,
            timer: AttentionTimer::Idle,
            fixation,
            iteration: 0,
            target_found: false,
            found_target: None,
            correct: false,
            num_attended: 0,
            num_eye_movements: 0,
            num_auto_rejections: 0,
            outcome: SearchOutcome::InProgress,
            label: String::new(),
            log: TraceLog::new(),
        })
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Replace the configuration; takes effect on the next `init_search`
    pub fn set_config(&mut self, config: ModelConfig) -> Result<()> {
        config.validate()?;
        let locations = display::capacity(&config.display);
        if self.items.len() > locations {
            return Err(SearchError::DisplayCapacity { items: self.items.len(), locations });
        }
        if let Some(layout) = &self.layout {
            self.salience = config.salience.expand(layout);
        }
        self.config = config;
        Ok(())
    }

    // === SIMULATION SETUP ===

    /// Build the template and item population for one condition
    ///
    /// `target.count` must be 0 (target absent) or 1. `relevant`, when
    /// given, replaces the computed relevant-dimension set. Nothing is
    /// changed if any part of the specification is invalid.
    pub fn create_simulation(
        &mut self,
        target: &ItemSpec,
        distractors: &[ItemSpec],
        relevant: Option<&[usize]>,
    ) -> Result<()> {
        if target.count > 1 {
            return Err(SearchError::InvalidTargetCount(target.count));
        }
        let total: usize =
            target.count as usize + distractors.iter().map(|d| d.count as usize).sum::<usize>();
        if total == 0 {
            return Err(SearchError::EmptyDisplay);
        }

        let template_parts = self.tables.encode_parts(&target.parts)?;
        let part_len = template_parts[0].len();
        let layout = FeatureLayout::for_part_len(part_len)
            .ok_or(SearchError::PartLengthMismatch { expected: part_len, found: 0 })?;

        let encoded_distractors = distractors
            .iter()
            .map(|spec| self.tables.encode_parts(&spec.parts))
            .collect::<Result<Vec<_>>>()?;

        for parts in std::iter::once(&template_parts).chain(encoded_distractors.iter()) {
            if let Some(bad) = parts.iter().find(|p| p.len() != part_len) {
                return Err(SearchError::PartLengthMismatch { expected: part_len, found: bad.len() });
            }
        }

        let locations = display::capacity(&self.config.display);
        if total > locations {
            return Err(SearchError::DisplayCapacity { items: total, locations });
        }

        let mut items = Vec::with_capacity(total);
        let mut next_id = 0u32;
        if target.count == 1 {
            items.push(VisualItem::new(
                ItemId::new(next_id),
                format!("Target={}", target.describe()),
                true,
                template_parts.clone(),
                target.parts.clone(),
            ));
            next_id += 1;
        }
        for (spec, parts) in distractors.iter().zip(encoded_distractors) {
            for _ in 0..spec.count {
                items.push(VisualItem::new(
                    ItemId::new(next_id),
                    format!("Lure={}", spec.describe()),
                    false,
                    parts.clone(),
                    spec.parts.clone(),
                ));
                next_id += 1;
            }
        }

        let template = SearchTemplate::new(template_parts, target.parts.clone());
        let relevance = match relevant {
            Some(dims) => Relevance::with_relevant(&template, dims, layout.non_relation())?,
            None => Relevance::compute(&template, &items, layout.non_relation()),
        };

        tracing::info!(
            "Created simulation: target {} among {} distractors ({} relevant, {} irrelevant dimensions)",
            target.describe(),
            total - target.count as usize,
            relevance.relevant.len(),
            relevance.irrelevant.len(),
        );

        self.index = items.iter().enumerate().map(|(i, item)| (item.id, i)).collect();
        self.viable = items.iter().map(|item| item.id).collect();
        self.rejected.clear();
        self.items = items;
        self.salience = self.config.salience.expand(&layout);
        self.layout = Some(layout);
        self.template = Some(template);
        self.relevance = relevance;
        self.selected = None;
        self.timer = AttentionTimer::Idle;
        self.outcome = SearchOutcome::InProgress;
        Ok(())
    }

    /// Reset all per-run state and lay the items out on the display
    pub fn init_search(&mut self, label: &str) {
        self.viable = self.items.iter().map(|item| item.id).collect();
        self.rejected.clear();
        self.selected = None;
        self.timer = AttentionTimer::Idle;
        self.fixation = self.config.display.center;
        self.iteration = 0;
        self.target_found = false;
        self.found_target = None;
        self.correct = false;
        self.num_attended = 0;
        self.num_eye_movements = 0;
        self.num_auto_rejections = 0;
        self.outcome = SearchOutcome::InProgress;
        self.label = label.to_string();

        self.log.clear();
        self.log.raw(label);
        self.log.raw(format!("Fixation at {}", self.fixation));

        for item in &mut self.items {
            let noise = self.rng.gen::<f64>() * self.config.exogenous_cue_noise;
            item.reset(1.0 + noise);
        }
        let locations = display::shuffled_locations(&self.config.display, &mut self.rng);
        for (item, location) in self.items.iter_mut().zip(locations) {
            item.location = Some(location);
        }
        self.update_distances();
    }

    // === STEPPING ===

    /// Advance one iteration; returns true once the search has concluded
    pub fn run_search_step(&mut self) -> bool {
        if self.outcome.is_done() || self.template.is_none() {
            return true;
        }

        self.iteration += 1;
        self.log.raw(format!("* * * Iteration {} * * *", self.iteration));

        let retain = 1.0 - self.config.item_integrator_decay;
        for &id in &self.viable {
            if let Some(&idx) = self.index.get(&id) {
                self.items[idx].integrator *= retain;
            }
        }

        self.parallel_pass();
        self.update_viability();

        if self.selected.is_none() {
            let draw = self.rng.gen::<f64>();
            self.select_with_draw(draw);
        }

        // a fresh selection is checked on the same iteration
        if let Some(id) = self.selected {
            match self.timer {
                AttentionTimer::Shifting(0) | AttentionTimer::Idle => {
                    self.log.event(self.iteration, format!("Attention arrived on item {}", id));
                    self.process_selected_item();
                }
                AttentionTimer::Shifting(remaining) => {
                    self.timer = AttentionTimer::Shifting(remaining - 1);
                }
                AttentionTimer::Processed => {}
            }
        }

        self.update_viability();
        self.check_termination()
    }

    /// Run to completion from a fresh `init_search`, then classify the outcome
    pub fn run_whole_search(&mut self, label: &str) -> RunSummary {
        self.init_search(label);
        while !self.run_search_step() {}
        self.analyze_result();
        self.summary()
    }

    fn check_termination(&mut self) -> bool {
        if let (true, Some(id)) = (self.target_found, self.found_target) {
            self.log.event(
                self.iteration,
                format!("Target Found! Item {} on iteration {}", id, self.iteration),
            );
            tracing::debug!("Target found: item {} after {} iterations", id, self.iteration);
            self.outcome = SearchOutcome::TargetFound(id);
            return true;
        }

        if self.viable.is_empty() {
            self.iteration += self.config.target_absent_cost;
            self.log.event(
                self.iteration,
                format!("I have concluded the Target is Absent on iteration {}", self.iteration),
            );
            tracing::debug!("Concluded target absent after {} iterations", self.iteration);
            self.outcome = SearchOutcome::TargetAbsent;
            return true;
        }

        if let Some(cap) = self.config.max_iterations {
            if self.iteration >= cap {
                self.log.event(self.iteration, "Iteration cap reached without a conclusion");
                tracing::warn!("Search '{}' hit the iteration cap of {}", self.label, cap);
                self.outcome = SearchOutcome::IterationCap;
                return true;
            }
        }

        false
    }

    /// Noisy match of every viable item against the template
    fn parallel_pass(&mut self) {
        let Some(template) = self.template.as_ref() else {
            return;
        };
        let ctx = MatchContext {
            template,
            relevance: &self.relevance,
            salience: &self.salience,
            config: &self.config,
        };

        for &id in &self.viable {
            let Some(&idx) = self.index.get(&id) else {
                continue;
            };
            let item = &mut self.items[idx];
            if item.rejected {
                continue;
            }
            let similarity = ctx.sample_match(&item.parts, &mut self.rng);
            let noise = self.rng.gen::<f64>();
            if accumulate(item, similarity, noise, &self.config) {
                self.num_auto_rejections += 1;
                self.log.event(self.iteration, format!("Item {} automatically rejected", id));
                tracing::debug!("Item {} rejected in parallel pass", id);
            }
        }
    }

    /// Move newly rejected items out of the viable list
    pub fn update_viability(&mut self) {
        let items = &self.items;
        let index = &self.index;
        let is_rejected = |id: &ItemId| index.get(id).is_some_and(|&i| items[i].rejected);

        let (newly_rejected, still_viable): (Vec<ItemId>, Vec<ItemId>) =
            self.viable.iter().copied().partition(|id| is_rejected(id));
        if newly_rejected.is_empty() {
            return;
        }
        self.viable = still_viable;
        self.rejected.extend(newly_rejected);

        if let Some(id) = self.selected {
            if is_rejected(&id) {
                self.selected = None;
                self.timer = AttentionTimer::Idle;
            }
        }
    }

    // === ATTENTION ===

    /// Select among viable items using `draw` in [0, 1)
    ///
    /// Masses are priority × distance weight in viable order. Returns `None`
    /// without side effects when every mass is zero.
    pub fn select_with_draw(&mut self, draw: f64) -> Option<ItemId> {
        let masses: Vec<f64> = self
            .viable
            .iter()
            .map(|id| self.item(*id).map_or(0.0, |item| item.selection_mass()))
            .collect();
        let ranges = assign_subranges(&masses)?;

        for (id, &range) in self.viable.iter().zip(&ranges) {
            if let Some(&idx) = self.index.get(id) {
                self.items[idx].subrange = range;
                self.items[idx].currently_selected = false;
            }
        }

        let chosen = self.viable[pick(&ranges, draw)?];
        let idx = *self.index.get(&chosen)?;
        self.items[idx].currently_selected = true;
        self.selected = Some(chosen);
        self.num_attended += 1;
        self.timer = AttentionTimer::Shifting(self.config.attention_shift_cost);

        if self.config.permit_eye_movements {
            self.fixate_selected();
        }

        let location = self.items[idx].location.unwrap_or(self.fixation);
        self.log.event(
            self.iteration,
            format!("Moving attention to item {} at {}", chosen, location),
        );
        tracing::debug!("Selected item {} (draw {:.3})", chosen, draw);
        Some(chosen)
    }

    /// Try to saccade to the selected item, then refresh every distance weight
    pub fn fixate_selected(&mut self) {
        let Some(location) = self.selected.and_then(|id| self.item(id)).and_then(|i| i.location) else {
            return;
        };

        let distance = self.fixation.distance(&location);
        let accuracy = self.config.distance_cost.weight(distance, self.config.display.radius);
        if self.rng.gen::<f64>() < accuracy {
            self.fixation = location;
            self.iteration += self.config.eye_movement_time_cost;
            self.num_eye_movements += 1;
            self.log.event(self.iteration, format!("Eyes moved to {}", location));
            tracing::debug!("Saccade of {:.1} to {}", distance, location);
        } else {
            self.log.event(self.iteration, format!("Saccade toward {} missed", location));
        }

        self.update_distances();
    }

    fn update_distances(&mut self) {
        let fixation = self.fixation;
        let radius = self.config.display.radius;
        for item in &mut self.items {
            let location = item.location.unwrap_or(fixation);
            item.fixation_distance = fixation.distance(&location);
            item.distance_weight = self.config.distance_cost.weight(item.fixation_distance, radius);
        }
    }

    /// Exact comparison of the selected item against the template
    ///
    /// Every item part must equal some template part. Parts are checked in
    /// random order and the first miss rejects the item.
    pub fn process_selected_item(&mut self) {
        let Some(id) = self.selected else {
            return;
        };
        let (Some(&idx), Some(template)) = (self.index.get(&id), self.template.as_ref()) else {
            return;
        };
        let item = &mut self.items[idx];

        let accepted = if item.part_count() != template.part_count() {
            false
        } else {
            let mut order: Vec<usize> = (0..item.part_count()).collect();
            order.shuffle(&mut self.rng);
            order.iter().all(|&p| template.matches_part(&item.parts[p]))
        };

        if accepted {
            self.target_found = true;
            self.found_target = Some(id);
            self.timer = AttentionTimer::Processed;
            self.log.event(
                self.iteration,
                format!("Selected item {} has been identified as the target!", id),
            );
        } else {
            item.reject();
            self.selected = None;
            self.timer = AttentionTimer::Idle;
            self.log.event(self.iteration, format!("Selected item {} rejected", id));
            tracing::debug!("Item {} rejected by serial comparison", id);
        }
    }

    /// Decide whether the concluded run was correct
    pub fn analyze_result(&mut self) -> bool {
        self.correct = match self.found_target {
            Some(id) => self.item(id).is_some_and(|item| item.is_target),
            None => !self.target_present(),
        };
        self.correct
    }

    // === READ-ONLY SURFACE ===

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            label: self.label.clone(),
            iterations: self.iteration,
            target_present: self.target_present(),
            target_found: self.target_found,
            correct: self.correct,
            num_attended: self.num_attended,
            num_eye_movements: self.num_eye_movements,
            num_auto_rejections: self.num_auto_rejections,
            outcome: self.outcome,
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&VisualItem> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    /// Direct item access for tools and scenario tests
    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut VisualItem> {
        self.index.get(&id).map(|&i| &mut self.items[i])
    }

    pub fn search_items(&self) -> &[VisualItem] {
        &self.items
    }

    pub fn viable_ids(&self) -> &[ItemId] {
        &self.viable
    }

    pub fn rejected_ids(&self) -> &[ItemId] {
        &self.rejected
    }

    pub fn viable_items(&self) -> Vec<&VisualItem> {
        self.viable.iter().filter_map(|&id| self.item(id)).collect()
    }

    pub fn rejected_items(&self) -> Vec<&VisualItem> {
        self.rejected.iter().filter_map(|&id| self.item(id)).collect()
    }

    pub fn template(&self) -> Option<&SearchTemplate> {
        self.template.as_ref()
    }

    pub fn relevance(&self) -> &Relevance {
        &self.relevance
    }

    pub fn salience(&self) -> &[f64] {
        &self.salience
    }

    pub fn target_present(&self) -> bool {
        self.items.iter().any(|item| item.is_target)
    }

    pub fn messages(&self) -> &[String] {
        self.log.messages()
    }

    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    pub fn correct(&self) -> bool {
        self.correct
    }

    pub fn target_found(&self) -> bool {
        self.target_found
    }

    pub fn found_target(&self) -> Option<ItemId> {
        self.found_target
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn timer(&self) -> AttentionTimer {
        self.timer
    }

    pub fn fixation(&self) -> Point {
        self.fixation
    }

    pub fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    pub fn num_attended(&self) -> u32 {
        self.num_attended
    }

    /// Saccades that landed; missed saccades are logged but not counted
    pub fn num_eye_movements(&self) -> u32 {
        self.num_eye_movements
    }

    pub fn num_auto_rejections(&self) -> u32 {
        self.num_auto_rejections
    }
}
