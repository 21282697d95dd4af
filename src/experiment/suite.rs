//! Condition sweeps: repeated searches across display sizes

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::ModelConfig;
use crate::core::error::Result;
use crate::experiment::stats::{linear_fit, mean_and_sem, LinearFit, MeanSem};
use crate::search::features::{ItemSpec, PartSpec};
use crate::search::model::SearchModel;

/// One experimental condition: a target, its distractor kinds, and the
/// display sizes to sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub label: String,
    pub target: Vec<PartSpec>,
    /// Each distractor kind, as a parts list
    pub distractor_types: Vec<Vec<PartSpec>>,
    /// Total distractor counts; split evenly over the kinds
    pub set_sizes: Vec<u32>,
    pub runs: u32,
    pub target_present: bool,
}

impl Condition {
    pub fn new(label: &str, target: Vec<PartSpec>, distractor_types: Vec<Vec<PartSpec>>) -> Self {
        Self {
            label: label.to_string(),
            target,
            distractor_types,
            set_sizes: vec![2, 4, 8, 16, 32, 64],
            runs: 100,
            target_present: true,
        }
    }

    pub fn with_set_sizes(mut self, set_sizes: &[u32]) -> Self {
        self.set_sizes = set_sizes.to_vec();
        self
    }

    pub fn with_runs(mut self, runs: u32) -> Self {
        self.runs = runs;
        self
    }

    pub fn target_absent(mut self) -> Self {
        self.target_present = false;
        self
    }

    /// Target and distractor specs for `num_distractors` total distractors
    pub fn specs(&self, num_distractors: u32) -> (ItemSpec, Vec<ItemSpec>) {
        let kinds = self.distractor_types.len().max(1) as u32;
        let per_kind = num_distractors / kinds;
        let target = ItemSpec::new(self.target.clone(), u32::from(self.target_present));
        let distractors = self
            .distractor_types
            .iter()
            .map(|parts| ItemSpec::new(parts.clone(), per_kind))
            .collect();
        (target, distractors)
    }
}

/// Results for one display size; means cover correct runs only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSizeResult {
    pub num_distractors: u32,
    pub display_size: u32,
    pub runs: u32,
    pub errors: u32,
    pub rt: Option<MeanSem>,
    pub selections: Option<MeanSem>,
    pub eye_movements: Option<MeanSem>,
    pub auto_rejections: Option<MeanSem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionReport {
    pub label: String,
    pub target_present: bool,
    pub results: Vec<SetSizeResult>,
    /// Mean RT regressed on display size
    pub rt_fit: Option<LinearFit>,
}

impl ConditionReport {
    pub fn total_errors(&self) -> u32 {
        self.results.iter().map(|r| r.errors).sum()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{} (target {})",
            self.label,
            if self.target_present { "present" } else { "absent" }
        )];
        for result in &self.results {
            match result.rt {
                Some(rt) => lines.push(format!(
                    "  {:>3} items: mean RT {:.3} ({:.3}), errors {}",
                    result.display_size, rt.mean, rt.sem, result.errors
                )),
                None => lines.push(format!(
                    "  {:>3} items: all {} runs in error",
                    result.display_size, result.runs
                )),
            }
        }
        if let Some(fit) = self.rt_fit {
            lines.push(format!(
                "  slope {:.3} per item, intercept {:.3}, r^2 {:.3}",
                fit.slope, fit.intercept, fit.r_squared
            ));
        }
        lines.join("\n")
    }
}

/// Sweep every set size of `condition` on `model`
pub fn run_condition(model: &mut SearchModel, condition: &Condition) -> Result<ConditionReport> {
    let mut results = Vec::with_capacity(condition.set_sizes.len());

    for &num_distractors in &condition.set_sizes {
        let (target, distractors) = condition.specs(num_distractors);
        model.create_simulation(&target, &distractors, None)?;
        let display_size = model.search_items().len() as u32;

        let mut rts = Vec::new();
        let mut selections = Vec::new();
        let mut eye_movements = Vec::new();
        let mut auto_rejections = Vec::new();
        let mut errors = 0;

        for run in 0..condition.runs {
            let label = format!("{} [{} items, run {}]", condition.label, display_size, run + 1);
            let summary = model.run_whole_search(&label);
            if summary.correct {
                rts.push(summary.iterations as f64);
                selections.push(f64::from(summary.num_attended));
                eye_movements.push(f64::from(summary.num_eye_movements));
                auto_rejections.push(f64::from(summary.num_auto_rejections));
            } else {
                errors += 1;
            }
        }

        if rts.is_empty() && condition.runs > 0 {
            tracing::warn!("{}: all {} runs in error at {} items", condition.label, condition.runs, display_size);
        }

        results.push(SetSizeResult {
            num_distractors,
            display_size,
            runs: condition.runs,
            errors,
            rt: mean_and_sem(&rts),
            selections: mean_and_sem(&selections),
            eye_movements: mean_and_sem(&eye_movements),
            auto_rejections: mean_and_sem(&auto_rejections),
        });
    }

    let points: Vec<(f64, f64)> = results
        .iter()
        .filter_map(|r| r.rt.map(|rt| (f64::from(r.display_size), rt.mean)))
        .collect();

    tracing::info!("Finished condition '{}' over {} set sizes", condition.label, results.len());

    Ok(ConditionReport {
        label: condition.label.clone(),
        target_present: condition.target_present,
        results,
        rt_fit: linear_fit(&points),
    })
}

/// Run conditions in parallel, one model per condition seeded `seed + index`
pub fn run_suite_parallel(
    config: &ModelConfig,
    conditions: &[Condition],
    seed: u64,
) -> Result<Vec<ConditionReport>> {
    conditions
        .par_iter()
        .enumerate()
        .map(|(i, condition)| {
            let mut model = SearchModel::with_seed(config.clone(), seed.wrapping_add(i as u64))?;
            run_condition(&mut model, condition)
        })
        .collect()
}
