//! Batch experiments layered over the search model

pub mod presets;
pub mod stats;
pub mod suite;

pub use presets::{all_presets, preset, Preset, PRESET_NAMES};
pub use stats::{linear_fit, mean_and_sem, LinearFit, MeanSem};
pub use suite::{run_condition, run_suite_parallel, Condition, ConditionReport, SetSizeResult};
