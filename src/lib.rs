//! Visual Search - attention model of parallel and serial visual search

pub mod core;
pub mod display;
pub mod experiment;
pub mod search;

pub use crate::core::{ModelConfig, Result, SearchError};
pub use crate::search::{ItemSpec, PartSpec, RunSummary, SearchModel, SearchOutcome};
