//! Visual search engine: feature encoding, items, and the attention model

pub mod features;
pub mod fixation;
pub mod item;
pub mod model;
pub mod parallel;
pub mod relevance;
pub mod selection;
pub mod trace;

pub use features::{FeatureLayout, FeatureTables, ItemSpec, PartSpec};
pub use fixation::distance_cost_table;
pub use item::{SearchTemplate, VisualItem};
pub use model::{AttentionTimer, RunSummary, SearchModel, SearchOutcome};
pub use relevance::Relevance;
pub use trace::TraceLog;
