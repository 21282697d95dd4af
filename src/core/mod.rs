pub mod config;
pub mod error;
pub mod types;

pub use config::{DisplayConfig, DistanceCost, GridLayout, ModelConfig, SalienceProfile};
pub use error::{Result, SearchError};
pub use types::{FeatureVector, ItemId, Iteration, Point};
