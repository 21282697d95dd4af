use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("Unknown shape: {0}")]
    UnknownShape(String),

    #[error("Unknown relational role: {0}")]
    UnknownRole(String),

    #[error("Display contains no items")]
    EmptyDisplay,

    #[error("Item specification has no parts")]
    EmptyItem,

    #[error("Target count must be 0 or 1, got {0}")]
    InvalidTargetCount(u32),

    #[error("Feature part length mismatch: expected {expected}, found {found}")]
    PartLengthMismatch { expected: usize, found: usize },

    #[error("Display holds {locations} locations but {items} items were requested")]
    DisplayCapacity { items: usize, locations: usize },

    #[error("Relevant dimension {0} is outside the color and shape bands")]
    InvalidRelevantDimension(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
