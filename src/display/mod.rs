pub mod grid;

pub use grid::{candidate_locations, capacity, shuffled_locations};
