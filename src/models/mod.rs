//! Data models for chart entities and collage geometry.

pub mod entity;
pub mod grid;
pub mod period;

// Re-exports for convenience
pub use entity::{Entity, EntityKind};
pub use grid::{CellSize, GridSpec, MAX_GRID_SIDE};
pub use period::Period;
