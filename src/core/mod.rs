// core/mod.rs

// Geometry shared by every scenario: the bounded search domain and the
// occupancy grid with its segment collision check.

pub mod grid;
pub mod space;

pub use grid::{CollisionChecker, DEFAULT_COLLISION_SAMPLES, OccupancyGrid, is_blocked};
pub use space::{Bound, BoundedSpace};
