//! Swarm Nav - particle swarm optimization for navigation problems
//!
//! This library provides a particle swarm optimizer together with two
//! fitness models: waypoint path planning through an occupancy-grid maze and
//! an obstacle-penalized continuous multimodal function.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod core;
pub mod fitness;
pub mod swarm;
pub mod scenarios;

// Re-export commonly used items for easier access
pub use core::{Bound, BoundedSpace, CollisionChecker, OccupancyGrid};
pub use fitness::{
    DecodedFitness, FitnessEvaluator, FnFitness, MazePathFitness, Obstacle, PathScore,
    PenalizedContinuousFitness,
};
pub use scenarios::{ContinuousOutcome, ContinuousScenario, MazeOutcome, MazeScenario};
pub use swarm::{
    CancellationToken, OptimizationResult, Particle, ProgressObserver, ProgressReport,
    PsoUpdateRule, Swarm, SwarmConfig, SwarmState, Termination, UpdateSchedule, VelocityInit,
};

/// Swarm Nav error types
#[derive(Debug, Clone, PartialEq)]
pub enum SwarmError {
    /// Bound with `lower > upper` or a non-finite limit
    InvalidBounds {
        /// Lower limit as given
        lower: f64,
        /// Upper limit as given
        upper: f64,
    },
    /// Swarm needs at least one particle
    InvalidParticleCount(usize),
    /// Run needs at least one iteration
    InvalidIterationCount(usize),
    /// Inertia, cognitive, social or velocity coefficient out of range
    InvalidCoefficient(String),
    /// Penalty magnitude must be finite and non-negative
    InvalidPenalty(f64),
    /// Obstacle radius below zero or not finite
    NegativeRadius(f64),
    /// Vector length does not match the search space
    DimensionMismatch {
        /// Dimensions the search space or evaluator expects
        expected: usize,
        /// Dimensions actually supplied
        found: usize,
    },
    /// Occupancy grid is empty or ragged
    InvalidGrid(String),
    /// Collision checks need at least one sample
    InvalidSampleCount(usize),
    /// Run finished without a single finite fitness score
    NoFiniteScore,
    /// Configuration file could not be read or parsed
    ConfigError(String),
}

impl std::fmt::Display for SwarmError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SwarmError::InvalidBounds { lower, upper } => {
                write!(f, "Invalid bounds: lower {} upper {}", lower, upper)
            }
            SwarmError::InvalidParticleCount(n) => write!(f, "Invalid particle count: {}", n),
            SwarmError::InvalidIterationCount(n) => write!(f, "Invalid iteration count: {}", n),
            SwarmError::InvalidCoefficient(msg) => write!(f, "Invalid coefficient: {}", msg),
            SwarmError::InvalidPenalty(p) => write!(f, "Invalid penalty magnitude: {}", p),
            SwarmError::NegativeRadius(r) => write!(f, "Invalid obstacle radius: {}", r),
            SwarmError::DimensionMismatch { expected, found } => {
                write!(f, "Dimension mismatch: expected {}, found {}", expected, found)
            }
            SwarmError::InvalidGrid(msg) => write!(f, "Invalid grid: {}", msg),
            SwarmError::InvalidSampleCount(n) => write!(f, "Invalid collision sample count: {}", n),
            SwarmError::NoFiniteScore => write!(f, "No finite fitness score was found"),
            SwarmError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SwarmError {}
