// scenarios/continuous.rs

// Continuous minimization over a square domain with circular obstacles.
// Defaults follow the reference setup: [-10, 10]^2, three obstacles, an
// asynchronous swarm with zero initial velocity.

use std::path::Path;

use log::{info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::{load_yaml, parse_yaml};
use crate::SwarmError;
use crate::core::BoundedSpace;
use crate::fitness::continuous::{DEFAULT_PENALTY_WEIGHT, DEFAULT_TARGET};
use crate::fitness::{DecodedFitness, Obstacle, PenalizedContinuousFitness};
use crate::swarm::{
    CancellationToken, OptimizationResult, ProgressObserver, ProgressReport, PsoUpdateRule, Swarm,
    SwarmConfig, UpdateSchedule, VelocityInit, seeded_rng,
};

/// Reference obstacles as `(center, radius)`
pub const DEFAULT_OBSTACLES: [([f64; 2], f64); 3] =
    [([2.0, 2.0], 1.5), ([-3.0, -3.0], 2.0), ([6.0, -4.0], 1.0)];

/// Continuous scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousScenario {
    /// `[lower, upper]` applied to both coordinates
    pub bounds: [f64; 2],
    /// Circular obstacles
    pub obstacles: Vec<Obstacle>,
    /// Minimum of the paraboloid term
    pub target: Point2<f64>,
    /// Penalty per unit of obstacle penetration
    pub penalty_weight: f64,
    /// Swarm settings
    pub swarm: SwarmConfig,
}

impl Default for ContinuousScenario {
    fn default() -> Self {
        ContinuousScenario {
            bounds: [-10.0, 10.0],
            obstacles: DEFAULT_OBSTACLES
                .iter()
                .filter_map(|&(center, radius)| Obstacle::new(Point2::from(center), radius).ok())
                .collect(),
            target: Point2::from(DEFAULT_TARGET),
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
            swarm: SwarmConfig {
                rule: PsoUpdateRule {
                    inertia: 0.5,
                    cognitive: 1.5,
                    social: 1.5,
                },
                velocity_init: VelocityInit::Zero,
                schedule: UpdateSchedule::Asynchronous,
                ..SwarmConfig::default()
            },
        }
    }
}

/// Best point found for a continuous scenario
#[derive(Debug, Clone)]
pub struct ContinuousOutcome {
    /// Raw optimizer result
    pub result: OptimizationResult,
    /// Best point
    pub point: Point2<f64>,
    /// Base function value at the best point
    pub base: f64,
    /// Obstacle penalty at the best point
    pub penalty: f64,
}

impl ContinuousOutcome {
    /// True when the best point lies inside some obstacle
    pub fn inside_obstacle(&self) -> bool {
        self.penalty > 0.0
    }
}

impl ContinuousScenario {
    /// Load a scenario from a YAML file; missing fields take default values
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SwarmError> {
        load_yaml(path.as_ref())
    }

    /// Parse a scenario from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self, SwarmError> {
        parse_yaml(text)
    }

    /// Build the penalized fitness for this scenario
    pub fn fitness(&self) -> Result<PenalizedContinuousFitness, SwarmError> {
        PenalizedContinuousFitness::new(self.obstacles.clone())
            .with_target(self.target)
            .with_penalty_weight(self.penalty_weight)
    }

    /// Search space: `bounds` on both coordinates
    pub fn search_space(&self) -> Result<BoundedSpace, SwarmError> {
        BoundedSpace::uniform(2, self.bounds[0], self.bounds[1])
    }

    /// Run with a seed from the swarm config and no progress observer
    pub fn run(&self) -> Result<ContinuousOutcome, SwarmError> {
        self.run_with(&mut |_: &ProgressReport| {}, &CancellationToken::new())
    }

    /// Run with a progress observer and cancellation token
    pub fn run_with<O>(
        &self,
        observer: &mut O,
        cancel: &CancellationToken,
    ) -> Result<ContinuousOutcome, SwarmError>
    where
        O: ProgressObserver + ?Sized,
    {
        let fitness = self.fitness()?;
        let mut swarm = Swarm::new(&fitness, self.search_space()?, self.swarm.clone())?;
        let mut rng = seeded_rng(self.swarm.seed);
        let result = swarm.run_with(&mut rng, observer, cancel);

        let best = result.best_position.as_ref().ok_or(SwarmError::NoFiniteScore)?;
        let point = fitness.decode(best.as_slice());
        let base = fitness.base(&point);
        let penalty = fitness.penalty(&point);
        if penalty > 0.0 {
            warn!("Best point ({:.3}, {:.3}) lies inside an obstacle", point.x, point.y);
        } else {
            info!("Best point ({:.3}, {:.3}), value {:.4}", point.x, point.y, base);
        }

        Ok(ContinuousOutcome {
            result,
            point,
            base,
            penalty,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_reference_obstacles() {
        let scenario = ContinuousScenario::default();
        assert_eq!(scenario.obstacles.len(), 3);
        assert_eq!(scenario.obstacles[1].radius(), 2.0);
        assert_eq!(scenario.swarm.schedule, UpdateSchedule::Asynchronous);
        assert_eq!(scenario.swarm.velocity_init, VelocityInit::Zero);
        assert_eq!(scenario.swarm.rule.social, 1.5);
    }

    #[test]
    fn inverted_bounds_fail_before_running() {
        let scenario = ContinuousScenario {
            bounds: [5.0, -5.0],
            ..ContinuousScenario::default()
        };
        assert_eq!(
            scenario.run().unwrap_err(),
            SwarmError::InvalidBounds { lower: 5.0, upper: -5.0 }
        );
    }

    #[test]
    fn yaml_rejects_negative_radius() {
        let yaml = "obstacles:\n  - center: [0.0, 0.0]\n    radius: -2.0\n";
        assert!(matches!(
            ContinuousScenario::from_yaml_str(yaml),
            Err(SwarmError::ConfigError(_))
        ));
    }
}
