// swarm/config.rs

// Run parameters for the swarm: population size, iteration budget, update
// weights, initialization, schedule and the optional extras (progress
// interval, stagnation stop, parallel evaluation, seed).

use serde::{Deserialize, Serialize};

use super::update::PsoUpdateRule;
use crate::SwarmError;

/// How initial velocities are drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VelocityInit {
    /// All velocities start at zero
    Zero,
    /// Each component uniform in `[-magnitude, magnitude]`
    Uniform {
        /// Half-width of the range
        magnitude: f64,
    },
}

/// Order of evaluation and movement within one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateSchedule {
    /// Evaluate every particle, then move every particle
    Synchronous,
    /// Evaluate the whole swarm once up front; afterwards move and evaluate
    /// one particle at a time so the global best updates mid-sweep
    Asynchronous,
}

/// Swarm run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of particles
    pub particles: usize,
    /// Iteration budget
    pub iterations: usize,
    /// Update weights
    #[serde(flatten)]
    pub rule: PsoUpdateRule,
    /// Initial velocity distribution
    pub velocity_init: VelocityInit,
    /// Evaluation/movement ordering
    pub schedule: UpdateSchedule,
    /// Report progress every N iterations; `None` disables reports
    pub report_interval: Option<usize>,
    /// Stop after this many iterations without improvement; `None` runs the full budget
    pub stagnation_limit: Option<usize>,
    /// Evaluate particles on the rayon pool (synchronous schedule only)
    pub parallel: bool,
    /// Seed for the run's random source; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        SwarmConfig {
            particles: 30,
            iterations: 100,
            rule: PsoUpdateRule::default(),
            velocity_init: VelocityInit::Uniform { magnitude: 1.0 },
            schedule: UpdateSchedule::Synchronous,
            report_interval: Some(10),
            stagnation_limit: None,
            parallel: false,
            seed: None,
        }
    }
}

impl SwarmConfig {
    /// Fail fast on settings the run cannot start with
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.particles == 0 {
            return Err(SwarmError::InvalidParticleCount(self.particles));
        }
        if self.iterations == 0 {
            return Err(SwarmError::InvalidIterationCount(self.iterations));
        }
        self.rule.validate()?;

        if let VelocityInit::Uniform { magnitude } = self.velocity_init {
            // Sampling needs the full width 2 * magnitude to stay finite
            if !(2.0 * magnitude).is_finite() || magnitude < 0.0 {
                return Err(SwarmError::InvalidCoefficient(format!(
                    "velocity magnitude {}",
                    magnitude
                )));
            }
        }
        if self.report_interval == Some(0) {
            return Err(SwarmError::ConfigError(
                "report_interval must be at least 1".to_string(),
            ));
        }
        if self.stagnation_limit == Some(0) {
            return Err(SwarmError::ConfigError(
                "stagnation_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SwarmConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_counts_fail_fast() {
        let config = SwarmConfig {
            particles: 0,
            ..SwarmConfig::default()
        };
        assert_eq!(config.validate(), Err(SwarmError::InvalidParticleCount(0)));

        let config = SwarmConfig {
            iterations: 0,
            ..SwarmConfig::default()
        };
        assert_eq!(config.validate(), Err(SwarmError::InvalidIterationCount(0)));
    }

    #[test]
    fn velocity_magnitude_must_be_samplable() {
        let config = SwarmConfig {
            velocity_init: VelocityInit::Uniform { magnitude: f64::MAX },
            ..SwarmConfig::default()
        };
        assert!(matches!(config.validate(), Err(SwarmError::InvalidCoefficient(_))));

        let config = SwarmConfig {
            velocity_init: VelocityInit::Uniform { magnitude: -1.0 },
            ..SwarmConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SwarmConfig {
            velocity_init: VelocityInit::Uniform { magnitude: f64::MAX / 2.0 },
            ..SwarmConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_fills_missing_fields_from_default() {
        let yaml = "particles: 12\ninertia: 0.7\nvelocity_init:\n  kind: zero\nschedule: asynchronous\n";
        let config: SwarmConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.particles, 12);
        assert_eq!(config.iterations, 100);
        assert_eq!(config.rule.inertia, 0.7);
        assert_eq!(config.rule.cognitive, 1.0);
        assert_eq!(config.velocity_init, VelocityInit::Zero);
        assert_eq!(config.schedule, UpdateSchedule::Asynchronous);
    }
}
