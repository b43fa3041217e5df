// swarm/update.rs

// Velocity/position recurrence applied to one particle per step:
//   v' = w v + c1 r1 (pbest - x) + c2 r2 (gbest - x)
//   x' = clip(x + v')
// r1 and r2 are drawn per dimension. Velocity itself is never clipped.

use nalgebra::DVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::particle::Particle;
use crate::SwarmError;
use crate::core::BoundedSpace;

/// Inertia, cognitive and social weights of the PSO update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsoUpdateRule {
    /// Fraction of the previous velocity kept (w)
    pub inertia: f64,
    /// Pull toward the particle's own best (c1)
    pub cognitive: f64,
    /// Pull toward the swarm's best (c2)
    pub social: f64,
}

impl PsoUpdateRule {
    /// Create a validated rule
    pub fn new(inertia: f64, cognitive: f64, social: f64) -> Result<Self, SwarmError> {
        let rule = PsoUpdateRule {
            inertia,
            cognitive,
            social,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// All weights finite, attraction weights non-negative
    pub fn validate(&self) -> Result<(), SwarmError> {
        if !self.inertia.is_finite() {
            return Err(SwarmError::InvalidCoefficient(format!("inertia {}", self.inertia)));
        }
        for (name, value) in [("cognitive", self.cognitive), ("social", self.social)] {
            if !value.is_finite() || value < 0.0 {
                return Err(SwarmError::InvalidCoefficient(format!("{} {}", name, value)));
            }
        }
        Ok(())
    }

    /// New velocity from the current state and the random factors.
    /// Without a global best the social term is dropped.
    pub fn velocity(
        &self,
        velocity: &DVector<f64>,
        position: &DVector<f64>,
        personal_best: &DVector<f64>,
        global_best: Option<&DVector<f64>>,
        r1: &DVector<f64>,
        r2: &DVector<f64>,
    ) -> DVector<f64> {
        let mut next =
            velocity * self.inertia + (personal_best - position).component_mul(r1) * self.cognitive;
        if let Some(best) = global_best {
            next += (best - position).component_mul(r2) * self.social;
        }
        next
    }

    /// Move `particle` one step and clip its position into `space`
    pub fn apply<R: Rng + ?Sized>(
        &self,
        particle: &mut Particle,
        global_best: Option<&DVector<f64>>,
        space: &BoundedSpace,
        rng: &mut R,
    ) {
        let n = particle.dimensions();
        let r1 = DVector::from_fn(n, |_, _| rng.random::<f64>());
        let r2 = DVector::from_fn(n, |_, _| rng.random::<f64>());

        let velocity = self.velocity(
            particle.velocity(),
            particle.position(),
            particle.best_position(),
            global_best,
            &r1,
            &r2,
        );
        let mut position = particle.position() + &velocity;
        space.clip_in_place(&mut position);
        particle.set_motion(position, velocity);
    }
}

impl Default for PsoUpdateRule {
    fn default() -> Self {
        PsoUpdateRule {
            inertia: 0.5,
            cognitive: 1.0,
            social: 1.0,
        }
    }
}
