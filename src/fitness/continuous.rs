// fitness/continuous.rs

// Continuous two-variable objective with circular obstacles. The base
// surface is a shifted paraboloid with two sinusoidal ripples; each obstacle
// adds a penalty growing linearly with how deep the point sits inside it.

use nalgebra::{Point2, distance};
use serde::{Deserialize, Serialize};

use super::{DecodedFitness, FitnessEvaluator};
use crate::SwarmError;

/// Penalty per unit of obstacle penetration unless configured otherwise
pub const DEFAULT_PENALTY_WEIGHT: f64 = 1000.0;

/// Minimum of the paraboloid term
#[allow(clippy::approx_constant)]
pub const DEFAULT_TARGET: [f64; 2] = [3.14, 2.72];

/// Circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawObstacle", into = "RawObstacle")]
pub struct Obstacle {
    center: Point2<f64>,
    radius: f64,
}

#[derive(Serialize, Deserialize)]
struct RawObstacle {
    center: Point2<f64>,
    radius: f64,
}

impl Obstacle {
    /// Create an obstacle; the radius must be finite and non-negative
    pub fn new(center: Point2<f64>, radius: f64) -> Result<Self, SwarmError> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(SwarmError::NegativeRadius(radius));
        }
        Ok(Obstacle { center, radius })
    }

    /// Obstacle center
    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    /// Obstacle radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// How far `point` sits inside the obstacle; zero on or outside the rim
    pub fn penetration(&self, point: &Point2<f64>) -> f64 {
        let d = distance(point, &self.center);
        if d < self.radius { self.radius - d } else { 0.0 }
    }
}

impl TryFrom<RawObstacle> for Obstacle {
    type Error = SwarmError;

    fn try_from(raw: RawObstacle) -> Result<Self, Self::Error> {
        Obstacle::new(raw.center, raw.radius)
    }
}

impl From<Obstacle> for RawObstacle {
    fn from(obstacle: Obstacle) -> Self {
        RawObstacle {
            center: obstacle.center,
            radius: obstacle.radius,
        }
    }
}

/// Multimodal base function plus obstacle penalties
#[derive(Debug, Clone)]
pub struct PenalizedContinuousFitness {
    target: Point2<f64>,
    obstacles: Vec<Obstacle>,
    penalty_weight: f64,
}

impl PenalizedContinuousFitness {
    /// Create a fitness with the default target and penalty weight
    pub fn new(obstacles: Vec<Obstacle>) -> Self {
        PenalizedContinuousFitness {
            target: Point2::from(DEFAULT_TARGET),
            obstacles,
            penalty_weight: DEFAULT_PENALTY_WEIGHT,
        }
    }

    /// Move the minimum of the paraboloid term
    pub fn with_target(mut self, target: Point2<f64>) -> Self {
        self.target = target;
        self
    }

    /// Set the penalty per unit of penetration
    pub fn with_penalty_weight(mut self, weight: f64) -> Result<Self, SwarmError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(SwarmError::InvalidPenalty(weight));
        }
        self.penalty_weight = weight;
        Ok(self)
    }

    /// Obstacles in the field
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Base surface without penalties
    pub fn base(&self, point: &Point2<f64>) -> f64 {
        (point.x - self.target.x).powi(2)
            + (point.y - self.target.y).powi(2)
            + (3.0 * point.x + 1.41).sin()
            + (4.0 * point.y - 1.73).sin()
    }

    /// Sum of obstacle penalties at `point`
    pub fn penalty(&self, point: &Point2<f64>) -> f64 {
        self.obstacles
            .iter()
            .map(|obstacle| self.penalty_weight * obstacle.penetration(point))
            .sum()
    }

    /// Base plus penalty
    pub fn evaluate_point(&self, point: &Point2<f64>) -> f64 {
        self.base(point) + self.penalty(point)
    }
}

impl DecodedFitness for PenalizedContinuousFitness {
    type Decoded = Point2<f64>;

    fn decode(&self, candidate: &[f64]) -> Point2<f64> {
        debug_assert_eq!(candidate.len(), 2, "candidate length");
        Point2::new(candidate[0], candidate[1])
    }

    fn score(&self, point: &Point2<f64>) -> f64 {
        self.evaluate_point(point)
    }
}

impl FitnessEvaluator for PenalizedContinuousFitness {
    fn dimensions(&self) -> usize {
        2
    }

    fn evaluate(&self, candidate: &[f64]) -> f64 {
        self.evaluate_point(&self.decode(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(radius: f64) -> PenalizedContinuousFitness {
        PenalizedContinuousFitness::new(vec![Obstacle::new(Point2::origin(), radius).unwrap()])
    }

    #[test]
    fn negative_radius_rejected() {
        assert_eq!(
            Obstacle::new(Point2::origin(), -0.5),
            Err(SwarmError::NegativeRadius(-0.5))
        );
        assert!(Obstacle::new(Point2::origin(), 0.0).is_ok());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "candidate length")]
    fn short_candidate_is_rejected() {
        single(1.0).evaluate(&[0.5]);
    }

    #[test]
    fn penalty_at_center_is_weight_times_radius() {
        let fitness = single(2.0);
        assert!((fitness.penalty(&Point2::origin()) - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn penalty_vanishes_on_rim_and_outside() {
        let fitness = single(2.0);
        assert_eq!(fitness.penalty(&Point2::new(2.0, 0.0)), 0.0);
        assert_eq!(fitness.penalty(&Point2::new(0.0, -2.0)), 0.0);
        assert_eq!(fitness.penalty(&Point2::new(5.0, 5.0)), 0.0);
    }

    #[test]
    fn penalty_grows_linearly_inside() {
        let fitness = single(2.0);
        assert!((fitness.penalty(&Point2::new(1.5, 0.0)) - 500.0).abs() < 1e-9);
        assert!((fitness.penalty(&Point2::new(1.0, 0.0)) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn base_matches_closed_form() {
        let fitness = PenalizedContinuousFitness::new(Vec::new());
        let expected = 3.14_f64.powi(2) + 2.72_f64.powi(2) + 1.41_f64.sin() + (-1.73_f64).sin();
        assert!((fitness.evaluate(&[0.0, 0.0]) - expected).abs() < 1e-12);
    }

    #[test]
    fn obstacle_yaml_validates_radius() {
        let ok: Obstacle = serde_yaml::from_str("center: [2.0, 2.0]\nradius: 1.5\n").unwrap();
        assert_eq!(ok.center(), Point2::new(2.0, 2.0));
        assert!(serde_yaml::from_str::<Obstacle>("center: [0.0, 0.0]\nradius: -1.0\n").is_err());
    }
}
