// swarm/particle.rs

// A single candidate solution: current position and velocity plus the best
// position it has visited so far.

use nalgebra::DVector;

/// Particle state owned by the swarm
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    position: DVector<f64>,
    velocity: DVector<f64>,
    best_position: DVector<f64>,
    best_score: f64,
}

impl Particle {
    /// Create a particle with no recorded best (score `+inf`)
    pub fn new(position: DVector<f64>, velocity: DVector<f64>) -> Self {
        Particle {
            best_position: position.clone(),
            position,
            velocity,
            best_score: f64::INFINITY,
        }
    }

    /// Current position
    pub fn position(&self) -> &DVector<f64> {
        &self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> &DVector<f64> {
        &self.velocity
    }

    /// Best position visited so far
    pub fn best_position(&self) -> &DVector<f64> {
        &self.best_position
    }

    /// Score of the best position, `+inf` until the first finite evaluation
    pub fn best_score(&self) -> f64 {
        self.best_score
    }

    /// Dimensions of the particle's vectors
    pub fn dimensions(&self) -> usize {
        self.position.len()
    }

    /// Record the score of the current position. Only a strict improvement
    /// replaces the personal best; returns whether it did.
    pub(crate) fn record(&mut self, score: f64) -> bool {
        if score < self.best_score {
            self.best_score = score;
            self.best_position.copy_from(&self.position);
            true
        } else {
            false
        }
    }

    pub(crate) fn set_motion(&mut self, position: DVector<f64>, velocity: DVector<f64>) {
        self.position = position;
        self.velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_finite_score_always_records() {
        let mut particle = Particle::new(DVector::from_vec(vec![1.0]), DVector::zeros(1));
        assert_eq!(particle.best_score(), f64::INFINITY);
        assert!(particle.record(1e12));
        assert_eq!(particle.best_score(), 1e12);
    }

    #[test]
    fn ties_do_not_replace_best() {
        let mut particle = Particle::new(DVector::from_vec(vec![1.0]), DVector::zeros(1));
        particle.record(5.0);
        particle.set_motion(DVector::from_vec(vec![2.0]), DVector::zeros(1));
        assert!(!particle.record(5.0));
        assert_eq!(particle.best_position()[0], 1.0);
        assert!(particle.record(4.0));
        assert_eq!(particle.best_position()[0], 2.0);
    }
}
