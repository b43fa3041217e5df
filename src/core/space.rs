// core/space.rs

// Defines the search domain for the swarm: one closed interval per dimension
// and the clipping policy applied to every particle after it moves.

use nalgebra::DVector;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::SwarmError;

/// Closed interval `[lower, upper]` for one search dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Bound {
    lower: f64,
    upper: f64,
}

impl Bound {
    /// Create a bound, rejecting `lower > upper`, non-finite limits and
    /// widths too large to sample from
    pub fn new(lower: f64, upper: f64) -> Result<Self, SwarmError> {
        if !lower.is_finite()
            || !upper.is_finite()
            || lower > upper
            || !(upper - lower).is_finite()
        {
            return Err(SwarmError::InvalidBounds { lower, upper });
        }
        Ok(Bound { lower, upper })
    }

    /// Lower limit
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper limit
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Clamp a coordinate into the interval. NaN lands on the lower limit.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        value.clamp(self.lower, self.upper)
    }

    /// Whether `value` lies inside the interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Draw a uniform sample from the interval
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.random_range(self.lower..=self.upper)
    }
}

impl TryFrom<[f64; 2]> for Bound {
    type Error = SwarmError;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        Bound::new(pair[0], pair[1])
    }
}

impl From<Bound> for [f64; 2] {
    fn from(bound: Bound) -> Self {
        [bound.lower, bound.upper]
    }
}

/// Per-dimension bounds of the search domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundedSpace {
    bounds: Vec<Bound>,
}

impl BoundedSpace {
    /// Build a space from already validated bounds
    pub fn new(bounds: Vec<Bound>) -> Self {
        BoundedSpace { bounds }
    }

    /// Same `[lower, upper]` interval on every dimension
    pub fn uniform(dimensions: usize, lower: f64, upper: f64) -> Result<Self, SwarmError> {
        let bound = Bound::new(lower, upper)?;
        Ok(BoundedSpace {
            bounds: vec![bound; dimensions],
        })
    }

    /// Build a space from `(lower, upper)` pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, SwarmError> {
        let bounds = pairs
            .iter()
            .map(|&(lower, upper)| Bound::new(lower, upper))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BoundedSpace { bounds })
    }

    /// Number of dimensions
    pub fn dimensions(&self) -> usize {
        self.bounds.len()
    }

    /// The per-dimension bounds
    pub fn bounds(&self) -> &[Bound] {
        &self.bounds
    }

    /// Clamp every coordinate of `position` into its own bound
    pub fn clip(&self, position: &DVector<f64>) -> DVector<f64> {
        let mut clipped = position.clone();
        self.clip_in_place(&mut clipped);
        clipped
    }

    /// In-place variant of [`BoundedSpace::clip`]
    pub fn clip_in_place(&self, position: &mut DVector<f64>) {
        for (value, bound) in position.iter_mut().zip(&self.bounds) {
            *value = bound.clamp(*value);
        }
    }

    /// Whether every coordinate lies inside its bound
    pub fn contains(&self, position: &DVector<f64>) -> bool {
        position.len() == self.bounds.len()
            && position
                .iter()
                .zip(&self.bounds)
                .all(|(value, bound)| bound.contains(*value))
    }

    /// Draw a position uniformly, independently per dimension
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        DVector::from_iterator(
            self.bounds.len(),
            self.bounds.iter().map(|bound| bound.sample(rng)),
        )
    }
}
