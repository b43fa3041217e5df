//! Fitness evaluation for the swarm
//!
//! Every scenario plugs into the optimizer through [`FitnessEvaluator`].
//! Lower scores are better. Evaluators that first turn the flat candidate
//! into a domain structure (a path, a point) also implement
//! [`DecodedFitness`], which exposes the decode and score stages separately.

pub mod continuous;
pub mod maze;

pub use continuous::{Obstacle, PenalizedContinuousFitness};
pub use maze::{MazePathFitness, PathScore};

/// Scores a flat candidate vector; lower is better
pub trait FitnessEvaluator: Send + Sync {
    /// Length of the candidate vectors this evaluator accepts
    fn dimensions(&self) -> usize;

    /// Score a candidate.
    ///
    /// `candidate.len()` must equal [`FitnessEvaluator::dimensions`]; the
    /// swarm always passes vectors of that length. Implementations check it
    /// with `debug_assert_eq!`.
    fn evaluate(&self, candidate: &[f64]) -> f64;
}

impl<E: FitnessEvaluator + ?Sized> FitnessEvaluator for &E {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn evaluate(&self, candidate: &[f64]) -> f64 {
        (**self).evaluate(candidate)
    }
}

impl<E: FitnessEvaluator + ?Sized> FitnessEvaluator for Box<E> {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn evaluate(&self, candidate: &[f64]) -> f64 {
        (**self).evaluate(candidate)
    }
}

/// Two-stage fitness: candidate -> domain structure -> score
pub trait DecodedFitness {
    /// Domain structure a candidate decodes into
    type Decoded;

    /// Turn a flat candidate into the domain structure. Same length
    /// precondition as [`FitnessEvaluator::evaluate`].
    fn decode(&self, candidate: &[f64]) -> Self::Decoded;

    /// Score an already decoded structure
    fn score(&self, decoded: &Self::Decoded) -> f64;

    /// Decode then score, keeping the decoded structure for reporting
    fn evaluate_decoded(&self, candidate: &[f64]) -> (f64, Self::Decoded) {
        let decoded = self.decode(candidate);
        (self.score(&decoded), decoded)
    }
}

/// Wraps a plain function as a [`FitnessEvaluator`]
pub struct FnFitness<F> {
    dimensions: usize,
    function: F,
}

impl<F> FnFitness<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Wrap `function` taking candidates of `dimensions` values
    pub fn new(dimensions: usize, function: F) -> Self {
        FnFitness {
            dimensions,
            function,
        }
    }
}

impl<F> FitnessEvaluator for FnFitness<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn evaluate(&self, candidate: &[f64]) -> f64 {
        (self.function)(candidate)
    }
}

impl<F> std::fmt::Debug for FnFitness<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("FnFitness")
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}
