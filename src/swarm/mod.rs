//! Particle swarm optimizer
//!
//! The [`Swarm`] owns the particles and the global best, and runs a fixed
//! budget of iterations. Under the default synchronous schedule each
//! iteration evaluates every particle, updates personal and global bests,
//! then moves every particle with [`PsoUpdateRule`] and clips it back into
//! the [`BoundedSpace`].
//!
//! Non-finite fitness scores are treated as `+inf`, so they can never
//! become a personal or global best.

pub mod config;
pub mod particle;
pub mod update;

pub use config::{SwarmConfig, UpdateSchedule, VelocityInit};
pub use particle::Particle;
pub use update::PsoUpdateRule;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::SwarmError;
use crate::core::BoundedSpace;
use crate::fitness::FitnessEvaluator;

/// Best score seen at the end of one iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressReport {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Global best score after the iteration
    pub best_score: f64,
}

/// Receives progress reports every `report_interval` iterations
pub trait ProgressObserver {
    /// Called with the latest report
    fn on_progress(&mut self, report: &ProgressReport);
}

impl<F: FnMut(&ProgressReport)> ProgressObserver for F {
    fn on_progress(&mut self, report: &ProgressReport) {
        self(report)
    }
}

/// Shared flag to stop a run between iterations
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop before its next iteration
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Full iteration budget used
    Completed,
    /// Stagnation limit reached
    Stagnated,
    /// Cancellation token fired
    Cancelled,
}

/// Outcome of a swarm run
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Best position found; `None` if no finite score was ever seen
    pub best_position: Option<DVector<f64>>,
    /// Score of the best position (`+inf` if none)
    pub best_score: f64,
    /// Iterations actually executed
    pub iterations: usize,
    /// Why the run ended
    pub termination: Termination,
    /// Global best after every iteration
    pub history: Vec<ProgressReport>,
}

/// Particles plus the swarm-wide best
#[derive(Debug, Clone)]
pub struct SwarmState {
    particles: Vec<Particle>,
    global_best_position: Option<DVector<f64>>,
    global_best_score: f64,
}

impl SwarmState {
    fn new(particles: Vec<Particle>) -> Self {
        SwarmState {
            particles,
            global_best_position: None,
            global_best_score: f64::INFINITY,
        }
    }

    /// Particles in stable index order
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Best position found by any particle
    pub fn global_best_position(&self) -> Option<&DVector<f64>> {
        self.global_best_position.as_ref()
    }

    /// Score of the global best, `+inf` before the first finite evaluation
    pub fn global_best_score(&self) -> f64 {
        self.global_best_score
    }

    // Strict improvement only, so ties keep the earlier best
    fn offer(&mut self, index: usize, score: f64) -> bool {
        let particle = &mut self.particles[index];
        let improved_personal = particle.record(score);
        if improved_personal && score < self.global_best_score {
            self.global_best_score = score;
            self.global_best_position = Some(particle.position().clone());
            return true;
        }
        false
    }
}

/// Particle swarm over a fitness evaluator
pub struct Swarm<E> {
    evaluator: E,
    space: BoundedSpace,
    config: SwarmConfig,
    state: SwarmState,
    primed: bool,
}

impl<E: FitnessEvaluator> Swarm<E> {
    /// Create a swarm, validating the configuration and that the evaluator
    /// and search space agree on dimensionality
    pub fn new(evaluator: E, space: BoundedSpace, config: SwarmConfig) -> Result<Self, SwarmError> {
        config.validate()?;
        if evaluator.dimensions() != space.dimensions() {
            return Err(SwarmError::DimensionMismatch {
                expected: evaluator.dimensions(),
                found: space.dimensions(),
            });
        }
        if config.parallel && config.schedule == UpdateSchedule::Asynchronous {
            warn!("Parallel evaluation has no effect with the asynchronous schedule");
        }

        Ok(Swarm {
            evaluator,
            space,
            config,
            state: SwarmState::new(Vec::new()),
            primed: false,
        })
    }

    /// Start from explicit particles instead of random initialization
    pub fn with_particles(mut self, particles: Vec<Particle>) -> Result<Self, SwarmError> {
        if particles.is_empty() {
            return Err(SwarmError::InvalidParticleCount(0));
        }
        for (i, particle) in particles.iter().enumerate() {
            for vector in [particle.position(), particle.velocity()] {
                if vector.len() != self.space.dimensions() {
                    return Err(SwarmError::DimensionMismatch {
                        expected: self.space.dimensions(),
                        found: vector.len(),
                    });
                }
            }
            if !self.space.contains(particle.position()) {
                return Err(SwarmError::ConfigError(format!(
                    "particle {} starts outside the search space",
                    i
                )));
            }
        }

        self.config.particles = particles.len();
        self.state = SwarmState::new(particles);
        self.primed = false;
        Ok(self)
    }

    /// Scatter particles uniformly over the space and draw initial velocities.
    /// Resets all bests.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let dimensions = self.space.dimensions();
        let particles = (0..self.config.particles)
            .map(|_| {
                let position = self.space.sample(rng);
                let velocity = match self.config.velocity_init {
                    VelocityInit::Zero => DVector::zeros(dimensions),
                    VelocityInit::Uniform { magnitude } => {
                        DVector::from_fn(dimensions, |_, _| rng.random_range(-magnitude..=magnitude))
                    }
                };
                Particle::new(position, velocity)
            })
            .collect();

        self.state = SwarmState::new(particles);
        self.primed = false;
    }

    /// Evaluation phase: score every particle, then fold the scores into the
    /// personal and global bests in index order. Returns whether the global
    /// best improved.
    pub fn evaluate_all(&mut self) -> bool {
        let scores = self.score_all();
        let mut improved = false;
        for (index, score) in scores.into_iter().enumerate() {
            improved |= self.state.offer(index, score);
        }
        self.primed = true;
        improved
    }

    /// Update phase: move every particle using the bests from the last
    /// evaluation phase
    pub fn move_all<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let global_best = self.state.global_best_position.as_ref();
        for particle in &mut self.state.particles {
            self.config.rule.apply(particle, global_best, &self.space, rng);
        }
    }

    /// Run one iteration under the configured schedule. Returns whether the
    /// global best improved.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.state.particles.is_empty() {
            self.initialize(rng);
        }

        match self.config.schedule {
            UpdateSchedule::Synchronous => {
                let improved = self.evaluate_all();
                self.move_all(rng);
                improved
            }
            UpdateSchedule::Asynchronous => {
                if !self.primed {
                    self.evaluate_all();
                }
                self.step_asynchronous(rng)
            }
        }
    }

    /// Run the full budget with a random source seeded from the config
    pub fn run(&mut self) -> OptimizationResult {
        let mut rng = seeded_rng(self.config.seed);
        self.run_with(&mut rng, &mut |_: &ProgressReport| {}, &CancellationToken::new())
    }

    /// Run the full budget with an explicit random source, progress observer
    /// and cancellation token
    pub fn run_with<R, O>(
        &mut self,
        rng: &mut R,
        observer: &mut O,
        cancel: &CancellationToken,
    ) -> OptimizationResult
    where
        R: Rng + ?Sized,
        O: ProgressObserver + ?Sized,
    {
        if self.state.particles.is_empty() {
            self.initialize(rng);
        }
        if self.config.schedule == UpdateSchedule::Asynchronous && !self.primed {
            self.evaluate_all();
        }

        info!(
            "Starting swarm run: {} particles, {} dimensions, {} iterations",
            self.state.particles.len(),
            self.space.dimensions(),
            self.config.iterations
        );

        let mut history = Vec::with_capacity(self.config.iterations);
        let mut termination = Termination::Completed;
        let mut stale = 0;

        for iteration in 0..self.config.iterations {
            if cancel.is_cancelled() {
                termination = Termination::Cancelled;
                info!("Swarm run cancelled before iteration {}", iteration);
                break;
            }

            let improved = self.step(rng);
            let report = ProgressReport {
                iteration,
                best_score: self.state.global_best_score,
            };
            history.push(report);

            if let Some(interval) = self.config.report_interval {
                if iteration % interval == 0 {
                    info!("Iteration {}, best fitness: {:.2}", iteration, report.best_score);
                    observer.on_progress(&report);
                }
            }

            stale = if improved { 0 } else { stale + 1 };
            if let Some(limit) = self.config.stagnation_limit {
                if stale >= limit {
                    termination = Termination::Stagnated;
                    info!("No improvement for {} iterations, stopping", stale);
                    break;
                }
            }
        }

        info!(
            "Swarm run finished after {} iterations ({:?}), best fitness {:.4}",
            history.len(),
            termination,
            self.state.global_best_score
        );
        if self.state.global_best_position.is_none() {
            warn!("Swarm run ended without a finite fitness score");
        }

        OptimizationResult {
            best_position: self.state.global_best_position.clone(),
            best_score: self.state.global_best_score,
            iterations: history.len(),
            termination,
            history,
        }
    }

    /// Current swarm state
    pub fn state(&self) -> &SwarmState {
        &self.state
    }

    /// The fitness evaluator
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// The search space
    pub fn space(&self) -> &BoundedSpace {
        &self.space
    }

    /// The run configuration
    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    // Move and evaluate one particle at a time; later particles see any
    // global best found earlier in the same sweep
    fn step_asynchronous<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut improved = false;
        for index in 0..self.state.particles.len() {
            let global_best = self.state.global_best_position.as_ref();
            let particle = &mut self.state.particles[index];
            self.config.rule.apply(particle, global_best, &self.space, rng);

            let score = self.evaluator.evaluate(particle.position().as_slice());
            if !score.is_finite() {
                warn!("Non-finite fitness {} for particle {}", score, index);
            }
            improved |= self.state.offer(index, finite_or_worst(score));
        }
        improved
    }

    fn score_all(&self) -> Vec<f64> {
        let scores: Vec<f64> = if self.config.parallel {
            self.state
                .particles
                .par_iter()
                .map(|p| self.evaluator.evaluate(p.position().as_slice()))
                .collect()
        } else {
            self.state
                .particles
                .iter()
                .map(|p| self.evaluator.evaluate(p.position().as_slice()))
                .collect()
        };

        let non_finite = scores.iter().filter(|s| !s.is_finite()).count();
        if non_finite > 0 {
            warn!(
                "{} of {} fitness scores were not finite; ranking them last",
                non_finite,
                scores.len()
            );
        }
        scores.into_iter().map(finite_or_worst).collect()
    }
}

/// Random source for a run: seeded when `seed` is set, from the OS otherwise
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn finite_or_worst(score: f64) -> f64 {
    if score.is_finite() { score } else { f64::INFINITY }
}
