// fitness/maze.rs

// Waypoint path fitness for the maze scenario. A candidate holds K
// intermediate waypoints as flat (x, y) pairs; the path runs from the fixed
// start through the waypoints to the fixed goal. Its score is the total
// Euclidean length plus a fixed penalty for every segment that hits a wall.

use nalgebra::{Point2, distance};

use super::{DecodedFitness, FitnessEvaluator};
use crate::SwarmError;
use crate::core::{BoundedSpace, CollisionChecker, OccupancyGrid};

/// Penalty added per colliding segment unless configured otherwise
pub const DEFAULT_COLLISION_PENALTY: f64 = 1000.0;

/// Breakdown of a scored path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathScore {
    /// Sum of Euclidean segment lengths
    pub length: f64,
    /// Number of segments that hit a wall or left the grid
    pub collisions: usize,
    /// `length + collisions * penalty`
    pub score: f64,
}

impl PathScore {
    /// A path is feasible when none of its segments collide
    pub fn is_feasible(&self) -> bool {
        self.collisions == 0
    }
}

/// Maze path fitness: start -> waypoints -> goal
#[derive(Debug, Clone)]
pub struct MazePathFitness {
    grid: OccupancyGrid,
    start: Point2<f64>,
    goal: Point2<f64>,
    waypoints: usize,
    checker: CollisionChecker,
    collision_penalty: f64,
}

impl MazePathFitness {
    /// Create a fitness over `grid` with `waypoints` intermediate points,
    /// default sampling and default penalty
    pub fn new(grid: OccupancyGrid, start: Point2<f64>, goal: Point2<f64>, waypoints: usize) -> Self {
        MazePathFitness {
            grid,
            start,
            goal,
            waypoints,
            checker: CollisionChecker::default(),
            collision_penalty: DEFAULT_COLLISION_PENALTY,
        }
    }

    /// Replace the collision checker
    pub fn with_checker(mut self, checker: CollisionChecker) -> Self {
        self.checker = checker;
        self
    }

    /// Set the penalty added per colliding segment
    pub fn with_collision_penalty(mut self, penalty: f64) -> Result<Self, SwarmError> {
        if !penalty.is_finite() || penalty < 0.0 {
            return Err(SwarmError::InvalidPenalty(penalty));
        }
        self.collision_penalty = penalty;
        Ok(self)
    }

    /// The maze grid
    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Fixed path start
    pub fn start(&self) -> Point2<f64> {
        self.start
    }

    /// Fixed path goal
    pub fn goal(&self) -> Point2<f64> {
        self.goal
    }

    /// Number of intermediate waypoints
    pub fn waypoints(&self) -> usize {
        self.waypoints
    }

    /// Penalty per colliding segment
    pub fn collision_penalty(&self) -> f64 {
        self.collision_penalty
    }

    /// Search space for the waypoints: x in `[0, width - 1]`, y in `[0, height - 1]`
    pub fn search_space(&self) -> Result<BoundedSpace, SwarmError> {
        let x = (0.0, (self.grid.width() - 1) as f64);
        let y = (0.0, (self.grid.height() - 1) as f64);
        let pairs: Vec<_> = [x, y].into_iter().cycle().take(2 * self.waypoints).collect();
        BoundedSpace::from_pairs(&pairs)
    }

    /// Score a full path (start and goal included)
    pub fn score_path(&self, path: &[Point2<f64>]) -> PathScore {
        let (length, collisions) = path.windows(2).fold((0.0, 0), |(length, hits), pair| {
            let blocked = self.checker.is_blocked(&pair[0], &pair[1], &self.grid);
            (
                length + distance(&pair[0], &pair[1]),
                hits + usize::from(blocked),
            )
        });

        PathScore {
            length,
            collisions,
            score: length + collisions as f64 * self.collision_penalty,
        }
    }

    /// Score a candidate and return the decoded path alongside
    pub fn evaluate_with_path(&self, candidate: &[f64]) -> (f64, Vec<Point2<f64>>) {
        self.evaluate_decoded(candidate)
    }
}

impl DecodedFitness for MazePathFitness {
    type Decoded = Vec<Point2<f64>>;

    fn decode(&self, candidate: &[f64]) -> Vec<Point2<f64>> {
        debug_assert_eq!(candidate.len(), 2 * self.waypoints, "candidate length");
        let mut path = Vec::with_capacity(self.waypoints + 2);
        path.push(self.start);
        path.extend(
            candidate
                .chunks_exact(2)
                .take(self.waypoints)
                .map(|xy| Point2::new(xy[0], xy[1])),
        );
        path.push(self.goal);
        path
    }

    fn score(&self, path: &Vec<Point2<f64>>) -> f64 {
        self.score_path(path).score
    }
}

impl FitnessEvaluator for MazePathFitness {
    fn dimensions(&self) -> usize {
        2 * self.waypoints
    }

    fn evaluate(&self, candidate: &[f64]) -> f64 {
        self.score(&self.decode(candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walled() -> OccupancyGrid {
        // Wall in the middle of row 1
        OccupancyGrid::from_text(&["...", ".#.", "..."]).unwrap()
    }

    #[test]
    fn decodes_start_waypoints_goal() {
        let fitness = MazePathFitness::new(walled(), Point2::new(0.0, 0.0), Point2::new(2.0, 2.0), 2);
        let path = fitness.decode(&[2.0, 0.0, 2.0, 1.0]);
        assert_eq!(
            path,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 1.0),
                Point2::new(2.0, 2.0)
            ]
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "candidate length")]
    fn short_candidate_is_rejected() {
        let fitness = MazePathFitness::new(walled(), Point2::new(0.0, 0.0), Point2::new(2.0, 2.0), 2);
        fitness.evaluate(&[1.0, 1.0]);
    }

    #[test]
    fn free_path_scores_its_length() {
        let fitness = MazePathFitness::new(walled(), Point2::new(0.0, 0.0), Point2::new(2.0, 2.0), 1);
        let (score, path) = fitness.evaluate_with_path(&[2.0, 0.0]);
        assert_eq!(path.len(), 3);
        assert!((score - 4.0).abs() < 1e-12);
        assert!(fitness.score_path(&path).is_feasible());
    }

    #[test]
    fn colliding_segment_adds_penalty() {
        let fitness = MazePathFitness::new(walled(), Point2::new(0.0, 0.0), Point2::new(2.0, 2.0), 0);
        let breakdown = fitness.score_path(&fitness.decode(&[]));
        assert_eq!(breakdown.collisions, 1);
        assert!((breakdown.score - (8.0_f64.sqrt() + 1000.0)).abs() < 1e-9);
    }

    #[test]
    fn penalty_is_configurable() {
        let fitness = MazePathFitness::new(walled(), Point2::new(0.0, 0.0), Point2::new(2.0, 2.0), 0)
            .with_collision_penalty(50.0)
            .unwrap();
        assert!((fitness.evaluate(&[]) - (8.0_f64.sqrt() + 50.0)).abs() < 1e-9);
        assert!(
            MazePathFitness::new(walled(), Point2::origin(), Point2::origin(), 0)
                .with_collision_penalty(-1.0)
                .is_err()
        );
    }

    #[test]
    fn search_space_alternates_axes() {
        let grid = OccupancyGrid::open(10, 5).unwrap();
        let fitness = MazePathFitness::new(grid, Point2::origin(), Point2::new(9.0, 4.0), 3);
        let space = fitness.search_space().unwrap();
        assert_eq!(space.dimensions(), 6);
        assert_eq!(space.bounds()[0].upper(), 9.0);
        assert_eq!(space.bounds()[1].upper(), 4.0);
        assert_eq!(space.bounds()[4].upper(), 9.0);
        assert_eq!(fitness.dimensions(), 6);
    }
}
