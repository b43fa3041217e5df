// scenarios/maze.rs

// Maze waypoint planning: find K intermediate waypoints so that the path
// start -> waypoints -> goal is short and avoids every wall cell.

use std::path::Path;

use log::{info, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use super::{load_yaml, parse_yaml};
use crate::SwarmError;
use crate::core::{CollisionChecker, OccupancyGrid};
use crate::fitness::maze::DEFAULT_COLLISION_PENALTY;
use crate::fitness::{DecodedFitness, MazePathFitness, PathScore};
use crate::swarm::{
    CancellationToken, OptimizationResult, ProgressObserver, ProgressReport, Swarm, SwarmConfig,
    seeded_rng,
};

/// 10x10 reference maze, `#` marks a wall
pub const DEFAULT_MAZE: [&str; 10] = [
    "..........",
    ".###.####.",
    ".#......#.",
    ".#.####.#.",
    "......#...",
    ".####.###.",
    ".#..#...#.",
    ".#.####.#.",
    "........#.",
    ".######...",
];

// Parsed at compile time; a malformed row fails the build
const DEFAULT_MAZE_CELLS: [[bool; 10]; 10] = parse_rows(DEFAULT_MAZE);

const fn parse_rows<const W: usize, const H: usize>(rows: [&str; H]) -> [[bool; W]; H] {
    let mut cells = [[false; W]; H];
    let mut y = 0;
    while y < H {
        let row = rows[y].as_bytes();
        assert!(row.len() == W, "maze row has the wrong width");
        let mut x = 0;
        while x < W {
            assert!(row[x] == b'#' || row[x] == b'.', "maze cell must be '#' or '.'");
            cells[y][x] = row[x] == b'#';
            x += 1;
        }
        y += 1;
    }
    cells
}

/// Maze scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeScenario {
    /// Occupancy grid
    pub grid: OccupancyGrid,
    /// Path start (x, y)
    pub start: Point2<f64>,
    /// Path goal (x, y)
    pub goal: Point2<f64>,
    /// Number of intermediate waypoints
    pub waypoints: usize,
    /// Points sampled per segment during collision checks
    pub collision_samples: CollisionChecker,
    /// Penalty per colliding segment
    pub collision_penalty: f64,
    /// Swarm settings
    pub swarm: SwarmConfig,
}

impl Default for MazeScenario {
    fn default() -> Self {
        let grid = OccupancyGrid::from(DEFAULT_MAZE_CELLS);
        let goal = Point2::new((grid.width() - 1) as f64, (grid.height() - 1) as f64);
        MazeScenario {
            grid,
            start: Point2::new(0.0, 0.0),
            goal,
            waypoints: 3,
            collision_samples: CollisionChecker::default(),
            collision_penalty: DEFAULT_COLLISION_PENALTY,
            swarm: SwarmConfig::default(),
        }
    }
}

/// Best path found for a maze scenario
#[derive(Debug, Clone)]
pub struct MazeOutcome {
    /// Raw optimizer result
    pub result: OptimizationResult,
    /// Decoded best path, start and goal included
    pub path: Vec<Point2<f64>>,
    /// Length/collision breakdown of the best path
    pub score: PathScore,
}

impl MazeOutcome {
    /// True when the best path avoids every wall
    pub fn feasible(&self) -> bool {
        self.score.is_feasible()
    }
}

impl MazeScenario {
    /// Load a scenario from a YAML file; missing fields take default values
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SwarmError> {
        load_yaml(path.as_ref())
    }

    /// Parse a scenario from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self, SwarmError> {
        parse_yaml(text)
    }

    /// Build the path fitness for this scenario
    pub fn fitness(&self) -> Result<MazePathFitness, SwarmError> {
        MazePathFitness::new(self.grid.clone(), self.start, self.goal, self.waypoints)
            .with_checker(self.collision_samples)
            .with_collision_penalty(self.collision_penalty)
    }

    /// Run with a seed from the swarm config and no progress observer
    pub fn run(&self) -> Result<MazeOutcome, SwarmError> {
        self.run_with(&mut |_: &ProgressReport| {}, &CancellationToken::new())
    }

    /// Run with a progress observer and cancellation token
    pub fn run_with<O>(&self, observer: &mut O, cancel: &CancellationToken) -> Result<MazeOutcome, SwarmError>
    where
        O: ProgressObserver + ?Sized,
    {
        let fitness = self.fitness()?;
        for (name, point) in [("start", self.start), ("goal", self.goal)] {
            if self.grid.is_blocked_at(&point) {
                warn!("Maze {} ({}, {}) is on a wall or off the grid", name, point.x, point.y);
            }
        }

        let space = fitness.search_space()?;
        let mut swarm = Swarm::new(&fitness, space, self.swarm.clone())?;
        let mut rng = seeded_rng(self.swarm.seed);
        let result = swarm.run_with(&mut rng, observer, cancel);

        let best = result.best_position.as_ref().ok_or(SwarmError::NoFiniteScore)?;
        let path = fitness.decode(best.as_slice());
        let score = fitness.score_path(&path);
        if score.is_feasible() {
            info!("Best path: length {:.2} through {} points", score.length, path.len());
        } else {
            warn!(
                "Best path still collides on {} segment(s), score {:.2}",
                score.collisions, score.score
            );
        }

        Ok(MazeOutcome {
            result,
            path,
            score,
        })
    }
}
