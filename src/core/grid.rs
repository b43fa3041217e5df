// core/grid.rs

// Binary occupancy grid for the maze scenario and the sampled segment
// collision check used when scoring waypoint paths. Cells are addressed
// (row = y, col = x); anything outside the grid counts as blocked.

use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::SwarmError;

/// Samples per segment when no explicit count is configured
pub const DEFAULT_COLLISION_SAMPLES: usize = 20;

/// Occupancy grid: `true` marks a wall, stored row-major
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridRows", into = "GridRows")]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

// On-disk grid layout: either text rows (`#` wall, `.` free) or 0/1 rows
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GridRows {
    Text(Vec<String>),
    Cells(Vec<Vec<u8>>),
}

impl OccupancyGrid {
    /// Build a grid from rows of cells, `true` meaning blocked
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, SwarmError> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(SwarmError::InvalidGrid("grid has no cells".to_string()));
        }
        if let Some(row) = rows.iter().position(|r| r.len() != width) {
            return Err(SwarmError::InvalidGrid(format!(
                "row {} has {} cells, expected {}",
                row,
                rows[row].len(),
                width
            )));
        }

        Ok(OccupancyGrid {
            width,
            height,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Parse text rows where `#` is a wall and `.` is free space
    pub fn from_text<S: AsRef<str>>(rows: &[S]) -> Result<Self, SwarmError> {
        let rows = rows
            .iter()
            .enumerate()
            .map(|(y, row)| {
                row.as_ref()
                    .chars()
                    .map(|c| match c {
                        '#' => Ok(true),
                        '.' => Ok(false),
                        other => Err(SwarmError::InvalidGrid(format!(
                            "unexpected character '{}' in row {}",
                            other, y
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// A grid with no walls
    pub fn open(width: usize, height: usize) -> Result<Self, SwarmError> {
        Self::from_rows(vec![vec![false; width]; height])
    }

    /// Number of columns (x extent)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows (y extent)
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell state at column `x`, row `y`; `None` outside the grid
    pub fn cell(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Mark or clear a wall. Out-of-range coordinates are ignored.
    pub fn set_blocked(&mut self, x: usize, y: usize, blocked: bool) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = blocked;
        }
    }

    /// Whether a continuous point falls on a wall or off the grid.
    /// Coordinates round half-to-even onto the nearest cell.
    pub fn is_blocked_at(&self, point: &Point2<f64>) -> bool {
        match (
            Self::axis_index(point.x, self.width),
            Self::axis_index(point.y, self.height),
        ) {
            (Some(x), Some(y)) => self.cells[y * self.width + x],
            _ => true,
        }
    }

    fn axis_index(coordinate: f64, extent: usize) -> Option<usize> {
        let rounded = coordinate.round_ties_even();
        // NaN fails both comparisons
        if rounded >= 0.0 && rounded < extent as f64 {
            Some(rounded as usize)
        } else {
            None
        }
    }

    fn to_text(&self) -> Vec<String> {
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|&b| if b { '#' } else { '.' }).collect())
            .collect()
    }
}

impl<const W: usize, const H: usize> From<[[bool; W]; H]> for OccupancyGrid {
    fn from(rows: [[bool; W]; H]) -> Self {
        const { assert!(W > 0 && H > 0, "grid has no cells") };
        OccupancyGrid {
            width: W,
            height: H,
            cells: rows.into_iter().flatten().collect(),
        }
    }
}

impl TryFrom<GridRows> for OccupancyGrid {
    type Error = SwarmError;

    fn try_from(rows: GridRows) -> Result<Self, Self::Error> {
        match rows {
            GridRows::Text(lines) => Self::from_text(&lines),
            GridRows::Cells(rows) => Self::from_rows(
                rows.into_iter()
                    .map(|row| row.into_iter().map(|cell| cell != 0).collect())
                    .collect(),
            ),
        }
    }
}

impl From<OccupancyGrid> for GridRows {
    fn from(grid: OccupancyGrid) -> Self {
        GridRows::Text(grid.to_text())
    }
}

/// Sampled straight-segment collision test against an [`OccupancyGrid`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct CollisionChecker {
    samples: usize,
}

impl CollisionChecker {
    /// Create a checker taking `samples` points per segment (endpoints included)
    pub fn new(samples: usize) -> Result<Self, SwarmError> {
        if samples == 0 {
            return Err(SwarmError::InvalidSampleCount(samples));
        }
        Ok(CollisionChecker { samples })
    }

    /// Points tested per segment
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Whether the segment from `a` to `b` touches a wall or leaves the grid.
    ///
    /// Tests `samples` evenly spaced points with `t` in `[0, 1]` and stops at
    /// the first hit. A single sample tests `a` only.
    pub fn is_blocked(&self, a: &Point2<f64>, b: &Point2<f64>, grid: &OccupancyGrid) -> bool {
        let delta = b - a;
        let last = (self.samples - 1).max(1) as f64;
        let hit = (0..self.samples).find(|&i| grid.is_blocked_at(&(a + delta * (i as f64 / last))));

        if let Some(i) = hit {
            debug!(
                "Segment ({:.2}, {:.2}) -> ({:.2}, {:.2}) blocked at sample {}",
                a.x, a.y, b.x, b.y, i
            );
        }
        hit.is_some()
    }
}

impl Default for CollisionChecker {
    fn default() -> Self {
        CollisionChecker {
            samples: DEFAULT_COLLISION_SAMPLES,
        }
    }
}

impl TryFrom<usize> for CollisionChecker {
    type Error = SwarmError;

    fn try_from(samples: usize) -> Result<Self, Self::Error> {
        CollisionChecker::new(samples)
    }
}

impl From<CollisionChecker> for usize {
    fn from(checker: CollisionChecker) -> Self {
        checker.samples
    }
}

/// Free-function form of [`CollisionChecker::is_blocked`]
pub fn is_blocked(
    a: &Point2<f64>,
    b: &Point2<f64>,
    grid: &OccupancyGrid,
    samples: usize,
) -> Result<bool, SwarmError> {
    Ok(CollisionChecker::new(samples)?.is_blocked(a, b, grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> OccupancyGrid {
        OccupancyGrid::from_text(&["....", ".##.", "...."]).unwrap()
    }

    #[test]
    fn parses_text_rows() {
        let grid = corridor();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.cell(1, 1), Some(true));
        assert_eq!(grid.cell(0, 1), Some(false));
        assert_eq!(grid.cell(4, 0), None);
    }

    #[test]
    fn rejects_ragged_and_empty_grids() {
        assert!(matches!(
            OccupancyGrid::from_text(&["...", ".."]),
            Err(SwarmError::InvalidGrid(_))
        ));
        assert!(OccupancyGrid::from_rows(Vec::new()).is_err());
        assert!(OccupancyGrid::from_text(&["..x"]).is_err());
    }

    #[test]
    fn free_segment_is_not_blocked() {
        let checker = CollisionChecker::default();
        assert!(!checker.is_blocked(&Point2::new(0.0, 0.0), &Point2::new(3.0, 0.0), &corridor()));
        assert!(!checker.is_blocked(&Point2::new(0.0, 2.0), &Point2::new(3.0, 2.0), &corridor()));
    }

    #[test]
    fn segment_through_wall_is_blocked() {
        let checker = CollisionChecker::default();
        assert!(checker.is_blocked(&Point2::new(0.0, 1.0), &Point2::new(3.0, 1.0), &corridor()));
    }

    #[test]
    fn endpoint_outside_grid_is_blocked() {
        let checker = CollisionChecker::default();
        assert!(checker.is_blocked(&Point2::new(0.0, 0.0), &Point2::new(5.0, 0.0), &corridor()));
        assert!(checker.is_blocked(&Point2::new(-0.6, 0.0), &Point2::new(0.0, 0.0), &corridor()));
    }

    #[test]
    fn degenerate_segment_checks_its_point() {
        let checker = CollisionChecker::default();
        let wall = Point2::new(1.0, 1.0);
        let free = Point2::new(0.0, 0.0);
        assert!(checker.is_blocked(&wall, &wall, &corridor()));
        assert!(!checker.is_blocked(&free, &free, &corridor()));
    }

    #[test]
    fn rounds_half_to_even() {
        let grid = OccupancyGrid::from_text(&["..#."]).unwrap();
        // 2.5 rounds to 2 (wall), 1.5 rounds to 2 (wall), 3.5 rounds to 4 (off grid)
        assert!(grid.is_blocked_at(&Point2::new(2.5, 0.0)));
        assert!(grid.is_blocked_at(&Point2::new(1.5, 0.0)));
        assert!(grid.is_blocked_at(&Point2::new(3.5, 0.0)));
        assert!(!grid.is_blocked_at(&Point2::new(0.5, 0.0)));
        assert!(grid.is_blocked_at(&Point2::new(f64::NAN, 0.0)));
    }

    #[test]
    fn zero_samples_rejected() {
        assert_eq!(CollisionChecker::new(0), Err(SwarmError::InvalidSampleCount(0)));
        assert!(is_blocked(&Point2::origin(), &Point2::origin(), &corridor(), 0).is_err());
    }

    #[test]
    fn single_sample_tests_start_only() {
        let checker = CollisionChecker::new(1).unwrap();
        assert!(!checker.is_blocked(&Point2::new(0.0, 0.0), &Point2::new(1.0, 1.0), &corridor()));
    }

    #[test]
    fn fixed_size_rows_match_text() {
        let grid = OccupancyGrid::from([
            [false, false, false, false],
            [false, true, true, false],
            [false; 4],
        ]);
        assert_eq!(grid, corridor());
    }

    #[test]
    fn grid_yaml_accepts_text_and_numeric_rows() {
        let text: OccupancyGrid = serde_yaml::from_str("- '..'\n- '#.'\n").unwrap();
        let numeric: OccupancyGrid = serde_yaml::from_str("- [0, 0]\n- [1, 0]\n").unwrap();
        assert_eq!(text, numeric);
        assert_eq!(text.cell(0, 1), Some(true));
    }
}
