// src/main.rs
// Demo entry point: runs the maze and/or continuous scenario and logs the result.
//
// Usage: swarm_nav [maze|continuous|all] [scenario.yaml]
// Set RUST_LOG=info to see progress reports.

use std::error::Error;

use log::{error, info};
use swarm_nav::{ContinuousScenario, MazeScenario};

fn run_maze(config: Option<&str>) -> Result<(), Box<dyn Error>> {
    let scenario = match config {
        Some(path) => MazeScenario::from_yaml_file(path)?,
        None => MazeScenario::default(),
    };
    let outcome = scenario.run()?;

    info!(
        "Maze: best score {:.2} after {} iterations ({:?})",
        outcome.result.best_score, outcome.result.iterations, outcome.result.termination
    );
    for (i, point) in outcome.path.iter().enumerate() {
        info!("  waypoint {}: ({:.2}, {:.2})", i, point.x, point.y);
    }
    if !outcome.feasible() {
        error!("No collision-free path found ({} colliding segments)", outcome.score.collisions);
    }
    Ok(())
}

fn run_continuous(config: Option<&str>) -> Result<(), Box<dyn Error>> {
    let scenario = match config {
        Some(path) => ContinuousScenario::from_yaml_file(path)?,
        None => ContinuousScenario::default(),
    };
    let outcome = scenario.run()?;

    info!(
        "Continuous: best ({:.4}, {:.4}) score {:.4} (base {:.4}, penalty {:.4})",
        outcome.point.x, outcome.point.y, outcome.result.best_score, outcome.base, outcome.penalty
    );
    Ok(())
}

/// Main function: picks the scenario from the command line and runs it.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for debugging
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = args.first().map(String::as_str).unwrap_or("all");
    let config = args.get(1).map(String::as_str);

    match mode {
        "maze" => run_maze(config),
        "continuous" => run_continuous(config),
        "all" => {
            run_maze(None)?;
            run_continuous(None)
        }
        other => Err(format!("unknown scenario '{}', expected maze, continuous or all", other).into()),
    }
}
