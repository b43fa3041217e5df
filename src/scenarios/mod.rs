//! Ready-to-run scenario presets
//!
//! Each scenario bundles the problem data, fitness settings and swarm
//! configuration for one use of the optimizer, can be loaded from YAML,
//! and reports its best solution in domain terms.

pub mod continuous;
pub mod maze;

pub use continuous::{ContinuousOutcome, ContinuousScenario};
pub use maze::{MazeOutcome, MazeScenario};

use std::fs::File;
use std::path::Path;

use log::info;
use serde::de::DeserializeOwned;

use crate::SwarmError;

// Shared YAML loader for scenario files
fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, SwarmError> {
    let file = File::open(path)
        .map_err(|e| SwarmError::ConfigError(format!("{}: {}", path.display(), e)))?;
    let scenario = serde_yaml::from_reader(file)
        .map_err(|e| SwarmError::ConfigError(format!("{}: {}", path.display(), e)))?;
    info!("Loaded scenario from {}", path.display());
    Ok(scenario)
}

fn parse_yaml<T: DeserializeOwned>(text: &str) -> Result<T, SwarmError> {
    serde_yaml::from_str(text).map_err(|e| SwarmError::ConfigError(e.to_string()))
}
