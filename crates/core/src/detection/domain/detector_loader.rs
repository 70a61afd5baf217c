use std::path::PathBuf;

use thiserror::Error;

use crate::detection::domain::object_detector::ObjectDetector;

#[derive(Error, Debug)]
pub enum DetectorLoadError {
    #[error("detector file {name} not found (searched: {})", display_paths(.searched))]
    NotFound { name: String, searched: Vec<PathBuf> },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed detector file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("unsupported detector file {path}: {reason}")]
    Unsupported { path: PathBuf, reason: String },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Produces the detector once, at loop start-up.
pub trait DetectorLoader: Send {
    fn load(&mut self) -> Result<Box<dyn ObjectDetector>, DetectorLoadError>;
}
