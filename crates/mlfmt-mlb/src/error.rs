//! Manifest-walking error conditions.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MlbError {
    #[error("failed to read manifest {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("unterminated path-variable reference in `{0}`")]
    UnterminatedPathVar(String),

    #[error("undefined path variable `{0}`")]
    UndefinedPathVar(String),

    #[error("manifest {0} references itself, directly or through a cycle")]
    Cycle(PathBuf),
}
