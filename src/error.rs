//! Error kinds raised while generating DDL.
//!
//! Per-file errors ([`GeneratorError::is_per_file`]) are downgraded to a
//! warning by the orchestrator and the offending file is skipped. Everything
//! else aborts the run.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = GeneratorError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("No configuration file found (tried {})", display_candidates(.candidates))]
    ConfigNotFound { candidates: Vec<PathBuf> },

    #[error("Reading configuration file {path:?}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("Reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parsing CSV header of {path:?}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("File {path:?} has no readable header row")]
    MissingHeader { path: PathBuf },

    #[error("Path {path:?} cannot be mapped to a schema under {root:?}")]
    InvalidPath { path: PathBuf, root: PathBuf },

    #[error("Scanning directory {path:?}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Writing output file {path:?}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GeneratorError {
    /// True for failures that only concern a single source file.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            GeneratorError::Read { .. }
                | GeneratorError::Csv { .. }
                | GeneratorError::MissingHeader { .. }
                | GeneratorError::InvalidPath { .. }
        )
    }
}

fn display_candidates(candidates: &[PathBuf]) -> String {
    candidates
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
