//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent violations of the lineage tree's structure.
/// A name lookup that finds nothing is not one of them: queries return `Ok(None)`.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown vampire: {0}")]
    UnknownVampire(String),

    #[error("duplicate vampire name: {0}")]
    DuplicateName(String),

    #[error("cycle detected: {offspring} cannot be sired by its own descendant {sire}")]
    CycleDetected { sire: String, offspring: String },

    #[error("{first} and {second} belong to different lineages")]
    DisjointLineages { first: String, second: String },

    #[error("lineage contains no vampires")]
    EmptyLineage,

    #[error("lineage has more than one original vampire: {}", roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    #[error("failed to read lineage file {path}")]
    LineageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid lineage file {path}: {message}")]
    LineageParse { path: PathBuf, message: String },
}

/// Result type for lineage operations.
pub type DomainResult<T> = Result<T, DomainError>;
