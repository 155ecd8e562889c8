//! Error types for lineage operations.
//!
//! Parsing itself is lenient and only reports [`lineage_gedcom::Warning`]s;
//! the errors here are the ones that stop an operation: invalid input caught
//! before parsing, strict-mode parse failures, and storage failures.

use std::io;
use thiserror::Error;

/// The error type for lineage operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Database operation failed outside of an import.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The GEDCOM text was empty or whitespace only.
    #[error("No GEDCOM data provided")]
    EmptyDocument,

    /// An import was attempted without an owner identity.
    #[error("Owner id must not be empty")]
    MissingOwner,

    /// Strict parsing rejected the document.
    #[error("GEDCOM parse error: {0}")]
    Parse(#[from] lineage_gedcom::Error),

    /// An import failed part way; nothing from it was kept.
    #[error("Error saving family tree while {step}: {source}")]
    SaveFailed {
        /// What the import was doing when it failed.
        step: String,
        /// The underlying database error.
        #[source]
        source: rusqlite::Error,
    },

    /// A referenced row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal invariant violated (e.g. a poisoned lock).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Builds a [`SaveFailed`](Self::SaveFailed) mapper for `map_err`.
    pub(crate) fn save_step(step: impl Into<String>) -> impl FnOnce(rusqlite::Error) -> Self {
        let step = step.into();
        move |source| Self::SaveFailed { step, source }
    }
}

/// A specialized Result type for lineage operations.
pub type Result<T> = std::result::Result<T, Error>;
