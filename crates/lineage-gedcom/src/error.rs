//! Error types for lineage-gedcom operations.

use thiserror::Error;

/// The error type for lineage-gedcom operations.
///
/// Lenient parsing never fails; these errors are only produced by
/// [`GedcomParser::strict`](crate::GedcomParser::strict).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A non-blank line did not match `<level> [@xref@] <TAG> [value]`.
    #[error("Malformed GEDCOM line {line_number}: {line:?}")]
    MalformedLine {
        /// The 1-based line number of the offending line.
        line_number: usize,
        /// The offending line, trimmed.
        line: String,
    },
}

/// A specialized Result type for lineage-gedcom operations.
pub type Result<T> = std::result::Result<T, Error>;
