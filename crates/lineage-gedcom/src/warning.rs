//! Non-fatal diagnostics collected while parsing.
//!
//! The parser keeps going past anything it cannot use. Each such event is
//! recorded as a [`Warning`] carrying the 1-based line number, so callers can
//! report what was dropped without the parse failing.
//!
//! # Examples
//!
//! ```
//! use lineage_gedcom::{GedcomParser, Warning};
//!
//! let parser = GedcomParser::new("0 @I1@ INDI\n1 BIRT\n2 DATE spring\n");
//! assert_eq!(
//!     parser.warnings(),
//!     &[Warning::UnparsableDate {
//!         line_number: 3,
//!         value: "spring".to_string(),
//!     }]
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal event that occurred during parsing.
///
/// Serializes with a `kind` tag matching [`Warning::kind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A non-blank line did not match the line grammar and was skipped.
    MalformedLine {
        /// The 1-based line number.
        line_number: usize,
        /// The skipped line, trimmed.
        content: String,
    },

    /// An `INDI` or `FAM` record started without a cross-reference id.
    ///
    /// The record is still emitted, with an empty id.
    MissingXref {
        /// The 1-based line number of the level-0 line.
        line_number: usize,
        /// The record tag (`INDI` or `FAM`).
        tag: String,
    },

    /// A record reused an id already seen earlier in the document.
    ///
    /// Both records are emitted.
    DuplicateId {
        /// The 1-based line number of the repeated record.
        line_number: usize,
        /// The repeated id.
        id: String,
    },

    /// A `DATE` value could not be normalized; the date field stays empty.
    UnparsableDate {
        /// The 1-based line number.
        line_number: usize,
        /// The raw `DATE` value.
        value: String,
    },

    /// A `SEX` value was not one of the known codes; `U` was stored.
    UnrecognizedSex {
        /// The 1-based line number.
        line_number: usize,
        /// The raw `SEX` value.
        value: String,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::MalformedLine { line_number, .. }
            | Self::MissingXref { line_number, .. }
            | Self::DuplicateId { line_number, .. }
            | Self::UnparsableDate { line_number, .. }
            | Self::UnrecognizedSex { line_number, .. } => *line_number,
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_gedcom::Warning;
    ///
    /// let warning = Warning::DuplicateId {
    ///     line_number: 12,
    ///     id: "I1".to_string(),
    /// };
    /// assert_eq!(warning.description(), "line 12: duplicate record id I1");
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::MalformedLine {
                line_number,
                content,
            } => format!("line {line_number}: skipped malformed line {content:?}"),
            Self::MissingXref { line_number, tag } => {
                format!("line {line_number}: {tag} record has no cross-reference id")
            }
            Self::DuplicateId { line_number, id } => {
                format!("line {line_number}: duplicate record id {id}")
            }
            Self::UnparsableDate { line_number, value } => {
                format!("line {line_number}: unparsable date {value:?}")
            }
            Self::UnrecognizedSex { line_number, value } => {
                format!("line {line_number}: unrecognized sex {value:?}, using U")
            }
        }
    }

    /// Returns a static string identifying the warning kind.
    ///
    /// Useful for grouping warnings without matching on the variants.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedLine { .. } => "malformed_line",
            Self::MissingXref { .. } => "missing_xref",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::UnparsableDate { .. } => "unparsable_date",
            Self::UnrecognizedSex { .. } => "unrecognized_sex",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}
