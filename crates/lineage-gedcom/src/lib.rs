//! A lenient GEDCOM parser.
//!
//! This library turns raw GEDCOM text into two ordered sequences of flat
//! records, [`Individual`]s and [`Family`]s, whose cross references are the
//! original GEDCOM identifiers with the `@` delimiters stripped.
//!
//! Parsing is a single synchronous pass. Lines the tokenizer does not
//! understand are skipped and reported as [`Warning`]s instead of failing the
//! whole document; [`GedcomParser::strict`] is the opt-in alternative that
//! stops at the first malformed line.
//!
//! # Examples
//!
//! ```
//! use lineage_gedcom::{GedcomParser, Sex};
//!
//! let text = "0 HEAD\n0 @I1@ INDI\n1 NAME John /Smith/\n1 SEX M\n1 BIRT\n2 DATE 12 JAN 1980\n0 TRLR\n";
//! let parser = GedcomParser::new(text);
//!
//! let john = &parser.individuals()[0];
//! assert_eq!(john.id, "I1");
//! assert_eq!(john.name, "John Smith");
//! assert_eq!(john.surname, "Smith");
//! assert_eq!(john.sex, Sex::Male);
//! assert_eq!(john.birth_date.unwrap().to_string(), "1980-01-12");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod date;
pub mod error;
pub mod line;
pub mod parser;
pub mod record;
pub mod warning;

pub use error::{Error, Result};
pub use parser::GedcomParser;
pub use record::{Family, Individual, Sex};
pub use warning::Warning;
