//! Lineage - GEDCOM family trees in SQLite.
//!
//! This crate provides both a CLI application and a library that sit around
//! the [`lineage_gedcom`] parser: it projects parsed families into
//! relationship rows, stores whole imports atomically per owner, and reads
//! them back grouped by relationship.

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod config;
pub mod domain;
pub mod error;
pub mod store;

// Public CLI module (needed by binary)
pub mod cli;

pub(crate) mod output;

pub use error::{Error, Result};
