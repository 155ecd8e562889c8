//! CLI argument parsing and command dispatch.
//!
//! This module provides the command-line interface for lineage using clap's derive API.
//!
//! # Commands
//!
//! - `parse`: Parse a GEDCOM file and print what was found
//! - `import`: Store a GEDCOM file as a new family tree
//! - `trees`: List stored trees with their families
//! - `link`: Add an individual to a family by hand
//!
//! # Global Flags
//!
//! - `--config <PATH>`: Configuration file (defaults to `./lineage.yaml` when present)
//! - `--db <PATH>`: Database path, overriding the configuration
//! - `--json`: Output in JSON format (applies to all commands)
//! - `-v`: Verbosity (repeatable)
//!
//! # Example
//!
//! ```bash
//! lineage parse family.ged
//! lineage import family.ged --owner alice
//! lineage trees --owner alice --json
//! lineage link 3 17 --as child --owner alice
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lineage_gedcom::GedcomParser;

use crate::config::LineageConfig;
use crate::domain::{ImportOptions, OwnerId, RelationshipType, relationships_for};
use crate::error::Error;
use crate::output::{self, OutputMode, ParseReport};
use crate::store::{SqliteStore, TreeStorage};

/// Lineage - GEDCOM family trees in `SQLite`
///
/// Parse GEDCOM 5.5 files leniently, store each import atomically per owner,
/// and browse families grouped by relationship.
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to `lineage.yaml` in the working directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Database path, overriding the configuration
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Output in JSON format for programmatic use
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Parse a GEDCOM file without storing it
    ///
    /// Prints the individuals and families found, the relationships they
    /// imply, and every line that was skipped.
    Parse(ParseArgs),

    /// Import a GEDCOM file as a new family tree
    ///
    /// The whole file is stored in one transaction. References to people
    /// outside the file are reported and skipped.
    Import(ImportArgs),

    /// List stored family trees
    ///
    /// Shows every tree for the owner with its families, members grouped
    /// into husbands, wives, children and others.
    Trees(TreesArgs),

    /// Add an individual to a family
    ///
    /// Takes database row ids as shown by `lineage trees`.
    Link(LinkArgs),
}

// ============================================================================
// Argument Structs
// ============================================================================

/// Arguments for the `parse` command
#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// GEDCOM file to read
    pub file: PathBuf,

    /// Fail on the first malformed line instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `import` command
#[derive(Parser, Debug, Clone)]
pub struct ImportArgs {
    /// GEDCOM file to import
    pub file: PathBuf,

    /// Owner of the new tree (defaults to the configured owner)
    #[arg(short, long, value_parser = validate_owner)]
    pub owner: Option<String>,

    /// Name for the tree (defaults to `Family Tree <timestamp>`)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Fail on the first malformed line instead of skipping it
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `trees` command
#[derive(Parser, Debug, Clone)]
pub struct TreesArgs {
    /// Owner whose trees to list (defaults to the configured owner)
    #[arg(short, long, value_parser = validate_owner)]
    pub owner: Option<String>,
}

/// Arguments for the `link` command
#[derive(Parser, Debug, Clone)]
pub struct LinkArgs {
    /// Family row id
    pub family_row: i64,

    /// Individual row id
    pub individual_row: i64,

    /// Owner of both rows (defaults to the configured owner)
    #[arg(short, long, value_parser = validate_owner)]
    pub owner: Option<String>,

    /// Role of the individual in the family
    #[arg(long = "as", value_enum, default_value_t = RelationshipArg::Member)]
    pub relationship: RelationshipArg,
}

// ============================================================================
// Value Enums
// ============================================================================

/// Relationship accepted by `link --as`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RelationshipArg {
    /// Husband of the family
    Husband,
    /// Wife of the family
    Wife,
    /// Child of the family
    Child,
    /// Any other member
    Member,
}

impl std::fmt::Display for RelationshipArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationshipArg::Husband => write!(f, "husband"),
            RelationshipArg::Wife => write!(f, "wife"),
            RelationshipArg::Child => write!(f, "child"),
            RelationshipArg::Member => write!(f, "member"),
        }
    }
}

impl From<RelationshipArg> for RelationshipType {
    fn from(arg: RelationshipArg) -> Self {
        match arg {
            RelationshipArg::Husband => RelationshipType::Husband,
            RelationshipArg::Wife => RelationshipType::Wife,
            RelationshipArg::Child => RelationshipType::Child,
            RelationshipArg::Member => RelationshipType::Member,
        }
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Reject blank owner ids.
fn validate_owner(s: &str) -> std::result::Result<String, String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err("Owner id cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// CLI Implementation
// ============================================================================

/// Effective settings after applying flags over the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    database: PathBuf,
    owner: OwnerId,
    strict: bool,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }

    /// Merge command-line flags over the loaded configuration.
    fn settings(&self, config: LineageConfig) -> Settings {
        let (owner, strict) = match &self.command {
            Commands::Parse(args) => (None, args.strict),
            Commands::Import(args) => (args.owner.clone(), args.strict),
            Commands::Trees(args) => (args.owner.clone(), false),
            Commands::Link(args) => (args.owner.clone(), false),
        };

        Settings {
            database: self.db.clone().unwrap_or(config.database),
            owner: OwnerId::new(owner.unwrap_or(config.owner)),
            strict: strict || config.strict,
        }
    }

    /// Execute the CLI command
    pub fn execute(&self) -> Result<()> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let config = LineageConfig::discover(self.config.as_deref(), &cwd)?;
        let settings = self.settings(config);
        let mode = self.output_mode();

        tracing::debug!(
            database = %settings.database.display(),
            owner = %settings.owner,
            strict = settings.strict,
            "Resolved settings"
        );

        match &self.command {
            Commands::Parse(args) => run_parse(&args.file, settings.strict, mode),
            Commands::Import(args) => {
                let store = SqliteStore::open(&settings.database)?;
                let text = read_document(&args.file)?;
                let options = ImportOptions {
                    strict: settings.strict,
                    name: args.name.clone(),
                };
                let summary = store.save_tree(&settings.owner, &text, options)?;
                output::print_import_summary(&summary, mode)?;
                Ok(())
            }
            Commands::Trees(_) => {
                let store = SqliteStore::open(&settings.database)?;
                let trees = store.list_trees(&settings.owner)?;
                output::print_trees(&trees, mode)?;
                Ok(())
            }
            Commands::Link(args) => {
                let store = SqliteStore::open(&settings.database)?;
                let kind = RelationshipType::from(args.relationship);
                let id = store.link_member(
                    &settings.owner,
                    args.family_row,
                    args.individual_row,
                    kind,
                )?;
                output::print_link(id, args.family_row, args.individual_row, kind, mode)?;
                Ok(())
            }
        }
    }
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn run_parse(path: &Path, strict: bool, mode: OutputMode) -> Result<()> {
    let text = read_document(path)?;
    if text.trim().is_empty() {
        return Err(Error::EmptyDocument.into());
    }

    let parser = if strict {
        GedcomParser::strict(&text).map_err(Error::from)?
    } else {
        GedcomParser::new(&text)
    };
    let (individuals, families, warnings) = parser.into_parts();
    let report = ParseReport {
        relationships: relationships_for(&families),
        individuals,
        families,
        warnings,
    };

    output::print_parse_report(&report, mode)?;
    Ok(())
}
