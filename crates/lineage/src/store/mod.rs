//! `SQLite` storage for imported family trees.
//!
//! An import is stored as one `trees` row holding the raw GEDCOM text, plus
//! the parsed individuals, families and `family_individual` join rows. Every
//! import runs in a single transaction: either the whole tree is stored or
//! nothing is.
//!
//! ## Module Structure
//!
//! - `schema` - Database schema (DDL)
//! - `helpers` - Row conversion and parsing utilities
//! - `trees` - Import and tree listing
//! - `families` - Family listing and manual membership

mod families;
mod helpers;
mod schema;
mod trees;

pub(crate) use schema::SCHEMA;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::domain::{
    ImportOptions, ImportSummary, OwnerId, RelationshipType, StoredFamily, StoredTree,
};
use crate::error::{Error, Result};

/// Storage backend for family trees.
///
/// All reads and writes are scoped to an explicit [`OwnerId`]; there is no
/// ambient "current user".
pub trait TreeStorage: Send + Sync {
    /// Parse `gedcom` and store the result as a new tree owned by `owner`.
    ///
    /// Empty or whitespace-only input is rejected with
    /// [`Error::EmptyDocument`] before parsing. References to individuals
    /// that are not part of the import are skipped and reported in
    /// [`ImportSummary::unresolved`]. Any database failure rolls back the
    /// whole import and is returned as [`Error::SaveFailed`].
    fn save_tree(
        &self,
        owner: &OwnerId,
        gedcom: &str,
        options: ImportOptions,
    ) -> Result<ImportSummary>;

    /// Add an individual to a family, returning the new join row id.
    ///
    /// Both rows must belong to `owner` and to the same tree; anything else
    /// is reported as [`Error::NotFound`]. This is the only way a
    /// [`RelationshipType::Member`] row is written.
    fn link_member(
        &self,
        owner: &OwnerId,
        family_row: i64,
        individual_row: i64,
        kind: RelationshipType,
    ) -> Result<i64>;

    /// All trees owned by `owner`, oldest first, with their families.
    fn list_trees(&self, owner: &OwnerId) -> Result<Vec<StoredTree>>;

    /// All families owned by `owner`, across trees, with grouped members.
    fn list_families(&self, owner: &OwnerId) -> Result<Vec<StoredFamily>>;
}

/// `SQLite` implementation of [`TreeStorage`].
///
/// The connection is wrapped in a `Mutex` so the store can be shared across
/// threads while every operation gets exclusive access.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        tracing::debug!(path = %path.display(), "Opened tree database");
        Self::init(conn)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection lock.
    pub(crate) fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            Error::Internal(format!("database connection mutex poisoned: {e}"))
        })
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl TreeStorage for SqliteStore {
    fn save_tree(
        &self,
        owner: &OwnerId,
        gedcom: &str,
        options: ImportOptions,
    ) -> Result<ImportSummary> {
        self.import_tree(owner, gedcom, options)
    }

    fn link_member(
        &self,
        owner: &OwnerId,
        family_row: i64,
        individual_row: i64,
        kind: RelationshipType,
    ) -> Result<i64> {
        self.insert_member(owner, family_row, individual_row, kind)
    }

    fn list_trees(&self, owner: &OwnerId) -> Result<Vec<StoredTree>> {
        self.trees_for(owner)
    }

    fn list_families(&self, owner: &OwnerId) -> Result<Vec<StoredFamily>> {
        let conn = self.connection()?;
        families::load_families(&conn, owner)
    }
}
