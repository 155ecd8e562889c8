//! Family listing and manual membership.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params};

use super::SqliteStore;
use super::helpers::{MEMBER_COLUMNS, row_to_member};
use crate::domain::{FamilyMembers, OwnerId, RelationshipType, StoredFamily};
use crate::error::{Error, Result};

/// Load every family owned by `owner`, in insertion order, with members
/// grouped by relationship.
pub(super) fn load_families(conn: &Connection, owner: &OwnerId) -> Result<Vec<StoredFamily>> {
    let mut stmt =
        conn.prepare("SELECT id, tree_id, gedcom_id FROM families WHERE owner_id = ?1 ORDER BY id")?;
    let mut families = stmt
        .query_map([owner.as_str()], |row| {
            Ok(StoredFamily {
                id: row.get(0)?,
                tree_id: row.get(1)?,
                gedcom_id: row.get(2)?,
                members: FamilyMembers::default(),
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let positions: HashMap<i64, usize> = families
        .iter()
        .enumerate()
        .map(|(index, family)| (family.id, index))
        .collect();

    let mut stmt = conn.prepare(&format!(
        "SELECT {MEMBER_COLUMNS}
         FROM family_individual fi
         JOIN families f ON f.id = fi.family_id
         JOIN individuals i ON i.id = fi.individual_id
         WHERE f.owner_id = ?1
         ORDER BY fi.id"
    ))?;
    let rows = stmt
        .query_map([owner.as_str()], row_to_member)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    for (family_id, kind, member) in rows {
        if let Some(&index) = positions.get(&family_id) {
            families[index].members.push(kind, member);
        }
    }

    Ok(families)
}

impl SqliteStore {
    pub(super) fn insert_member(
        &self,
        owner: &OwnerId,
        family_row: i64,
        individual_row: i64,
        kind: RelationshipType,
    ) -> Result<i64> {
        let conn = self.connection()?;

        let tree_id: i64 = conn
            .query_row(
                "SELECT tree_id FROM families WHERE id = ?1 AND owner_id = ?2",
                params![family_row, owner.as_str()],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("family row {family_row}")))?;

        // The individual must come from the same owner's import of the same tree.
        let same_tree = conn
            .query_row(
                "SELECT 1 FROM individuals WHERE id = ?1 AND owner_id = ?2 AND tree_id = ?3",
                params![individual_row, owner.as_str(), tree_id],
                |_| Ok(()),
            )
            .optional()?;
        if same_tree.is_none() {
            return Err(Error::NotFound(format!(
                "individual row {individual_row} in tree {tree_id}"
            )));
        }

        conn.execute(
            "INSERT INTO family_individual (family_id, individual_id, relationship_type)
             VALUES (?1, ?2, ?3)",
            params![family_row, individual_row, kind.as_str()],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(
            owner = %owner,
            family_row,
            individual_row,
            relationship = %kind,
            "Linked family member"
        );
        Ok(id)
    }
}
