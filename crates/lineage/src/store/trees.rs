//! Tree import and listing.

use std::collections::HashMap;

use chrono::Local;
use lineage_gedcom::GedcomParser;
use rusqlite::params;

use super::helpers::format_date;
use super::{SqliteStore, families};
use crate::domain::{ImportOptions, ImportSummary, OwnerId, StoredTree, relationships};
use crate::error::{Error, Result};

/// Default tree name for an import made at `now`.
fn default_name(now: &chrono::DateTime<Local>) -> String {
    format!("Family Tree {}", now.format("%Y-%m-%d %H:%M:%S"))
}

impl SqliteStore {
    pub(super) fn import_tree(
        &self,
        owner: &OwnerId,
        gedcom: &str,
        options: ImportOptions,
    ) -> Result<ImportSummary> {
        if owner.as_str().trim().is_empty() {
            return Err(Error::MissingOwner);
        }
        if gedcom.trim().is_empty() {
            return Err(Error::EmptyDocument);
        }

        let parser = if options.strict {
            GedcomParser::strict(gedcom)?
        } else {
            GedcomParser::new(gedcom)
        };
        let (individuals, families, warnings) = parser.into_parts();

        let now = Local::now();
        let name = options.name.unwrap_or_else(|| default_name(&now));

        let mut conn = self.connection()?;
        let tx = conn
            .transaction()
            .map_err(Error::save_step("starting the import"))?;

        tx.execute(
            "INSERT INTO trees (owner_id, name, data, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![owner.as_str(), name, gedcom, now.to_rfc3339()],
        )
        .map_err(Error::save_step("storing the tree"))?;
        let tree_id = tx.last_insert_rowid();

        // Duplicate GEDCOM ids: the last record wins when resolving references.
        let mut individual_rows: HashMap<&str, i64> = HashMap::with_capacity(individuals.len());
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO individuals (tree_id, owner_id, gedcom_id, name, given_name,
                     surname, sex, birth_date, death_date)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )
                .map_err(Error::save_step("preparing individuals"))?;

            for person in &individuals {
                let row = stmt
                    .insert(params![
                        tree_id,
                        owner.as_str(),
                        person.id,
                        person.name,
                        person.given_name,
                        person.surname,
                        person.sex.as_str(),
                        format_date(person.birth_date),
                        format_date(person.death_date),
                    ])
                    .map_err(Error::save_step(format!("storing individual {}", person.id)))?;
                individual_rows.insert(person.id.as_str(), row);
            }
        }

        let mut stored = 0;
        let mut unresolved = Vec::new();
        {
            let mut family_stmt = tx
                .prepare("INSERT INTO families (tree_id, owner_id, gedcom_id) VALUES (?1, ?2, ?3)")
                .map_err(Error::save_step("preparing families"))?;
            let mut member_stmt = tx
                .prepare(
                    "INSERT INTO family_individual (family_id, individual_id, relationship_type)
                     VALUES (?1, ?2, ?3)",
                )
                .map_err(Error::save_step("preparing relationships"))?;

            for family in &families {
                let family_row = family_stmt
                    .insert(params![tree_id, owner.as_str(), family.id])
                    .map_err(Error::save_step(format!("storing family {}", family.id)))?;

                for rel in relationships(family) {
                    let Some(&individual_row) = individual_rows.get(rel.individual_id.as_str())
                    else {
                        tracing::warn!(
                            family = %rel.family_id,
                            individual = %rel.individual_id,
                            relationship = %rel.relationship_type,
                            "Skipping reference to an individual outside this import"
                        );
                        unresolved.push(rel);
                        continue;
                    };

                    member_stmt
                        .execute(params![
                            family_row,
                            individual_row,
                            rel.relationship_type.as_str()
                        ])
                        .map_err(Error::save_step(format!(
                            "linking {} to family {}",
                            rel.individual_id, rel.family_id
                        )))?;
                    stored += 1;
                }
            }
        }

        tx.commit()
            .map_err(Error::save_step("committing the import"))?;

        tracing::info!(
            tree_id,
            owner = %owner,
            individuals = individuals.len(),
            families = families.len(),
            relationships = stored,
            unresolved = unresolved.len(),
            warnings = warnings.len(),
            "Imported family tree"
        );

        Ok(ImportSummary {
            tree_id,
            name,
            individuals: individuals.len(),
            families: families.len(),
            relationships: stored,
            unresolved,
            warnings,
        })
    }

    pub(super) fn trees_for(&self, owner: &OwnerId) -> Result<Vec<StoredTree>> {
        let conn = self.connection()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, data, created_at FROM trees WHERE owner_id = ?1 ORDER BY id",
        )?;
        let mut trees = stmt
            .query_map([owner.as_str()], |row| {
                Ok(StoredTree {
                    id: row.get(0)?,
                    owner: owner.clone(),
                    name: row.get(1)?,
                    data: row.get(2)?,
                    created_at: row.get(3)?,
                    families: Vec::new(),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let positions: HashMap<i64, usize> = trees
            .iter()
            .enumerate()
            .map(|(index, tree)| (tree.id, index))
            .collect();
        for family in families::load_families(&conn, owner)? {
            if let Some(&index) = positions.get(&family.tree_id) {
                trees[index].families.push(family);
            }
        }

        Ok(trees)
    }
}
