//! Database schema definition for Lineage.

/// Database schema definition.
pub(crate) const SCHEMA: &str = r"
-- One row per import; data holds the GEDCOM text exactly as received
CREATE TABLE IF NOT EXISTS trees (
    id INTEGER PRIMARY KEY,
    owner_id TEXT NOT NULL,
    name TEXT NOT NULL,
    data TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_trees_owner ON trees(owner_id);

-- Individuals; gedcom_id is only unique within one import
CREATE TABLE IF NOT EXISTS individuals (
    id INTEGER PRIMARY KEY,
    tree_id INTEGER NOT NULL REFERENCES trees(id) ON DELETE CASCADE,
    owner_id TEXT NOT NULL,
    gedcom_id TEXT NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    given_name TEXT NOT NULL DEFAULT '',
    surname TEXT NOT NULL DEFAULT '',
    sex TEXT NOT NULL DEFAULT 'U' CHECK (sex IN ('M', 'F', 'U')),
    birth_date TEXT,
    death_date TEXT
);

CREATE INDEX IF NOT EXISTS idx_individuals_owner_gedcom ON individuals(owner_id, gedcom_id);
CREATE INDEX IF NOT EXISTS idx_individuals_tree ON individuals(tree_id);

CREATE TABLE IF NOT EXISTS families (
    id INTEGER PRIMARY KEY,
    tree_id INTEGER NOT NULL REFERENCES trees(id) ON DELETE CASCADE,
    owner_id TEXT NOT NULL,
    gedcom_id TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_families_owner ON families(owner_id);
CREATE INDEX IF NOT EXISTS idx_families_tree ON families(tree_id);

-- Family membership join rows
-- MEMBER is never produced by an import, only by link_member
CREATE TABLE IF NOT EXISTS family_individual (
    id INTEGER PRIMARY KEY,
    family_id INTEGER NOT NULL REFERENCES families(id) ON DELETE CASCADE,
    individual_id INTEGER NOT NULL REFERENCES individuals(id) ON DELETE CASCADE,
    relationship_type TEXT NOT NULL
        CHECK (relationship_type IN ('HUSBAND', 'WIFE', 'CHILD', 'MEMBER'))
);

CREATE INDEX IF NOT EXISTS idx_family_individual_family ON family_individual(family_id);
CREATE INDEX IF NOT EXISTS idx_family_individual_individual ON family_individual(individual_id);
";
