//! Domain types for stored family trees.
//!
//! The parser hands back flat [`Individual`](lineage_gedcom::Individual) and [`Family`] records keyed by
//! GEDCOM ids. This module holds what the storage side needs on top of that:
//! the owner identity, the relationship projection used for join rows, and
//! the grouped views returned when reading trees back.

use chrono::NaiveDate;
use lineage_gedcom::{Family, Sex, Warning};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of the user who owns an import.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl OwnerId {
    /// Create a new owner ID
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The owner ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OwnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for OwnerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// How an individual belongs to a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// From a `HUSB` line
    Husband,

    /// From a `WIFE` line
    Wife,

    /// From a `CHIL` line
    Child,

    /// Generic membership. Never produced from GEDCOM, only added by hand.
    Member,
}

impl RelationshipType {
    /// All variants, in display order.
    pub const ALL: [Self; 4] = [Self::Husband, Self::Wife, Self::Child, Self::Member];

    /// The value stored in the `relationship_type` column.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Husband => "HUSBAND",
            Self::Wife => "WIFE",
            Self::Child => "CHILD",
            Self::Member => "MEMBER",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid relationship type: {s:?}"))
    }
}

/// One family membership, keyed by GEDCOM ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// GEDCOM id of the family
    pub family_id: String,

    /// GEDCOM id of the individual
    pub individual_id: String,

    /// Role within the family
    pub relationship_type: RelationshipType,
}

/// Flattens a family into its relationships: husband, wife, then children in
/// source order. Repeated children are kept.
///
/// # Examples
///
/// ```
/// use lineage::domain::{relationships, RelationshipType};
/// use lineage_gedcom::Family;
///
/// let mut family = Family::new("F1");
/// family.wife_id = Some("I2".to_string());
/// family.children = vec!["I3".to_string()];
///
/// let rels = relationships(&family);
/// assert_eq!(rels.len(), 2);
/// assert_eq!(rels[0].relationship_type, RelationshipType::Wife);
/// assert_eq!(rels[1].individual_id, "I3");
/// ```
#[must_use]
pub fn relationships(family: &Family) -> Vec<Relationship> {
    let spouses = [
        (family.husband_id.as_ref(), RelationshipType::Husband),
        (family.wife_id.as_ref(), RelationshipType::Wife),
    ];
    let spouses = spouses
        .into_iter()
        .filter_map(|(id, kind)| id.map(|id| (id, kind)));
    let children = family
        .children
        .iter()
        .map(|id| (id, RelationshipType::Child));

    spouses
        .chain(children)
        .map(|(id, kind)| Relationship {
            family_id: family.id.clone(),
            individual_id: id.clone(),
            relationship_type: kind,
        })
        .collect()
}

/// [`relationships`] for every family, in order.
#[must_use]
pub fn relationships_for(families: &[Family]) -> Vec<Relationship> {
    families.iter().flat_map(relationships).collect()
}

/// Options for a single import.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Fail on malformed lines instead of skipping them
    pub strict: bool,

    /// Tree name; defaults to `Family Tree <timestamp>`
    pub name: Option<String>,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Row id of the stored tree
    pub tree_id: i64,

    /// Name given to the tree
    pub name: String,

    /// Number of individuals stored
    pub individuals: usize,

    /// Number of families stored
    pub families: usize,

    /// Number of relationship rows stored
    pub relationships: usize,

    /// Relationships whose individual is not part of the import
    pub unresolved: Vec<Relationship>,

    /// Parser diagnostics
    pub warnings: Vec<Warning>,
}

/// A stored individual as shown inside a family.
///
/// The sex column is exposed as `gender`, the name display clients use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    /// Row id
    pub id: i64,

    /// GEDCOM id within the import
    pub gedcom_id: String,

    /// Display name
    pub name: String,

    /// Given name
    pub given_name: String,

    /// Surname
    pub surname: String,

    /// Sex code
    #[serde(rename = "gender")]
    pub sex: Sex,

    /// Birth date
    pub birth_date: Option<NaiveDate>,

    /// Death date
    pub death_date: Option<NaiveDate>,
}

/// Members of one family, bucketed by relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyMembers {
    /// `HUSBAND` rows
    pub husbands: Vec<MemberView>,

    /// `WIFE` rows
    pub wives: Vec<MemberView>,

    /// `CHILD` rows
    pub children: Vec<MemberView>,

    /// `MEMBER` rows
    pub others: Vec<MemberView>,
}

impl FamilyMembers {
    /// Adds a member to the bucket for its relationship.
    pub fn push(&mut self, kind: RelationshipType, member: MemberView) {
        let bucket = match kind {
            RelationshipType::Husband => &mut self.husbands,
            RelationshipType::Wife => &mut self.wives,
            RelationshipType::Child => &mut self.children,
            RelationshipType::Member => &mut self.others,
        };
        bucket.push(member);
    }

    /// Total number of members across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.husbands.len() + self.wives.len() + self.children.len() + self.others.len()
    }

    /// Returns `true` if the family has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A stored family with its grouped members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFamily {
    /// Row id
    pub id: i64,

    /// Row id of the tree the family was imported with
    pub tree_id: i64,

    /// GEDCOM id within the import
    pub gedcom_id: String,

    /// Members by relationship
    pub members: FamilyMembers,
}

/// A stored import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredTree {
    /// Row id
    pub id: i64,

    /// Owner of the import
    pub owner: OwnerId,

    /// Tree name
    pub name: String,

    /// The GEDCOM text exactly as imported
    pub data: String,

    /// Import timestamp (RFC 3339)
    pub created_at: String,

    /// Families of the import
    pub families: Vec<StoredFamily>,
}
