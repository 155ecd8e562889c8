//! Row conversion and parsing utilities for the store.

use chrono::NaiveDate;
use lineage_gedcom::Sex;
use rusqlite::Row;
use rusqlite::types::Type;

use crate::domain::{MemberView, RelationshipType};

/// Date format used for the `birth_date` and `death_date` columns.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQL column list for members, joined through `family_individual` as `fi`
/// and `individuals` as `i`.
///
/// Use with `row_to_member` for consistent column ordering.
pub(crate) const MEMBER_COLUMNS: &str = "fi.family_id, fi.relationship_type, i.id, i.gedcom_id, \
     i.name, i.given_name, i.surname, i.sex, i.birth_date, i.death_date";

fn corrupt(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, message.into())
}

/// Parse a sex code from the database.
///
/// Returns an error for unrecognized values, indicating possible database corruption.
pub(crate) fn parse_sex(column: usize, s: &str) -> rusqlite::Result<Sex> {
    s.parse::<Sex>()
        .map_err(|_| corrupt(column, format!("Unknown sex '{s}' in database")))
}

/// Parse a relationship type from the database.
pub(crate) fn parse_relationship_type(column: usize, s: &str) -> rusqlite::Result<RelationshipType> {
    s.parse::<RelationshipType>()
        .map_err(|_| corrupt(column, format!("Unknown relationship type '{s}' in database")))
}

/// Parse an optional ISO date column.
pub(crate) fn parse_date(column: usize, s: Option<String>) -> rusqlite::Result<Option<NaiveDate>> {
    s.map(|s| {
        NaiveDate::parse_from_str(&s, DATE_FORMAT)
            .map_err(|e| corrupt(column, format!("Invalid date '{s}' in database: {e}")))
    })
    .transpose()
}

/// Format an optional date for storage.
pub(crate) fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format(DATE_FORMAT).to_string())
}

/// Convert a row selected with [`MEMBER_COLUMNS`] into its family row id,
/// relationship and member view.
pub(crate) fn row_to_member(row: &Row) -> rusqlite::Result<(i64, RelationshipType, MemberView)> {
    let family_id: i64 = row.get(0)?;
    let kind: String = row.get(1)?;
    let sex: String = row.get(7)?;

    let member = MemberView {
        id: row.get(2)?,
        gedcom_id: row.get(3)?,
        name: row.get(4)?,
        given_name: row.get(5)?,
        surname: row.get(6)?,
        sex: parse_sex(7, &sex)?,
        birth_date: parse_date(8, row.get(8)?)?,
        death_date: parse_date(9, row.get(9)?)?,
    };

    Ok((family_id, parse_relationship_type(1, &kind)?, member))
}
