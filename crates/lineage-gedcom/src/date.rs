//! GEDCOM date normalization.
//!
//! GEDCOM dates are free-ish text: `12 JAN 1980`, `ABT 1900`,
//! `BET 1850 AND 1855`, and exporters also emit ISO strings. This module maps
//! the common shapes onto a calendar date and gives up (returns `None`) on
//! everything else.
//!
//! Partial dates resolve to the first day of the missing unit: `1990` becomes
//! `1990-01-01` and `JAN 1980` becomes `1980-01-01`. Qualifiers (`ABT`, `BEF`,
//! `AFT`, ...) are dropped, and ranges and periods use their first date.

use chrono::NaiveDate;

const MONTHS: [&str; 12] = [
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];

/// Qualifiers that only soften a date and can be dropped.
const QUALIFIERS: [&str; 8] = ["ABT", "ABOUT", "CAL", "EST", "BEF", "AFT", "INT", "TO"];

/// ISO-like layouts tried for single-token dates.
const ISO_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Normalizes a GEDCOM `DATE` value to a calendar date.
///
/// Returns `None` when the value is empty or not in a recognized shape.
///
/// # Examples
///
/// ```
/// use lineage_gedcom::date::normalize_date;
///
/// let iso = |v: &str| normalize_date(v).map(|d| d.to_string());
/// assert_eq!(iso("12 JAN 1980").as_deref(), Some("1980-01-12"));
/// assert_eq!(iso("ABT 1850").as_deref(), Some("1850-01-01"));
/// assert_eq!(iso("January 12, 1980").as_deref(), Some("1980-01-12"));
/// assert_eq!(iso("1980-01-12").as_deref(), Some("1980-01-12"));
/// assert_eq!(iso("sometime in spring"), None);
/// ```
#[must_use]
pub fn normalize_date(value: &str) -> Option<NaiveDate> {
    let upper = value.trim().to_ascii_uppercase();
    let tokens: Vec<&str> = upper
        .split_whitespace()
        .map(|t| t.trim_matches(|c| c == ',' || c == '.'))
        .filter(|t| !t.is_empty())
        .collect();

    let tokens = first_date_tokens(&tokens);
    match tokens {
        [] => None,
        [single] if single.contains(['-', '/', '.']) => parse_iso(single),
        [year] => from_parts(year, None, None),
        [month, year] => from_parts(year, Some(month_number(month)?), None),
        [first, second, year] => match month_number(second) {
            Some(month) => from_parts(year, Some(month), Some(*first)),
            None => from_parts(year, Some(month_number(first)?), Some(*second)),
        },
        _ => None,
    }
}

/// Drops qualifiers and narrows ranges (`BET a AND b`, `FROM a TO b`) down to
/// the tokens of their first date.
fn first_date_tokens<'a, 'b>(tokens: &'b [&'a str]) -> &'b [&'a str] {
    let Some((head, rest)) = tokens.split_first() else {
        return tokens;
    };

    let rest = match *head {
        "BET" | "BETWEEN" => until(rest, "AND"),
        "FROM" => until(rest, "TO"),
        q if QUALIFIERS.contains(&q) => rest,
        _ => return until(tokens, "TO"),
    };

    // Interpreted dates carry their original phrase in parentheses.
    match rest.iter().position(|t| t.starts_with('(')) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

fn until<'a, 'b>(tokens: &'b [&'a str], stop: &str) -> &'b [&'a str] {
    match tokens.iter().position(|t| *t == stop) {
        Some(end) => &tokens[..end],
        None => tokens,
    }
}

fn parse_iso(token: &str) -> Option<NaiveDate> {
    ISO_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
}

/// Maps an English month name or abbreviation (at least three letters) to 1-12.
fn month_number(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(token))
        .and_then(|index| u32::try_from(index + 1).ok())
}

fn from_parts(year: &str, month: Option<u32>, day: Option<&str>) -> Option<NaiveDate> {
    if year.is_empty() || year.len() > 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let day = match day {
        Some(day) if day.len() <= 2 && day.bytes().all(|b| b.is_ascii_digit()) => {
            day.parse().ok()?
        }
        Some(_) => return None,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day)
}
