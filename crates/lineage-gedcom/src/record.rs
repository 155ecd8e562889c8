//! Record types produced by the parser.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sex of an individual, as recorded by the `SEX` tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    /// `M`
    #[serde(rename = "M")]
    Male,

    /// `F`
    #[serde(rename = "F")]
    Female,

    /// `U`, also used when the tag is absent or unrecognized
    #[default]
    #[serde(rename = "U")]
    Unknown,
}

impl Sex {
    /// Interprets a `SEX` value, case-insensitively.
    ///
    /// Accepts the single-letter codes and the words `male`/`female`/`unknown`.
    /// Returns `None` for anything else, including the empty string.
    #[must_use]
    pub fn from_gedcom(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Some(Self::Male),
            "F" | "FEMALE" => Some(Self::Female),
            "U" | "UNKNOWN" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// The single-letter code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Unknown => "U",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_gedcom(s).ok_or_else(|| format!("invalid sex code: {s:?}"))
    }
}

/// A person record (`0 @Ix@ INDI`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// GEDCOM identifier without `@` delimiters, e.g. `I1`
    pub id: String,

    /// Display name with the surname slashes removed
    pub name: String,

    /// Part of the NAME value before the surname
    pub given_name: String,

    /// Part of the NAME value between the slashes
    pub surname: String,

    /// Sex, `U` unless a recognized `SEX` line was seen
    pub sex: Sex,

    /// Date of the `BIRT` event
    pub birth_date: Option<NaiveDate>,

    /// Date of the `DEAT` event
    pub death_date: Option<NaiveDate>,
}

impl Individual {
    /// Creates an individual with every other field empty.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            given_name: String::new(),
            surname: String::new(),
            sex: Sex::Unknown,
            birth_date: None,
            death_date: None,
        }
    }

    /// Fills the name fields from a GEDCOM `NAME` value such as `John /Smith/`.
    ///
    /// `name` is the value with every slash removed, so `John/Smith/` becomes
    /// `JohnSmith`. The surname is the segment between the first pair of
    /// slashes; the given name is everything before the first slash.
    ///
    /// # Examples
    ///
    /// ```
    /// use lineage_gedcom::Individual;
    ///
    /// let mut person = Individual::new("I1");
    /// person.set_name("John Paul /Smith/ Jr.");
    /// assert_eq!(person.name, "John Paul Smith Jr.");
    /// assert_eq!(person.given_name, "John Paul");
    /// assert_eq!(person.surname, "Smith");
    /// ```
    pub fn set_name(&mut self, value: &str) {
        self.name = value.replace('/', "").trim().to_string();

        let mut segments = value.splitn(3, '/');
        self.given_name = segments.next().unwrap_or_default().trim().to_string();
        self.surname = segments.next().unwrap_or_default().trim().to_string();
    }
}

/// A family record (`0 @Fx@ FAM`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    /// GEDCOM identifier without `@` delimiters, e.g. `F1`
    pub id: String,

    /// Individual id from the `HUSB` line
    pub husband_id: Option<String>,

    /// Individual id from the `WIFE` line
    pub wife_id: Option<String>,

    /// Individual ids from `CHIL` lines, in source order
    pub children: Vec<String>,
}

impl Family {
    /// Creates a family with no members.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}
