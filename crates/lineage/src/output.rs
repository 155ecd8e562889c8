//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.

use crate::domain::{
    FamilyMembers, ImportSummary, MemberView, Relationship, RelationshipType, StoredTree,
};
use chrono::NaiveDate;
use colored::Colorize;
use lineage_gedcom::{Family, Individual, Sex, Warning};
use serde::Serialize;
use std::io::{self, Write};

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Everything `lineage parse` reports about a document.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    /// Parsed individuals
    pub individuals: Vec<Individual>,
    /// Parsed families
    pub families: Vec<Family>,
    /// Relationships implied by the families
    pub relationships: Vec<Relationship>,
    /// Skipped or questionable lines
    pub warnings: Vec<Warning>,
}

// ============================================================================
// Color Helpers
// ============================================================================

fn colorize_id(id: &str) -> String {
    if id.is_empty() {
        "(no id)".dimmed().to_string()
    } else {
        id.cyan().to_string()
    }
}

fn colorize_sex(sex: Sex) -> String {
    match sex {
        Sex::Male => "M".blue().to_string(),
        Sex::Female => "F".magenta().to_string(),
        Sex::Unknown => "U".dimmed().to_string(),
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "(unnamed)" } else { name }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "?".to_string(), |d| d.to_string())
}

fn format_member(member: &MemberView) -> String {
    format!(
        "{} ({}, #{})",
        display_name(&member.name),
        colorize_id(&member.gedcom_id),
        member.id
    )
}

// ============================================================================
// Public Printers
// ============================================================================

/// Print the result of parsing a document
pub fn print_parse_report(report: &ParseReport, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_parse_report_text(&mut handle, report),
        OutputMode::Json => write_json(&mut handle, report),
    }
}

/// Print the outcome of an import
pub fn print_import_summary(summary: &ImportSummary, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_import_summary_text(&mut handle, summary),
        OutputMode::Json => write_json(&mut handle, summary),
    }
}

/// Print stored trees with their families
pub fn print_trees(trees: &[StoredTree], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match mode {
        OutputMode::Text => print_trees_text(&mut handle, trees),
        OutputMode::Json => write_json(&mut handle, &trees),
    }
}

/// Result of `lineage link`.
#[derive(Debug, Serialize)]
struct LinkResult {
    id: i64,
    family_row: i64,
    individual_row: i64,
    relationship_type: RelationshipType,
}

/// Print the join row created by `lineage link`
pub fn print_link(
    id: i64,
    family_row: i64,
    individual_row: i64,
    kind: RelationshipType,
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let result = LinkResult {
        id,
        family_row,
        individual_row,
        relationship_type: kind,
    };

    match mode {
        OutputMode::Text => print_link_text(&mut handle, &result),
        OutputMode::Json => write_json(&mut handle, &result),
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{json}")
}

// ============================================================================
// Text Formatting
// ============================================================================

fn print_warnings_text<W: Write>(w: &mut W, warnings: &[Warning]) -> io::Result<()> {
    if warnings.is_empty() {
        return Ok(());
    }

    writeln!(w)?;
    writeln!(w, "{} ({}):", "Warnings".yellow().bold(), warnings.len())?;
    for warning in warnings {
        writeln!(w, "  {} {}", "!".yellow(), warning)?;
    }
    Ok(())
}

fn print_parse_report_text<W: Write>(w: &mut W, report: &ParseReport) -> io::Result<()> {
    writeln!(
        w,
        "Parsed {} individual(s), {} family(ies), {} relationship(s)",
        report.individuals.len(),
        report.families.len(),
        report.relationships.len()
    )?;

    if !report.individuals.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", "Individuals:".bold())?;
        for person in &report.individuals {
            writeln!(
                w,
                "  {}  {}  {}  {} {}  {} {}",
                colorize_id(&person.id),
                display_name(&person.name),
                colorize_sex(person.sex),
                "born".dimmed(),
                format_date(person.birth_date),
                "died".dimmed(),
                format_date(person.death_date)
            )?;
        }
    }

    if !report.families.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}", "Families:".bold())?;
        for family in &report.families {
            writeln!(
                w,
                "  {}  {} {}  {} {}  {} {}",
                colorize_id(&family.id),
                "husband".dimmed(),
                family.husband_id.as_deref().unwrap_or("-"),
                "wife".dimmed(),
                family.wife_id.as_deref().unwrap_or("-"),
                "children".dimmed(),
                if family.children.is_empty() {
                    "-".to_string()
                } else {
                    family.children.join(", ")
                }
            )?;
        }
    }

    print_warnings_text(w, &report.warnings)
}

fn print_import_summary_text<W: Write>(w: &mut W, summary: &ImportSummary) -> io::Result<()> {
    writeln!(
        w,
        "{} Imported tree #{} {:?}",
        "✓".green(),
        summary.tree_id,
        summary.name
    )?;
    writeln!(
        w,
        "  {} individual(s), {} family(ies), {} relationship(s)",
        summary.individuals, summary.families, summary.relationships
    )?;

    if !summary.unresolved.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{} ({}):",
            "Unresolved references".yellow().bold(),
            summary.unresolved.len()
        )?;
        for rel in &summary.unresolved {
            writeln!(
                w,
                "  {} {} of {} is not in this file",
                rel.individual_id, rel.relationship_type, rel.family_id
            )?;
        }
    }

    print_warnings_text(w, &summary.warnings)
}

fn print_members_text<W: Write>(w: &mut W, members: &FamilyMembers) -> io::Result<()> {
    let groups = [
        ("Husbands", &members.husbands),
        ("Wives", &members.wives),
        ("Children", &members.children),
        ("Others", &members.others),
    ];

    for (label, group) in groups {
        if group.is_empty() {
            continue;
        }
        let names: Vec<String> = group.iter().map(format_member).collect();
        writeln!(w, "    {} {}", format!("{label}:").dimmed(), names.join(", "))?;
    }
    Ok(())
}

fn print_trees_text<W: Write>(w: &mut W, trees: &[StoredTree]) -> io::Result<()> {
    if trees.is_empty() {
        writeln!(w, "No trees found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} tree(s):", trees.len())?;

    for tree in trees {
        writeln!(w)?;
        writeln!(
            w,
            "{} {}  {}",
            format!("#{}", tree.id).cyan(),
            tree.name.bold(),
            tree.created_at.dimmed()
        )?;

        if tree.families.is_empty() {
            writeln!(w, "  {}", "(no families)".dimmed())?;
        }
        for family in &tree.families {
            writeln!(
                w,
                "  Family {} (#{})",
                colorize_id(&family.gedcom_id),
                family.id
            )?;
            print_members_text(w, &family.members)?;
        }
    }

    Ok(())
}

fn print_link_text<W: Write>(w: &mut W, result: &LinkResult) -> io::Result<()> {
    writeln!(
        w,
        "{} Linked individual #{} to family #{} as {}",
        "✓".green(),
        result.individual_row,
        result.family_row,
        result.relationship_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OwnerId, StoredFamily};

    fn member(id: i64, gedcom_id: &str, name: &str) -> MemberView {
        MemberView {
            id,
            gedcom_id: gedcom_id.to_string(),
            name: name.to_string(),
            given_name: String::new(),
            surname: String::new(),
            sex: Sex::Unknown,
            birth_date: None,
            death_date: None,
        }
    }

    fn render<F>(print: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buffer = Vec::new();
        print(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_parse_report_text_lists_records_and_warnings() {
        let mut person = Individual::new("I1");
        person.set_name("John /Smith/");
        person.birth_date = NaiveDate::from_ymd_opt(1980, 1, 12);
        let mut family = Family::new("F1");
        family.husband_id = Some("I1".to_string());

        let report = ParseReport {
            relationships: crate::domain::relationships(&family),
            individuals: vec![person],
            families: vec![family],
            warnings: vec![Warning::MalformedLine {
                line_number: 4,
                content: "garbage".to_string(),
            }],
        };

        let output = render(|w| print_parse_report_text(w, &report));
        assert!(output.contains("Parsed 1 individual(s), 1 family(ies), 1 relationship(s)"));
        assert!(output.contains("John Smith"));
        assert!(output.contains("1980-01-12"));
        assert!(output.contains("line 4: skipped malformed line"));
    }

    #[test]
    fn test_import_summary_text_reports_unresolved() {
        let summary = ImportSummary {
            tree_id: 3,
            name: "Family Tree".to_string(),
            individuals: 1,
            families: 1,
            relationships: 1,
            unresolved: vec![Relationship {
                family_id: "F1".to_string(),
                individual_id: "I9".to_string(),
                relationship_type: RelationshipType::Child,
            }],
            warnings: vec![],
        };

        let output = render(|w| print_import_summary_text(w, &summary));
        assert!(output.contains("Imported tree #3"));
        assert!(output.contains("I9 CHILD of F1 is not in this file"));
        assert!(!output.contains("Warnings"));
    }

    #[test]
    fn test_trees_text_groups_members() {
        let mut members = FamilyMembers::default();
        members.push(RelationshipType::Husband, member(1, "I1", "John Smith"));
        members.push(RelationshipType::Member, member(4, "I4", ""));
        let tree = StoredTree {
            id: 1,
            owner: OwnerId::new("alice"),
            name: "Smiths".to_string(),
            data: String::new(),
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
            families: vec![StoredFamily {
                id: 2,
                tree_id: 1,
                gedcom_id: "F1".to_string(),
                members,
            }],
        };

        let output = render(|w| print_trees_text(w, &[tree]));
        assert!(output.contains("Found 1 tree(s)"));
        assert!(output.contains("Smiths"));
        assert!(output.contains("John Smith"));
        assert!(output.contains("(unnamed)"));
        assert!(output.contains("Others:"));
        assert!(!output.contains("Wives:"));
    }

    #[test]
    fn test_no_trees_message() {
        let output = render(|w| print_trees_text(w, &[]));
        assert_eq!(output, "No trees found.\n");
    }

    #[test]
    fn test_link_json() {
        let result = LinkResult {
            id: 9,
            family_row: 2,
            individual_row: 5,
            relationship_type: RelationshipType::Member,
        };

        let output = render(|w| write_json(w, &result));
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["id"], 9);
        assert_eq!(parsed["relationship_type"], "MEMBER");
    }
}
