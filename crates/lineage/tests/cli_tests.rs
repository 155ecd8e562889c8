//! Integration tests for the lineage CLI.
//!
//! These tests verify the end-to-end behavior of all CLI commands.

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{SAMPLE, run_lineage_in_dir, stderr, stdout, write_file};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides a temporary directory containing `family.ged`
#[fixture]
fn gedcom_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    write_file(temp.path(), "family.ged", SAMPLE);
    temp
}

fn json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).expect("stdout is not valid JSON")
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn test_cli_help_shows_all_commands(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Usage:"));
    for command in ["parse", "import", "trees", "link"] {
        assert!(out.contains(command), "help is missing {command}");
    }
}

#[rstest]
fn test_cli_version(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("0.1.0"));
}

#[rstest]
fn test_cli_without_command_fails(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &[]);
    assert!(!output.status.success());
}

// ============================================================================
// Parse Command Tests
// ============================================================================

#[rstest]
fn test_parse_text_output(gedcom_dir: TempDir) {
    let output = run_lineage_in_dir(gedcom_dir.path(), &["parse", "family.ged"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Parsed 3 individual(s), 1 family(ies), 4 relationship(s)"));
    assert!(out.contains("John Smith"));
    assert!(out.contains("1980-01-12"));
    assert!(out.contains("Warnings (1)"));
}

#[rstest]
fn test_parse_json_output(gedcom_dir: TempDir) {
    let output = run_lineage_in_dir(gedcom_dir.path(), &["parse", "family.ged", "--json"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value = json(&output);
    assert_eq!(value["individuals"].as_array().unwrap().len(), 3);
    assert_eq!(value["individuals"][1]["birth_date"], "1982-01-01");
    assert_eq!(value["families"][0]["children"][1], "I9");
    assert_eq!(value["relationships"][0]["relationship_type"], "HUSBAND");
    assert_eq!(value["warnings"][0]["kind"], "malformed_line");
}

#[rstest]
fn test_parse_strict_rejects_malformed_lines(gedcom_dir: TempDir) {
    let output = run_lineage_in_dir(gedcom_dir.path(), &["parse", "family.ged", "--strict"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Malformed GEDCOM line"));
}

#[rstest]
fn test_parse_missing_file_fails(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["parse", "missing.ged"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read"));
}

#[rstest]
fn test_parse_empty_file_fails(temp_dir: TempDir) {
    write_file(temp_dir.path(), "empty.ged", "\n\n");

    let output = run_lineage_in_dir(temp_dir.path(), &["parse", "empty.ged"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("No GEDCOM data provided"));
}

// ============================================================================
// Import and Trees Command Tests
// ============================================================================

#[rstest]
fn test_import_then_list(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();

    let output = run_lineage_in_dir(dir, &["import", "family.ged", "--owner", "alice"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Imported tree #1"));
    assert!(out.contains("I9 CHILD of F1 is not in this file"));
    assert!(dir.join("lineage.db").exists());

    let output = run_lineage_in_dir(dir, &["trees", "--owner", "alice"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Found 1 tree(s)"));
    assert!(out.contains("Husbands: John Smith"));
    assert!(out.contains("Wives: Jane Doe"));
    assert!(out.contains("Children: Baby Smith"));
}

#[rstest]
fn test_import_json_summary(gedcom_dir: TempDir) {
    let output = run_lineage_in_dir(
        gedcom_dir.path(),
        &["--json", "import", "family.ged", "--name", "Smiths"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value = json(&output);
    assert_eq!(value["name"], "Smiths");
    assert_eq!(value["individuals"], 3);
    assert_eq!(value["relationships"], 3);
    assert_eq!(value["unresolved"][0]["individual_id"], "I9");
}

#[rstest]
fn test_trees_are_scoped_to_owner(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    let output = run_lineage_in_dir(dir, &["import", "family.ged", "--owner", "alice"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_lineage_in_dir(dir, &["trees", "--owner", "bob"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("No trees found."));
}

#[rstest]
fn test_db_flag_selects_database(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    let output = run_lineage_in_dir(dir, &["import", "family.ged", "--db", "data/custom.db"]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.join("data/custom.db").exists());
    assert!(!dir.join("lineage.db").exists());
}

#[rstest]
fn test_config_file_supplies_defaults(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    write_file(dir, "lineage.yaml", "database: configured.db\nowner: carol\n");

    let output = run_lineage_in_dir(dir, &["import", "family.ged"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.join("configured.db").exists());

    let output = run_lineage_in_dir(dir, &["--json", "trees", "--owner", "carol"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(json(&output).as_array().unwrap().len(), 1);
}

#[rstest]
fn test_strict_config_applies_to_import(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    write_file(dir, "strict.yaml", "strict: true\n");

    let output = run_lineage_in_dir(dir, &["--config", "strict.yaml", "import", "family.ged"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Malformed GEDCOM line"));
}

#[rstest]
fn test_invalid_config_is_reported(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    write_file(dir, "lineage.yaml", "strict: maybe-later\n");

    let output = run_lineage_in_dir(dir, &["trees"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Configuration error"));
}

// ============================================================================
// Link Command Tests
// ============================================================================

#[rstest]
fn test_link_adds_other_member(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    let output = run_lineage_in_dir(dir, &["import", "family.ged"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_lineage_in_dir(dir, &["--json", "trees"]);
    let trees = json(&output);
    let family_row = trees[0]["families"][0]["id"].as_i64().unwrap();
    let child_row = trees[0]["families"][0]["members"]["children"][0]["id"]
        .as_i64()
        .unwrap();

    let family_arg = family_row.to_string();
    let child_arg = child_row.to_string();
    let output = run_lineage_in_dir(dir, &["link", family_arg.as_str(), child_arg.as_str()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("as MEMBER"));

    let output = run_lineage_in_dir(dir, &["--json", "trees"]);
    let trees = json(&output);
    assert_eq!(
        trees[0]["families"][0]["members"]["others"][0]["id"].as_i64(),
        Some(child_row)
    );
}

#[rstest]
fn test_link_unknown_rows_fails(temp_dir: TempDir) {
    let output = run_lineage_in_dir(temp_dir.path(), &["link", "1", "2", "--as", "child"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not found"));
}

#[rstest]
fn test_link_is_scoped_to_owner(gedcom_dir: TempDir) {
    let dir = gedcom_dir.path();
    let output = run_lineage_in_dir(dir, &["import", "family.ged", "--owner", "alice"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let output = run_lineage_in_dir(dir, &["--json", "trees", "--owner", "alice"]);
    let trees = json(&output);
    let family_arg = trees[0]["families"][0]["id"].as_i64().unwrap().to_string();
    let wife_arg = trees[0]["families"][0]["members"]["wives"][0]["id"]
        .as_i64()
        .unwrap()
        .to_string();

    let output = run_lineage_in_dir(
        dir,
        &["link", family_arg.as_str(), wife_arg.as_str(), "--owner", "bob"],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not found"));

    let output = run_lineage_in_dir(
        dir,
        &["link", family_arg.as_str(), wife_arg.as_str(), "--owner", "alice"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}
