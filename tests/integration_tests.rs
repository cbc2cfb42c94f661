//! Integration tests for the bom-merge CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get a bom-merge command with logging and colours off
fn bom_merge() -> Command {
    let mut cmd = Command::cargo_bin("bom-merge").unwrap();
    cmd.env_remove("BOM_MERGE_LOG")
        .env_remove("BOM_MERGE_CONFIG")
        .env_remove("BOM_MERGE_CAP_THRESHOLD")
        .env("NO_COLOR", "1");
    cmd
}

/// Helper to write two project BOMs into a temp directory
fn setup_projects(tmp: &TempDir) -> (PathBuf, PathBuf) {
    let fuzz = tmp.path().join("Fuzz Face - BOM.csv");
    fs::write(
        &fuzz,
        "Part,Value,Description\n\
         R1,2k2,Resistor\n\
         R2,470,Resistor\n\
         C1,100n,Film capacitor\n\
         Q1,2N3904,Transistor\n\
         ,,IC socket\n",
    )
    .unwrap();

    let muff = tmp.path().join("Big Muff.csv");
    fs::write(
        &muff,
        "Big Muff Pi parts list\n\
         \n\
         Designator,Value,Description,Qty\n\
         R5,2.2K,Resistor,1\n\
         \"C3, C4\",0.1uF,Film capacitor,2\n\
         D1,1N4148,Diode,1\n",
    )
    .unwrap();

    (fuzz, muff)
}

/// Helper to write an inventory workbook in directory form
fn setup_inventory(tmp: &TempDir) -> PathBuf {
    let dir = tmp.path().join("inventory");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join("TH Resistors.csv"), "2k2,few\n10k,\n").unwrap();
    fs::write(
        dir.join("TH Capacitors.csv"),
        "Ceramic,,,Film,,Electrolytic,\n,,,100n,,,\n",
    )
    .unwrap();
    dir
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    bom_merge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("merge"))
        .stdout(predicate::str::contains("inventory"));
}

#[test]
fn test_version_displays() {
    bom_merge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bom-merge"));
}

#[test]
fn test_merge_requires_inputs() {
    bom_merge().arg("merge").assert().failure();
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_writes_workbook() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, muff) = setup_projects(&tmp);
    let out = tmp.path().join("out");

    bom_merge()
        .args(["merge", "--in", path_arg(&fuzz), "--in", path_arg(&muff)])
        .args(["--out", path_arg(&out)])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 3 sheet(s)"))
        .stderr(predicate::str::contains("inventory not checked"));

    let combined = fs::read_to_string(out.join("Combined.csv")).unwrap();
    insta::assert_snapshot!(combined, @r#"
    Type,Count,Value,Description,Sources
    Resistor,1,470R,Resistor,Fuzz Face - BOM.csv
    Resistor,2,2k2,Resistor,"Big Muff.csv, Fuzz Face - BOM.csv"
    Capacitor,3,100n,Film capacitor,"Big Muff.csv, Fuzz Face - BOM.csv"
    Diode,1,1N4148,Diode,Big Muff.csv
    Transistor,1,2N3904,Transistor,Fuzz Face - BOM.csv
    "#);

    let project = fs::read_to_string(out.join("Fuzz Face.csv")).unwrap();
    insta::assert_snapshot!(project, @r"
    Type,Part,Value,Description,Notes
    Resistor,R2,470R,Resistor,
    Resistor,R1,2k2,Resistor,
    Capacitor,C1,100n,Film capacitor,
    Transistor,Q1,2N3904,Transistor,
    ");

    let muff_sheet = fs::read_to_string(out.join("Big Muff.csv")).unwrap();
    assert!(muff_sheet.contains("Capacitor,\"C3, C4\",100n,Film capacitor,"));
}

#[test]
fn test_merge_with_inventory() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, muff) = setup_projects(&tmp);
    let inventory = setup_inventory(&tmp);

    bom_merge()
        .args(["-f", "csv", "merge", "--in", path_arg(&fuzz), "--in", path_arg(&muff)])
        .args(["--inventory", path_arg(&inventory)])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Type,Count,Value,Description,Sources,Stock\n",
        ))
        .stdout(predicate::str::contains("Resistor,1,470R,Resistor,Fuzz Face - BOM.csv,missing\n"))
        .stdout(predicate::str::contains(",2k2,Resistor,\"Big Muff.csv, Fuzz Face - BOM.csv\",low\n"))
        .stdout(predicate::str::contains("Diode,1,1N4148,Diode,Big Muff.csv,\n"))
        .stderr(predicate::str::contains("1 missing, 1 low"));
}

#[test]
fn test_merge_markdown_output() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, _) = setup_projects(&tmp);

    bom_merge()
        .args(["merge", "--in", path_arg(&fuzz)])
        .assert()
        .success()
        .stdout(predicate::str::contains("| Type"))
        .stdout(predicate::str::contains("2N3904"))
        .stdout(predicate::str::contains("Stock").not());
}

#[test]
fn test_merge_json_output() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, muff) = setup_projects(&tmp);

    let output = bom_merge()
        .args(["-f", "json", "-q", "merge", "--in", path_arg(&fuzz), "--in", path_arg(&muff)])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["stats"]["sources"], 2);
    assert_eq!(json["stats"]["rows_excluded"], 1);
    assert_eq!(json["combined"]["inventory_available"], false);
    assert_eq!(json["combined"]["parts"][1]["quantity"], 2);
    assert_eq!(json["combined"]["parts"][1]["value"]["display"], "2k2");
    assert_eq!(json["projects"][0]["name"], "Fuzz Face");
}

#[test]
fn test_merge_input_order_does_not_matter() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, muff) = setup_projects(&tmp);

    let forward = bom_merge()
        .args(["-f", "csv", "merge", "--in", path_arg(&fuzz), "--in", path_arg(&muff)])
        .output()
        .unwrap();
    let backward = bom_merge()
        .args(["-f", "csv", "merge", "--in", path_arg(&muff), "--in", path_arg(&fuzz)])
        .output()
        .unwrap();
    assert_eq!(forward.stdout, backward.stdout);
}

#[test]
fn test_merge_empty_input_fails() {
    let tmp = TempDir::new().unwrap();
    let empty = tmp.path().join("empty.csv");
    fs::write(&empty, "Part,Value,Description\n").unwrap();

    bom_merge()
        .args(["merge", "--in", path_arg(&empty)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input rows"));
}

#[test]
fn test_merge_unsupported_input_fails() {
    let tmp = TempDir::new().unwrap();
    let notes = tmp.path().join("bom.txt");
    fs::write(&notes, "R1 10k").unwrap();

    bom_merge()
        .args(["merge", "--in", path_arg(&notes)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported input"));
}

#[test]
fn test_merge_inventory_without_sheets_fails() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, _) = setup_projects(&tmp);
    let inventory = tmp.path().join("stock");
    fs::create_dir(&inventory).unwrap();
    fs::write(inventory.join("Misc.csv"), "x\n").unwrap();

    bom_merge()
        .args(["merge", "--in", path_arg(&fuzz), "--inventory", path_arg(&inventory)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TH Resistors"));
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[test]
fn test_config_file_changes_exclusions() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, _) = setup_projects(&tmp);
    let config = tmp.path().join("bom-merge.yaml");
    fs::write(&config, "exclude_keywords: [transistor]\n").unwrap();

    bom_merge()
        .args(["-f", "csv", "--config", path_arg(&config)])
        .args(["merge", "--in", path_arg(&fuzz)])
        .assert()
        .success()
        .stdout(predicate::str::contains("2N3904").not())
        .stdout(predicate::str::contains("IC socket"));
}

#[test]
fn test_invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    let (fuzz, _) = setup_projects(&tmp);
    let config = tmp.path().join("bad.yaml");
    fs::write(&config, "exclude_keyword: [knob]\n").unwrap();

    bom_merge()
        .args(["--config", path_arg(&config), "merge", "--in", path_arg(&fuzz)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn test_threshold_env_changes_bare_capacitors() {
    bom_merge()
        .env("BOM_MERGE_CAP_THRESHOLD", "0.01")
        .args(["-f", "csv", "value", "capacitor", "0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1,farads,0.0000000000001,0p1\n"));
}

// ============================================================================
// Value / Classify / Inventory Tests
// ============================================================================

#[test]
fn test_bare_capacitor_default_threshold() {
    bom_merge()
        .args(["-f", "csv", "value", "capacitor", "0.1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1,farads,0.0000001,100n\n"));
}

#[test]
fn test_value_spellings_agree() {
    bom_merge()
        .args(["-f", "csv", "value", "resistor", "2k2", "2.2K", "2200", "2.2 kOhm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2k2,ohms,2200,2k2\n"))
        .stdout(predicate::str::contains("2.2 kOhm,ohms,2200,2k2\n"));
}

#[test]
fn test_value_capacitor_notations() {
    bom_merge()
        .args(["-f", "csv", "value", "capacitor", "1n5", "1500p", "0.1u", "47"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1n5,farads,0.0000000015,1n5\n"))
        .stdout(predicate::str::contains("1500p,farads,0.0000000015,1n5\n"))
        .stdout(predicate::str::contains("0.1u,farads,0.0000001,100n\n"))
        .stdout(predicate::str::contains("47,farads,0.000000000047,47p\n"));
}

#[test]
fn test_value_opaque_text() {
    bom_merge()
        .args(["-f", "csv", "value", "diode", "1N4148"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1N4148,opaque,-,1N4148"));
}

#[test]
fn test_classify_reports_exclusion() {
    bom_merge()
        .args(["classify", "--description", "IC socket, 8 pin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("excluded"));

    bom_merge()
        .args(["classify", "--part", "R1", "--value", "10k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resistor"))
        .stdout(predicate::str::contains("kept"));
}

#[test]
fn test_inventory_lists_entries() {
    let tmp = TempDir::new().unwrap();
    let inventory = setup_inventory(&tmp);

    bom_merge()
        .args(["-f", "csv", "inventory", path_arg(&inventory)])
        .assert()
        .success()
        .stdout(predicate::str::contains("resistor,2k2,low\n"))
        .stdout(predicate::str::contains("resistor,10k,\n"))
        .stdout(predicate::str::contains("film,100n,\n"))
        .stderr(predicate::str::contains("3 entr(ies)"));
}

#[test]
fn test_completions() {
    bom_merge()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bom-merge"));
}
