//! Integration tests for the poscan CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BAKER_BOYS: &str = "\
Baker Boys Distribution
P.O. Number: 88123
10-2201 EACH 12 12 0 8.50 102.00 Thrasher Flame Tee Whse: 01
10-2202 EACH 2 2 0 8.50 17.00 Thrasher Flame Tee XL
";

const GENERIC: &str = "\
Customer: Corner Shop
PO# 4410
MUG-1 Mug 3 $4.00 $12.00
White ceramic mug
";

/// CLI command isolated from the user's config directory.
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_poscan"));
    cmd.env("HOME", home).env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_parse_json() {
    let home = TempDir::new().unwrap();
    let input = write(home.path(), "SFWW PO# 12345.txt", BAKER_BOYS);

    let output = cli(home.path()).arg("parse").arg(&input).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["file"], "SFWW PO# 12345.txt");
    assert_eq!(json["outer_po"], "12345");
    assert_eq!(json["vendor"], "baker_boys");
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["items"][0]["customer"], "Baker Boys Distribution");
    assert_eq!(json["items"][0]["po"], "88123");
    assert_eq!(json["items"][0]["description"], "Thrasher Flame Tee");
    assert_eq!(json["items"][0]["qty"], 12);
}

#[test]
fn test_parse_csv_rows() {
    let home = TempDir::new().unwrap();
    let input = write(home.path(), "scan.txt", GENERIC);

    cli(home.path())
        .args(["parse", "--format", "csv", "--outer-po", "777"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Outer PO,Invoice,Customer,PO,Style,Description,Qty,Unit Price,Total Amount",
        ))
        .stdout(predicate::str::contains(
            "777,777,Corner Shop,4410,MUG-1,White ceramic mug,3,4.00,12.00",
        ))
        .stdout(predicate::str::contains(",,,,,TOTAL,3,,12.00"));
}

#[test]
fn test_parse_text_to_file() {
    let home = TempDir::new().unwrap();
    let input = write(home.path(), "scan.txt", GENERIC);
    let out = home.path().join("out.txt");

    cli(home.path())
        .args(["parse", "-f", "text", "-o"])
        .arg(&out)
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.contains("Vendor: Generic"));
    assert!(content.contains("Total: 3 units, 12.00"));
}

#[test]
fn test_parse_missing_file() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .args(["parse", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_detect() {
    let home = TempDir::new().unwrap();
    let input = write(home.path(), "po.txt", "Violent Gentlemen\nPurchase Order# 1\n");

    cli(home.path())
        .arg("detect")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Violent Gentlemen"));
}

#[test]
fn test_run_appends_sheet() {
    let home = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    write(&inbox, "SFWW PO# 1.txt", BAKER_BOYS);
    write(&inbox, "SFWW PO# 2.txt", GENERIC);
    write(&inbox, "SFWW PO# 3.txt", "nothing to see here");
    write(&inbox, "readme.md", BAKER_BOYS);
    let sheet = home.path().join("sheet.csv");
    let report = home.path().join("report.json");

    cli(home.path())
        .arg("run")
        .arg("--input-dir")
        .arg(&inbox)
        .arg("--sheet")
        .arg(&sheet)
        .args(["--invoice-prefix", "INV-", "--jobs", "2", "--report"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 documents"));

    let content = fs::read_to_string(&sheet).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    // header, 2 rows + total, 1 row + total
    assert_eq!(lines.len(), 6);
    assert!(lines[0].starts_with("Outer PO,"));
    assert!(lines[1].starts_with("1,INV-1,Baker Boys Distribution,88123,10-2201,"));
    assert_eq!(lines[3], ",,,,,TOTAL,14,,119.00");
    assert!(lines[4].starts_with("2,INV-2,Corner Shop,4410,MUG-1,"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["documents"].as_array().unwrap().len(), 3);
    assert_eq!(json["documents"][2]["rows_written"], 0);
    assert!(json["failures"].as_array().unwrap().is_empty());
}

#[test]
fn test_run_sequential_matches_concurrent() {
    let home = TempDir::new().unwrap();
    let inbox = home.path().join("inbox");
    fs::create_dir(&inbox).unwrap();
    write(&inbox, "SFWW PO# 1.txt", BAKER_BOYS);
    write(&inbox, "SFWW PO# 2.txt", GENERIC);

    let mut sheets = Vec::new();
    for jobs in ["1", "3"] {
        let sheet = home.path().join(format!("sheet-{}.csv", jobs));
        cli(home.path())
            .arg("run")
            .arg("--input-dir")
            .arg(&inbox)
            .arg("--sheet")
            .arg(&sheet)
            .args(["--jobs", jobs])
            .assert()
            .success()
            .stdout(predicate::str::contains("2 successful, 0 failed, 3 rows"));
        sheets.push(fs::read_to_string(&sheet).unwrap());
    }

    assert_eq!(sheets[0], sheets[1]);
    assert_eq!(sheets[0].lines().count(), 6);
}

#[test]
fn test_run_missing_directory() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .args(["run", "--input-dir"])
        .arg(home.path().join("missing"))
        .assert()
        .failure();
}

#[test]
fn test_config_init_and_get() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("poscan.json");

    cli(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    cli(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "sheet.invoice_prefix", "SF-"])
        .assert()
        .success();

    cli(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "sheet.invoice_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"SF-\""));

    cli(home.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "sheet.nope", "1"])
        .assert()
        .failure();
}

#[test]
fn test_config_path() {
    let home = TempDir::new().unwrap();
    cli(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poscan"))
        .stdout(predicate::str::contains("not created"));
}
