mod fixtures;

use fixtures::*;

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::tempdir;

fn input_file(data: &[u8]) -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(data).unwrap();
    f.flush().unwrap();
    f
}

#[test]
fn it_prints_the_tree_outline() {
    let input = input_file(&stacked_column_stream());
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.arg(input.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Chart (0x1002)"))
        .stdout(predicate::str::contains("    ChartFormat (0x1014)"))
        .stdout(predicate::str::contains("DataFormat (0x1006) [bare]"));
}

#[test]
fn it_lists_flat_records_with_hexdump() {
    let input = input_file(&doughnut_stream());
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.args(["-o", "records", "--hexdump"]).arg(input.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0x1019 Pie"))
        .stdout(predicate::str::contains("0x1033 Begin"));
}

#[test]
fn it_renders_json() {
    let input = input_file(&stacked_column_stream());
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    let output = cmd.args(["-o", "json"]).arg(input.path()).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[1]["opcode"], "0x1002");
}

#[test]
fn it_renders_ooxml() {
    let input = input_file(&doughnut_stream());
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.args(["-o", "ooxml"]).arg(input.path());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<c:doughnutChart>"));
}

#[test]
fn it_checks_round_trips() {
    let input = input_file(&irregular_stream());
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.arg("--check-round-trip").arg(input.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("round trip OK"));
}

#[test]
fn it_fails_on_unbalanced_input() {
    let input = input_file(&StreamBuilder::new().end().build());
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.arg(input.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("END without a matching BEGIN"));
}

#[test]
fn it_writes_to_an_output_file_without_prompting() {
    let input = input_file(&doughnut_stream());
    let d = tempdir().unwrap();
    let target = d.path().join("nested").join("out.json");

    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.args(["-o", "json", "-f"])
        .arg(&target)
        .arg("--no-confirm-overwrite")
        .arg(input.path());
    cmd.assert().success();
    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("\"Pie\""));

    // a second run overwrites the existing file
    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.args(["-o", "ooxml", "-f"])
        .arg(&target)
        .arg("--no-confirm-overwrite")
        .arg(input.path());
    cmd.assert().success();
    assert!(fs::read_to_string(&target).unwrap().starts_with("<c:plotArea>"));
}

#[test]
fn it_refuses_to_overwrite_directories() {
    let input = input_file(&doughnut_stream());
    let d = tempdir().unwrap();

    let mut cmd = Command::cargo_bin("chart_dump").expect("failed to find binary");
    cmd.arg("-f").arg(d.path()).arg(input.path());
    cmd.assert().failure();
}
