// End-to-end tests for the `show` and `values` commands over the
// shared on-disk fixture.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use serde_json::Value;
use std::process::Command;

mod util;
use util::{ARTICLES_CSV, SCHOOLS_CSV, make_dataset_fixture};

fn scout(tmp: &assert_fs::TempDir, subcommand: &str) -> Command {
    let mut cmd = Command::cargo_bin("scout").expect("bin");
    cmd.current_dir(tmp.path()).arg(subcommand);
    cmd
}

fn with_sources(mut cmd: Command) -> Command {
    cmd.arg("--schools").arg(SCHOOLS_CSV).arg("--articles").arg(ARTICLES_CSV);
    cmd
}

#[test]
fn show_prints_detail_and_related_articles() {
    let tmp = make_dataset_fixture();

    // The canonical name has single spaces; the CLI joins word args.
    with_sources(scout(&tmp, "show"))
        .arg("--no-color")
        .arg("ABC")
        .arg("Primary")
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC Primary"))
        .stdout(predicate::str::contains("新界"))
        .stdout(predicate::str::contains("Related articles:"))
        // Both article spellings joined after canonicalization.
        .stdout(predicate::str::contains("ABC Primary admissions guide"))
        .stdout(predicate::str::contains("Open day report"));
}

#[test]
fn show_suppresses_placeholder_fields() {
    let tmp = make_dataset_fixture();

    // The second school's religion and address are placeholders; the
    // detail table must not show empty rows for them.
    with_sources(scout(&tmp, "show"))
        .arg("--no-color")
        .arg("保良局小學")
        .assert()
        .success()
        .stdout(predicate::str::contains("宗教").not())
        .stdout(predicate::str::contains("地址").not());
}

#[test]
fn show_unknown_school_prints_notice_not_error() {
    let tmp = make_dataset_fixture();

    with_sources(scout(&tmp, "show"))
        .arg("--no-color")
        .arg("不存在的學校")
        .assert()
        .success()
        .stdout(predicate::str::contains("No school named"));
}

#[test]
fn show_json_carries_schools_and_articles() {
    let tmp = make_dataset_fixture();

    let assert = with_sources(scout(&tmp, "show"))
        .arg("--json")
        .arg("ABC")
        .arg("Primary")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let v: Value = serde_json::from_str(&stdout).expect("json");

    assert_eq!(v["name"], "ABC Primary");
    assert_eq!(v["schools"].as_array().unwrap().len(), 1);
    assert_eq!(v["articles"].as_array().unwrap().len(), 2);
    assert_eq!(v["schools"][0]["has_feeder"], true);
}

#[test]
fn show_school_without_articles_prints_notice() {
    let tmp = make_dataset_fixture();

    with_sources(scout(&tmp, "show"))
        .arg("--no-color")
        .arg("保良局小學")
        .assert()
        .success()
        .stdout(predicate::str::contains("No related articles"));
}

#[test]
fn values_are_sorted_and_deduplicated() {
    let tmp = make_dataset_fixture();

    let assert = with_sources(scout(&tmp, "values"))
        .arg("region")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();

    // Sorted by code point, one line per distinct value.
    assert_eq!(lines, vec!["九龍", "新界", "港島"]);
}

#[test]
fn values_skip_placeholder_cells() {
    let tmp = make_dataset_fixture();

    // The second school's net code is "-", which normalizes to empty
    // and must not appear as a selectable value.
    let assert = with_sources(scout(&tmp, "values"))
        .arg("net")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["41", "91"]);
}

#[test]
fn values_json_names_the_source_column() {
    let tmp = make_dataset_fixture();

    let assert = with_sources(scout(&tmp, "values"))
        .arg("funding")
        .arg("--json")
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let v: Value = serde_json::from_str(&stdout).expect("json");

    assert_eq!(v["column"], "資助類型");
    let values = v["values"].as_array().unwrap();
    assert_eq!(values.len(), 3);
}
