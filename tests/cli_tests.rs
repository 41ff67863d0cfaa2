// Integration tests for the jetsub command-line driver

mod utils;

use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;
use utils::*;

fn jetsub() -> assert_cmd::Command {
    assert_cmd::cargo::cargo_bin_cmd!("jetsub")
}

#[test]
fn test_help_lists_options() {
    jetsub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("--format"))
        .stdout(predicate::str::contains("--simulated"));
}

#[test]
fn test_jsonl_records_on_stdout() {
    let events = write_events(&[boosted_event(300.0), boosted_event(40.0), boosted_event(500.0)]);

    jetsub()
        .arg(events.path())
        .arg("--no-area")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":0"#))
        .stdout(predicate::str::contains(r#""event":2"#))
        .stdout(predicate::str::contains(r#""event":1"#).not())
        .stdout(predicate::str::contains(r#""tau1""#))
        .stderr(predicate::str::contains(r#""events_analyzed": 3"#))
        .stderr(predicate::str::contains(r#""below_threshold": 1"#));
}

#[test]
fn test_events_from_stdin() {
    let input = format!("{}\n{}\n", to_line(&boosted_event(300.0)), to_line(&boosted_event(350.0)));

    let output = jetsub()
        .args(["--no-area", "-j", "2"])
        .write_stdin(input)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn test_csv_output_to_file_with_summary() {
    let dir = TempDir::new().unwrap();
    let records = dir.path().join("records.csv");
    let summary = dir.path().join("summary.json");
    let events = write_events(&[boosted_event(300.0), boosted_event(250.0)]);

    jetsub()
        .arg(events.path())
        .args(["--no-area", "--format", "csv"])
        .arg("-o")
        .arg(&records)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let csv = fs::read_to_string(&records).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("event,n_parts,n_jets,trigger"));
    assert!(!lines[0].contains("gen_jet1"));
    assert!(lines[1].starts_with("0,5,2,0,"));

    let summary: serde_json::Value = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(summary["format"], "jetsub-summary-v1");
    assert_eq!(summary["records"], 2);
}

#[test]
fn test_config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("jetsub.toml");
    fs::write(&config, "min_leading_pt = 1000.0\n\n[area]\nenabled = false\n").unwrap();
    let events = write_events(&[boosted_event(300.0)]);

    jetsub()
        .arg(events.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(r#""below_threshold": 1"#));
}

#[test]
fn test_cli_override_beats_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("jetsub.toml");
    fs::write(&config, "min_leading_pt = 1000.0\n").unwrap();

    jetsub()
        .arg("--config")
        .arg(&config)
        .args(["--min-pt", "50", "--print-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("min_leading_pt = 50.0"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "cone_size = -1.0\n").unwrap();

    jetsub()
        .arg("--config")
        .arg(&config)
        .arg("--print-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cone_size must be positive"));
}

#[test]
fn test_invalid_override_fails() {
    jetsub()
        .args(["--cone-size", "0", "--print-config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cone_size"));
}

#[test]
fn test_missing_event_file_fails() {
    jetsub()
        .arg("/nonexistent/events.jsonl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open event file"));
}

#[test]
fn test_malformed_lines_are_counted_not_fatal() {
    let input = format!("{}\nnot an event\n", to_line(&boosted_event(300.0)));

    jetsub()
        .arg("--no-area")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":0"#))
        .stderr(predicate::str::contains(r#""malformed": 1"#));
}

#[test]
fn test_simulated_csv_has_generator_columns() {
    let mut event = boosted_event(300.0);
    event.gen_particles = Some(vec![gen_particle(200.0, 0.0, 1.0), gen_particle(90.0, 0.1, 1.1)]);
    let events = write_events(&[event]);

    jetsub()
        .arg(events.path())
        .args(["--no-area", "--simulated", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n_gen_parts,n_gen_jets,gen_jet1_px"));
}
