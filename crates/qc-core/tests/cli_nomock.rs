//! End-to-end tests for the `qc` binary.
//!
//! Every test runs the real binary against files in a temp directory and
//! checks stdout payloads, written artifacts and exit codes.

use assert_cmd::Command;
use predicates::prelude::*;
use qc_common::{parse_timestamp, TestResultRow, TestResults};
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SAMPLE: &str = r#""TOA5","Station","CR1000","1234","CR1000.Std.22","CPU:prog.CR1","1234","Table1"
"TIMESTAMP","RECORD","Wind","Air_Temp"
"TS","RN","m/s","Deg C"
"","","Smp","Avg"
"2015-01-01 00:15:00",1,1.7,"NAN"
"2015-01-01 00:00:00",0,1.5,20.1
"#;

/// Get a Command for the qc binary with a clean environment.
fn qc() -> Command {
    let mut cmd = Command::cargo_bin("qc").expect("qc binary should exist");
    cmd.env_remove("QC_CONFIG")
        .env_remove("QC_LOG")
        .env_remove("RUST_LOG")
        .env_remove("QC_LOG_FORMAT")
        .env_remove("QC_SMTP_PASSWORD");
    cmd
}

fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("station.dat");
    fs::write(&path, SAMPLE).expect("sample");
    path
}

mod read {
    use super::*;

    #[test]
    fn prints_summary() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());

        qc().arg("read")
            .arg(&data)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"rows\": 2"))
            .stdout(predicate::str::contains("\"start\": \"2015-01-01 00:00:00\""))
            .stdout(predicate::str::contains("Air_Temp"));
    }

    #[test]
    fn missing_file_gives_empty_summary() {
        let dir = TempDir::new().expect("tempdir");
        qc().arg("read")
            .arg(dir.path().join("absent.dat"))
            .assert()
            .success()
            .stdout(predicate::str::contains("\"rows\": 0"))
            .stdout(predicate::str::contains("\"start\": null"));
    }

    #[test]
    fn strict_missing_file_is_io_error() {
        let dir = TempDir::new().expect("tempdir");
        qc().args(["read", "--strict"])
            .arg(dir.path().join("absent.dat"))
            .assert()
            .code(21);
    }

    #[test]
    fn strict_bad_index_column_is_input_error() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        qc().args(["read", "--strict", "--index-col", "TS"])
            .arg(&data)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("index column 'TS' not found"));
    }
}

mod metrics {
    use super::*;

    #[test]
    fn successive_runs_merge() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("metrics.csv");

        qc().arg("metrics")
            .arg(&path)
            .args(["--label", "d1", "--set", "A=1"])
            .assert()
            .success();
        qc().arg("metrics")
            .arg(&path)
            .args(["--label", "d2", "--set", "B=2"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"rows\": 2"));

        assert_eq!(
            fs::read_to_string(&path).expect("metrics"),
            "TIMESTEP,A,B\nd1,1.0,NaN\nd2,NaN,2.0\n"
        );
    }

    #[test]
    fn malformed_assignment_is_args_error() {
        let dir = TempDir::new().expect("tempdir");
        qc().arg("metrics")
            .arg(dir.path().join("metrics.csv"))
            .args(["--set", "Completeness"])
            .assert()
            .code(10);
        assert!(!dir.path().join("metrics.csv").exists());
    }
}

mod report {
    use super::*;

    fn write_results(dir: &Path) -> PathBuf {
        let ts = parse_timestamp("2015-01-01 00:15:00").expect("ts");
        let mut results: TestResults = vec![
            TestResultRow::new("Station", "Wind")
                .with_test_type("Range")
                .with_window(ts, ts, 1),
            TestResultRow::new("Station", "Air_Temp")
                .with_test_type("Missing")
                .with_window(ts, ts, 1)
                .with_error_flag("Missing data"),
        ]
        .into_iter()
        .collect();
        let path = dir.join("test_results.csv");
        qc_io::write_test_results(&path, &mut results).expect("test results");
        path
    }

    #[test]
    fn renders_report_with_log_notes() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        let results = write_results(dir.path());
        let output = dir.path().join("report.html");
        let log = dir.path().join("qc.log");

        qc().arg("--log-file")
            .arg(&log)
            .arg("report")
            .arg("--data")
            .arg(&data)
            .arg("--test-results")
            .arg(&results)
            .args(["--title", "Station 4", "--output"])
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"test_results\": 2"));

        let html = fs::read_to_string(&output).expect("report");
        assert!(html.contains("<title>Station 4</title>"));
        assert!(html.contains("Start time: 2015-01-01 00:00:00"));
        assert!(html.contains("Test Results (2)"));
        assert!(html.find("<td>Air_Temp</td>").unwrap() < html.find("<td>Wind</td>").unwrap());
        assert!(html.contains("Reading Campbell Scientific CSV file"));
    }

    #[test]
    fn notes_hold_only_the_current_run() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        let log = dir.path().join("qc.log");

        for run in 0..3 {
            let output = dir.path().join(format!("report{run}.html"));
            qc().arg("--log-file")
                .arg(&log)
                .arg("report")
                .arg("--data")
                .arg(&data)
                .arg("--output")
                .arg(&output)
                .assert()
                .success();

            let html = fs::read_to_string(&output).expect("report");
            assert_eq!(
                html.matches("Reading Campbell Scientific CSV file").count(),
                1,
                "run {run} repeated earlier log lines"
            );
        }
    }

    #[test]
    fn encode_with_missing_graphic_fails() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        let output = dir.path().join("report.html");

        qc().arg("report")
            .arg("--data")
            .arg(&data)
            .arg("--graphic")
            .arg(dir.path().join("absent.png"))
            .arg("--encode")
            .arg("--output")
            .arg(&output)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("absent.png"));
        assert!(!output.exists());
    }

    #[test]
    fn config_file_sets_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        let output = dir.path().join("report.html");
        let config = dir.path().join("qc.toml");
        fs::write(
            &config,
            "[report.options]\ntitle = \"From Config\"\n\n[report.options.config]\nLocation = \"Albuquerque\"\n",
        )
        .expect("config");

        qc().arg("--config")
            .arg(&config)
            .arg("report")
            .arg("--data")
            .arg(&data)
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        let html = fs::read_to_string(&output).expect("report");
        assert!(html.contains("<title>From Config</title>"));
        assert!(html.contains("<li><b>Location</b>: Albuquerque</li>"));
    }
}

mod dashboard {
    use super::*;

    #[test]
    fn renders_from_toml() {
        let dir = TempDir::new().expect("tempdir");
        let spec = dir.path().join("dashboard.toml");
        let output = dir.path().join("dashboard.html");
        fs::write(
            &spec,
            r#"title = "Sites"
column_names = ["A"]
row_names = ["X"]

[[cells]]
row = "X"
column = "A"
text = "hello"
"#,
        )
        .expect("spec");

        qc().arg("dashboard")
            .arg("--spec")
            .arg(&spec)
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        let html = fs::read_to_string(&output).expect("dashboard");
        assert!(html.contains("<h1>Sites</h1>"));
        assert_eq!(html.matches(r#"<td class="dashboard-cell">"#).count(), 1);
        assert!(html.contains("hello"));
    }

    #[test]
    fn renders_from_json() {
        let dir = TempDir::new().expect("tempdir");
        let spec = dir.path().join("dashboard.json");
        let output = dir.path().join("dashboard.html");
        fs::write(
            &spec,
            r#"{"column_names": ["A", "B"], "row_names": ["X"], "datatables": true,
                "cells": [{"row": "X", "column": "B", "link": "x/report.html"}]}"#,
        )
        .expect("spec");

        qc().arg("dashboard")
            .arg("--spec")
            .arg(&spec)
            .arg("-o")
            .arg(&output)
            .assert()
            .success();

        let html = fs::read_to_string(&output).expect("dashboard");
        assert!(html.contains(r#"href="x/report.html""#));
        assert!(html.contains("DataTable("));
    }

    #[test]
    fn invalid_spec_is_input_error() {
        let dir = TempDir::new().expect("tempdir");
        let spec = dir.path().join("dashboard.toml");
        fs::write(&spec, "column_names = 3\n").expect("spec");

        qc().arg("dashboard")
            .arg("--spec")
            .arg(&spec)
            .arg("--output")
            .arg(dir.path().join("dashboard.html"))
            .assert()
            .code(12)
            .stderr(predicate::str::contains("invalid dashboard spec"));
    }
}

mod email {
    use super::*;

    #[test]
    fn unreachable_host_is_delivery_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        qc().args([
            "email",
            "--subject",
            "QC results",
            "--body",
            "All tests passed",
            "--from",
            "qc@example.com",
            "--to",
            "ops@example.com",
            "--host",
        ])
        .arg(format!("127.0.0.1:{port}"))
        .assert()
        .code(13);
    }

    #[test]
    fn missing_sender_is_args_error() {
        qc().args([
            "email",
            "--subject",
            "s",
            "--body",
            "b",
            "--to",
            "ops@example.com",
        ])
        .assert()
        .code(10)
        .stderr(predicate::str::contains("--from"));
    }

    #[test]
    fn body_and_body_file_conflict() {
        qc().args([
            "email",
            "--subject",
            "s",
            "--body",
            "b",
            "--body-file",
            "body.txt",
        ])
        .assert()
        .code(10);
    }
}

mod global {
    use super::*;

    #[test]
    fn unknown_command_fails() {
        qc().arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn help_succeeds() {
        qc().arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("dashboard"));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        qc().arg("--config")
            .arg(dir.path().join("absent.toml"))
            .arg("read")
            .arg(&data)
            .assert()
            .code(11)
            .stderr(predicate::str::contains("Config file not found"));
    }

    #[test]
    fn jsonl_logs_on_stderr() {
        let dir = TempDir::new().expect("tempdir");
        let data = write_sample(dir.path());
        qc().args(["--log-format", "jsonl", "read"])
            .arg(&data)
            .assert()
            .success()
            .stderr(predicate::str::contains("\"level\":\"INFO\""));
    }
}
