//! Integration tests for tabkit CLI

use std::process::Command;

fn fixture(name: &str) -> String {
    format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn run_tabkit(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_tabkit"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_tabkit(&["--help"]);

    assert!(success);
    assert!(stdout.contains("tabkit"));
    assert!(stdout.contains("report"));
    assert!(stdout.contains("table"));
    assert!(stdout.contains("footprint"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_tabkit(&["--version"]);

    assert!(success);
    assert!(stdout.contains("tabkit"));
}

#[test]
fn test_report_text_default() {
    let (stdout, _, success) = run_tabkit(&["report", &fixture("portfolio.csv")]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "      name     shares      price");
    assert_eq!(lines[1], "---------- ---------- ---------- ");
    assert_eq!(lines[2], "        AA        100       32.2");
}

#[test]
fn test_report_csv_with_column_formats() {
    let (stdout, _, success) = run_tabkit(&[
        "report",
        &fixture("portfolio.csv"),
        "-F",
        "csv",
        "--column-format",
        "%s",
        "--column-format",
        "%d",
        "--column-format",
        "%0.2f",
    ]);

    assert!(success);
    assert!(stdout.starts_with("name,shares,price\nAA,100,32.20\nIBM,50,91.10\n"));
}

#[test]
fn test_report_html_upper_headers() {
    let (stdout, _, success) = run_tabkit(&[
        "report",
        &fixture("portfolio.csv"),
        "-F",
        "html",
        "--columns",
        "name,shares",
        "--upper-headers",
    ]);

    assert!(success);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("<tr>  <th>NAME</th> <th>SHARES</th> </tr>"));
    assert_eq!(lines.next(), Some("<tr>  <td>AA</td> <td>100</td> </tr>"));
}

#[test]
fn test_report_json_output() {
    let (stdout, _, success) = run_tabkit(&[
        "report",
        &fixture("portfolio.csv"),
        "--columns",
        "name,cost",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let rows = parsed.as_array().expect("expected an array");
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0]["name"], "AA");
    assert!(rows[0].get("cost").is_some());
    assert!(rows[0].get("shares").is_none());
}

#[test]
fn test_report_unknown_attribute_fails() {
    let (stdout, stderr, success) = run_tabkit(&[
        "report",
        &fixture("portfolio.csv"),
        "--columns",
        "name,owner",
    ]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("owner"));
}

#[test]
fn test_report_bad_column_format_fails() {
    let (_, stderr, success) = run_tabkit(&[
        "report",
        &fixture("portfolio.csv"),
        "--column-format",
        "%q",
    ]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_report_bad_value_reports_line() {
    let (_, stderr, success) = run_tabkit(&["report", &fixture("bad_shares.csv")]);

    assert!(!success);
    assert!(stderr.contains("line 3"));
    assert!(stderr.contains("fifty"));
}

#[test]
fn test_missing_file_fails() {
    let (_, stderr, success) = run_tabkit(&["report", "/nonexistent/portfolio.csv"]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("/nonexistent/portfolio.csv"));
}

#[test]
fn test_table_with_slice() {
    let (stdout, _, success) = run_tabkit(&[
        "table",
        &fixture("portfolio.csv"),
        "--types",
        "str,int,float",
        "--slice",
        "1:3",
        "-F",
        "csv",
    ]);

    assert!(success);
    assert_eq!(stdout, "name,shares,price\nIBM,50,91.1\nCAT,150,83.44\n");
}

#[test]
fn test_table_column_subset_json() {
    let (stdout, _, success) = run_tabkit(&[
        "table",
        &fixture("ctabus.csv"),
        "--types",
        "intern,str,str,int",
        "--columns",
        "route,rides",
        "--slice",
        "::4",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let rows = parsed.as_array().expect("expected an array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["route"], "3");
    assert_eq!(rows[0]["rides"], 7354);
    assert_eq!(rows[1]["route"], "4");
}

#[test]
fn test_table_zero_step_fails() {
    let (_, stderr, success) = run_tabkit(&[
        "table",
        &fixture("portfolio.csv"),
        "--types",
        "str,int,float",
        "--slice",
        "0:2:0",
    ]);

    assert!(!success);
    assert!(stderr.contains("invalid slice"));
}

#[test]
fn test_portfolio_listing() {
    let (stdout, _, success) = run_tabkit(&["portfolio", &fixture("portfolio.csv")]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "      name     shares      price");
    assert_eq!(lines[1], "---------- ---------- ---------- ");
    assert_eq!(lines[2], "        AA        100      32.20");
    assert_eq!(lines[8], "       IBM        100      70.44");
}

#[test]
fn test_cost() {
    let (stdout, _, success) = run_tabkit(&["cost", &fixture("portfolio.dat")]);

    assert!(success);
    assert_eq!(stdout.trim(), "Total cost: 44671.15");
}

#[test]
fn test_cost_skips_bad_lines() {
    let (stdout, stderr, success) = run_tabkit(&["cost", &fixture("missing.dat")]);

    assert!(success);
    assert_eq!(stdout.trim(), "Total cost: 31170.15");
    assert!(stderr.contains("could not parse line"));
}

#[test]
fn test_rides_routes() {
    let (stdout, _, success) = run_tabkit(&["rides", &fixture("ctabus.csv"), "routes"]);

    assert!(success);
    assert_eq!(stdout.trim(), "Routes: 3");
}

#[test]
fn test_rides_passengers_json() {
    let (stdout, _, success) = run_tabkit(&[
        "rides",
        &fixture("ctabus.csv"),
        "passengers",
        "--route",
        "22",
        "--date",
        "01/02/2001",
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["rides"], 8441);
}

#[test]
fn test_rides_passengers_needs_route() {
    let (_, stderr, success) = run_tabkit(&["rides", &fixture("ctabus.csv"), "passengers"]);

    assert!(!success);
    assert!(stderr.contains("--route"));
}

#[test]
fn test_rides_route_rides() {
    let (stdout, _, success) = run_tabkit(&[
        "rides",
        &fixture("ctabus.csv"),
        "route-rides",
        "-o",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let rows = parsed.as_array().expect("expected an array");
    assert_eq!(rows.len(), 3);
    let total = |route: &str| {
        rows.iter()
            .find(|r| r["route"] == route)
            .map(|r| r["rides"].clone())
    };
    assert_eq!(total("3"), Some(serde_json::json!(46893)));
    assert_eq!(total("4"), Some(serde_json::json!(55646)));
    assert_eq!(total("22"), Some(serde_json::json!(24596)));
}

#[test]
fn test_rides_top_increases() {
    let (stdout, _, success) = run_tabkit(&["rides", &fixture("ctabus.csv"), "top-increases"]);

    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "     route   increase");
    assert_eq!(lines[2], "        22       1686");
    assert_eq!(lines[3], "         3       1451");
}

#[test]
fn test_footprint() {
    let (stdout, _, success) = run_tabkit(&["footprint", &fixture("ctabus.csv"), "-o", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    let rows = parsed.as_array().expect("expected an array");
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|r| r["rows"] == 12));
    assert_eq!(rows[0]["representation"], "tuples");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let (stdout, stderr, success) = run_tabkit(&["-vv", "cost", &fixture("portfolio.dat")]);

    assert!(success);
    assert!(stdout.contains("Total cost"));
    assert!(!stdout.contains("computed portfolio cost"));
    assert!(stderr.contains("computed portfolio cost"));
}
