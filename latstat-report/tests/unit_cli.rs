use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::NamedTempFile;

const PERCENTILES: &str = env!("CARGO_BIN_EXE_latstat-percentiles");
const HISTOGRAM: &str = env!("CARGO_BIN_EXE_latstat-histogram");

fn run_percentiles(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(PERCENTILES)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn latstat-percentiles");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn run_histogram(args: &[&str]) -> Output {
    Command::new(HISTOGRAM)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run latstat-histogram")
}

fn data_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn stdout(out: &Output) -> String {
    String::from_utf8(out.stdout.clone()).unwrap()
}

#[test]
fn test_percentiles_default_ranks() {
    let out = run_percentiles(&[], "1000000 2000000\n3000000 3000000\n");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let text = stdout(&out);
    let ranks: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split_whitespace().next().unwrap())
        .collect();
    assert_eq!(ranks, vec!["50", "75", "90", "95", "99", "99.9"]);
    assert!(text.lines().nth(1).unwrap().ends_with("2.00                 2.50                 0.50"));
}

#[test]
fn test_percentiles_custom_ranks() {
    let out = run_percentiles(&["-p", "0,100"], "5000000 7000000\n1000000 1500000\n");
    assert!(out.status.success());
    let text = stdout(&out);
    let rows: Vec<Vec<&str>> = text.lines().skip(1).map(|l| l.split_whitespace().collect()).collect();
    assert_eq!(rows, vec![vec!["0", "1.00", "1.50", "0.50"], vec!["100", "5.00", "7.00", "2.00"]]);
}

#[test]
fn test_percentiles_malformed_input_fails_without_output() {
    let out = run_percentiles(&[], "1 2\nabc 123\n");
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Malformed line 2"));
}

#[test]
fn test_percentiles_empty_input_fails() {
    let out = run_percentiles(&[], "");
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_percentiles_rank_out_of_range_is_usage_error() {
    let out = run_percentiles(&["-p", "150"], "1 2\n");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_histogram_end_to_end() {
    let a = data_file("1000000 1000000\n3000000 3000000\n");
    let b = data_file("1500000 1500000\n");
    let out = run_histogram(&[
        "-b", "3", "-s", "1",
        "ttc",
        "zz", b.path().to_str().unwrap(),
        "aa", a.path().to_str().unwrap(),
    ]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));

    let expected = [
        "#                  aa         zz",
        "         0          0          0",
        "         1          1          1",
        "         2          0          0",
    ]
    .join("\n")
        + "\n";
    assert_eq!(stdout(&out), expected);
}

#[test]
fn test_histogram_default_bins() {
    let a = data_file("0 120000000\n");
    let out = run_histogram(&["ttfb", "a", a.path().to_str().unwrap()]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert_eq!(text.lines().count(), 1 + 64);
    let last_label = text.lines().last().unwrap().split_whitespace().next().unwrap();
    assert_eq!(last_label, "3150");
    let third: Vec<&str> = text.lines().nth(3).unwrap().split_whitespace().collect();
    assert_eq!(third, vec!["100", "1"]);
}

#[test]
fn test_histogram_bad_arity_prints_help() {
    let a = data_file("1 2\n");
    for args in [
        vec!["ttc"],
        vec!["ttc", "a"],
        vec!["ttc", "a", a.path().to_str().unwrap(), "b"],
    ] {
        let out = run_histogram(&args);
        assert_eq!(out.status.code(), Some(1), "args {args:?}");
        assert!(stdout(&out).contains("Usage"), "help expected for {args:?}");
    }
}

#[test]
fn test_histogram_unknown_kind_prints_help() {
    let a = data_file("1 2\n");
    let out = run_histogram(&["rtt", "a", a.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Usage"));
}

#[test]
fn test_histogram_malformed_source_is_fatal() {
    let good = data_file("1 2\n");
    let bad = data_file("abc 123\n");
    let out = run_histogram(&[
        "delta",
        "good", good.path().to_str().unwrap(),
        "bad", bad.path().to_str().unwrap(),
    ]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    assert!(String::from_utf8_lossy(&out.stderr).contains(bad.path().to_str().unwrap()));
}

#[test]
fn test_histogram_json_output() {
    let a = data_file("0 60000000\n");
    let out = run_histogram(&["--format", "json", "-b", "2", "ttfb", "a", a.path().to_str().unwrap()]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["columns"][0]["counts"], serde_json::json!([0, 1]));
}

#[test]
fn test_histogram_non_numeric_option_is_usage_error() {
    let a = data_file("1 2\n");
    for args in [
        vec!["-b", "abc", "ttc", "a", a.path().to_str().unwrap()],
        vec!["-s", "wide", "ttc", "a", a.path().to_str().unwrap()],
    ] {
        let out = run_histogram(&args);
        assert_eq!(out.status.code(), Some(1), "args {args:?}");
        assert!(stdout(&out).contains("Usage"), "help expected for {args:?}");
        assert!(String::from_utf8_lossy(&out.stderr).contains("invalid value"));
    }
}

#[test]
fn test_histogram_overflowing_bin_layout_is_usage_error() {
    let a = data_file("1 2\n");
    let out = run_histogram(&["-s", "1e308", "-b", "3", "ttc", "a", a.path().to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Usage"));
}

#[test]
fn test_percentiles_non_numeric_rank_is_usage_error() {
    let out = run_percentiles(&["-p", "x"], "1 2\n");
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).contains("Usage"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid value"));
}

#[test]
fn test_help_flag_exits_successfully() {
    let out = run_histogram(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Usage"));

    let out = run_percentiles(&["--help"], "");
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Usage"));
}
