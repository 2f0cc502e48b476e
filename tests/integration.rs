//! Integration tests for the typing log analyzer
//!
//! These exercise the full pipeline: JSONL on disk, loading, every analyzer,
//! chart generation and the command-line binary.

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use typing_log_analyzer::analysis::{rank_key_pairs, BasicStats, ProblemKeys};
use typing_log_analyzer::config::{AnalysisConfig, PlotConfig};
use typing_log_analyzer::events::{load_jsonl, Field};
use typing_log_analyzer::pipeline::{run_analyses, run_plots, PlotOutcome};
use typing_log_analyzer::plots::{PlotGenerator, PlotStyle, ELAPSED_PLOT, HOURLY_PLOT};
use typing_log_analyzer::report::{render_console, AnalysisReport};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut contents = lines.join("\n");
    contents.push('\n');
    fs::write(&path, contents).unwrap();
    path
}

/// Ten labelled records, two of them mistakes, spread over hours 9 and 14.
fn ten_records() -> Vec<String> {
    (0..10)
        .map(|i| {
            let hour = if i < 6 { 9 } else { 14 };
            let source = if i % 2 == 0 { "P" } else { "H" };
            let previous = if i == 0 { None } else { Some("O") };
            json!({
                "SessionId": "s-1",
                "Timestamp": format!("2025-01-15T{:02}:{:02}:00", hour, i),
                "ActivationKeyName": "Space",
                "SourceKeyName": source,
                "PreviousKey": previous,
                "ElapsedMs": 50 + i * 10,
                "TimeSinceLastKey": 100 + i,
                "MarkedAsMistake": i < 2,
                "RolloverDetected": i == 0,
                "EventType": "mapped",
            })
            .to_string()
        })
        .collect()
}

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_typing-log-analyzer"))
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn loader_counts_only_valid_lines() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines = ten_records();
    lines.insert(3, "{\"SourceKeyName\": \"P\", \"Elapsed".to_string());
    lines.insert(7, "garbage".to_string());
    let path = write_log(dir.path(), "log.jsonl", &lines);

    let data = load_jsonl(&path).unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(data.skipped_lines(), 2);
    assert_eq!(data.sources(), &[path]);
}

// ---------------------------------------------------------------------------
// End-to-end figures
// ---------------------------------------------------------------------------

#[test]
fn ten_records_two_mistakes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(dir.path(), "log.jsonl", &ten_records());
    let data = load_jsonl(&path).unwrap();

    let stats = BasicStats::summarize(&data);
    assert_eq!(stats.mistakes.unwrap().rate_pct(), Some(20.0));

    let sections = run_analyses(&data, &AnalysisConfig::default());
    let basic = &sections[0];
    let mistake = basic.find("Mistake rate").unwrap();
    assert!(mistake.value.contains("20.00%"));
    assert!(mistake.value.contains("2 / 10"));
}

#[test]
fn hour_buckets_are_sparse() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = ["09:00", "09:30", "14:15"]
        .iter()
        .map(|t| {
            json!({"Timestamp": format!("2025-01-15T{}:00", t), "ElapsedMs": 10, "SourceKeyName": "A"})
                .to_string()
        })
        .collect();
    let data = load_jsonl(&write_log(dir.path(), "log.jsonl", &lines)).unwrap();

    let sections = run_analyses(&data, &AnalysisConfig::default());
    let hourly = sections.iter().find(|s| s.title == "Time of Day").unwrap();
    let hours: Vec<&str> = hourly
        .findings
        .iter()
        .filter(|f| f.label.ends_with('h'))
        .map(|f| f.label.as_str())
        .collect();
    assert_eq!(hours, vec!["09h", "14h"]);
}

#[test]
fn combo_rate_regression_three_of_hundred() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..100)
        .map(|i| {
            json!({"ActivationKeyName": "Space", "SourceKeyName": "J", "ElapsedMs": 5, "MarkedAsMistake": i < 3})
                .to_string()
        })
        .collect();
    let data = load_jsonl(&write_log(dir.path(), "log.jsonl", &lines)).unwrap();

    let summary = ProblemKeys::summarize(&data, 10);
    let top = &summary.top_mistakes.unwrap()[0];
    assert_eq!((top.mistakes, top.total), (3, 100));
    assert_eq!(top.rate_pct(), Some(3.0));
}

#[test]
fn key_sequence_ranking_respects_minimum() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines = Vec::new();
    for i in 0..4 {
        lines.push(json!({"SourceKeyName": "X", "PreviousKey": "Z", "MarkedAsMistake": i == 0}).to_string());
    }
    for i in 0..6 {
        lines.push(json!({"SourceKeyName": "B", "PreviousKey": "A", "MarkedAsMistake": i < 3}).to_string());
    }
    let data = load_jsonl(&write_log(dir.path(), "log.jsonl", &lines)).unwrap();

    let ranked = rank_key_pairs(&data, 5).unwrap();
    assert_eq!(ranked.len(), 1);
    assert!(ranked.iter().all(|p| p.count >= 5));
    assert_eq!(ranked[0].rate_pct(), 50.0);
}

#[test]
fn unlabelled_log_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..6)
        .map(|i| {
            json!({"ActivationKeyName": "Space", "SourceKeyName": "K", "PreviousKey": "L",
                   "ElapsedMs": 20 + i, "Timestamp": "2025-01-15T10:00:00"})
            .to_string()
        })
        .collect();
    let data = load_jsonl(&write_log(dir.path(), "log.jsonl", &lines)).unwrap();
    assert!(!data.has(Field::MarkedAsMistake));

    let sections = run_analyses(&data, &AnalysisConfig::default());
    assert!(sections[0]
        .find("Mistake rate")
        .unwrap()
        .value
        .starts_with("not applicable"));
    assert!(!sections[2].is_applicable());
    assert!(!sections[3].is_applicable());

    let out = dir.path().join("plots");
    let generator = PlotGenerator::new(PlotStyle::plain(&PlotConfig::default()), &out);
    match run_plots(&generator, &data) {
        PlotOutcome::Generated(summary) => {
            assert!(out.join(ELAPSED_PLOT).is_file());
            assert!(!out.join(HOURLY_PLOT).exists());
            assert_eq!(summary.skipped.len(), 1);
        }
        other => panic!("unexpected plot outcome: {:?}", other),
    }
}

#[test]
fn report_renders_every_section() {
    let dir = tempfile::tempdir().unwrap();
    let data = load_jsonl(&write_log(dir.path(), "log.jsonl", &ten_records())).unwrap();
    let sections = run_analyses(&data, &AnalysisConfig::default());
    let report = AnalysisReport::new(&data, sections, PlotOutcome::Disabled);

    let text = render_console(&report);
    for title in [
        "Basic Statistics",
        "Problem Keys",
        "Timing Patterns",
        "Key Sequences",
        "Time of Day",
        "Analysis complete",
    ] {
        assert!(text.contains(title), "missing section {}", title);
    }
}

// ---------------------------------------------------------------------------
// Binary
// ---------------------------------------------------------------------------

#[test]
fn binary_without_arguments_exits_one() {
    let output = bin().output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn binary_empty_log_exits_one_without_plots() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(dir.path(), "empty.jsonl", &["not json".to_string()]);
    let out = dir.path().join("plots");

    let output = bin()
        .arg(&path)
        .arg("--output-dir")
        .arg(&out)
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    assert!(!dir.path().join("plots").exists());
}

#[test]
fn binary_missing_file_exits_one() {
    let output = bin().arg("/nonexistent/typing-log.jsonl").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("typing-log.jsonl"));
}

#[test]
fn binary_full_run_writes_report_and_charts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_log(dir.path(), "log.jsonl", &ten_records());
    let out = dir.path().join("charts");
    let json_path = dir.path().join("report.json");

    let output = bin()
        .arg(&path)
        .arg("--output-dir")
        .arg(&out)
        .arg("--json")
        .arg(&json_path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("20.00% (2 / 10)"));
    assert!(stdout.contains("Analysis complete"));
    assert!(out.join(ELAPSED_PLOT).is_file());
    assert!(out.join(HOURLY_PLOT).is_file());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(report["metadata"]["total_events"], 10);
    assert_eq!(report["sections"].as_array().unwrap().len(), 5);
}

#[test]
fn binary_all_mode_merges_logs() {
    let dir = tempfile::tempdir().unwrap();
    let records = ten_records();
    write_log(dir.path(), "typing-log-20250115-a.jsonl", &records[..4]);
    write_log(dir.path(), "typing-log-20250116-b.jsonl", &records[4..]);
    write_log(dir.path(), "unrelated.jsonl", &records);

    let output = bin()
        .arg("--all")
        .arg("--log-dir")
        .arg(dir.path())
        .arg("--no-plots")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 / 10"));
    assert!(stdout.contains("typing-log-20250115-a.jsonl"));
    assert!(!stdout.contains("unrelated.jsonl"));
}

#[test]
fn binary_all_mode_without_logs_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let output = bin()
        .arg("--all")
        .arg("--log-dir")
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn binary_log_dir_without_all_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    write_log(dir.path(), "typing-log-20250115.jsonl", &ten_records());

    let output = bin().arg("--log-dir").arg(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn wrong_typed_fields_keep_their_rows() {
    let dir = tempfile::tempdir().unwrap();
    let lines = vec![
        json!({"SourceKeyName": "A", "ElapsedMs": 10}).to_string(),
        json!({"SourceKeyName": "A", "ElapsedMs": "12"}).to_string(),
        json!({"SourceKeyName": "A", "MarkedAsMistake": 0}).to_string(),
    ];
    let data = load_jsonl(&write_log(dir.path(), "log.jsonl", &lines)).unwrap();
    assert_eq!(data.len(), 3);
    assert_eq!(data.skipped_lines(), 0);

    let stats = BasicStats::summarize(&data);
    assert_eq!(stats.total_events, 3);
    assert!(stats.mistakes.is_none());
}
