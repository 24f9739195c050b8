// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end runs against scripted stand-in viewers

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;
use viewer_bench::sweep::Silent;
use viewer_bench::{BenchConfig, BenchError, Benchmark, ChartKind, Strategy};

/// Scripts are written and then executed; holding this lock keeps another
/// test from forking while a script file is still open for writing.
static SPAWN_LOCK: Mutex<()> = Mutex::new(());

fn lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Parses `--pl N` out of the arguments into `$pl`
const PARSE_ARGS: &str = r#"pl=0
while [ $# -gt 0 ]; do
  case "$1" in
    --pl) pl="$2"; shift ;;
  esac
  shift
done
"#;

/// Appends one token per run, like the real viewer in csv mode
const CSV_VIEWER: &str = r#"if [ "$pl" -eq 0 ]; then
  printf '%s' 60.5 >> out/fps.csv
else
  printf '%s' "$((10000 / pl))" >> out/fps.csv
fi
"#;

/// Prints FPS forever, like the real viewer in benchmark mode
const STREAMING_VIEWER: &str = r#"while true; do
  if [ "$pl" -eq 0 ]; then
    echo 30
    echo 90
  else
    echo "$pl"
  fi
done
"#;

/// Leaves a background child behind in the viewer's process group
const FORKING_VIEWER: &str = r#"sleep 300 &
echo $! > sleeper.pid
while true; do
  echo 60
done
"#;

/// Gives up after a few frames
const SHORT_VIEWER: &str = r#"echo 40
echo 50
echo 60
"#;

/// Zombies waiting for a reaper count as gone
fn is_alive(pid: u32) -> bool {
    if Path::new("/proc/self").exists() {
        return match fs::read_to_string(format!("/proc/{pid}/stat")) {
            Ok(stat) => stat
                .rsplit(')')
                .next()
                .map_or(false, |rest| !rest.trim_start().starts_with('Z')),
            Err(_) => false,
        };
    }
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn wait_until_gone(pid: u32) -> bool {
    for _ in 0..100 {
        if !is_alive(pid) {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    false
}

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(models: &[&str], viewer_body: &str) -> Self {
        let dir = TempDir::new().unwrap();

        let models_dir = dir.path().join("data").join("models");
        fs::create_dir_all(&models_dir).unwrap();
        for name in models {
            fs::write(models_dir.join(format!("{name}.ply")), "ply\n").unwrap();
        }
        fs::write(models_dir.join("README.txt"), "not a model").unwrap();

        let build = dir.path().join("build");
        fs::create_dir_all(&build).unwrap();
        let viewer = build.join("3DViewer");
        fs::write(&viewer, format!("#!/bin/sh\n{PARSE_ARGS}{viewer_body}")).unwrap();
        fs::set_permissions(&viewer, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config(&self, strategy: Strategy) -> BenchConfig {
        let mut config = BenchConfig::default();
        config.working_dir = self.path().to_path_buf();
        config.strategy = strategy;
        config.samples_per_run = 10;
        config
    }
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_csv_three_models_bar_chart() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny", "dragon", "teapot"], CSV_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Csv), &[]);

    let outcome = bench.run(&mut Silent).unwrap();

    let csv = fs::read_to_string(ws.path().join("out").join("fps.csv")).unwrap();
    assert_eq!(csv, "60.5, 60.5, 60.5");

    assert_eq!(outcome.table.row_count(), 3);
    assert!(outcome.table.is_single_value());
    assert_eq!(outcome.chart.title, "FPS simple");
    let ChartKind::Bar { categories, values } = &outcome.chart.kind else {
        panic!("expected a bar chart");
    };
    assert_eq!(categories, &["bunny", "dragon", "teapot"]);
    assert_eq!(values, &[60.5, 60.5, 60.5]);
}

#[test]
fn test_csv_sweep_line_chart() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny", "dragon"], CSV_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Csv), &args(&["--fs"]));

    let outcome = bench.run(&mut Silent).unwrap();

    let csv = fs::read_to_string(ws.path().join("out").join("fps.csv")).unwrap();
    assert_eq!(csv, "200, 100, 66, 50, 40\n200, 100, 66, 50, 40");

    assert_eq!(outcome.table.row_count(), 2);
    assert!(outcome.table.rows.iter().all(|r| r.values.len() == 5));
    assert_eq!(outcome.chart.x_label, "point lights");
    assert_eq!(outcome.chart.y_label, "FPS");
    assert_eq!(outcome.chart.legend(), vec!["bunny", "dragon"]);
    let ChartKind::Line { x, .. } = &outcome.chart.kind else {
        panic!("expected a line chart");
    };
    assert_eq!(x, &[50, 100, 150, 200, 250]);
}

#[test]
fn test_csv_file_is_truncated_between_invocations() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny"], CSV_VIEWER);
    let out = ws.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("fps.csv"), "1, 2, 3\n4, 5\n").unwrap();

    let outcome = Benchmark::new(ws.config(Strategy::Csv), &[])
        .run(&mut Silent)
        .unwrap();
    assert_eq!(outcome.table.rows[0].values, vec![60.5]);
}

#[test]
fn test_streaming_averages_samples() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny", "dragon"], STREAMING_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Streaming), &[]);

    let outcome = bench.run(&mut Silent).unwrap();

    assert!(outcome.chart.is_bar());
    for row in &outcome.table.rows {
        assert_eq!(row.values, vec![60.0]);
    }
    assert_eq!(outcome.report.run_stats.len(), 2);
    assert_eq!(outcome.report.run_stats[0].stats.count, 10);
}

#[test]
fn test_streaming_sweep_passes_point_lights() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny"], STREAMING_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Streaming), &args(&["--ss"]));

    let outcome = bench.run(&mut Silent).unwrap();

    assert_eq!(
        outcome.table.rows[0].values,
        vec![50.0, 100.0, 150.0, 200.0, 250.0]
    );
    assert!(!outcome.chart.is_bar());
}

#[test]
fn test_streaming_teardown_stops_forked_children() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny"], FORKING_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Streaming), &[]);

    let outcome = bench.run(&mut Silent).unwrap();
    assert_eq!(outcome.table.rows[0].values, vec![60.0]);

    let pid: u32 = fs::read_to_string(ws.path().join("sleeper.pid"))
        .unwrap()
        .trim()
        .parse()
        .unwrap();
    assert!(wait_until_gone(pid), "process {pid} outlived the viewer");
}

#[test]
fn test_streaming_short_run_is_flagged() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny"], SHORT_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Streaming), &[]);

    let outcome = bench.run(&mut Silent).unwrap();
    assert_eq!(outcome.table.rows[0].values, vec![50.0]);
    assert_eq!(outcome.report.run_stats[0].stats.count, 3);
    assert_eq!(outcome.report.short_runs(10).count(), 1);
}

#[test]
fn test_silent_viewer_is_rejected() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny"], "exit 0\n");
    let bench = Benchmark::new(ws.config(Strategy::Streaming), &[]);

    let err = bench.run(&mut Silent).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BenchError>(),
        Some(BenchError::NoSamples { .. })
    ));
}

#[test]
fn test_failing_viewer_stops_the_run() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny", "dragon"], "exit 3\n");
    let bench = Benchmark::new(ws.config(Strategy::Csv), &[]);

    let err = bench.run(&mut Silent).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BenchError>(),
        Some(BenchError::ViewerFailed { .. })
    ));
}

#[test]
fn test_viewer_writing_nothing_yields_shape_error() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny", "dragon"], "exit 0\n");
    let bench = Benchmark::new(ws.config(Strategy::Csv), &args(&["--fs"]));

    let err = bench.run(&mut Silent).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("Malformed FPS file"), "{message}");
}

#[test]
fn test_outputs_written() {
    let _guard = lock();
    let ws = Workspace::new(&["bunny", "dragon"], CSV_VIEWER);
    let bench = Benchmark::new(ws.config(Strategy::Csv), &args(&["--fs"]));

    let outcome = bench.run(&mut Silent).unwrap();
    let outputs = bench.write_outputs(&outcome).unwrap();

    assert!(outputs.chart_png.exists());
    assert!(outputs.chart_json.exists());
    assert!(outputs.report_json.exists());
    let md = fs::read_to_string(&outputs.report_md).unwrap();
    assert!(md.contains("| bunny | 200.0 | 100.0 | 66.0 | 50.0 | 40.0 |"));
}
