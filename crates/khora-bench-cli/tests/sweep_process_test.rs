// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Drives real sweeps against the `stub-renderer` binary.

use khora_bench::{run_sweep, LightCounts, NullObserver, SweepConfig, SweepError};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const STUB: &str = env!("CARGO_BIN_EXE_stub-renderer");

fn stub_config(dir: &TempDir) -> SweepConfig {
    let mut config = SweepConfig {
        working_directory: dir.path().to_path_buf(),
        executable: PathBuf::from(STUB),
        log_directory: PathBuf::from("logs"),
        lights: LightCounts::List(vec![0, 25, 50]),
        pipelines: vec![
            "deferred-clustered-gpu".to_string(),
            "forward-clustered-gpu".to_string(),
        ],
        create_log_directory: true,
        ..SweepConfig::default()
    };
    config.environment.insert(
        "STUB_RENDERER_TRACE".to_string(),
        dir.path().join("trace.txt").display().to_string(),
    );
    config
}

fn trace_lines(dir: &TempDir) -> Vec<String> {
    fs::read_to_string(dir.path().join("trace.txt"))
        .expect("trace file should exist")
        .lines()
        .map(str::to_string)
        .collect()
}

const REFERENCE_ORDER: [&str; 6] = [
    "0 deferred-clustered-gpu",
    "25 deferred-clustered-gpu",
    "50 deferred-clustered-gpu",
    "0 forward-clustered-gpu",
    "25 forward-clustered-gpu",
    "50 forward-clustered-gpu",
];

#[test]
fn test_sweep_runs_every_point_once_in_order_without_overlap() {
    let dir = TempDir::new().unwrap();
    let summary = run_sweep(stub_config(&dir), &mut NullObserver).unwrap();

    assert_eq!(summary.attempted, 6);
    assert_eq!(summary.succeeded, 6);

    // Strict start/end alternation: each run finished before the next began.
    let expected: Vec<String> = REFERENCE_ORDER
        .iter()
        .flat_map(|id| [format!("start {id}"), format!("end {id}")])
        .collect();
    assert_eq!(trace_lines(&dir), expected);
}

#[test]
fn test_renderer_writes_logs_at_templated_paths() {
    let dir = TempDir::new().unwrap();
    run_sweep(stub_config(&dir), &mut NullObserver).unwrap();

    let logs = dir.path().join("logs");
    let mut names: Vec<String> = fs::read_dir(&logs)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "deferred-clustered-gpu_nlights=00000.json",
            "deferred-clustered-gpu_nlights=00025.json",
            "deferred-clustered-gpu_nlights=00050.json",
            "forward-clustered-gpu_nlights=00000.json",
            "forward-clustered-gpu_nlights=00025.json",
            "forward-clustered-gpu_nlights=00050.json",
        ]
    );

    let log: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(logs.join("forward-clustered-gpu_nlights=00025.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(log["lights"], 25);
    assert_eq!(log["pipeline"], "forward-clustered-gpu");
    assert_eq!(log["eval"], true);
}

#[test]
fn test_failing_renderer_does_not_stop_the_sweep() {
    let dir = TempDir::new().unwrap();
    let mut config = stub_config(&dir);
    config
        .environment
        .insert("STUB_RENDERER_EXIT_CODE".to_string(), "3".to_string());

    let summary = run_sweep(config, &mut NullObserver).unwrap();
    assert_eq!(summary.attempted, 6);
    assert_eq!(summary.failed, 6);
    assert_eq!(summary.succeeded, 0);

    let starts = trace_lines(&dir)
        .iter()
        .filter(|line| line.starts_with("start "))
        .count();
    assert_eq!(starts, 6);
}

#[test]
fn test_stop_on_failure_halts_after_first_failed_run() {
    let dir = TempDir::new().unwrap();
    let mut config = stub_config(&dir);
    config.stop_on_failure = true;
    config
        .environment
        .insert("STUB_RENDERER_EXIT_CODE".to_string(), "2".to_string());

    let err = run_sweep(config, &mut NullObserver).unwrap_err();
    match err {
        SweepError::RendererFailed { point, status } => {
            assert_eq!(point.lights, 0);
            assert_eq!(point.pipeline, "deferred-clustered-gpu");
            assert_eq!(status.code, Some(2));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        trace_lines(&dir),
        vec!["start 0 deferred-clustered-gpu", "end 0 deferred-clustered-gpu"]
    );
}

#[test]
fn test_unknown_pipeline_is_forwarded_verbatim() {
    let dir = TempDir::new().unwrap();
    let mut config = stub_config(&dir);
    config.lights = LightCounts::List(vec![10]);
    config.pipelines = vec!["not-a-real-pipeline".to_string()];

    let summary = run_sweep(config, &mut NullObserver).unwrap();
    assert_eq!(summary.succeeded, 1);
    assert!(dir
        .path()
        .join("logs")
        .join("not-a-real-pipeline_nlights=00010.json")
        .is_file());
}

#[test]
fn test_missing_executable_aborts_the_sweep() {
    let dir = TempDir::new().unwrap();
    let mut config = stub_config(&dir);
    config.executable = PathBuf::from("no-such-renderer");

    let err = run_sweep(config, &mut NullObserver).unwrap_err();
    match err {
        SweepError::Launch { program, .. } => {
            assert!(program.ends_with("no-such-renderer"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("trace.txt").exists());
}

#[test]
fn test_tuning_flags_reach_the_renderer() {
    let dir = TempDir::new().unwrap();
    let mut config = stub_config(&dir);
    config.lights = LightCounts::List(vec![100]);
    config.pipelines = vec!["forward-tiled-gpu".to_string()];
    config.tuning.tiles = Some([16, 8]);
    config.tuning.max_lights_per_tile = Some(64);

    run_sweep(config, &mut NullObserver).unwrap();

    let log: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(
            dir.path()
                .join("logs")
                .join("forward-tiled-gpu_nlights=00100.json"),
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(log["num_tiles"], serde_json::json!([16, 8]));
    assert_eq!(log["max_lights_per_tile"], 64);
    assert!(log.get("num_clusters_z").is_none());
}

#[test]
fn test_stub_rejects_unknown_flags() {
    let output = Command::new(STUB)
        .args(["--lights", "10", "--bogus"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "Args error");
}

// Linux filesystems accept arbitrary bytes in names; APFS does not.
#[cfg(target_os = "linux")]
#[test]
fn test_non_utf8_log_directory_receives_the_log() {
    use std::ffi::{OsStr, OsString};
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let log_directory = dir.path().join(OsStr::from_bytes(b"logs-\xff"));
    let mut config = stub_config(&dir);
    config.log_directory = log_directory.clone();
    config.lights = LightCounts::List(vec![25]);
    config.pipelines = vec!["clay".to_string()];

    let summary = run_sweep(config, &mut NullObserver).unwrap();
    assert_eq!(summary.succeeded, 1);

    let names: Vec<_> = fs::read_dir(&log_directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![OsString::from("clay_nlights=00025.json")]);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}
