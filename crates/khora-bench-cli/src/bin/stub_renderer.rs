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

//! Stand-in for the renderer, used by the cross-process tests.
//!
//! Accepts the renderer's flags, writes a small JSON log to `--log-file` and
//! exits with `STUB_RENDERER_EXIT_CODE` (default 0).
//!
//! When `STUB_RENDERER_TRACE` names a file, each run appends a `start` and an
//! `end` line to it. A `<trace>.inflight` marker is held for the duration of
//! the run; finding it already present means two runs overlapped, which is
//! recorded as an `overlap` line.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "stub-renderer")]
struct StubArgs {
    #[arg(long, default_value_t = 100)]
    lights: usize,

    #[arg(long, default_value = "deferred-clustered-gpu")]
    pipeline: String,

    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    #[arg(long = "numTiles", num_args = 2, value_names = ["X", "Y"])]
    num_tiles: Option<Vec<i32>>,

    #[arg(long = "numClustersZ")]
    num_clusters_z: Option<i32>,

    #[arg(long = "maxLightsPerTile")]
    max_lights_per_tile: Option<i32>,

    /// Headless benchmark mode (the default).
    #[arg(long)]
    eval: bool,

    #[arg(short = 'I', long)]
    interactive: bool,
}

#[derive(Debug, Serialize)]
struct StubLog {
    lights: usize,
    pipeline: String,
    eval: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_tiles: Option<Vec<i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_clusters_z: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_lights_per_tile: Option<i32>,
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open trace '{}'", path.display()))?;
    writeln!(file, "{line}")?;
    Ok(())
}

fn run() -> Result<i32> {
    let parsed = StubArgs::try_parse().map_err(|_| anyhow!("Args error"))?;

    let trace = std::env::var_os("STUB_RENDERER_TRACE").map(PathBuf::from);
    let marker = trace.as_ref().map(|t| {
        let mut name = t.as_os_str().to_owned();
        name.push(".inflight");
        PathBuf::from(name)
    });
    let id = format!("{} {}", parsed.lights, parsed.pipeline);

    if let (Some(trace), Some(marker)) = (&trace, &marker) {
        if OpenOptions::new().write(true).create_new(true).open(marker).is_err() {
            append_line(trace, &format!("overlap {id}"))?;
        }
        append_line(trace, &format!("start {id}"))?;
    }

    // Long enough for an overlapping launch to find the marker.
    thread::sleep(Duration::from_millis(20));

    if let Some(log_file) = &parsed.log_file {
        let log = StubLog {
            lights: parsed.lights,
            pipeline: parsed.pipeline.clone(),
            eval: parsed.eval || !parsed.interactive,
            num_tiles: parsed.num_tiles.clone(),
            num_clusters_z: parsed.num_clusters_z,
            max_lights_per_tile: parsed.max_lights_per_tile,
        };
        fs::write(log_file, serde_json::to_string_pretty(&log)?)
            .with_context(|| format!("Failed to write log '{}'", log_file.display()))?;
    }

    if let (Some(trace), Some(marker)) = (&trace, &marker) {
        append_line(trace, &format!("end {id}"))?;
        fs::remove_file(marker).ok();
    }

    let code = match std::env::var("STUB_RENDERER_EXIT_CODE") {
        Ok(code) => code.parse().context("Invalid STUB_RENDERER_EXIT_CODE")?,
        Err(_) => 0,
    };
    Ok(code)
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            println!("{e:#}");
            std::process::exit(1);
        }
    }
}
