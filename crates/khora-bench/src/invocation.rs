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

//! Renderer command lines.

use crate::config::RendererTuning;
use crate::plan::SweepPoint;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Flag selecting the renderer's headless benchmark mode.
pub const EVAL_FLAG: &str = "--eval";

/// A fully resolved renderer launch for one sweep point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub point: SweepPoint,
    pub program: PathBuf,
    /// Arguments after the program, one argv entry each. Paths are kept as
    /// the OS sees them, so non-UTF-8 directories reach the renderer intact.
    pub args: Vec<OsString>,
    pub working_directory: PathBuf,
    pub environment: BTreeMap<String, String>,
    pub log_file: PathBuf,
}

impl Invocation {
    /// Builds `<program> --lights N --pipeline NAME --eval --log-file PATH [tuning...]`.
    pub fn new(
        point: SweepPoint,
        program: PathBuf,
        working_directory: PathBuf,
        log_file: PathBuf,
        tuning: &RendererTuning,
        environment: BTreeMap<String, String>,
    ) -> Self {
        let mut args: Vec<OsString> = vec![
            "--lights".into(),
            point.lights.to_string().into(),
            "--pipeline".into(),
            point.pipeline.as_str().into(),
            EVAL_FLAG.into(),
            "--log-file".into(),
            log_file.as_os_str().to_owned(),
        ];
        args.extend(tuning.args().into_iter().map(OsString::from));

        Self {
            point,
            program,
            args,
            working_directory,
            environment,
            log_file,
        }
    }

    /// Shell-style rendering for logs: program and log path are quoted.
    ///
    /// The process itself is spawned without a shell, so this string is only
    /// ever displayed.
    pub fn command_line(&self) -> String {
        let mut line = quote(&self.program.display().to_string());
        let mut previous = None;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            line.push(' ');
            if previous.as_deref() == Some("--log-file") {
                line.push_str(&quote(&arg));
            } else {
                line.push_str(&arg);
            }
            previous = Some(arg);
        }
        line
    }
}

fn quote(text: &str) -> String {
    format!("\"{text}\"")
}
