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

//! Launching the renderer.
//!
//! The [`Launcher`] trait is the seam between the sweep loop and the operating
//! system. Implementations must block until the launched run has finished.

use crate::error::{SweepError, SweepResult};
use crate::invocation::Invocation;
use std::fmt;
use std::process::{Command, ExitStatus};

/// How a renderer process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitReport {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl ExitReport {
    pub const SUCCESS: ExitReport = ExitReport { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitReport {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for ExitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exited with code {code}"),
            None => f.write_str("was terminated by a signal"),
        }
    }
}

/// Runs one invocation to completion.
pub trait Launcher {
    /// Starts the process and waits for it to exit.
    ///
    /// Returns `Err` only when the process could not be started at all.
    fn launch(&mut self, invocation: &Invocation) -> SweepResult<ExitReport>;
}

/// Spawns the renderer as a child process with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .current_dir(&invocation.working_directory)
            .envs(&invocation.environment);
        command
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&mut self, invocation: &Invocation) -> SweepResult<ExitReport> {
        let status = Self::command(invocation)
            .status()
            .map_err(|source| SweepError::Launch {
                program: invocation.program.clone(),
                source,
            })?;
        Ok(status.into())
    }
}

/// Launches nothing and reports success for every invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunLauncher;

impl Launcher for DryRunLauncher {
    fn launch(&mut self, invocation: &Invocation) -> SweepResult<ExitReport> {
        log::debug!("Dry run: skipping launch of {}", invocation.point);
        Ok(ExitReport::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererTuning;
    use crate::plan::SweepPoint;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn invocation(program: PathBuf) -> Invocation {
        Invocation::new(
            SweepPoint {
                lights: 0,
                pipeline: "clay".to_string(),
            },
            program,
            std::env::temp_dir(),
            std::env::temp_dir().join("clay_nlights=00000.json"),
            &RendererTuning::default(),
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_exit_report_display_and_success() {
        assert!(ExitReport::SUCCESS.success());
        assert!(!ExitReport::from_code(3).success());
        assert!(!ExitReport { code: None }.success());
        assert_eq!(ExitReport::from_code(3).to_string(), "exited with code 3");
        assert_eq!(
            ExitReport { code: None }.to_string(),
            "was terminated by a signal"
        );
    }

    #[test]
    fn test_missing_executable_is_a_launch_error() {
        let program = std::env::temp_dir().join("khora-bench-no-such-renderer");
        let err = ProcessLauncher::new()
            .launch(&invocation(program.clone()))
            .unwrap_err();
        match err {
            SweepError::Launch { program: p, .. } => assert_eq!(p, program),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dry_run_reports_success() {
        let report = DryRunLauncher
            .launch(&invocation(PathBuf::from("missing")))
            .unwrap();
        assert_eq!(report, ExitReport::SUCCESS);
    }
}
