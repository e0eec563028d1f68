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

//! The sweep loop.
//!
//! A [`SweepRunner`] is built from a validated [`SweepConfig`] and resolves
//! every [`Invocation`] up front. [`SweepRunner::run`] then launches them one
//! at a time, waiting for each renderer to exit before starting the next.

use crate::config::SweepConfig;
use crate::error::{ConfigError, SweepError, SweepResult};
use crate::invocation::Invocation;
use crate::launcher::{ExitReport, Launcher, ProcessLauncher};
use crate::pipeline::KnownPipeline;
use crate::plan::SweepPlan;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Counters for a finished sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed: Duration,
}

/// Receives progress events from [`SweepRunner::run`].
///
/// `index` is zero-based; `total` is the number of sweep points.
pub trait SweepObserver {
    fn on_sweep_start(&mut self, _total: usize) {}

    /// Called with the invocation immediately before it is launched.
    fn before_launch(&mut self, _index: usize, _total: usize, _invocation: &Invocation) {}

    fn after_exit(
        &mut self,
        _index: usize,
        _total: usize,
        _invocation: &Invocation,
        _exit: ExitReport,
        _elapsed: Duration,
    ) {
    }

    fn on_sweep_end(&mut self, _summary: &SweepSummary) {}
}

/// An observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SweepObserver for NullObserver {}

/// Drives one sweep.
#[derive(Debug, Clone)]
pub struct SweepRunner {
    log_directory: PathBuf,
    create_log_directory: bool,
    stop_on_failure: bool,
    invocations: Vec<Invocation>,
}

impl SweepRunner {
    /// Validates `config` and resolves every invocation.
    ///
    /// The working directory must exist. The log directory must exist too,
    /// unless `create_log_directory` is set, in which case [`SweepRunner::run`]
    /// creates it.
    pub fn new(mut config: SweepConfig) -> Result<Self, ConfigError> {
        let (template, lights) = config.validate()?;

        if !config.working_directory.is_dir() {
            return Err(ConfigError::MissingDirectory {
                kind: "working directory",
                path: config.working_directory,
            });
        }
        config.working_directory = std::path::absolute(&config.working_directory).map_err(
            |source| ConfigError::Io {
                path: config.working_directory.clone(),
                source,
            },
        )?;
        let working_directory = config.working_directory.clone();
        let program = config.resolve(&config.executable);
        let log_directory = config.resolve(&config.log_directory);

        if !config.create_log_directory && !log_directory.is_dir() {
            return Err(ConfigError::MissingDirectory {
                kind: "log directory",
                path: log_directory,
            });
        }

        for name in &config.pipelines {
            if !KnownPipeline::is_known(name) {
                log::warn!(
                    "Pipeline '{name}' is not a known renderer pipeline; forwarding it as is"
                );
            } else if !config.tuning.is_empty()
                && name
                    .parse::<KnownPipeline>()
                    .is_ok_and(|p| !p.uses_light_grid())
            {
                log::debug!("Pipeline '{name}' ignores the light-grid tuning flags");
            }
        }

        let plan = SweepPlan::new(&lights, &config.pipelines, config.order);
        let log_files = plan.log_files(&log_directory, &template)?;

        let invocations = plan
            .iter()
            .zip(log_files)
            .map(|(point, log_file)| {
                Invocation::new(
                    point.clone(),
                    program.clone(),
                    working_directory.clone(),
                    log_file,
                    &config.tuning,
                    config.environment.clone(),
                )
            })
            .collect();

        log::debug!(
            "Resolved {} sweep points ({} light counts x {} pipelines, {:?})",
            plan.len(),
            lights.len(),
            config.pipelines.len(),
            config.order
        );

        Ok(Self {
            log_directory,
            create_log_directory: config.create_log_directory,
            stop_on_failure: config.stop_on_failure,
            invocations,
        })
    }

    /// Every invocation in launch order.
    pub fn plan(&self) -> &[Invocation] {
        &self.invocations
    }

    pub fn log_directory(&self) -> &Path {
        &self.log_directory
    }

    /// Launches every invocation in order, one at a time.
    ///
    /// A launch failure aborts the sweep. A non-zero renderer exit is counted
    /// and the sweep continues, unless `stop_on_failure` is set.
    pub fn run(
        &self,
        launcher: &mut impl Launcher,
        observer: &mut impl SweepObserver,
    ) -> SweepResult<SweepSummary> {
        if self.create_log_directory && !self.log_directory.is_dir() {
            log::info!("Creating log directory '{}'", self.log_directory.display());
            fs::create_dir_all(&self.log_directory).map_err(|source| ConfigError::Io {
                path: self.log_directory.clone(),
                source,
            })?;
        }

        let total = self.invocations.len();
        let started = Instant::now();
        let mut summary = SweepSummary::default();

        log::info!("Starting sweep of {total} renderer runs");
        observer.on_sweep_start(total);

        for (index, invocation) in self.invocations.iter().enumerate() {
            log::info!("{}", invocation.command_line());
            observer.before_launch(index, total, invocation);

            let run_started = Instant::now();
            let exit = launcher.launch(invocation)?;
            let elapsed = run_started.elapsed();

            summary.attempted += 1;
            observer.after_exit(index, total, invocation, exit, elapsed);

            if exit.success() {
                summary.succeeded += 1;
                continue;
            }

            summary.failed += 1;
            log::warn!("Renderer {exit} at sweep point {}", invocation.point);
            if self.stop_on_failure {
                summary.elapsed = started.elapsed();
                observer.on_sweep_end(&summary);
                return Err(SweepError::RendererFailed {
                    point: invocation.point.clone(),
                    status: exit,
                });
            }
        }

        summary.elapsed = started.elapsed();
        log::info!(
            "Sweep finished: {}/{} runs succeeded in {:.2}s",
            summary.succeeded,
            summary.attempted,
            summary.elapsed.as_secs_f64()
        );
        observer.on_sweep_end(&summary);
        Ok(summary)
    }
}

/// Runs the whole sweep described by `config` against the real renderer.
pub fn run_sweep(
    config: SweepConfig,
    observer: &mut impl SweepObserver,
) -> SweepResult<SweepSummary> {
    let runner = SweepRunner::new(config)?;
    runner.run(&mut ProcessLauncher::new(), observer)
}
