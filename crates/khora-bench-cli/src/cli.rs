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

//! Command-line definition and configuration overrides.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use khora_bench::{LightCounts, SweepConfig, SweepOrder};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "khora-bench",
    version,
    about = "Sweeps the Khora renderer over light counts and pipelines"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Launch the renderer once per sweep point, one run at a time.
    Run {
        #[command(flatten)]
        sweep: SweepArgs,
        /// Print every command without launching anything.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the command lines `run` would execute.
    Plan {
        #[command(flatten)]
        sweep: SweepArgs,
    },
    /// List the pipeline identifiers the renderer is known to accept.
    Pipelines,
}

#[derive(Args, Debug, Clone)]
pub struct SweepArgs {
    /// Sweep configuration file. Defaults apply when it does not exist.
    #[arg(long, default_value = "Sweep.toml")]
    pub config: PathBuf,

    /// Base directory for relative paths and the renderer's working directory.
    #[arg(long)]
    pub working_dir: Option<PathBuf>,

    /// Renderer executable.
    #[arg(long)]
    pub executable: Option<PathBuf>,

    /// Directory the renderer writes its logs to.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log filename template, e.g. "{pipeline}_nlights={lights:05}.json".
    #[arg(long)]
    pub template: Option<String>,

    /// Explicit light counts, comma separated.
    #[arg(long, value_delimiter = ',', conflicts_with = "lights_range")]
    pub lights: Option<Vec<u32>>,

    /// Light count range as START:STOP:STEP, stop inclusive.
    #[arg(long, value_parser = parse_light_range)]
    pub lights_range: Option<LightCounts>,

    /// Pipeline to sweep; repeat to sweep several. Replaces the configured list.
    #[arg(long = "pipeline")]
    pub pipelines: Vec<String>,

    /// Which axis forms the outer loop.
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Abort on the first renderer failure instead of carrying on.
    #[arg(long)]
    pub stop_on_failure: bool,

    /// Create the log directory if it is missing.
    #[arg(long)]
    pub create_log_dir: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    PipelineMajor,
    LightsMajor,
}

impl From<OrderArg> for SweepOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::PipelineMajor => SweepOrder::PipelineMajor,
            OrderArg::LightsMajor => SweepOrder::LightsMajor,
        }
    }
}

impl SweepArgs {
    /// Loads the configuration file and applies the command-line overrides.
    pub fn load_config(&self) -> Result<SweepConfig> {
        let config = SweepConfig::load_or_default(&self.config).with_context(|| {
            format!(
                "Failed to load sweep configuration from '{}'",
                self.config.display()
            )
        })?;
        Ok(self.apply(config))
    }

    /// Overrides every field that was given on the command line.
    pub fn apply(&self, mut config: SweepConfig) -> SweepConfig {
        if let Some(dir) = &self.working_dir {
            config.working_directory = dir.clone();
        }
        if let Some(exe) = &self.executable {
            config.executable = exe.clone();
        }
        if let Some(dir) = &self.log_dir {
            config.log_directory = dir.clone();
        }
        if let Some(template) = &self.template {
            config.log_filename_template = template.clone();
        }
        if let Some(lights) = &self.lights {
            config.lights = LightCounts::List(lights.clone());
        }
        if let Some(range) = &self.lights_range {
            config.lights = range.clone();
        }
        if !self.pipelines.is_empty() {
            config.pipelines = self.pipelines.clone();
        }
        if let Some(order) = self.order {
            config.order = order.into();
        }
        config.stop_on_failure |= self.stop_on_failure;
        config.create_log_directory |= self.create_log_dir;
        config
    }
}

fn parse_light_range(value: &str) -> Result<LightCounts> {
    let parts: Vec<&str> = value.split(':').collect();
    let [start, stop, step] = parts.as_slice() else {
        bail!("expected START:STOP:STEP, got '{value}'");
    };
    let parse = |name: &str, text: &str| {
        text.trim()
            .parse::<u32>()
            .with_context(|| format!("invalid {name} '{text}'"))
    };
    Ok(LightCounts::Range {
        start: parse("start", *start)?,
        stop: parse("stop", *stop)?,
        step: parse("step", *step)?,
    })
}
