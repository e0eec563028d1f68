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

// Khora Bench
// Runs the renderer in evaluation mode across light counts and pipelines.
// Run with: khora-bench run [--config Sweep.toml]

mod cli;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, SweepArgs};
use khora_bench::{DryRunLauncher, KnownPipeline, ProcessLauncher, SweepRunner};
use report::*;

fn main() {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run { sweep, dry_run } => run(&sweep, dry_run),
        Command::Plan { sweep } => plan(&sweep),
        Command::Pipelines => {
            pipelines();
            Ok(())
        }
    };

    if let Err(e) = result {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn build_runner(sweep: &SweepArgs) -> Result<SweepRunner> {
    let config = sweep.load_config()?;
    SweepRunner::new(config).context("Invalid sweep configuration")
}

fn run(sweep: &SweepArgs, dry_run: bool) -> Result<()> {
    let runner = build_runner(sweep)?;
    let mut reporter = TerminalReporter::new(dry_run);

    let summary = if dry_run {
        runner.run(&mut DryRunLauncher, &mut reporter)
    } else {
        runner.run(&mut ProcessLauncher::new(), &mut reporter)
    }
    .context("Sweep aborted")?;

    log::debug!("Sweep summary: {:?}", summary);
    Ok(())
}

fn plan(sweep: &SweepArgs) -> Result<()> {
    let runner = build_runner(sweep)?;
    let total = runner.plan().len();
    let width = total.to_string().len();
    for (index, invocation) in runner.plan().iter().enumerate() {
        println!("[{:>width$}/{}] {}", index + 1, total, invocation.command_line());
    }
    Ok(())
}

fn pipelines() {
    print_task_start("Known Pipelines", LIGHT, CYAN);
    for pipeline in KnownPipeline::ALL {
        let grid = if pipeline.uses_light_grid() {
            " (light grid)"
        } else {
            ""
        };
        println!("  {}{}{}{}", BOLD, pipeline, RESET, grid);
    }
}
