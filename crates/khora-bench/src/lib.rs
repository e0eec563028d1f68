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

//! Light-count sweep harness for the Khora renderer.
//!
//! The harness runs an external renderer once for every combination of light
//! count and pipeline name, strictly one after another, passing
//! `--lights N --pipeline NAME --eval --log-file PATH` each time. The renderer
//! owns the log files it writes; the harness only picks unique paths for them.
//!
//! ```no_run
//! use khora_bench::{run_sweep, NullObserver, SweepConfig};
//!
//! let config = SweepConfig::load_or_default("Sweep.toml".as_ref())?;
//! let summary = run_sweep(config, &mut NullObserver)?;
//! println!("{} of {} runs succeeded", summary.succeeded, summary.attempted);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod invocation;
pub mod launcher;
pub mod pipeline;
pub mod plan;
pub mod runner;
pub mod template;

pub use config::{LightCounts, RendererTuning, SweepConfig, SweepOrder};
pub use error::{ConfigError, SweepError, SweepResult, TemplateError};
pub use invocation::Invocation;
pub use launcher::{DryRunLauncher, ExitReport, Launcher, ProcessLauncher};
pub use pipeline::KnownPipeline;
pub use plan::{SweepPlan, SweepPoint};
pub use runner::{run_sweep, NullObserver, SweepObserver, SweepRunner, SweepSummary};
pub use template::FilenameTemplate;
