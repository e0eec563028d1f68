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

//! Error types for the sweep harness.

use crate::launcher::ExitReport;
use crate::plan::SweepPoint;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing a log filename template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{` was opened but never closed.
    #[error("unclosed placeholder starting at byte {0}")]
    Unclosed(usize),
    /// A lone `}` appeared outside of a placeholder.
    #[error("unmatched '}}' at byte {0}")]
    UnmatchedClose(usize),
    /// The placeholder name is not one of `pipeline` or `lights`.
    #[error("unknown placeholder '{{{0}}}'")]
    UnknownPlaceholder(String),
    /// The format spec after `:` is not a zero-padded width such as `05`, or is
    /// wider than [`crate::template::MAX_LIGHTS_WIDTH`].
    #[error("unsupported format spec '{spec}' for placeholder '{name}'")]
    BadFormatSpec { name: String, spec: String },
    /// The template lacks the placeholder needed to keep log paths distinct.
    #[error("template must contain a '{{{0}}}' placeholder")]
    MissingPlaceholder(&'static str),
}

/// Errors detected before the first renderer is launched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no light counts configured")]
    EmptyLightCounts,

    #[error("no pipelines configured")]
    EmptyPipelines,

    #[error("light count {0} appears more than once")]
    DuplicateLightCount(u32),

    #[error("pipeline '{0}' appears more than once")]
    DuplicatePipeline(String),

    #[error("pipeline names must not be empty")]
    EmptyPipelineName,

    #[error("pipeline name '{0}' must not contain a path separator")]
    InvalidPipelineName(String),

    #[error("light range step must be greater than zero")]
    ZeroStep,

    #[error("light range start {start} is greater than stop {stop}")]
    InvertedRange { start: u32, stop: u32 },

    #[error("invalid log filename template: {0}")]
    Template(#[from] TemplateError),

    #[error("{kind} '{}' does not exist", .path.display())]
    MissingDirectory { kind: &'static str, path: PathBuf },

    #[error("sweep points {first} and {second} both write to '{}'", .path.display())]
    LogPathCollision {
        path: PathBuf,
        first: SweepPoint,
        second: SweepPoint,
    },

    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sweep configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors that abort a sweep.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The operating system refused to start the renderer.
    #[error("failed to launch '{}': {source}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only raised when `stop_on_failure` is set.
    #[error("renderer {status} at sweep point {point}")]
    RendererFailed { point: SweepPoint, status: ExitReport },
}

/// Result type alias for sweep operations.
pub type SweepResult<T> = Result<T, SweepError>;
