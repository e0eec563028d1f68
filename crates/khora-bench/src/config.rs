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

//! Sweep configuration, usually loaded from a `Sweep.toml` file.

use crate::error::ConfigError;
use crate::template::{FilenameTemplate, DEFAULT_LOG_FILENAME_TEMPLATE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// The light counts to sweep, either listed or generated from a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LightCounts {
    List(Vec<u32>),
    /// `start, start + step, ...` up to and including `stop`.
    Range { start: u32, stop: u32, step: u32 },
}

impl LightCounts {
    /// Expands the counts in sweep order.
    ///
    /// An invalid range yields an empty list; [`SweepConfig::validate`] reports it.
    pub fn values(&self) -> Vec<u32> {
        match *self {
            LightCounts::List(ref values) => values.clone(),
            LightCounts::Range { start, stop, step } => {
                if step == 0 || start > stop {
                    return Vec::new();
                }
                (start..=stop).step_by(step as usize).collect()
            }
        }
    }
}

impl Default for LightCounts {
    fn default() -> Self {
        LightCounts::Range {
            start: 0,
            stop: 2000,
            step: 25,
        }
    }
}

/// Which axis forms the outer loop of the sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SweepOrder {
    /// Every light count for the first pipeline, then the next pipeline.
    #[default]
    PipelineMajor,
    /// Every pipeline for the first light count, then the next count.
    LightsMajor,
}

/// Optional light-grid flags forwarded to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererTuning {
    /// `--numTiles X Y`
    pub tiles: Option<[u32; 2]>,
    /// `--numClustersZ Z`
    pub clusters_z: Option<u32>,
    /// `--maxLightsPerTile M`
    pub max_lights_per_tile: Option<u32>,
}

impl RendererTuning {
    pub fn is_empty(&self) -> bool {
        self.tiles.is_none() && self.clusters_z.is_none() && self.max_lights_per_tile.is_none()
    }

    /// Renders the flags in the order the renderer documents them.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some([x, y]) = self.tiles {
            args.extend(["--numTiles".to_string(), x.to_string(), y.to_string()]);
        }
        if let Some(z) = self.clusters_z {
            args.extend(["--numClustersZ".to_string(), z.to_string()]);
        }
        if let Some(max) = self.max_lights_per_tile {
            args.extend(["--maxLightsPerTile".to_string(), max.to_string()]);
        }
        args
    }
}

/// Everything a sweep needs, fixed for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Base directory for relative paths; also the renderer's working directory.
    pub working_directory: PathBuf,
    /// Renderer executable, absolute or relative to `working_directory`.
    pub executable: PathBuf,
    /// Where the renderer writes its per-run logs.
    pub log_directory: PathBuf,
    /// See [`FilenameTemplate`].
    pub log_filename_template: String,
    pub lights: LightCounts,
    pub pipelines: Vec<String>,
    pub order: SweepOrder,
    /// Abort the sweep on the first non-zero renderer exit.
    pub stop_on_failure: bool,
    /// Create `log_directory` instead of failing when it is missing.
    pub create_log_directory: bool,
    pub tuning: RendererTuning,
    /// Extra environment variables for every renderer process.
    pub environment: BTreeMap<String, String>,
}

impl Default for SweepConfig {
    /// Clustered forward vs. deferred, 0 to 2000 lights in steps of 25.
    fn default() -> Self {
        Self {
            working_directory: PathBuf::from("./render_engine"),
            executable: PathBuf::from("../x64/Release/render_engine.exe"),
            log_directory: PathBuf::from("logs"),
            log_filename_template: DEFAULT_LOG_FILENAME_TEMPLATE.to_string(),
            lights: LightCounts::default(),
            pipelines: vec![
                "deferred-clustered-gpu".to_string(),
                "forward-clustered-gpu".to_string(),
            ],
            order: SweepOrder::default(),
            stop_on_failure: false,
            create_log_directory: false,
            tuning: RendererTuning::default(),
            environment: BTreeMap::new(),
        }
    }
}

impl SweepConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            log::info!("Loading sweep configuration from '{}'", path.display());
            Self::load(path)
        } else {
            log::info!(
                "No '{}' found. Using default sweep configuration.",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Checks the values that do not depend on the filesystem.
    ///
    /// Returns the parsed filename template and the expanded light counts.
    pub fn validate(&self) -> Result<(FilenameTemplate, Vec<u32>), ConfigError> {
        if let LightCounts::Range { start, stop, step } = self.lights {
            if step == 0 {
                return Err(ConfigError::ZeroStep);
            }
            if start > stop {
                return Err(ConfigError::InvertedRange { start, stop });
            }
        }

        let lights = self.lights.values();
        if lights.is_empty() {
            return Err(ConfigError::EmptyLightCounts);
        }
        let mut seen = HashSet::new();
        if let Some(&dup) = lights.iter().find(|n| !seen.insert(**n)) {
            return Err(ConfigError::DuplicateLightCount(dup));
        }

        if self.pipelines.is_empty() {
            return Err(ConfigError::EmptyPipelines);
        }
        let mut seen = HashSet::new();
        for name in &self.pipelines {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyPipelineName);
            }
            if name.contains(['/', '\\']) {
                return Err(ConfigError::InvalidPipelineName(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicatePipeline(name.clone()));
            }
        }

        let template = FilenameTemplate::parse(&self.log_filename_template)?;
        Ok((template, lights))
    }

    /// `path` if absolute, otherwise `path` under the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.working_directory.join(path)
        }
    }
}
