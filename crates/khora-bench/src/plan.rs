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

//! Enumeration of sweep points.

use crate::config::SweepOrder;
use crate::error::ConfigError;
use crate::template::FilenameTemplate;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// One (light count, pipeline) combination to benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SweepPoint {
    pub lights: u32,
    pub pipeline: String,
}

impl SweepPoint {
    /// `log_directory` joined with the rendered template.
    pub fn log_file(&self, log_directory: &Path, template: &FilenameTemplate) -> PathBuf {
        log_directory.join(template.render(self))
    }
}

impl fmt::Display for SweepPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lights, self.pipeline)
    }
}

/// The ordered Cartesian product of light counts and pipelines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPlan {
    points: Vec<SweepPoint>,
}

impl SweepPlan {
    pub fn new(lights: &[u32], pipelines: &[String], order: SweepOrder) -> Self {
        let mut points = Vec::with_capacity(lights.len() * pipelines.len());
        match order {
            SweepOrder::PipelineMajor => {
                for pipeline in pipelines {
                    for &n in lights {
                        points.push(SweepPoint {
                            lights: n,
                            pipeline: pipeline.clone(),
                        });
                    }
                }
            }
            SweepOrder::LightsMajor => {
                for &n in lights {
                    for pipeline in pipelines {
                        points.push(SweepPoint {
                            lights: n,
                            pipeline: pipeline.clone(),
                        });
                    }
                }
            }
        }
        Self { points }
    }

    pub(crate) fn len(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SweepPoint> {
        self.points.iter()
    }

    /// Computes every log path and fails on the first collision.
    pub fn log_files(
        &self,
        log_directory: &Path,
        template: &FilenameTemplate,
    ) -> Result<Vec<PathBuf>, ConfigError> {
        let mut owners: HashMap<PathBuf, &SweepPoint> = HashMap::with_capacity(self.len());
        let mut paths = Vec::with_capacity(self.len());
        for point in &self.points {
            let path = point.log_file(log_directory, template);
            if let Some(first) = owners.insert(path.clone(), point) {
                return Err(ConfigError::LogPathCollision {
                    path,
                    first: first.clone(),
                    second: point.clone(),
                });
            }
            paths.push(path);
        }
        Ok(paths)
    }
}

impl<'a> IntoIterator for &'a SweepPlan {
    type Item = &'a SweepPoint;
    type IntoIter = std::slice::Iter<'a, SweepPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
