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

//! Pipeline identifiers understood by the renderer.
//!
//! The harness forwards pipeline names verbatim and never rejects an unknown
//! one. This table only drives warnings and the `pipelines` listing.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Light culling strategy paired with a shading path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownPipeline {
    None,
    Clay,
    DeferredNone,
    DeferredBoundingSphere,
    DeferredRasterSphere,
    DeferredTiledCpu,
    DeferredClusteredCpu,
    DeferredTiledGpu,
    DeferredClusteredGpu,
    ForwardNone,
    ForwardBoundingSphere,
    ForwardTiledCpu,
    ForwardClusteredCpu,
    ForwardTiledGpu,
    ForwardClusteredGpu,
}

impl KnownPipeline {
    pub const ALL: [KnownPipeline; 15] = [
        KnownPipeline::None,
        KnownPipeline::Clay,
        KnownPipeline::DeferredNone,
        KnownPipeline::DeferredBoundingSphere,
        KnownPipeline::DeferredRasterSphere,
        KnownPipeline::DeferredTiledCpu,
        KnownPipeline::DeferredClusteredCpu,
        KnownPipeline::DeferredTiledGpu,
        KnownPipeline::DeferredClusteredGpu,
        KnownPipeline::ForwardNone,
        KnownPipeline::ForwardBoundingSphere,
        KnownPipeline::ForwardTiledCpu,
        KnownPipeline::ForwardClusteredCpu,
        KnownPipeline::ForwardTiledGpu,
        KnownPipeline::ForwardClusteredGpu,
    ];

    /// The identifier passed to `--pipeline`.
    pub fn as_str(self) -> &'static str {
        match self {
            KnownPipeline::None => "none",
            KnownPipeline::Clay => "clay",
            KnownPipeline::DeferredNone => "deferred-none",
            KnownPipeline::DeferredBoundingSphere => "deferred-boundingsphere",
            KnownPipeline::DeferredRasterSphere => "deferred-rastersphere",
            KnownPipeline::DeferredTiledCpu => "deferred-tiled-cpu",
            KnownPipeline::DeferredClusteredCpu => "deferred-clustered-cpu",
            KnownPipeline::DeferredTiledGpu => "deferred-tiled-gpu",
            KnownPipeline::DeferredClusteredGpu => "deferred-clustered-gpu",
            KnownPipeline::ForwardNone => "forward-none",
            KnownPipeline::ForwardBoundingSphere => "forward-boundingsphere",
            KnownPipeline::ForwardTiledCpu => "forward-tiled-cpu",
            KnownPipeline::ForwardClusteredCpu => "forward-clustered-cpu",
            KnownPipeline::ForwardTiledGpu => "forward-tiled-gpu",
            KnownPipeline::ForwardClusteredGpu => "forward-clustered-gpu",
        }
    }

    /// Whether the pipeline consumes the tile / cluster tuning flags.
    pub fn uses_light_grid(self) -> bool {
        matches!(
            self,
            KnownPipeline::DeferredTiledCpu
                | KnownPipeline::DeferredClusteredCpu
                | KnownPipeline::DeferredTiledGpu
                | KnownPipeline::DeferredClusteredGpu
                | KnownPipeline::ForwardTiledCpu
                | KnownPipeline::ForwardClusteredCpu
                | KnownPipeline::ForwardTiledGpu
                | KnownPipeline::ForwardClusteredGpu
        )
    }

    /// Returns `true` if `name` is one of the identifiers in [`KnownPipeline::ALL`].
    pub fn is_known(name: &str) -> bool {
        name.parse::<KnownPipeline>().is_ok()
    }
}

impl fmt::Display for KnownPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not a known pipeline identifier.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown pipeline '{0}'")]
pub struct UnknownPipeline(pub String);

impl FromStr for KnownPipeline {
    type Err = UnknownPipeline;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KnownPipeline::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPipeline(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip_through_from_str() {
        for pipeline in KnownPipeline::ALL {
            assert_eq!(pipeline.as_str().parse::<KnownPipeline>(), Ok(pipeline));
        }
    }

    #[test]
    fn test_is_known() {
        assert!(KnownPipeline::is_known("deferred-clustered-gpu"));
        assert!(KnownPipeline::is_known("forward-clustered-gpu"));
        assert!(!KnownPipeline::is_known("forward-rastersphere"));
        assert!(!KnownPipeline::is_known(""));
    }

    #[test]
    fn test_unknown_identifier_error() {
        let err = "forward-rastersphere".parse::<KnownPipeline>().unwrap_err();
        assert_eq!(err, UnknownPipeline("forward-rastersphere".to_string()));
        assert_eq!(err.to_string(), "unknown pipeline 'forward-rastersphere'");
    }

    #[test]
    fn test_light_grid_pipelines() {
        assert!(KnownPipeline::ForwardClusteredGpu.uses_light_grid());
        assert!(!KnownPipeline::DeferredBoundingSphere.uses_light_grid());
        assert!(!KnownPipeline::Clay.uses_light_grid());
    }
}
