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

//! Log filename templates.
//!
//! A template is plain text with `{pipeline}`, `{lights}` and `{lights:0N}`
//! placeholders. `{{` and `}}` produce literal braces.

use crate::error::TemplateError;
use crate::plan::SweepPoint;
use std::fmt::Write;

/// Default filename: `<pipeline>_nlights=<5-digit count>.json`.
pub const DEFAULT_LOG_FILENAME_TEMPLATE: &str = "{pipeline}_nlights={lights:05}.json";

/// Widest zero padding accepted for `{lights:0N}`.
pub const MAX_LIGHTS_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Pipeline,
    /// Light count, left-padded with zeros to `width` digits.
    Lights { width: usize },
}

/// A parsed log filename template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    segments: Vec<Segment>,
}

impl FilenameTemplate {
    /// Parses `source`, requiring both a pipeline and a lights placeholder.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(TemplateError::UnmatchedClose(pos)),
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        body.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(pos));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&body)?);
                }
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.iter().any(|s| matches!(s, Segment::Pipeline)) {
            return Err(TemplateError::MissingPlaceholder("pipeline"));
        }
        if !segments.iter().any(|s| matches!(s, Segment::Lights { .. })) {
            return Err(TemplateError::MissingPlaceholder("lights"));
        }

        Ok(Self { segments })
    }

    /// Renders the filename for one sweep point.
    pub fn render(&self, point: &SweepPoint) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Pipeline => out.push_str(&point.pipeline),
                // Writing into a String cannot fail.
                Segment::Lights { width } => {
                    let _ = write!(out, "{:0width$}", point.lights, width = *width);
                }
            }
        }
        out
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::Pipeline,
                Segment::Literal("_nlights=".to_string()),
                Segment::Lights { width: 5 },
                Segment::Literal(".json".to_string()),
            ],
        }
    }
}

fn parse_placeholder(body: &str) -> Result<Segment, TemplateError> {
    let (name, spec) = match body.split_once(':') {
        Some((name, spec)) => (name.trim(), Some(spec.trim())),
        None => (body.trim(), None),
    };

    match (name, spec) {
        ("pipeline", None) => Ok(Segment::Pipeline),
        ("lights", None) => Ok(Segment::Lights { width: 0 }),
        ("lights", Some(spec)) => {
            let width = spec
                .strip_prefix('0')
                .and_then(|digits| digits.parse::<usize>().ok())
                .filter(|&width| width <= MAX_LIGHTS_WIDTH)
                .ok_or_else(|| TemplateError::BadFormatSpec {
                    name: name.to_string(),
                    spec: spec.to_string(),
                })?;
            Ok(Segment::Lights { width })
        }
        ("pipeline", Some(spec)) => Err(TemplateError::BadFormatSpec {
            name: name.to_string(),
            spec: spec.to_string(),
        }),
        _ => Err(TemplateError::UnknownPlaceholder(body.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lights: u32, pipeline: &str) -> SweepPoint {
        SweepPoint {
            lights,
            pipeline: pipeline.to_string(),
        }
    }

    #[test]
    fn test_default_template_matches_parsed_default() {
        let parsed = FilenameTemplate::parse(DEFAULT_LOG_FILENAME_TEMPLATE).unwrap();
        assert_eq!(parsed, FilenameTemplate::default());
    }

    #[test]
    fn test_render_zero_pads_light_count() {
        let template = FilenameTemplate::default();
        assert_eq!(
            template.render(&point(25, "forward-clustered-gpu")),
            "forward-clustered-gpu_nlights=00025.json"
        );
        assert_eq!(
            template.render(&point(0, "deferred-clustered-gpu")),
            "deferred-clustered-gpu_nlights=00000.json"
        );
    }

    #[test]
    fn test_render_wider_than_padding_is_not_truncated() {
        let template = FilenameTemplate::default();
        assert_eq!(
            template.render(&point(123_456, "clay")),
            "clay_nlights=123456.json"
        );
    }

    #[test]
    fn test_unpadded_lights_and_escaped_braces() {
        let template = FilenameTemplate::parse("{{{pipeline}}}-{lights}.log").unwrap();
        assert_eq!(template.render(&point(7, "none")), "{none}-7.log");
    }

    #[test]
    fn test_missing_placeholders_are_rejected() {
        assert_eq!(
            FilenameTemplate::parse("run_{lights:05}.json"),
            Err(TemplateError::MissingPlaceholder("pipeline"))
        );
        assert_eq!(
            FilenameTemplate::parse("{pipeline}.json"),
            Err(TemplateError::MissingPlaceholder("lights"))
        );
    }

    #[test]
    fn test_malformed_templates_are_rejected() {
        assert_eq!(
            FilenameTemplate::parse("{pipeline_{lights}"),
            Err(TemplateError::UnknownPlaceholder("pipeline_{lights".to_string()))
        );
        assert_eq!(
            FilenameTemplate::parse("{pipeline}_{lights"),
            Err(TemplateError::Unclosed(11))
        );
        assert_eq!(
            FilenameTemplate::parse("{pipeline}}_{lights}"),
            Err(TemplateError::UnmatchedClose(10))
        );
        assert!(matches!(
            FilenameTemplate::parse("{pipeline}_{lights:x5}"),
            Err(TemplateError::BadFormatSpec { .. })
        ));
        assert!(matches!(
            FilenameTemplate::parse("{pipeline:05}_{lights}"),
            Err(TemplateError::BadFormatSpec { .. })
        ));
    }

    #[test]
    fn test_padding_width_is_bounded() {
        let widest = FilenameTemplate::parse("{pipeline}_{lights:020}.json").unwrap();
        assert_eq!(
            widest.render(&point(7, "clay")),
            format!("clay_{}7.json", "0".repeat(19))
        );

        assert_eq!(
            FilenameTemplate::parse("{pipeline}_{lights:021}.json"),
            Err(TemplateError::BadFormatSpec {
                name: "lights".to_string(),
                spec: "021".to_string(),
            })
        );
        assert!(matches!(
            FilenameTemplate::parse("{pipeline}_{lights:070000}.json"),
            Err(TemplateError::BadFormatSpec { .. })
        ));
    }
}
