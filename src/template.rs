//! Shader sources and the fragment template model.
//!
//! A [`FragmentTemplate`] is an ordered list of literal text and named slots.
//! Assembly always starts from the template itself, so rebuilding with the
//! same inputs produces the same source and never stacks declarations.

use crate::error::RenderError;

/// Fixed vertex stage: passes the full-screen quad straight through.
pub const VERTEX_SHADER: &str = r"#version 300 es
in vec4 a_position;

void main() {
    gl_Position = a_position;
}
";

/// Built-in fragment template. The marker lines become slots.
pub const FRAGMENT_TEMPLATE: &str = r"#version 300 es
precision highp float;

uniform vec2 iResolution;
uniform vec2 iMouse;
uniform float iTime;

out vec4 outColor;

// insert-variables

// insert-main-image

void main() {
    mainImage(outColor, gl_FragCoord.xy);
}
";

/// Used when the host supplies no `mainImage` of its own.
pub const DEFAULT_MAIN_IMAGE: &str = r"void mainImage( out vec4 fragColor, in vec2 fragCoord )
{
    vec2 uv = fragCoord.xy / iResolution.xy;
    fragColor = vec4(uv, 0.5 + 0.5 * sin(iTime), iMouse.x);
}
";

const VARIABLES_MARKER: &str = "insert-variables";
const MAIN_IMAGE_MARKER: &str = "insert-main-image";
const LEGACY_MAIN_IMAGE_MARKER: &str = "insert-here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Parameter-derived declarations, one per line.
    Variables,
    /// The user's `mainImage` function.
    MainImage,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentTemplate {
    segments: Vec<Segment>,
}

impl FragmentTemplate {
    /// Splits `source` at its marker lines.
    ///
    /// `// insert-variables` and `// insert-main-image` (or the older
    /// `//insert-here`) must each appear exactly once on a line of their own.
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut seen_variables = false;
        let mut seen_main_image = false;

        for line in source.lines() {
            let slot = match marker_name(line) {
                Some(VARIABLES_MARKER) => Some((Slot::Variables, &mut seen_variables)),
                Some(MAIN_IMAGE_MARKER | LEGACY_MAIN_IMAGE_MARKER) => {
                    Some((Slot::MainImage, &mut seen_main_image))
                }
                _ => None,
            };
            match slot {
                Some((slot, seen)) => {
                    if *seen {
                        return Err(RenderError::Template(format!(
                            "{slot:?} marker appears more than once"
                        )));
                    }
                    *seen = true;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Slot(slot));
                }
                None => {
                    text.push_str(line);
                    text.push('\n');
                }
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        if !seen_variables {
            return Err(RenderError::Template(format!(
                "missing `// {VARIABLES_MARKER}` marker"
            )));
        }
        if !seen_main_image {
            return Err(RenderError::Template(format!(
                "missing `// {MAIN_IMAGE_MARKER}` marker"
            )));
        }
        Ok(Self { segments })
    }

    /// Produces the final fragment source. Markers are not carried over.
    pub fn assemble(&self, variables: &[String], main_image: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(Slot::Variables) => {
                    for line in variables {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                Segment::Slot(Slot::MainImage) => {
                    let body = if main_image.trim().is_empty() {
                        DEFAULT_MAIN_IMAGE
                    } else {
                        main_image
                    };
                    out.push_str(body);
                    if !body.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
        out
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(slot) => Some(*slot),
            Segment::Text(_) => None,
        })
    }
}

impl Default for FragmentTemplate {
    fn default() -> Self {
        let (head, rest) = split_at_marker(FRAGMENT_TEMPLATE, VARIABLES_MARKER);
        let (middle, tail) = split_at_marker(rest, MAIN_IMAGE_MARKER);
        Self {
            segments: vec![
                Segment::Text(head.to_owned()),
                Segment::Slot(Slot::Variables),
                Segment::Text(middle.to_owned()),
                Segment::Slot(Slot::MainImage),
                Segment::Text(tail.to_owned()),
            ],
        }
    }
}

/// `Some("insert-...")` when `line` is a marker comment.
fn marker_name(line: &str) -> Option<&str> {
    let name = line.trim().strip_prefix("//")?.trim();
    name.starts_with("insert-").then_some(name)
}

// Only used on the built-in template, whose markers are known to exist.
fn split_at_marker<'a>(source: &'a str, marker: &str) -> (&'a str, &'a str) {
    let needle = format!("// {marker}\n");
    match source.find(&needle) {
        Some(at) => (&source[..at], &source[at + needle.len()..]),
        None => (source, ""),
    }
}
