//! Parameter marshalling: uniform uploads or inline GLSL constants.
//!
//! | Kind      | Uniform (`u_<key>`)      | Inline constant (`fx_<key>`)          |
//! |-----------|--------------------------|---------------------------------------|
//! | `number`  | `uniform1f`              | `float fx_k = 3.5;`                   |
//! | `boolean` | `uniform1f` (0.0 / 1.0)  | `bool fx_k = true;`                   |
//! | `color`   | `uniform4f`              | `vec4 fx_k = vec4(1.0, 0.0, 0.0, 1.0);` |
//! | `bigint`  | `uniform1i` (saturated)  | `int fx_k = 2147483647;`              |

use log::warn;

use crate::params::{Color, ParameterValue, Parameters};
use crate::template::FragmentTemplate;

pub const UNIFORM_PREFIX: &str = "u_";
pub const CONSTANT_PREFIX: &str = "fx_";

/// How parameter values reach the shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarshalMode {
    /// Re-upload uniforms on change; the program is never rebuilt.
    Uniforms,
    /// Bake values into the source; every change recompiles.
    #[default]
    InlineConstants,
}

/// Destination for uniform uploads, normally a linked GL program.
pub trait UniformSink {
    type Location;

    /// `None` when the program has no active uniform by that name.
    fn location(&self, name: &str) -> Option<Self::Location>;
    fn set_float(&self, location: &Self::Location, value: f32);
    fn set_vec4(&self, location: &Self::Location, value: [f32; 4]);
    fn set_int(&self, location: &Self::Location, value: i32);
}

/// What one uniform pass did with each key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarshalReport {
    pub uploaded: Vec<String>,
    /// Keys whose uniform is absent from the program. Not an error.
    pub missing: Vec<String>,
    /// Keys skipped with a warning.
    pub skipped: Vec<String>,
}

enum Upload {
    Float(f32),
    Vec4([f32; 4]),
    Int(i32),
}

/// Saturates to the range of a GLSL `int`.
pub fn clamp_to_i32(value: i128) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Uploads every representable parameter to `u_<key>`.
pub fn assign_uniforms<S: UniformSink>(sink: &S, parameters: &Parameters) -> MarshalReport {
    let mut report = MarshalReport::default();
    for (key, value) in parameters.iter() {
        if !is_parameter_key(key) {
            warn!("parameter key cannot name a GLSL variable, skipping: {key}");
            report.skipped.push(key.to_owned());
            continue;
        }
        let upload = match value {
            ParameterValue::Number(n) => Upload::Float(*n as f32),
            ParameterValue::Boolean(b) => Upload::Float(if *b { 1.0 } else { 0.0 }),
            ParameterValue::Color(c) => Upload::Vec4(clamp_color(c).to_array()),
            ParameterValue::BigInt(i) => Upload::Int(clamp_to_i32(*i)),
            ParameterValue::Unsupported(kind) => {
                warn!("parameter type not supported: {key} : {kind}");
                report.skipped.push(key.to_owned());
                continue;
            }
        };

        let Some(location) = sink.location(&format!("{UNIFORM_PREFIX}{key}")) else {
            report.missing.push(key.to_owned());
            continue;
        };
        match upload {
            Upload::Float(v) => sink.set_float(&location, v),
            Upload::Vec4(v) => sink.set_vec4(&location, v),
            Upload::Int(v) => sink.set_int(&location, v),
        }
        report.uploaded.push(key.to_owned());
    }
    report
}

/// One GLSL declaration per representable parameter, in iteration order.
pub fn declarations(parameters: &Parameters) -> Vec<String> {
    parameters
        .iter()
        .filter_map(|(key, value)| declaration(key, value))
        .collect()
}

/// The declaration for a single parameter, or `None` (with a warning) when
/// it cannot be expressed in GLSL.
pub fn declaration(key: &str, value: &ParameterValue) -> Option<String> {
    if !is_parameter_key(key) {
        warn!("parameter key cannot name a GLSL variable, skipping: {key}");
        return None;
    }
    let name = format!("{CONSTANT_PREFIX}{key}");
    match value {
        ParameterValue::Number(n) if !n.is_finite() => {
            warn!("parameter {key} is not a finite number ({n}), skipping");
            None
        }
        // `{:?}` keeps a decimal point on integral values (`3.0`, not `3`).
        ParameterValue::Number(n) => Some(format!("float {name} = {n:?};")),
        ParameterValue::Boolean(b) => Some(format!("bool {name} = {b};")),
        ParameterValue::Color(c) => {
            let c = clamp_color(c);
            Some(format!(
                "vec4 {name} = vec4({:.1}, {:.1}, {:.1}, {:.1});",
                c.r, c.g, c.b, c.a
            ))
        }
        ParameterValue::BigInt(i) => Some(format!("int {name} = {};", clamp_to_i32(*i))),
        ParameterValue::Unsupported(kind) => {
            warn!("parameter type not supported: {key} : {kind}");
            None
        }
    }
}

/// Assembles `template` with the declarations for `parameters` in its
/// variables slot. The template itself is never modified.
pub fn add_variables_to_shader(
    template: &FragmentTemplate,
    parameters: &Parameters,
    main_image: &str,
) -> String {
    template.assemble(&declarations(parameters), main_image)
}

fn clamp_color(color: &Color) -> Color {
    Color::new(color.r, color.g, color.b, color.a)
}

/// Whether `key` stays a usable identifier once prefixed with `u_` or `fx_`.
/// Names containing `__` are reserved in GLSL ES, and a leading `_` would
/// produce one after the prefix.
pub fn is_parameter_key(key: &str) -> bool {
    is_glsl_identifier(key) && !key.starts_with('_') && !key.contains("__")
}

pub fn is_glsl_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
