//! Typed parameter values as the artwork sees them.
//!
//! The hosting platform hands out a loosely typed snapshot; the browser glue
//! normalises it into [`Parameters`] before anything else touches it.

use std::num::IntErrorKind;

/// An RGBA color with every channel normalised to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Builds a color, clamping each channel into `[0, 1]`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
            a: clamp_unit(a),
        }
    }

    /// Parses `rrggbb` or `rrggbbaa`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| -> Option<f32> {
            hex.get(i..i + 2)
                .and_then(|byte| u8::from_str_radix(byte, 16).ok())
                .map(|byte| f32::from(byte) / 255.0)
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 1.0 };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Lowercase `rrggbbaa`, the form the platform accepts as a default.
    pub fn to_hex(&self) -> String {
        self.to_array()
            .iter()
            .map(|c| format!("{:02x}", (c * 255.0).round() as u8))
            .collect()
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn clamp_unit(channel: f32) -> f32 {
    if channel.is_nan() {
        0.0
    } else {
        channel.clamp(0.0, 1.0)
    }
}

/// One parameter value, tagged with its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Number(f64),
    Boolean(bool),
    Color(Color),
    /// Arbitrary-precision integer from the platform, saturated to `i128`.
    BigInt(i128),
    /// A kind the shader has no representation for (`string`, `select`, ...).
    Unsupported(String),
}

impl ParameterValue {
    pub fn kind(&self) -> &str {
        match self {
            ParameterValue::Number(_) => "number",
            ParameterValue::Boolean(_) => "boolean",
            ParameterValue::Color(_) => "color",
            ParameterValue::BigInt(_) => "bigint",
            ParameterValue::Unsupported(kind) => kind,
        }
    }
}

/// Parses a decimal integer, saturating at the `i128` bounds instead of
/// failing on overflow. Returns `None` for text that is not an integer.
pub fn parse_bigint(text: &str) -> Option<i128> {
    let text = text.trim().trim_end_matches('n');
    match text.parse::<i128>() {
        Ok(value) => Some(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Some(i128::MAX),
            IntErrorKind::NegOverflow => Some(i128::MIN),
            _ => None,
        },
    }
}

/// Insertion-ordered snapshot of parameter values keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    entries: Vec<(String, ParameterValue)>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, keeping its original position when it already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: ParameterValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: ParameterValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ParameterValue)> for Parameters {
    fn from_iter<I: IntoIterator<Item = (K, ParameterValue)>>(iter: I) -> Self {
        let mut params = Parameters::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// UI range metadata; only the platform's controls use it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Describes a parameter to register with the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub id: String,
    pub name: String,
    pub default: ParameterValue,
    pub options: Option<Range>,
}

impl ParameterDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, default: ParameterValue) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default,
            options: None,
        }
    }

    pub fn with_range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.options = Some(Range { min, max, step });
        self
    }
}

/// A value reported as descriptive metadata about a generated instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}
