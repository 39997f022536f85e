use std::fmt;

use thiserror::Error;

/// Pipeline stage a shader source was compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Failures that abort renderer setup or a rebuild.
///
/// Soft marshalling problems (unsupported kinds, unknown uniforms) never
/// surface here; they are logged and skipped.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("WebGL2 not supported")]
    ContextUnavailable,

    #[error("could not compile {stage} shader:\n\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("could not link WebGL program:\n\n{log}")]
    Link { log: String },

    #[error("failed to create GL {0}")]
    Resource(&'static str),

    #[error("invalid fragment template: {0}")]
    Template(String),

    #[error("platform API `$fx` is not available on the global object")]
    PlatformUnavailable,

    #[error("{0}")]
    Dom(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for RenderError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        RenderError::Dom(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<RenderError> for wasm_bindgen::JsValue {
    fn from(err: RenderError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
