use web_sys::{WebGl2RenderingContext as GL, WebGlProgram, WebGlShader, WebGlUniformLocation};

use crate::error::{RenderError, ShaderStage};
use crate::marshal::UniformSink;

/// Attribute slot the quad is bound to in every program we link.
pub const POSITION_LOCATION: u32 = 0;

/// Compile and link a program from vertex and fragment sources.
///
/// `a_position` is pinned to [`POSITION_LOCATION`] so a vertex array set up
/// once stays valid for every rebuilt program. The shader objects are
/// deleted after linking; on any failure everything created here is deleted
/// before returning.
pub fn compile_program(
    gl: &GL,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<WebGlProgram, RenderError> {
    let vs = compile_shader(gl, ShaderStage::Vertex, vertex_src)?;
    let fs = match compile_shader(gl, ShaderStage::Fragment, fragment_src) {
        Ok(fs) => fs,
        Err(err) => {
            gl.delete_shader(Some(&vs));
            return Err(err);
        }
    };

    let Some(program) = gl.create_program() else {
        gl.delete_shader(Some(&vs));
        gl.delete_shader(Some(&fs));
        return Err(RenderError::Resource("program"));
    };
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    gl.bind_attrib_location(&program, POSITION_LOCATION, "a_position");
    gl.link_program(&program);

    let linked = gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false);

    gl.detach_shader(&program, &vs);
    gl.detach_shader(&program, &fs);
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    if !linked {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        return Err(RenderError::Link { log });
    }
    Ok(program)
}

fn compile_shader(gl: &GL, stage: ShaderStage, source: &str) -> Result<WebGlShader, RenderError> {
    let kind = match stage {
        ShaderStage::Vertex => GL::VERTEX_SHADER,
        ShaderStage::Fragment => GL::FRAGMENT_SHADER,
    };
    let shader = gl.create_shader(kind).ok_or(RenderError::Resource("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    let compiled = gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false);
    if !compiled {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        return Err(RenderError::Compile { stage, log });
    }
    Ok(shader)
}

/// Uniform uploads against one linked program. The program must be in use.
pub struct ProgramUniforms<'a> {
    pub gl: &'a GL,
    pub program: &'a WebGlProgram,
}

impl UniformSink for ProgramUniforms<'_> {
    type Location = WebGlUniformLocation;

    fn location(&self, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(self.program, name)
    }

    fn set_float(&self, location: &WebGlUniformLocation, value: f32) {
        self.gl.uniform1f(Some(location), value);
    }

    fn set_vec4(&self, location: &WebGlUniformLocation, [r, g, b, a]: [f32; 4]) {
        self.gl.uniform4f(Some(location), r, g, b, a);
    }

    fn set_int(&self, location: &WebGlUniformLocation, value: i32) {
        self.gl.uniform1i(Some(location), value);
    }
}
