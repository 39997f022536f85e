use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, HtmlCanvasElement, MouseEvent, WebGl2RenderingContext as GL, WebGlBuffer,
    WebGlProgram, WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use super::gl::{self, ProgramUniforms, POSITION_LOCATION};
use crate::artwork::ParameterTarget;
use crate::config::ArtworkConfig;
use crate::error::RenderError;
use crate::frame::{CancelToken, FrameLoop, PointerTracker, RenderClock};
use crate::marshal::{self, MarshalReport};
use crate::params::Parameters;
use crate::template::{FragmentTemplate, VERTEX_SHADER};

/// Two triangles covering clip space.
#[rustfmt::skip]
const QUAD: [f32; 12] = [
    -1.0, -1.0,
     1.0, -1.0,
    -1.0,  1.0,
    -1.0,  1.0,
     1.0, -1.0,
     1.0,  1.0,
];

struct BuiltinUniforms {
    resolution: Option<WebGlUniformLocation>,
    mouse: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

impl BuiltinUniforms {
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        Self {
            resolution: gl.get_uniform_location(program, "iResolution"),
            mouse: gl.get_uniform_location(program, "iMouse"),
            time: gl.get_uniform_location(program, "iTime"),
        }
    }
}

/// Owns the GL context, the active program and the full-screen quad.
pub struct ShaderRenderer {
    gl: GL,
    canvas: HtmlCanvasElement,
    template: FragmentTemplate,
    main_image: String,
    fragment: String,
    program: WebGlProgram,
    builtins: BuiltinUniforms,
    vao: WebGlVertexArrayObject,
    _quad: WebGlBuffer,
    clock: RenderClock,
    pointer: PointerTracker,
}

impl ShaderRenderer {
    /// Acquires a WebGL2 context on `canvas`, uploads the quad and compiles
    /// the template with `variables` and the configured `mainImage`.
    pub fn new(
        canvas: &HtmlCanvasElement,
        config: &ArtworkConfig,
        variables: &[String],
        clock: RenderClock,
        pointer: PointerTracker,
    ) -> Result<Self, RenderError> {
        let gl: GL = canvas
            .get_context("webgl2")?
            .ok_or(RenderError::ContextUnavailable)?
            .dyn_into()
            .map_err(|_| RenderError::ContextUnavailable)?;

        let vao = gl
            .create_vertex_array()
            .ok_or(RenderError::Resource("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let quad = gl.create_buffer().ok_or(RenderError::Resource("buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        let vertices = js_sys::Float32Array::from(&QUAD[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);
        gl.enable_vertex_attrib_array(POSITION_LOCATION);
        gl.vertex_attrib_pointer_with_i32(POSITION_LOCATION, 2, GL::FLOAT, false, 0, 0);
        gl.bind_vertex_array(None);

        let fragment = config.template.assemble(variables, &config.main_image);
        let program = gl::compile_program(&gl, VERTEX_SHADER, &fragment)?;
        let builtins = BuiltinUniforms::locate(&gl, &program);
        debug!("compiled program with {} parameter declarations", variables.len());

        Ok(Self {
            gl,
            canvas: canvas.clone(),
            template: config.template.clone(),
            main_image: config.main_image.clone(),
            fragment,
            program,
            builtins,
            vao,
            _quad: quad,
            clock,
            pointer,
        })
    }

    /// Fragment source of the active program.
    pub fn fragment_source(&self) -> &str {
        &self.fragment
    }

    /// Draws one frame at `now_ms` (the `performance.now()` time base).
    pub fn render_frame(&self, now_ms: f64) {
        let gl = &self.gl;
        let (width, height) = (self.canvas.width(), self.canvas.height());

        gl.viewport(0, 0, width as i32, height as i32);
        gl.use_program(Some(&self.program));
        gl.bind_vertex_array(Some(&self.vao));

        let pointer = self.pointer.get();
        gl.uniform2f(self.builtins.resolution.as_ref(), width as f32, height as f32);
        gl.uniform1f(self.builtins.time.as_ref(), self.clock.time(now_ms));
        gl.uniform2f(self.builtins.mouse.as_ref(), pointer.x, pointer.y);

        gl.draw_arrays(GL::TRIANGLES, 0, 6);
    }
}

impl ParameterTarget for ShaderRenderer {
    fn assign_uniforms(&mut self, parameters: &Parameters) -> MarshalReport {
        self.gl.use_program(Some(&self.program));
        let sink = ProgramUniforms {
            gl: &self.gl,
            program: &self.program,
        };
        marshal::assign_uniforms(&sink, parameters)
    }

    fn rebuild(&mut self, variables: &[String]) -> Result<(), RenderError> {
        let fragment = self.template.assemble(variables, &self.main_image);
        let program = gl::compile_program(&self.gl, VERTEX_SHADER, &fragment)?;

        let old = std::mem::replace(&mut self.program, program);
        self.gl.delete_program(Some(&old));
        self.builtins = BuiltinUniforms::locate(&self.gl, &self.program);
        self.fragment = fragment;
        debug!("rebuilt program with {} parameter declarations", variables.len());
        Ok(())
    }
}

/// Drives a frame callback from `requestAnimationFrame` until the returned
/// token is cancelled.
pub fn start_animation(frame: impl FnMut(f64) + 'static) -> Result<CancelToken, RenderError> {
    let token = CancelToken::new();
    let mut frames = FrameLoop::new(frame, token.clone());

    // `f` holds the animation-frame closure so it can re-request itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        if !frames.tick(now) {
            debug!("animation loop stopped after {} frames", frames.frames());
            let _ = f.borrow_mut().take();
            return;
        }
        if let Some(closure) = f.borrow().as_ref() {
            if let Err(err) = request_animation_frame(closure) {
                error!("could not schedule next frame: {err}");
            }
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(closure) = g.borrow().as_ref() {
        request_animation_frame(closure)?;
    }
    Ok(token)
}

fn request_animation_frame(closure: &Closure<dyn FnMut(f64)>) -> Result<i32, RenderError> {
    Ok(browser_window()?.request_animation_frame(closure.as_ref().unchecked_ref())?)
}

pub(crate) fn browser_window() -> Result<Window, RenderError> {
    window().ok_or_else(|| RenderError::Dom("no window".to_owned()))
}

/// Appends a fresh canvas with `class` to the document body.
pub fn create_canvas(document: &Document, class: &str) -> Result<HtmlCanvasElement, RenderError> {
    let body = document
        .body()
        .ok_or_else(|| RenderError::Dom("no document body".to_owned()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| RenderError::Dom("created element is not a canvas".to_owned()))?;
    canvas.class_list().add_1(class)?;
    body.append_child(&canvas)?;
    Ok(canvas)
}

/// Sizes `canvas` to the window now and on every `resize`.
pub fn fit_to_window(canvas: &HtmlCanvasElement) -> Result<(), RenderError> {
    let window = browser_window()?;
    resize_to(&window, canvas);

    let resize = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || {
            if let Some(window) = web_sys::window() {
                resize_to(&window, &canvas);
            }
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize.as_ref().unchecked_ref())?;
    resize.forget();
    Ok(())
}

fn window_size(window: &Window) -> (f64, f64) {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (size(window.inner_width()), size(window.inner_height()))
}

fn resize_to(window: &Window, canvas: &HtmlCanvasElement) {
    let (w, h) = window_size(window);
    if w > 0.0 && h > 0.0 {
        canvas.set_width(w as u32);
        canvas.set_height(h as u32);
    }
}

/// Feeds `mousemove` positions, normalised by the window size, into `pointer`.
pub fn track_pointer(pointer: &PointerTracker) -> Result<(), RenderError> {
    let window = browser_window()?;
    let mouse_move = {
        let pointer = pointer.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = window_size(&window);
            pointer.observe(
                f64::from(event.client_x()),
                f64::from(event.client_y()),
                width,
                height,
            );
        }) as Box<dyn FnMut(MouseEvent)>)
    };
    window.add_event_listener_with_callback("mousemove", mouse_move.as_ref().unchecked_ref())?;
    mouse_move.forget();
    Ok(())
}
