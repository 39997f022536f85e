#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

//! Boilerplate for WebGL2 fragment-shader artworks driven by platform
//! parameters.
//!
//! The marshalling, template and frame logic is target-independent; the
//! `wasm` module holds everything that needs a browser.

pub mod artwork;
pub mod config;
pub mod demo;
pub mod error;
pub mod frame;
pub mod marshal;
pub mod params;
pub mod template;

pub use artwork::{Artwork, ParameterTarget, Platform};
pub use config::ArtworkConfig;
pub use error::{RenderError, ShaderStage};
pub use marshal::{MarshalMode, MarshalReport, UniformSink};
pub use params::{Color, ParameterDefinition, ParameterValue, Parameters};
pub use template::FragmentTemplate;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::{error, info, warn};
    use wasm_bindgen::prelude::*;

    use crate::artwork::{Artwork, Platform};
    use crate::config::ArtworkConfig;
    use crate::demo;
    use crate::error::RenderError;
    use crate::frame::{CancelToken, PointerTracker, RenderClock};
    use crate::params::ParameterDefinition;

    pub mod gl;
    pub mod platform;
    pub mod render;

    use platform::FxPlatform;
    use render::ShaderRenderer;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let level = if cfg!(debug_assertions) {
            log::Level::Debug
        } else {
            log::Level::Info
        };
        let config = ArtworkConfig::default()
            .with_main_image(demo::MAIN_IMAGE)
            .with_log_level(level);
        // A second init (e.g. under the test harness) keeps the first logger.
        let _ = console_log::init_with_level(config.log_level);

        // The platform subscription keeps the artwork alive once this returns.
        let (artwork, _frames) = match launch(&config, &demo::definitions()) {
            Ok(launched) => launched,
            // Loaded outside the platform (e.g. by the test runner).
            Err(RenderError::PlatformUnavailable) => {
                warn!("{}; artwork not started", RenderError::PlatformUnavailable);
                return Ok(());
            }
            Err(err) => {
                error!("{err}");
                return Err(err.into());
            }
        };

        let platform = artwork.platform();
        let features = demo::features(|| platform.random(), &platform.parameters());
        platform.report_features(&features)?;
        Ok(())
    }

    /// Registers `definitions`, builds the renderer and starts the frame loop.
    ///
    /// Any setup failure aborts before the first frame, so nothing is drawn.
    pub fn launch(
        config: &ArtworkConfig,
        definitions: &[ParameterDefinition],
    ) -> Result<(Rc<Artwork<FxPlatform, ShaderRenderer>>, CancelToken), RenderError> {
        let window = render::browser_window()?;
        let document = window
            .document()
            .ok_or_else(|| RenderError::Dom("no document".to_owned()))?;

        let platform = FxPlatform::from_global()?;
        platform.register(definitions)?;

        if let Some(body) = document.body() {
            body.class_list().add_1(&config.body_class)?;
        }
        let canvas = render::create_canvas(&document, &config.canvas_class)?;
        if config.fit_window {
            render::fit_to_window(&canvas)?;
        }
        let pointer = PointerTracker::default();
        render::track_pointer(&pointer)?;

        let origin_ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let clock = RenderClock::new(platform.random(), origin_ms);
        let variables = config.mode.initial_variables(&platform.parameters());
        let renderer = Rc::new(RefCell::new(ShaderRenderer::new(
            &canvas, config, &variables, clock, pointer,
        )?));
        info!("artwork ready ({:?}, seed {:.4})", config.mode, clock.seed());

        let artwork = Artwork::new(platform, Rc::clone(&renderer), config.mode).start();
        let frames = render::start_animation(move |now| renderer.borrow().render_frame(now))?;
        Ok((artwork, frames))
    }
}
