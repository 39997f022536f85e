use crate::marshal::MarshalMode;
use crate::template::{FragmentTemplate, DEFAULT_MAIN_IMAGE};

/// Everything the browser entry needs to stand up an artwork.
#[derive(Debug, Clone)]
pub struct ArtworkConfig {
    pub mode: MarshalMode,
    /// GLSL implementing `mainImage(out vec4, in vec2)`.
    pub main_image: String,
    pub template: FragmentTemplate,
    pub canvas_class: String,
    pub body_class: String,
    /// Resize the canvas to the window on startup and on every `resize`.
    pub fit_window: bool,
    pub log_level: log::Level,
}

impl Default for ArtworkConfig {
    fn default() -> Self {
        Self {
            mode: MarshalMode::default(),
            main_image: DEFAULT_MAIN_IMAGE.to_owned(),
            template: FragmentTemplate::default(),
            canvas_class: "webgl".to_owned(),
            body_class: "fx".to_owned(),
            fit_window: true,
            log_level: log::Level::Info,
        }
    }
}

impl ArtworkConfig {
    pub fn with_main_image(mut self, main_image: impl Into<String>) -> Self {
        self.main_image = main_image.into();
        self
    }

    pub fn with_mode(mut self, mode: MarshalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_template(mut self, template: FragmentTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = level;
        self
    }
}
