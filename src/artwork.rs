//! Glue between the hosting platform and a shader target.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error};

use crate::error::RenderError;
use crate::marshal::{self, MarshalMode, MarshalReport};
use crate::params::Parameters;

/// What the hosting platform provides to an artwork.
pub trait Platform {
    /// Current snapshot of every registered parameter.
    fn parameters(&self) -> Parameters;

    /// Deterministic uniform draw in `[0, 1)`.
    fn random(&self) -> f64;

    /// Called after the platform has finished applying a parameter update.
    fn on_parameters_changed(&self, handler: Box<dyn FnMut()>);
}

/// Something parameter values can be pushed into, normally the renderer.
pub trait ParameterTarget {
    fn assign_uniforms(&mut self, parameters: &Parameters) -> MarshalReport;

    /// Recompiles with `variables` in the template's variables slot. On
    /// error the previously active program stays in place.
    fn rebuild(&mut self, variables: &[String]) -> Result<(), RenderError>;
}

impl MarshalMode {
    /// Declarations that must be compiled in before the first frame.
    pub fn initial_variables(self, parameters: &Parameters) -> Vec<String> {
        match self {
            MarshalMode::Uniforms => Vec::new(),
            MarshalMode::InlineConstants => marshal::declarations(parameters),
        }
    }
}

pub struct Artwork<P, T> {
    platform: P,
    target: Rc<RefCell<T>>,
    mode: MarshalMode,
}

impl<P, T> Artwork<P, T>
where
    P: Platform + 'static,
    T: ParameterTarget + 'static,
{
    /// `target` must already be built with
    /// [`MarshalMode::initial_variables`] for `mode`.
    pub fn new(platform: P, target: Rc<RefCell<T>>, mode: MarshalMode) -> Self {
        Self {
            platform,
            target,
            mode,
        }
    }

    /// Pushes the initial uniforms (uniform mode only) and subscribes to
    /// parameter changes.
    ///
    /// The subscription owns a strong handle, so the artwork keeps receiving
    /// updates after the returned `Rc` is dropped. The platform handler lives
    /// as long as the page.
    pub fn start(self) -> Rc<Self> {
        if self.mode == MarshalMode::Uniforms {
            let report = self
                .target
                .borrow_mut()
                .assign_uniforms(&self.platform.parameters());
            debug!("initial uniforms: {report:?}");
        }

        let artwork = Rc::new(self);
        let handle = Rc::clone(&artwork);
        artwork.platform.on_parameters_changed(Box::new(move || {
            if let Err(err) = handle.apply() {
                error!("failed to apply parameter update: {err}");
            }
        }));
        artwork
    }

    /// Re-reads the platform snapshot and pushes it into the target.
    pub fn apply(&self) -> Result<(), RenderError> {
        let parameters = self.platform.parameters();
        let mut target = self.target.borrow_mut();
        match self.mode {
            MarshalMode::Uniforms => {
                let report = target.assign_uniforms(&parameters);
                debug!("uniforms updated: {report:?}");
                Ok(())
            }
            MarshalMode::InlineConstants => target.rebuild(&marshal::declarations(&parameters)),
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn target(&self) -> &Rc<RefCell<T>> {
        &self.target
    }
}
