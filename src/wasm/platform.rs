//! Binding to the platform's `$fx` global.

use js_sys::{Array, Function, Object, Reflect};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::artwork::Platform;
use crate::error::RenderError;
use crate::params::{
    parse_bigint, Color, FeatureValue, ParameterDefinition, ParameterValue, Parameters,
};

#[wasm_bindgen]
extern "C" {
    /// The `$fx` object injected by the platform snippet.
    pub type FxHash;

    #[wasm_bindgen(method)]
    fn rand(this: &FxHash) -> f64;

    #[wasm_bindgen(method, js_name = getParams)]
    fn get_params(this: &FxHash) -> JsValue;

    #[wasm_bindgen(method)]
    fn params(this: &FxHash, definitions: &Array);

    #[wasm_bindgen(method)]
    fn features(this: &FxHash, features: &Object);

    #[wasm_bindgen(method)]
    fn on(this: &FxHash, event: &str, received: &Function, applied: &Function);
}

pub struct FxPlatform {
    fx: FxHash,
}

impl FxPlatform {
    pub fn from_global() -> Result<Self, RenderError> {
        let fx = Reflect::get(&js_sys::global(), &JsValue::from_str("$fx"))?;
        if fx.is_undefined() || fx.is_null() {
            return Err(RenderError::PlatformUnavailable);
        }
        Ok(Self {
            fx: fx.unchecked_into(),
        })
    }

    /// Registers parameter descriptors; must run before the first snapshot.
    pub fn register(&self, definitions: &[ParameterDefinition]) -> Result<(), RenderError> {
        let list = Array::new();
        for definition in definitions {
            list.push(&definition_to_js(definition)?);
        }
        self.fx.params(&list);
        Ok(())
    }

    pub fn report_features(&self, features: &[(String, FeatureValue)]) -> Result<(), RenderError> {
        let object = Object::new();
        for (name, value) in features {
            let value = match value {
                FeatureValue::Number(n) => JsValue::from_f64(*n),
                FeatureValue::Boolean(b) => JsValue::from_bool(*b),
                FeatureValue::Text(s) => JsValue::from_str(s),
            };
            Reflect::set(&object, &JsValue::from_str(name), &value)?;
        }
        self.fx.features(&object);
        Ok(())
    }
}

impl Platform for FxPlatform {
    fn parameters(&self) -> Parameters {
        parameters_from_js(&self.fx.get_params())
    }

    fn random(&self) -> f64 {
        self.fx.rand()
    }

    fn on_parameters_changed(&self, mut handler: Box<dyn FnMut()>) {
        let received = Closure::wrap(Box::new(|| {}) as Box<dyn FnMut()>);
        let applied = Closure::wrap(Box::new(move || handler()) as Box<dyn FnMut()>);
        self.fx.on(
            "params:update",
            received.as_ref().unchecked_ref(),
            applied.as_ref().unchecked_ref(),
        );
        received.forget();
        applied.forget();
    }
}

fn definition_to_js(definition: &ParameterDefinition) -> Result<Object, RenderError> {
    let object = Object::new();
    let set = |key: &str, value: &JsValue| Reflect::set(&object, &JsValue::from_str(key), value);

    set("id", &JsValue::from_str(&definition.id))?;
    set("name", &JsValue::from_str(&definition.name))?;
    let default = match &definition.default {
        ParameterValue::Number(n) => JsValue::from_f64(*n),
        ParameterValue::Boolean(b) => JsValue::from_bool(*b),
        ParameterValue::Color(c) => JsValue::from_str(&c.to_hex()),
        ParameterValue::BigInt(i) => js_sys::BigInt::new(&JsValue::from_str(&i.to_string()))
            .map_err(JsValue::from)?
            .into(),
        ParameterValue::Unsupported(kind) => {
            return Err(RenderError::Dom(format!(
                "cannot register parameter {} of kind {kind}",
                definition.id
            )))
        }
    };
    set("type", &JsValue::from_str(definition.default.kind()))?;
    set("default", &default)?;

    if let Some(range) = definition.options {
        let options = Object::new();
        for (key, value) in [("min", range.min), ("max", range.max), ("step", range.step)] {
            Reflect::set(&options, &JsValue::from_str(key), &JsValue::from_f64(value))?;
        }
        set("options", &options)?;
    }
    Ok(object)
}

/// Normalises a `$fx.getParams()` snapshot. Keys keep the snapshot's order.
pub fn parameters_from_js(snapshot: &JsValue) -> Parameters {
    let Some(object) = snapshot.dyn_ref::<Object>() else {
        warn!("parameter snapshot is not an object");
        return Parameters::new();
    };
    Object::entries(object)
        .iter()
        .filter_map(|entry| {
            let entry: Array = entry.unchecked_into();
            let key = entry.get(0).as_string()?;
            Some((key, value_from_js(&entry.get(1))))
        })
        .collect()
}

fn value_from_js(value: &JsValue) -> ParameterValue {
    if let Some(n) = value.as_f64() {
        return ParameterValue::Number(n);
    }
    if let Some(b) = value.as_bool() {
        return ParameterValue::Boolean(b);
    }
    if value.is_bigint() {
        let text = value
            .dyn_ref::<js_sys::BigInt>()
            .and_then(|i| i.to_string(10).ok())
            .map(String::from);
        if let Some(i) = text.as_deref().and_then(parse_bigint) {
            return ParameterValue::BigInt(i);
        }
        return ParameterValue::Unsupported("bigint".to_owned());
    }
    if value.is_object() {
        // Colors arrive as `{ hex: { rgba: "#rrggbbaa" }, obj: {...}, arr: {...} }`.
        let hex = Reflect::get(value, &JsValue::from_str("hex"))
            .and_then(|hex| Reflect::get(&hex, &JsValue::from_str("rgba")))
            .ok()
            .and_then(|rgba| rgba.as_string());
        if let Some(color) = hex.as_deref().and_then(Color::from_hex) {
            return ParameterValue::Color(color);
        }
        return ParameterValue::Unsupported("object".to_owned());
    }
    ParameterValue::Unsupported(value.js_typeof().as_string().unwrap_or_default())
}
