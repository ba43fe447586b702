use biomap::{validator::Validate, Settings, WorldConfig, WorldResult};
use serde::{Deserialize, Serialize};
use std::{marker::PhantomData, ops::Deref};
use wasm_bindgen::{prelude::*, JsCast};

use crate::{SettingsObject, WorldConfigObject};

/// An extension trait for `Result` to allow us to add custom methods
pub trait ResultExt<T> {
    /// Helper to convert any result to a result with a JS error value.
    fn into_js(self) -> Result<T, JsValue>;
}

impl<T> ResultExt<T> for WorldResult<T> {
    fn into_js(self) -> Result<T, JsValue> {
        self.map_err(|error| js_error(&error.to_string()))
    }
}

/// Build a JS `Error` with the given message
pub fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}

/// Convert any serializable value to a plain JS value (object, array, etc.)
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    JsValue::from_serde(value).map_err(|err| {
        js_error(&format!("Error serializing value: {}", err))
    })
}

/// A little container for consolidating functionality related to mapping
/// config objects between JS values and Rust values.
pub struct ConfigHelper<T, J>
where
    T: Default + Serialize + for<'a> Deserialize<'a> + Validate,
    J: Deref<Target = JsValue> + JsCast,
{
    phantom_t: PhantomData<T>,
    phantom_j: PhantomData<J>,
}

impl<T, J> ConfigHelper<T, J>
where
    T: Default + Serialize + for<'a> Deserialize<'a> + Validate,
    J: Deref<Target = JsValue> + JsCast,
{
    pub fn new() -> Self {
        Self {
            phantom_t: PhantomData,
            phantom_j: PhantomData,
        }
    }

    /// Get the default config as a JS object.
    pub fn default(&self) -> Result<J, JsValue> {
        Ok(to_js(&T::default())?.unchecked_into())
    }

    /// Deserialize a JS object into a config. The input should be an
    /// **object**, not a JSON string. Will return an error if deserialization
    /// fails in any way. This does **not** validate the config.
    pub fn deserialize(&self, input: J) -> Result<T, JsValue> {
        JsValue::into_serde(&input).map_err(|err| {
            js_error(&format!("Error deserializing value: {}", err))
        })
    }

    /// Verify that the given JS object is a valid config. Return the validated
    /// config, with all defaults populated, if it's valid. Return an error if
    /// it isn't.
    pub fn validate(&self, input: J) -> Result<J, JsValue> {
        // Deserialize the config then validate it manually
        let config = self.deserialize(input)?;
        config
            .validate()
            .map_err(|err| js_error(&format!("Invalid value: {}", err)))?;
        // Re-serialize it back into a JS object
        Ok(to_js(&config)?.unchecked_into())
    }
}

pub type WorldConfigHelper = ConfigHelper<WorldConfig, WorldConfigObject>;
pub type SettingsHelper = ConfigHelper<Settings, SettingsObject>;
