//! # Web Host Error Types
//!
//! The lenient mount path swallows all of these (the background is
//! decoration); the strict path hands them to JavaScript.

use ember_core::EngineError;
use thiserror::Error;

/// Errors produced by the web host.
#[derive(Error, Debug)]
pub enum WebError {
    /// The DOM APIs are not accessible (e.g. inside a worker).
    #[error("DOM is not available")]
    DomUnavailable,

    /// No `<canvas>` with the requested id.
    #[error("failed to find canvas element with id `{0}`")]
    CanvasNotFound(String),

    /// The canvas exists but has no 2D context.
    #[error("canvas `{0}` has no 2d context")]
    ContextUnavailable(String),

    /// The host-supplied configuration was rejected.
    #[error(transparent)]
    Config(#[from] EngineError),

    /// A CSS colour could not be formatted.
    #[error("failed to format a CSS colour")]
    Format(#[from] std::fmt::Error),

    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for WebError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(value: WebError) -> Self {
        js_sys::Error::new(&value.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            WebError::CanvasNotFound("embers".into()).to_string(),
            "failed to find canvas element with id `embers`"
        );
        assert_eq!(WebError::DomUnavailable.to_string(), "DOM is not available");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let inner = ember_core::EngineConfig::from_toml_str("max_particles = 0").unwrap_err();
        let message = inner.to_string();
        let err: WebError = inner.into();
        assert_eq!(err.to_string(), message);
    }
}
