//! # Ember Web
//!
//! Browser host for the ember particle background.
//!
//! ```js
//! import init, { EmberBackground } from "./ember_web.js";
//!
//! await init();
//! const embers = new EmberBackground("embers", null);
//! embers.styleBackdrop("/bgimg1.jpg");
//! // on unmount:
//! embers.teardown();
//! ```
//!
//! The canvas is sized to `window.innerWidth × innerHeight` before the first
//! frame and on every `resize` event. If the canvas or its 2D context is
//! missing the page keeps its static backdrop and nothing else happens.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backdrop;
pub mod error;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod surface;

pub use backdrop::Backdrop;
pub use error::WebError;

#[cfg(target_arch = "wasm32")]
pub use host::EmberBackground;
#[cfg(target_arch = "wasm32")]
pub use surface::CanvasSurface;
