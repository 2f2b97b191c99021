//! Browser lifecycle: mount, resize listener, frame loop, teardown.
//!
//! ```text
//! new() ──► size canvas ──► add "resize" listener ──► requestAnimationFrame
//!                                                        │
//!                              ┌─────────── tick ◄───────┘
//!                              └──► requestAnimationFrame (while running)
//!
//! teardown() ──► remove listener ──► cancel frame ──► engine.teardown()
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use ember_core::{EngineState, ParticleEngine, SystemClock};
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::backdrop::Backdrop;
use crate::error::WebError;
use crate::logging;
use crate::options::{self, REDUCED_MOTION_QUERY};
use crate::surface::CanvasSurface;

type Engine = ParticleEngine<CanvasSurface, ChaCha8Rng, SystemClock>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct Shared {
    engine: Engine,
    /// Pending `requestAnimationFrame` id.
    frame_id: Option<i32>,
}

/// Ember background bound to a `<canvas>`.
///
/// Dropping the handle tears the background down.
#[wasm_bindgen]
pub struct EmberBackground {
    window: Option<Window>,
    shared: Rc<RefCell<Shared>>,
    on_resize: Option<Closure<dyn FnMut()>>,
    on_frame: FrameSlot,
}

#[wasm_bindgen]
impl EmberBackground {
    /// Mounts on the canvas with id `canvas_id`.
    ///
    /// Never fails: a missing canvas, missing 2D context or rejected config
    /// leaves the page with its static backdrop only.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(canvas_id: &str, config_toml: Option<String>) -> Self {
        logging::init();
        let window = web_sys::window();
        let prefers_reduced = window.as_ref().is_some_and(prefers_reduced_motion);
        let config = options::resolve_config(config_toml.as_deref(), prefers_reduced);
        let surface = window
            .as_ref()
            .and_then(Window::document)
            .and_then(|document| CanvasSurface::find(&document, canvas_id).ok());
        Self::start(window, surface, config)
    }

    /// Mounts like [`EmberBackground::new`] but reports every failure.
    ///
    /// # Errors
    ///
    /// Fails if the DOM, canvas or 2D context is unavailable, or the config
    /// is rejected.
    #[wasm_bindgen(js_name = mountStrict)]
    pub fn mount_strict(
        canvas_id: &str,
        config_toml: Option<String>,
    ) -> Result<EmberBackground, JsValue> {
        logging::init();
        let window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document = window.document().ok_or(WebError::DomUnavailable)?;
        let config = options::parse_config(config_toml.as_deref(), prefers_reduced_motion(&window))?;
        let surface = CanvasSurface::find(&document, canvas_id)?;
        Ok(Self::start(Some(window), Some(surface), config))
    }

    /// Styles the canvas and its parent as the static backdrop layer.
    ///
    /// # Errors
    ///
    /// Fails if the browser rejects a style write.
    #[wasm_bindgen(js_name = styleBackdrop)]
    pub fn style_backdrop(&self, image_url: Option<String>) -> Result<(), JsValue> {
        let backdrop = image_url.map_or_else(Backdrop::default, Backdrop::with_image);
        let shared = self.shared.borrow();
        if let Some(surface) = shared.engine.surface() {
            backdrop.apply(surface.canvas())?;
        }
        Ok(())
    }

    /// Unmount hook. Safe to call more than once.
    pub fn teardown(&mut self) {
        if let (Some(window), Some(listener)) = (self.window.as_ref(), self.on_resize.take()) {
            // Nothing to do if the listener is already gone.
            let _ = window.remove_event_listener_with_callback(
                "resize",
                listener.as_ref().unchecked_ref(),
            );
        }

        if let Ok(mut shared) = self.shared.try_borrow_mut() {
            if let (Some(window), Some(id)) = (self.window.as_ref(), shared.frame_id.take()) {
                let _ = window.cancel_animation_frame(id);
            }
            shared.engine.teardown();
        }

        // Breaks the closure's self-reference.
        self.on_frame.borrow_mut().take();
    }

    /// Live particle count.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn alive(&self) -> usize {
        self.shared.borrow().engine.particles().len()
    }

    /// True while the frame loop is animating.
    #[wasm_bindgen(getter)]
    #[must_use]
    pub fn running(&self) -> bool {
        self.shared.borrow().engine.state() == EngineState::Running
    }
}

impl EmberBackground {
    fn start(
        window: Option<Window>,
        surface: Option<CanvasSurface>,
        config: ember_core::EngineConfig,
    ) -> Self {
        let viewport = window.as_ref().map_or(ember_core::SurfaceSize::ZERO, viewport);
        let fallback_seed = options::seed_from_unit(js_sys::Math::random());
        let engine = Engine::mount_seeded(surface, viewport, config, fallback_seed, SystemClock);

        let mut background = Self {
            window,
            shared: Rc::new(RefCell::new(Shared {
                engine,
                frame_id: None,
            })),
            on_resize: None,
            on_frame: Rc::new(RefCell::new(None)),
        };

        if let Some(window) = background.window.clone() {
            let mounted = background.shared.borrow().engine.state() != EngineState::Inert;
            if mounted {
                background.listen_for_resize(&window);
            }
            if background.shared.borrow().engine.wants_frames() {
                background.start_frame_loop(&window);
            }
        }
        background
    }

    fn listen_for_resize(&mut self, window: &Window) {
        let shared = Rc::clone(&self.shared);
        let target = window.clone();
        let listener = Closure::<dyn FnMut()>::new(move || {
            if let Ok(mut shared) = shared.try_borrow_mut() {
                shared.engine.resize(viewport(&target));
            }
        });

        match window.add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        {
            Ok(()) => self.on_resize = Some(listener),
            Err(err) => tracing::warn!("resize listener not registered: {:?}", err),
        }
    }

    fn start_frame_loop(&self, window: &Window) {
        let shared = Rc::clone(&self.shared);
        let slot = Rc::clone(&self.on_frame);
        let target = window.clone();

        *self.on_frame.borrow_mut() = Some(Closure::<dyn FnMut()>::new(move || {
            let Ok(mut state) = shared.try_borrow_mut() else {
                return;
            };
            state.frame_id = None;
            // A callback that was already queued at teardown lands here.
            if !state.engine.tick().should_reschedule() {
                return;
            }
            if let Some(callback) = slot.borrow().as_ref() {
                state.frame_id = request_frame(&target, callback);
            }
        }));

        let first = self.on_frame.borrow().as_ref().and_then(|cb| request_frame(window, cb));
        self.shared.borrow_mut().frame_id = first;
    }
}

impl Drop for EmberBackground {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn request_frame(window: &Window, callback: &Closure<dyn FnMut()>) -> Option<i32> {
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|err| tracing::warn!("requestAnimationFrame failed: {:?}", err))
        .ok()
}

fn viewport(window: &Window) -> ember_core::SurfaceSize {
    let read = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    options::viewport_from_inner(read(window.inner_width()), read(window.inner_height()))
}

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|query| query.matches())
}
