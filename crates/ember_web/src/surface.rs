//! `<canvas>` 2D context as an engine render surface.

use std::f64::consts::TAU;

use ember_core::{Glow, RenderSurface, SurfaceSize};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::error::WebError;

/// Render surface backed by a canvas element.
#[derive(Debug, Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    /// Reused CSS colour buffers for the gradient stops.
    inner_css: String,
    outer_css: String,
}

impl CanvasSurface {
    /// Looks up `canvas_id` and acquires its 2D context.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::CanvasNotFound`] if the element is missing or not a
    /// canvas, and [`WebError::ContextUnavailable`] if it has no 2D context.
    pub fn find(document: &Document, canvas_id: &str) -> Result<Self, WebError> {
        let canvas = document
            .get_element_by_id(canvas_id)
            .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| WebError::CanvasNotFound(canvas_id.to_string()))?;
        Self::acquire(canvas, canvas_id)
    }

    fn acquire(canvas: HtmlCanvasElement, canvas_id: &str) -> Result<Self, WebError> {
        let context = canvas
            .get_context("2d")?
            .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| WebError::ContextUnavailable(canvas_id.to_string()))?;
        Ok(Self {
            canvas,
            context,
            inner_css: String::with_capacity(32),
            outer_css: String::with_capacity(32),
        })
    }

    /// The underlying canvas element.
    #[must_use]
    pub const fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn try_fill_glow(&mut self, glow: &Glow) -> Result<(), WebError> {
        let gradient = self
            .context
            .create_radial_gradient(glow.x, glow.y, 0.0, glow.x, glow.y, glow.radius)?;
        glow.write_css_stops(&mut self.inner_css, &mut self.outer_css)?;
        gradient.add_color_stop(Glow::INNER_STOP, &self.inner_css)?;
        gradient.add_color_stop(Glow::OUTER_STOP, &self.outer_css)?;

        self.context.begin_path();
        self.context.set_fill_style_canvas_gradient(&gradient);
        self.context.arc(glow.x, glow.y, glow.radius, 0.0, TAU)?;
        self.context.fill();
        Ok(())
    }
}

impl RenderSurface for CanvasSurface {
    fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.canvas.width(), self.canvas.height())
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
    }

    fn clear(&mut self) {
        let size = self.size();
        self.context.set_global_alpha(1.0);
        self.context
            .clear_rect(0.0, 0.0, size.width_f64(), size.height_f64());
    }

    fn fill_glow(&mut self, glow: &Glow) {
        // A glow the browser refuses (e.g. a degenerate radius) is skipped.
        if let Err(err) = self.try_fill_glow(glow) {
            tracing::trace!("glow skipped: {err}");
        }
    }
}
