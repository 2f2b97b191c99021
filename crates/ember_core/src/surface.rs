//! Render surface abstraction.
//!
//! The engine only ever needs four things from a surface: read and write its
//! pixel size, wipe it, and fill a soft radial glow. Browser canvases, GPU
//! back-ends and the headless [`RecordingSurface`] all fit behind this trait.

use std::fmt;

use crate::particle::EmberColor;

/// Pixel dimensions of a surface or viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// A zero-sized surface.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width as `f64`.
    #[inline]
    #[must_use]
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    #[inline]
    #[must_use]
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// True if either side is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A soft circular glow: `alpha` at the centre fading to zero at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Centre x in pixels.
    pub x: f64,
    /// Centre y in pixels.
    pub y: f64,
    /// Outer radius in pixels.
    pub radius: f64,
    /// Colour template.
    pub color: EmberColor,
    /// Alpha at the centre, in [0, 1].
    pub alpha: f64,
}

impl Glow {
    /// Gradient offset of the centre stop.
    pub const INNER_STOP: f32 = 0.0;
    /// Gradient offset of the transparent rim stop.
    pub const OUTER_STOP: f32 = 1.0;

    /// Writes the CSS colours of both gradient stops into reusable buffers.
    ///
    /// Both buffers are cleared first; once they have grown to fit, no
    /// further allocation happens.
    ///
    /// # Errors
    ///
    /// Only if formatting fails, which a `String` never does.
    pub fn write_css_stops(&self, inner: &mut String, outer: &mut String) -> fmt::Result {
        inner.clear();
        outer.clear();
        self.color.write_css_rgba(inner, self.alpha)?;
        self.color.write_css_rgba(outer, 0.0)
    }
}

/// A 2D drawing surface the engine renders onto.
pub trait RenderSurface {
    /// Current pixel size.
    fn size(&self) -> SurfaceSize;

    /// Resizes the backing store. Implementations must apply exactly `size`.
    fn set_size(&mut self, size: SurfaceSize);

    /// Clears the whole surface to transparent.
    fn clear(&mut self);

    /// Fills a radial-gradient circle.
    fn fill_glow(&mut self, glow: &Glow);
}

/// A command recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Surface resized.
    Resize(SurfaceSize),
    /// Whole surface cleared.
    Clear,
    /// Glow filled.
    Glow(Glow),
}

/// Headless surface that records every call.
///
/// Used by the simulator, benches and tests. [`RecordingSurface::new`] keeps
/// the full command log until drained; [`RecordingSurface::counting`] only
/// counts, so long runs hold no per-command memory.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: SurfaceSize,
    commands: Vec<DrawCommand>,
    total: u64,
    retain: bool,
}

impl RecordingSurface {
    /// Creates a logging surface with the given initial size.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::with_capacity(1024),
            total: 0,
            retain: true,
        }
    }

    /// Creates a surface that counts commands without keeping them.
    #[must_use]
    pub const fn counting(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
            total: 0,
            retain: false,
        }
    }

    /// Every command since creation or the last [`Self::take_commands`].
    /// Always empty for a counting surface.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the command log.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of commands currently in the log.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Commands issued since creation, drained or not.
    #[must_use]
    pub const fn total_commands(&self) -> u64 {
        self.total
    }

    /// Recorded glows, in draw order.
    pub fn glows(&self) -> impl Iterator<Item = &Glow> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Glow(glow) => Some(glow),
            _ => None,
        })
    }

    fn record(&mut self, command: DrawCommand) {
        self.total += 1;
        if self.retain {
            self.commands.push(command);
        }
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(SurfaceSize::ZERO)
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
        self.record(DrawCommand::Resize(size));
    }

    fn clear(&mut self) {
        self.record(DrawCommand::Clear);
    }

    fn fill_glow(&mut self, glow: &Glow) {
        self.record(DrawCommand::Glow(*glow));
    }
}
