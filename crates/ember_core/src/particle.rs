//! Particle data model.
//!
//! A particle is born just above the top edge, falls a fixed number of pixels
//! per tick with a gentle sideways sway, and is dropped the first tick it
//! passes the bottom edge.

use std::fmt;

use rand::Rng;

use crate::config::{DriftConfig, EngineConfig, FlickerConfig};

/// RGB colour template; alpha is supplied at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmberColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl EmberColor {
    /// Bright golden spark colour.
    pub const GOLD: Self = Self::new(255, 220, 100);

    /// Creates a new colour.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats as a CSS `rgba()` colour with the given alpha.
    #[must_use]
    pub fn css_rgba(self, alpha: f64) -> String {
        let mut css = String::with_capacity(24);
        // Writing into a String cannot fail.
        let _ = self.write_css_rgba(&mut css, alpha);
        css
    }

    /// Appends the CSS `rgba()` colour to `out` without allocating.
    ///
    /// # Errors
    ///
    /// Propagates a failure of the underlying writer.
    pub fn write_css_rgba<W: fmt::Write>(self, out: &mut W, alpha: f64) -> fmt::Result {
        write!(out, "rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for EmberColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Which visual profile a particle was spawned with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// Warm, slow, steady glow.
    Ember,
    /// Small, fast, twinkling gold.
    Spark,
}

impl ParticleKind {
    /// Independent Bernoulli draw: spark with `spark_probability`.
    ///
    /// The probability is clamped into [0, 1]; NaN counts as 0.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, spark_probability: f64) -> Self {
        let probability = if spark_probability.is_nan() {
            0.0
        } else {
            spark_probability.clamp(0.0, 1.0)
        };
        if rng.gen_bool(probability) {
            Self::Spark
        } else {
            Self::Ember
        }
    }

    /// Sparks twinkle; embers do not.
    #[inline]
    #[must_use]
    pub const fn is_sparkle(self) -> bool {
        matches!(self, Self::Spark)
    }
}

/// One ember or spark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Horizontal position in pixels.
    pub x: f64,
    /// Vertical position in pixels, growing downwards.
    pub y: f64,
    /// Glow radius in pixels.
    pub radius: f64,
    /// Descent per tick in pixels.
    pub speed: f64,
    /// Base alpha before flicker.
    pub opacity: f64,
    /// Colour template.
    pub color: EmberColor,
    /// Spawn profile.
    pub kind: ParticleKind,
    /// Reserved flicker shaping factor. Stored, not yet read by rendering.
    pub flicker_intensity: f64,
}

impl Particle {
    /// Spawns a particle at a random `x` across `width`, at `config.spawn_y`.
    ///
    /// Draw order is fixed (kind, x, radius, speed, opacity, colour, flicker)
    /// so a seeded generator reproduces the same particles.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f64, config: &EngineConfig) -> Self {
        let kind = ParticleKind::roll(rng, config.spark_probability);
        let profile = config.profile(kind);

        let x = if width > 0.0 {
            rng.gen_range(0.0..width)
        } else {
            0.0
        };

        Self {
            x,
            y: config.spawn_y,
            radius: profile.radius.sample(rng),
            speed: profile.speed.sample(rng),
            opacity: profile.opacity.sample(rng),
            color: profile.color.pick(rng),
            kind,
            flicker_intensity: profile.flicker_intensity.sample(rng),
        }
    }

    /// Falls by `speed`, then sways sideways based on the new height.
    #[inline]
    pub fn advance(&mut self, drift: &DriftConfig) {
        self.y += self.speed;
        self.x += drift.offset(self.y);
    }

    /// Alpha to render with at `now_ms`.
    #[inline]
    #[must_use]
    pub fn render_alpha(&self, flicker: &FlickerConfig, now_ms: f64) -> f64 {
        let alpha = if self.kind.is_sparkle() {
            self.opacity * flicker.factor(now_ms)
        } else {
            self.opacity
        };
        alpha.clamp(0.0, 1.0)
    }

    /// True once the particle has passed the bottom edge.
    #[inline]
    #[must_use]
    pub fn is_below(&self, height: f64) -> bool {
        self.y > height
    }
}
