//! # Engine Configuration
//!
//! All tuning for the ember field lives here: population cap, spawn profiles,
//! drift and flicker shaping, motion preference and an optional seed.
//!
//! Every field has a default, so an empty TOML document is a valid config.
//! Profile tables (`[ember]`, `[spark]`) must be given in full when overridden.
//!
//! ```toml
//! max_particles = 150
//! spark_probability = 0.2
//! motion = "system"
//!
//! [flicker]
//! rate = 0.01
//! amplitude = 0.3
//! base = 0.7
//! ```

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::particle::EmberColor;

/// Default population cap.
pub const DEFAULT_MAX_PARTICLES: usize = 150;
/// Default spawn height, slightly above the top edge.
pub const DEFAULT_SPAWN_Y: f64 = -10.0;
/// Default probability that a spawn uses the spark profile.
pub const DEFAULT_SPARK_PROBABILITY: f64 = 0.2;

/// Half-open `[min, max)` sampling range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    /// Inclusive lower bound.
    pub min: f64,
    /// Exclusive upper bound.
    pub max: f64,
}

impl Range {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draws a uniform sample.
    ///
    /// A collapsed, inverted or non-finite range yields `min` without
    /// touching the generator.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max > self.min && (self.max - self.min).is_finite() {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }

    /// Returns true if `value` lies within `[min, max]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, name: &str) -> EngineResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(EngineError::invalid(format!("{name} must be finite")));
        }
        if self.min > self.max {
            return Err(EngineError::invalid(format!(
                "{name}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Inclusive integer range for one colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRange {
    /// Smallest value.
    pub min: u8,
    /// Largest value.
    pub max: u8,
}

impl ChannelRange {
    /// Creates a new channel range.
    #[must_use]
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// A channel pinned to one value.
    #[must_use]
    pub const fn fixed(value: u8) -> Self {
        Self::new(value, value)
    }

    fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> u8 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

/// How a profile picks its colour template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorSpec {
    /// Always the same colour.
    Fixed {
        /// Red channel.
        r: u8,
        /// Green channel.
        g: u8,
        /// Blue channel.
        b: u8,
    },
    /// Each channel drawn independently at spawn.
    Random {
        /// Red channel range.
        red: ChannelRange,
        /// Green channel range.
        green: ChannelRange,
        /// Blue channel range.
        blue: ChannelRange,
    },
}

impl ColorSpec {
    /// Picks a colour for a new particle.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> EmberColor {
        match *self {
            Self::Fixed { r, g, b } => EmberColor::new(r, g, b),
            Self::Random { red, green, blue } => {
                let r = red.sample(rng);
                let g = green.sample(rng);
                let b = blue.sample(rng);
                EmberColor::new(r, g, b)
            }
        }
    }

    fn validate(&self, name: &str) -> EngineResult<()> {
        if let Self::Random { red, green, blue } = self {
            for (channel, range) in [("red", red), ("green", green), ("blue", blue)] {
                if range.min > range.max {
                    return Err(EngineError::invalid(format!(
                        "{name}.color.{channel}: min {} exceeds max {}",
                        range.min, range.max
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parameter ranges for one particle profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Drawn circle radius in pixels.
    pub radius: Range,
    /// Descent in pixels per tick.
    pub speed: Range,
    /// Base alpha before flicker.
    pub opacity: Range,
    /// Reserved flicker shaping factor.
    pub flicker_intensity: Range,
    /// Colour template.
    pub color: ColorSpec,
}

impl ProfileConfig {
    /// Warm, slow, fairly opaque embers.
    #[must_use]
    pub const fn ember() -> Self {
        Self {
            radius: Range::new(1.0, 3.5),
            speed: Range::new(1.0, 3.0),
            opacity: Range::new(0.5, 1.0),
            flicker_intensity: Range::new(0.7, 1.0),
            color: ColorSpec::Random {
                red: ChannelRange::new(155, 254),
                green: ChannelRange::new(50, 99),
                blue: ChannelRange::fixed(0),
            },
        }
    }

    /// Small, fast, golden sparks.
    #[must_use]
    pub const fn spark() -> Self {
        Self {
            radius: Range::new(0.5, 2.0),
            speed: Range::new(1.5, 4.5),
            opacity: Range::new(0.4, 1.0),
            flicker_intensity: Range::new(0.7, 1.0),
            color: ColorSpec::Fixed {
                r: 255,
                g: 220,
                b: 100,
            },
        }
    }

    fn validate(&self, name: &str) -> EngineResult<()> {
        self.radius.validate(&format!("{name}.radius"))?;
        self.speed.validate(&format!("{name}.speed"))?;
        self.opacity.validate(&format!("{name}.opacity"))?;
        self.flicker_intensity
            .validate(&format!("{name}.flicker_intensity"))?;
        self.color.validate(name)?;

        if self.radius.min <= 0.0 {
            return Err(EngineError::invalid(format!("{name}.radius must be > 0")));
        }
        // Particles only fall.
        if self.speed.min <= 0.0 {
            return Err(EngineError::invalid(format!("{name}.speed must be > 0")));
        }
        if self.opacity.min < 0.0 || self.opacity.max > 1.0 {
            return Err(EngineError::invalid(format!(
                "{name}.opacity must lie within [0, 1]"
            )));
        }
        Ok(())
    }
}

/// Lateral sway applied each tick: `x += sin(y * frequency) * amplitude`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// Radians per pixel of descent.
    pub frequency: f64,
    /// Pixels of sway per tick at the peak.
    pub amplitude: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            frequency: 0.1,
            amplitude: 0.3,
        }
    }
}

impl DriftConfig {
    /// Horizontal offset for a particle now at height `y`.
    #[inline]
    #[must_use]
    pub fn offset(&self, y: f64) -> f64 {
        (y * self.frequency).sin() * self.amplitude
    }
}

/// Spark twinkle: `opacity * (sin(now_ms * rate) * amplitude + base)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlickerConfig {
    /// Radians per millisecond.
    pub rate: f64,
    /// Swing around `base`.
    pub amplitude: f64,
    /// Centre of the modulation.
    pub base: f64,
}

impl Default for FlickerConfig {
    fn default() -> Self {
        Self {
            rate: 0.01,
            amplitude: 0.3,
            base: 0.7,
        }
    }
}

impl FlickerConfig {
    /// Modulation factor at `now_ms`.
    #[inline]
    #[must_use]
    pub fn factor(&self, now_ms: f64) -> f64 {
        (now_ms * self.rate).sin() * self.amplitude + self.base
    }

    /// Lowest and highest factor the modulation can produce.
    #[must_use]
    pub fn envelope(&self) -> (f64, f64) {
        (self.base - self.amplitude.abs(), self.base + self.amplitude.abs())
    }
}

/// Whether the background animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionPreference {
    /// Always animate.
    #[default]
    Full,
    /// Never animate: the surface stays clear over the backdrop.
    Reduced,
    /// Follow the platform's reduced-motion setting.
    System,
}

impl MotionPreference {
    /// Replaces `System` with the platform's answer.
    #[must_use]
    pub const fn resolve(self, system_prefers_reduced: bool) -> Self {
        match self {
            Self::System if system_prefers_reduced => Self::Reduced,
            Self::System => Self::Full,
            other => other,
        }
    }

    /// True only for an explicit (or resolved) `Reduced`.
    #[must_use]
    pub const fn is_reduced(self) -> bool {
        matches!(self, Self::Reduced)
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on live particles.
    pub max_particles: usize,
    /// Height new particles appear at.
    pub spawn_y: f64,
    /// Bernoulli probability of the spark profile.
    pub spark_probability: f64,
    /// Ember profile.
    pub ember: ProfileConfig,
    /// Spark profile.
    pub spark: ProfileConfig,
    /// Lateral sway.
    pub drift: DriftConfig,
    /// Spark twinkle.
    pub flicker: FlickerConfig,
    /// Motion preference.
    pub motion: MotionPreference,
    /// Fixed RNG seed. Hosts pick one when absent.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_particles: DEFAULT_MAX_PARTICLES,
            spawn_y: DEFAULT_SPAWN_Y,
            spark_probability: DEFAULT_SPARK_PROBABILITY,
            ember: ProfileConfig::ember(),
            spark: ProfileConfig::spark(),
            drift: DriftConfig::default(),
            flicker: FlickerConfig::default(),
            motion: MotionPreference::Full,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Parse`] for malformed TOML and
    /// [`EngineError::InvalidConfig`] when validation fails.
    pub fn from_toml_str(text: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read, otherwise the
    /// errors of [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), max_particles = config.max_particles, "loaded engine config");
        Ok(config)
    }

    /// Checks every engine invariant the config can break.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_particles == 0 {
            return Err(EngineError::invalid("max_particles must be > 0"));
        }
        if !self.spawn_y.is_finite() {
            return Err(EngineError::invalid("spawn_y must be finite"));
        }
        if !(0.0..=1.0).contains(&self.spark_probability) {
            return Err(EngineError::invalid(
                "spark_probability must lie within [0, 1]",
            ));
        }
        self.ember.validate("ember")?;
        self.spark.validate("spark")?;

        if !self.drift.frequency.is_finite() || !self.drift.amplitude.is_finite() {
            return Err(EngineError::invalid("drift must be finite"));
        }
        if !self.flicker.rate.is_finite() {
            return Err(EngineError::invalid("flicker.rate must be finite"));
        }
        let (low, high) = self.flicker.envelope();
        if !(low >= 0.0 && high <= 1.0) {
            return Err(EngineError::invalid(format!(
                "flicker envelope [{low}, {high}] must lie within [0, 1]"
            )));
        }
        Ok(())
    }

    /// Resolves a `System` motion preference against the platform setting.
    #[must_use]
    pub fn with_system_motion(mut self, system_prefers_reduced: bool) -> Self {
        self.motion = self.motion.resolve(system_prefers_reduced);
        self
    }

    /// Profile for the given particle kind.
    #[must_use]
    pub const fn profile(&self, kind: crate::particle::ParticleKind) -> &ProfileConfig {
        match kind {
            crate::particle::ParticleKind::Ember => &self.ember,
            crate::particle::ParticleKind::Spark => &self.spark,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_defaults_are_valid() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            max_particles = 40
            motion = "system"
            seed = 7

            [flicker]
            rate = 0.02
            "#,
        )
        .unwrap();

        assert_eq!(config.max_particles, 40);
        assert_eq!(config.motion, MotionPreference::System);
        assert_eq!(config.seed, Some(7));
        assert!((config.flicker.rate - 0.02).abs() < f64::EPSILON);
        // Untouched fields keep their defaults
        assert!((config.flicker.base - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.ember, ProfileConfig::ember());
    }

    #[test]
    fn test_profile_table_override() {
        let config = EngineConfig::from_toml_str(
            r#"
            [spark]
            radius = { min = 0.2, max = 0.4 }
            speed = { min = 5.0, max = 6.0 }
            opacity = { min = 0.9, max = 1.0 }
            flicker_intensity = { min = 0.7, max = 1.0 }
            color = { kind = "fixed", r = 200, g = 200, b = 255 }
            "#,
        )
        .unwrap();

        assert_eq!(config.spark.speed, Range::new(5.0, 6.0));
        assert_eq!(
            config.spark.color,
            ColorSpec::Fixed {
                r: 200,
                g: 200,
                b: 255
            }
        );
    }

    #[test]
    fn test_rejects_zero_cap() {
        let err = EngineConfig::from_toml_str("max_particles = 0").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_probability() {
        assert!(EngineConfig::from_toml_str("spark_probability = 1.5").is_err());
        assert!(EngineConfig::from_toml_str("spark_probability = -0.1").is_err());
    }

    #[test]
    fn test_rejects_rising_particles() {
        let mut config = EngineConfig::default();
        config.ember.speed = Range::new(-1.0, 2.0);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ember.speed"));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let mut config = EngineConfig::default();
        config.spark.radius = Range::new(3.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_flicker_outside_unit_interval() {
        let mut config = EngineConfig::default();
        config.flicker.base = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = EngineConfig::from_toml_str("max_particles = \"many\"").unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EngineConfig::load("/definitely/not/here/embers.toml").unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
    }

    #[test]
    fn test_serialized_defaults_parse_back() {
        let text = toml::to_string(&EngineConfig::default()).unwrap();
        assert_eq!(
            EngineConfig::from_toml_str(&text).unwrap(),
            EngineConfig::default()
        );
    }

    #[test]
    fn test_motion_resolution() {
        assert_eq!(
            MotionPreference::System.resolve(true),
            MotionPreference::Reduced
        );
        assert_eq!(MotionPreference::System.resolve(false), MotionPreference::Full);
        assert_eq!(MotionPreference::Full.resolve(true), MotionPreference::Full);
        assert!(!MotionPreference::System.is_reduced());
    }

    #[test]
    fn test_collapsed_range_yields_min() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((Range::new(4.0, 4.0).sample(&mut rng) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unbounded_range_yields_min() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!((Range::new(1.0, f64::INFINITY).sample(&mut rng) - 1.0).abs() < f64::EPSILON);
        assert!((Range::new(-f64::MAX, f64::MAX).sample(&mut rng) + f64::MAX).abs() < f64::EPSILON);
        assert!(Range::new(f64::NAN, 2.0).sample(&mut rng).is_nan());
    }

    #[test]
    fn test_ember_colors_stay_warm() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let spec = ProfileConfig::ember().color;
        for _ in 0..1_000 {
            let color = spec.pick(&mut rng);
            assert!((155..=254).contains(&color.r));
            assert!((50..=99).contains(&color.g));
            assert_eq!(color.b, 0);
        }
    }
}
