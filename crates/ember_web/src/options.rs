//! Host-side option handling that does not touch the DOM.

use ember_core::{EngineConfig, SurfaceSize};

use crate::error::WebError;

/// Media query for the platform reduced-motion setting.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Parses an optional TOML config and resolves `motion = "system"`.
///
/// # Errors
///
/// Returns [`WebError::Config`] if the TOML is malformed or invalid.
pub fn parse_config(
    config_toml: Option<&str>,
    system_prefers_reduced: bool,
) -> Result<EngineConfig, WebError> {
    let config = match config_toml {
        Some(text) if !text.trim().is_empty() => EngineConfig::from_toml_str(text)?,
        _ => EngineConfig::default(),
    };
    Ok(config.with_system_motion(system_prefers_reduced))
}

/// Like [`parse_config`], but falls back to defaults on a bad config.
#[must_use]
pub fn resolve_config(config_toml: Option<&str>, system_prefers_reduced: bool) -> EngineConfig {
    parse_config(config_toml, system_prefers_reduced).unwrap_or_else(|err| {
        tracing::warn!("ember config rejected, using defaults: {err}");
        EngineConfig::default().with_system_motion(system_prefers_reduced)
    })
}

/// Converts `window.innerWidth/innerHeight` into a surface size.
///
/// Non-finite or negative values become zero; fractions are truncated the
/// way assigning to `canvas.width` does.
#[must_use]
pub fn viewport_from_inner(width: f64, height: f64) -> SurfaceSize {
    SurfaceSize::new(to_pixels(width), to_pixels(height))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_pixels(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

/// Seed in `[0, 2^53)` from a `Math.random()` sample in `[0, 1)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn seed_from_unit(sample: f64) -> u64 {
    const MANTISSA: f64 = 9_007_199_254_740_992.0; // 2^53
    (sample.clamp(0.0, 1.0) * MANTISSA) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::MotionPreference;

    #[test]
    fn test_missing_config_uses_defaults() {
        assert_eq!(resolve_config(None, false), EngineConfig::default());
        assert_eq!(resolve_config(Some("   "), false), EngineConfig::default());
    }

    #[test]
    fn test_bad_config_falls_back() {
        let config = resolve_config(Some("max_particles = 0"), false);
        assert_eq!(config.max_particles, 150);
        assert!(parse_config(Some("max_particles = 0"), false).is_err());
    }

    #[test]
    fn test_system_motion_follows_media_query() {
        let text = "motion = \"system\"";
        assert_eq!(
            resolve_config(Some(text), true).motion,
            MotionPreference::Reduced
        );
        assert_eq!(resolve_config(Some(text), false).motion, MotionPreference::Full);
        // An explicit preference wins over the platform
        assert_eq!(
            resolve_config(Some("motion = \"full\""), true).motion,
            MotionPreference::Full
        );
    }

    #[test]
    fn test_viewport_conversion() {
        assert_eq!(viewport_from_inner(1920.0, 1080.0), SurfaceSize::new(1920, 1080));
        assert_eq!(viewport_from_inner(800.7, 600.2), SurfaceSize::new(800, 600));
        assert_eq!(viewport_from_inner(f64::NAN, -5.0), SurfaceSize::ZERO);
    }

    #[test]
    fn test_seed_range() {
        assert_eq!(seed_from_unit(0.0), 0);
        assert!(seed_from_unit(0.999_999) < 1 << 53);
        assert_ne!(seed_from_unit(0.25), seed_from_unit(0.5));
    }
}
