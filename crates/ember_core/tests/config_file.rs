//! # Shipped Config Test
//!
//! The sample config in `config/` must load, and must describe the same
//! field as the built-in defaults apart from following the system motion
//! preference.

use ember_core::{EngineConfig, MotionPreference};

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/embers.toml");

#[test]
fn sample_config_matches_defaults() {
    let config = EngineConfig::load(SAMPLE).expect("sample config loads");

    assert_eq!(config.motion, MotionPreference::System);
    let expected = EngineConfig {
        motion: MotionPreference::System,
        ..EngineConfig::default()
    };
    assert_eq!(config, expected);
}

#[test]
fn sample_config_resolves_against_platform() {
    let config = EngineConfig::load(SAMPLE).unwrap();
    assert!(config.clone().with_system_motion(true).motion.is_reduced());
    assert!(!config.with_system_motion(false).motion.is_reduced());
}
