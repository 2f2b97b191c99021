//! # Ember Simulator
//!
//! Runs the engine headless against a recording surface and reports what a
//! browser would have drawn. Useful for tuning a config before shipping it.
//!
//! Usage: `ember_sim [CONFIG.toml] [TICKS] [WIDTHxHEIGHT]`
//!
//! Log level follows `RUST_LOG` (default `info`).

use ember_core::{
    EngineConfig, EngineResult, ParticleEngine, ParticleKind, RecordingSurface, SurfaceSize,
    SystemClock,
};
use tracing_subscriber::EnvFilter;

/// Seed used when the config does not pin one.
const DEFAULT_SEED: u64 = 0x00E4_BE45;
/// Ticks to run when none are given (10 s at 60 Hz).
const DEFAULT_TICKS: u64 = 600;
/// Viewport used when none is given.
const DEFAULT_VIEWPORT: SurfaceSize = SurfaceSize::new(1920, 1080);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: ember_sim [CONFIG.toml] [TICKS] [WIDTHxHEIGHT]");
        return;
    }

    if let Err(err) = run(&args) {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> EngineResult<()> {
    let config = match args.first().filter(|a| a.ends_with(".toml")) {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let rest = if args.first().is_some_and(|a| a.ends_with(".toml")) {
        &args[1..]
    } else {
        args
    };

    let ticks = rest
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);
    let viewport = rest
        .get(1)
        .map(String::as_str)
        .and_then(parse_viewport)
        .unwrap_or(DEFAULT_VIEWPORT);

    let surface = simulate(config, ticks, viewport);
    tracing::debug!(commands = surface.total_commands(), "surface commands issued");
    Ok(())
}

/// Runs `ticks` ticks and returns the torn-down surface.
fn simulate(config: EngineConfig, ticks: u64, viewport: SurfaceSize) -> RecordingSurface {
    let mut engine = ParticleEngine::mount_seeded(
        Some(RecordingSurface::counting(SurfaceSize::ZERO)),
        viewport,
        config,
        DEFAULT_SEED,
        SystemClock,
    );

    let mut glows = 0usize;
    for _ in 0..ticks {
        if let Some(stats) = engine.tick().stats() {
            glows += stats.drawn;
        }
    }

    let sparks = engine
        .particles()
        .iter()
        .filter(|p| p.kind == ParticleKind::Spark)
        .count();
    let stats = engine.stats();
    tracing::info!(
        ticks = stats.ticks,
        spawned = stats.total_spawned,
        culled = stats.total_culled,
        peak_alive = stats.peak_alive,
        alive = engine.particles().len(),
        sparks,
        glows,
        "simulation finished"
    );

    engine
        .teardown()
        .unwrap_or_else(|| RecordingSurface::counting(viewport))
}

fn parse_viewport(text: &str) -> Option<SurfaceSize> {
    let (width, height) = text.split_once('x')?;
    Some(SurfaceSize::new(width.parse().ok()?, height.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_viewport() {
        assert_eq!(parse_viewport("800x600"), Some(SurfaceSize::new(800, 600)));
        assert_eq!(parse_viewport("800"), None);
        assert_eq!(parse_viewport("wide x tall"), None);
    }

    #[test]
    fn test_run_without_config() {
        let args = vec!["30".to_string(), "320x240".to_string()];
        assert!(run(&args).is_ok());
    }

    #[test]
    fn test_simulation_keeps_no_command_log() {
        let surface = simulate(EngineConfig::default(), 2_000, SurfaceSize::new(320, 240));
        assert!(surface.commands().is_empty());
        // One resize, then a clear and at least one glow per tick.
        assert!(surface.total_commands() > 1 + 2 * 2_000);
    }

    #[test]
    fn test_missing_config_is_reported() {
        let args = vec!["/nonexistent/embers.toml".to_string()];
        assert!(run(&args).is_err());
    }
}
