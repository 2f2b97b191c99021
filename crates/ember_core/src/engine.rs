//! The ember particle engine.
//!
//! ```text
//! ┌──────────────────────────────── TICK ────────────────────────────────┐
//! │  clear surface → spawn (≤ 1) → advance all → draw all → cull (fresh)  │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host calls [`ParticleEngine::mount`] once, [`ParticleEngine::resize`]
//! on every viewport change, [`ParticleEngine::tick`] once per display
//! refresh, and [`ParticleEngine::teardown`] once on unmount. After teardown
//! the engine holds no surface, so a late frame callback cannot draw.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::particle::Particle;
use crate::stats::{EngineStats, TickStats};
use crate::surface::{Glow, RenderSurface, SurfaceSize};

/// Lifecycle state of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Animating every tick.
    Running,
    /// Mounted with reduced motion: sized and cleared, never drawn on.
    Still,
    /// Mounted without a usable surface. Does nothing.
    Inert,
    /// Torn down. Does nothing, forever.
    TornDown,
}

/// Result of a [`ParticleEngine::tick`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A full tick ran.
    Rendered(TickStats),
    /// Nothing to animate (inert or reduced motion).
    Idle,
    /// The engine has been torn down.
    Stopped,
}

impl TickOutcome {
    /// True if the host should schedule another frame.
    #[must_use]
    pub const fn should_reschedule(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    /// Tick statistics, if a tick ran.
    #[must_use]
    pub const fn stats(&self) -> Option<TickStats> {
        match self {
            Self::Rendered(stats) => Some(*stats),
            _ => None,
        }
    }
}

enum Stage<S> {
    Running(S),
    Still(S),
    Inert,
    TornDown,
}

/// Drifting ember background.
///
/// Generic over the surface, the random source and the clock so hosts and
/// tests can each supply their own.
pub struct ParticleEngine<S, R = ChaCha8Rng, C = SystemClock> {
    stage: Stage<S>,
    config: EngineConfig,
    rng: R,
    clock: C,
    /// Live set, in spawn order.
    particles: Vec<Particle>,
    /// Next tick's live set is built here, then swapped in.
    survivors: Vec<Particle>,
    stats: EngineStats,
}

impl<S, R, C> ParticleEngine<S, R, C>
where
    S: RenderSurface,
    R: Rng,
    C: Clock,
{
    /// Initialization hook.
    ///
    /// Sizes `surface` to `viewport` before anything is drawn. With no
    /// surface the engine is inert: it never draws and never fails. A config
    /// that fails [`EngineConfig::validate`] is replaced by the defaults,
    /// keeping its `motion` and `seed`.
    #[must_use]
    pub fn mount(
        surface: Option<S>,
        viewport: SurfaceSize,
        config: EngineConfig,
        rng: R,
        clock: C,
    ) -> Self {
        let config = checked(config);
        let stage = match surface {
            None => Stage::Inert,
            Some(mut surface) => {
                surface.set_size(viewport);
                if config.motion.is_reduced() {
                    surface.clear();
                    tracing::info!(
                        width = viewport.width,
                        height = viewport.height,
                        "ember background mounted still (reduced motion)"
                    );
                    Stage::Still(surface)
                } else {
                    tracing::info!(
                        width = viewport.width,
                        height = viewport.height,
                        max_particles = config.max_particles,
                        "ember background mounted"
                    );
                    Stage::Running(surface)
                }
            }
        };

        let capacity = if matches!(stage, Stage::Running(_)) {
            config.max_particles
        } else {
            0
        };

        Self {
            stage,
            rng,
            clock,
            particles: Vec::with_capacity(capacity),
            survivors: Vec::with_capacity(capacity),
            stats: EngineStats::default(),
            config,
        }
    }

    /// Viewport resize hook. Sets the surface to exactly `viewport`.
    ///
    /// Returns false if there is no surface to resize.
    pub fn resize(&mut self, viewport: SurfaceSize) -> bool {
        match &mut self.stage {
            Stage::Running(surface) | Stage::Still(surface) => {
                surface.set_size(viewport);
                tracing::debug!(
                    width = viewport.width,
                    height = viewport.height,
                    "ember surface resized"
                );
                true
            }
            Stage::Inert | Stage::TornDown => false,
        }
    }

    /// Runs one clear → spawn → update → draw → cull cycle.
    pub fn tick(&mut self) -> TickOutcome {
        let surface = match &mut self.stage {
            Stage::Running(surface) => surface,
            Stage::Still(_) | Stage::Inert => return TickOutcome::Idle,
            Stage::TornDown => return TickOutcome::Stopped,
        };

        // === PHASE 1: Clear ===
        surface.clear();
        let size = surface.size();

        // === PHASE 2: Spawn ===
        let mut spawned = 0;
        if self.particles.len() < self.config.max_particles {
            self.particles
                .push(Particle::spawn(&mut self.rng, size.width_f64(), &self.config));
            spawned = 1;
        }

        // === PHASE 3: Update ===
        for particle in &mut self.particles {
            particle.advance(&self.config.drift);
        }

        // === PHASE 4: Draw ===
        let now = self.clock.now_millis();
        for particle in &self.particles {
            surface.fill_glow(&Glow {
                x: particle.x,
                y: particle.y,
                radius: particle.radius,
                color: particle.color,
                alpha: particle.render_alpha(&self.config.flicker, now),
            });
        }
        let drawn = self.particles.len();

        // === PHASE 5: Cull ===
        let height = size.height_f64();
        self.survivors.clear();
        self.survivors.extend(
            self.particles
                .iter()
                .filter(|particle| !particle.is_below(height))
                .copied(),
        );
        std::mem::swap(&mut self.particles, &mut self.survivors);
        self.survivors.clear();

        let tick = TickStats {
            spawned,
            culled: drawn - self.particles.len(),
            drawn,
            alive: self.particles.len(),
        };
        self.stats.record(&tick);
        TickOutcome::Rendered(tick)
    }

    /// Teardown hook.
    ///
    /// Drops every particle and hands the surface back. Later calls to
    /// [`Self::tick`] and [`Self::resize`] do nothing. Calling it twice is
    /// harmless; the second call returns `None`.
    pub fn teardown(&mut self) -> Option<S> {
        let surface = match std::mem::replace(&mut self.stage, Stage::TornDown) {
            Stage::Running(surface) | Stage::Still(surface) => Some(surface),
            Stage::Inert | Stage::TornDown => None,
        };
        if surface.is_some() {
            tracing::info!(
                ticks = self.stats.ticks,
                spawned = self.stats.total_spawned,
                "ember background torn down"
            );
        }
        self.particles = Vec::new();
        self.survivors = Vec::new();
        surface
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        match self.stage {
            Stage::Running(_) => EngineState::Running,
            Stage::Still(_) => EngineState::Still,
            Stage::Inert => EngineState::Inert,
            Stage::TornDown => EngineState::TornDown,
        }
    }

    /// True if the host should drive a frame loop for this engine.
    #[must_use]
    pub const fn wants_frames(&self) -> bool {
        matches!(self.stage, Stage::Running(_))
    }

    /// Live particles, in spawn order.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Surface, while mounted.
    #[must_use]
    pub const fn surface(&self) -> Option<&S> {
        match &self.stage {
            Stage::Running(surface) | Stage::Still(surface) => Some(surface),
            Stage::Inert | Stage::TornDown => None,
        }
    }

    /// Totals since mount.
    #[must_use]
    pub const fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<S, C> ParticleEngine<S, ChaCha8Rng, C>
where
    S: RenderSurface,
    C: Clock,
{
    /// Mounts with a ChaCha generator seeded from `config.seed`, falling
    /// back to `fallback_seed`.
    #[must_use]
    pub fn mount_seeded(
        surface: Option<S>,
        viewport: SurfaceSize,
        config: EngineConfig,
        fallback_seed: u64,
        clock: C,
    ) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed.unwrap_or(fallback_seed));
        Self::mount(surface, viewport, config, rng, clock)
    }
}

fn checked(config: EngineConfig) -> EngineConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            tracing::warn!("ember config rejected, using defaults: {err}");
            EngineConfig {
                motion: config.motion,
                seed: config.seed,
                ..EngineConfig::default()
            }
        }
    }
}

impl<S, R, C> std::fmt::Debug for ParticleEngine<S, R, C>
where
    S: RenderSurface,
    R: Rng,
    C: Clock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleEngine")
            .field("state", &self.state())
            .field("alive", &self.particles.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
