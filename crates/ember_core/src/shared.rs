//! Thread-safe engine handle.
//!
//! Browser hosts are single-threaded and keep the engine in an
//! `Rc<RefCell<_>>`. Native hosts that deliver resize events on one thread
//! and frame callbacks on another share a [`SharedEngine`] instead: one
//! mutex guards both the surface dimensions and the particle state, so a
//! resize can never land in the middle of a tick.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;

use crate::clock::Clock;
use crate::engine::{EngineState, ParticleEngine, TickOutcome};
use crate::stats::EngineStats;
use crate::surface::{RenderSurface, SurfaceSize};

/// Cloneable, lock-guarded engine handle.
pub struct SharedEngine<S, R, C> {
    inner: Arc<Mutex<ParticleEngine<S, R, C>>>,
}

impl<S, R, C> Clone for SharedEngine<S, R, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, R, C> SharedEngine<S, R, C>
where
    S: RenderSurface,
    R: Rng,
    C: Clock,
{
    /// Wraps a mounted engine.
    #[must_use]
    pub fn new(engine: ParticleEngine<S, R, C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Runs one tick under the lock.
    pub fn tick(&self) -> TickOutcome {
        self.inner.lock().tick()
    }

    /// Resizes under the lock.
    pub fn resize(&self, viewport: SurfaceSize) -> bool {
        self.inner.lock().resize(viewport)
    }

    /// Tears down under the lock. Only the first caller gets the surface.
    pub fn teardown(&self) -> Option<S> {
        self.inner.lock().teardown()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.inner.lock().state()
    }

    /// Totals since mount.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.inner.lock().stats()
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<T>(&self, f: impl FnOnce(&mut ParticleEngine<S, R, C>) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl<S, R, C> std::fmt::Debug for SharedEngine<S, R, C>
where
    S: RenderSurface,
    R: Rng,
    C: Clock,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("engine", &*self.inner.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::EngineConfig;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_resize_and_tick_from_two_threads() {
        let engine = SharedEngine::new(ParticleEngine::mount_seeded(
            Some(RecordingSurface::default()),
            SurfaceSize::new(800, 600),
            EngineConfig::default(),
            7,
            ManualClock::default(),
        ));

        let resizer = {
            let engine = engine.clone();
            std::thread::spawn(move || {
                for i in 0..100u32 {
                    engine.resize(SurfaceSize::new(800 + i, 600 + i));
                }
            })
        };
        for _ in 0..100 {
            engine.tick();
        }
        resizer.join().unwrap();

        assert_eq!(engine.stats().ticks, 100);
        let surface = engine.teardown().unwrap();
        assert_eq!(surface.size(), SurfaceSize::new(899, 699));
        assert!(engine.teardown().is_none());
        assert_eq!(engine.state(), EngineState::TornDown);
    }

    #[test]
    fn test_with_gives_exclusive_access() {
        let engine = SharedEngine::new(ParticleEngine::mount_seeded(
            Some(RecordingSurface::default()),
            SurfaceSize::new(320, 240),
            EngineConfig::default(),
            3,
            ManualClock::default(),
        ));
        engine.tick();
        let alive = engine.with(|engine| engine.particles().len());
        assert_eq!(alive, 1);
    }
}
