//! # Ember Core
//!
//! A decorative particle engine: embers and golden sparks drift down a
//! transparent surface laid over a static backdrop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      HOST (browser, native)              │
//! ├──────────────────────────────────────────────────────────┤
//! │  mount ─► resize* ─► tick per frame ─► ... ─► teardown   │
//! │                          │                               │
//! │          clear → spawn → update → draw → cull            │
//! │                          │                               │
//! │                    RenderSurface                         │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Decorative** - a missing surface is a silent no-op, never an error
//! 2. **Deterministic** - randomness and time are injected; same seed, same frames
//! 3. **Bounded** - the live population never exceeds the configured cap
//! 4. **Clean teardown** - no surface writes after unmount
//!
//! ## Example
//!
//! ```rust
//! use ember_core::{EngineConfig, ManualClock, ParticleEngine, RecordingSurface, SurfaceSize};
//!
//! let mut engine = ParticleEngine::mount_seeded(
//!     Some(RecordingSurface::default()),
//!     SurfaceSize::new(800, 600),
//!     EngineConfig::default(),
//!     42,
//!     ManualClock::default(),
//! );
//!
//! engine.tick();
//! assert_eq!(engine.particles().len(), 1);
//!
//! let surface = engine.teardown();
//! assert!(surface.is_some());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod particle;
pub mod shared;
pub mod stats;
pub mod surface;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    ChannelRange, ColorSpec, DriftConfig, EngineConfig, FlickerConfig, MotionPreference,
    ProfileConfig, Range,
};
pub use engine::{EngineState, ParticleEngine, TickOutcome};
pub use error::{EngineError, EngineResult};
pub use particle::{EmberColor, Particle, ParticleKind};
pub use shared::SharedEngine;
pub use stats::{EngineStats, TickStats};
pub use surface::{DrawCommand, Glow, RecordingSurface, RenderSurface, SurfaceSize};
