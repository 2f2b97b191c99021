//! Benchmark for the engine tick.
//!
//! TARGET: a saturated 150-particle field well under 1% of a 16ms frame
//!
//! Run with: cargo bench --package ember_core --bench tick_benchmark

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use ember_core::{
    EngineConfig, ManualClock, Particle, ParticleEngine, RecordingSurface, RenderSurface,
    SurfaceSize,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Surface that discards everything, so only engine work is measured.
#[derive(Default)]
struct NullSurface {
    size: SurfaceSize,
}

impl RenderSurface for NullSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn set_size(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn clear(&mut self) {}

    fn fill_glow(&mut self, glow: &ember_core::Glow) {
        black_box(glow);
    }
}

fn benchmark_saturated_tick(c: &mut Criterion) {
    let clock = ManualClock::new(0.0);
    let mut engine = ParticleEngine::mount_seeded(
        Some(NullSurface::default()),
        SurfaceSize::new(1920, 1080),
        EngineConfig::default(),
        42,
        clock.clone(),
    );
    // Warm up to a full field
    for _ in 0..1_000 {
        engine.tick();
    }

    let mut group = c.benchmark_group("tick");
    group.throughput(Throughput::Elements(150));
    group.bench_function("saturated_150", |b| {
        b.iter(|| {
            clock.advance(16.0);
            black_box(engine.tick())
        });
    });
    group.finish();
}

fn benchmark_recording_tick(c: &mut Criterion) {
    c.bench_function("recording_surface_60_ticks", |b| {
        b.iter_batched(
            || {
                ParticleEngine::mount_seeded(
                    Some(RecordingSurface::default()),
                    SurfaceSize::new(1280, 720),
                    EngineConfig::default(),
                    7,
                    ManualClock::default(),
                )
            },
            |mut engine| {
                for _ in 0..60 {
                    black_box(engine.tick());
                }
                engine
            },
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_spawn(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    c.bench_function("spawn_particle", |b| {
        b.iter(|| black_box(Particle::spawn(&mut rng, black_box(1920.0), &config)));
    });
}

criterion_group!(
    benches,
    benchmark_saturated_tick,
    benchmark_recording_tick,
    benchmark_spawn
);
criterion_main!(benches);
