//! Engine hot-path benchmarks.
//!
//! A frame at 60 Hz has a 16.67ms budget. The numbers here cover the parts
//! the engine owns: rectangle overlap checks, particle advancement, and a
//! full headless frame with a busy game.
//!
//! Run with: `cargo bench --bench engine_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_pcg::Pcg64;

use arcade_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A grid of `count` 20x20 rectangles 15px apart, so neighbours overlap.
fn rect_grid(count: usize) -> Vec<Rect> {
    let columns = 32;
    (0..count)
        .map(|i| {
            let x = (i % columns) as f64 * 15.0;
            let y = (i / columns) as f64 * 15.0;
            Rect::new(x, y, 20.0, 20.0)
        })
        .collect()
}

/// Emits a burst of particles every frame and checks every pair of a few
/// dozen rectangles.
struct Fountain {
    rects: Vec<Rect>,
    hits: usize,
}

impl Game for Fountain {
    fn capabilities(&self) -> Capabilities {
        Capabilities::UPDATE | Capabilities::RENDER
    }

    fn update(&mut self, ctx: &mut GameContext<'_>, _delta_ms: f64) {
        let width = ctx.width();
        for _ in 0..10 {
            let x = ctx.random_range(0.0, width);
            ctx.emit_particle(x, 300.0, ParticleSpec::default());
        }
        self.hits = 0;
        for (i, a) in self.rects.iter().enumerate() {
            for b in &self.rects[i + 1..] {
                if ctx.check_collision(a, b) {
                    self.hits += 1;
                }
            }
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        for rect in &self.rects {
            surface.fill_rect(*rect, Color::RED);
        }
    }
}

fn fountain(_ctx: &mut GameContext<'_>) -> Box<dyn Game> {
    Box::new(Fountain {
        rects: rect_grid(48),
        hits: 0,
    })
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_overlaps(c: &mut Criterion) {
    let rects = rect_grid(256);
    c.bench_function("overlaps_256_all_pairs", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for (i, a) in rects.iter().enumerate() {
                for other in &rects[i + 1..] {
                    if overlaps(black_box(a), black_box(other)) {
                        hits += 1;
                    }
                }
            }
            black_box(hits)
        });
    });
}

fn bench_particle_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_advance");
    for count in [100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut rng = Pcg64::seed_from_u64(7);
            let mut system = ParticleSystem::new();
            for i in 0..count {
                system.emit(&mut rng, i as f64, 0.0, ParticleSpec::default());
            }
            b.iter(|| {
                let mut frame = system.clone();
                frame.advance(black_box(16.0));
                black_box(frame.len())
            });
        });
    }
    group.finish();
}

fn bench_headless_frames(c: &mut Criterion) {
    c.bench_function("run_frames_60_fountain", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineConfig::default(), NullSink);
            engine.start_game(fountain, "Fountain");
            black_box(engine.run_frames(60, 16.0))
        });
    });

    c.bench_function("draw_list_frame_fountain", |b| {
        let mut engine = Engine::new(EngineConfig::default(), NullSink);
        engine.start_game(fountain, "Fountain");
        let mut list = DrawList::new();
        let mut timestamp = 0.0;
        b.iter(|| {
            list.reset();
            timestamp += 16.0;
            engine.tick(timestamp, &mut list);
            black_box(list.len())
        });
    });
}

criterion_group!(
    benches,
    bench_overlaps,
    bench_particle_advance,
    bench_headless_frames
);
criterion_main!(benches);
