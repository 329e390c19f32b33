use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use spectrum_engine::spectrum::{ManualClock, TransformBackend};
use spectrum_engine::{CaptureConfig, SpectrumEngine, WindowFunction};
use std::f64::consts::PI;
use std::time::Duration;

fn signal(len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| (2.0 * PI * 440.0 * n as f64 / 48000.0).sin())
        .collect()
}

fn config(frame_size: usize) -> CaptureConfig {
    CaptureConfig {
        frame_size,
        sample_rate: 48000,
        capture_rate_hz: 60.0,
        window: WindowFunction::Hann,
        amplitude_correction: false,
    }
}

/// Every call emits a frame: full window + transform cost
fn bench_emitting(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest_emit");

    for backend in [TransformBackend::RealFft, TransformBackend::ComplexFft] {
        for frame_size in [512, 1024, 4096] {
            let clock = ManualClock::new();
            let mut engine =
                SpectrumEngine::with_parts(config(frame_size), backend, clock.clone()).unwrap();
            let block = signal(frame_size);

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", backend), frame_size),
                &block,
                |b, block| {
                    b.iter(|| {
                        clock.advance(Duration::from_secs(1));
                        black_box(engine.ingest(black_box(block)).unwrap())
                    })
                },
            );
        }
    }

    group.finish();
}

/// Calls inside the throttle interval only buffer samples
fn bench_throttled(c: &mut Criterion) {
    let mut engine = SpectrumEngine::with_parts(
        config(1024),
        TransformBackend::RealFft,
        ManualClock::new(),
    )
    .unwrap();
    let block = signal(256);

    // Consume the first emission so later calls are throttled
    engine.ingest(&signal(1024)).unwrap();

    c.bench_function("ingest_throttled_256", |b| {
        b.iter(|| black_box(engine.ingest(black_box(&block)).unwrap()))
    });
}

criterion_group!(benches, bench_emitting, bench_throttled);
criterion_main!(benches);
