use criterion::{Criterion, black_box, criterion_group, criterion_main};
use s2a_ascii::{quantize, render};
use s2a_core::config::{ThresholdMode, ToneConfig};
use s2a_core::pixels::PixelBuffer;

fn gradient_canvas(size: u32) -> PixelBuffer {
    let mut canvas = PixelBuffer::new(size, size);
    for y in 0..size {
        for x in 0..size {
            let l = ((x + y) * 255 / (2 * size - 2).max(1)) as u8;
            let a = if (x + y) % 7 == 0 { 0 } else { 255 };
            canvas.set_pixel(x, y, [l, l / 2, 255 - l, a]);
        }
    }
    canvas
}

fn bench_quantize(c: &mut Criterion) {
    let canvas = gradient_canvas(48);
    let adaptive = ToneConfig::default();
    let fixed = ToneConfig {
        mode: ThresholdMode::Fixed,
        ..ToneConfig::default()
    };

    c.bench_function("quantize_adaptive_48", |b| {
        b.iter(|| quantize(black_box(&canvas), black_box(&adaptive)));
    });
    c.bench_function("quantize_fixed_48", |b| {
        b.iter(|| quantize(black_box(&canvas), black_box(&fixed)));
    });

    let large = gradient_canvas(256);
    c.bench_function("quantize_render_256", |b| {
        b.iter(|| {
            let map = quantize(black_box(&large), &adaptive).ok()?;
            render(&map, &adaptive.palette_chars()).ok()
        });
    });
}

criterion_group!(benches, bench_quantize);
criterion_main!(benches);
