use criterion::{black_box, criterion_group, criterion_main, Criterion};

use recolor::{Color, ColorSubstitutionEngine, PixelBuffer, SubstitutionRequest};

fn bench_substitution(c: &mut Criterion) {
    let target = Color::rgba(14, 14, 18, 255);
    let replacement = Color::rgba(244, 245, 245, 255);
    // 1080p frame where every third pixel matches
    let source = PixelBuffer::from_fn(1920, 1080, |x, y| {
        if (x + y) % 3 == 0 {
            target
        } else {
            Color::rgb((x % 256) as u8, (y % 256) as u8, 0)
        }
    });
    let engine = ColorSubstitutionEngine::new(SubstitutionRequest::new(target, replacement));

    c.bench_function("substitute_1080p", |b| {
        b.iter(|| engine.apply(black_box(&source)))
    });
}

criterion_group!(benches, bench_substitution);
criterion_main!(benches);
