//! Criterion benchmarks for cellscreen-terminal
//!
//! Run with: cargo bench -p cellscreen-terminal

use cellscreen_core::Attr;
use cellscreen_terminal::direct::{CellBuffer, DiffRenderer, TermCell};
use cellscreen_terminal::{AttrTranslator, Capabilities};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

// =============================================================================
// CELL BUFFER BENCHMARKS
// =============================================================================

fn bench_cell_buffer_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("cell_buffer_set");
    group.throughput(Throughput::Elements(1));
    let mut buffer = CellBuffer::new(120, 40);
    let cell = TermCell::new('A', Attr::NONE, Default::default());

    group.bench_function("set_char", |b| {
        let mut x = 0i32;
        b.iter(|| {
            buffer.set(black_box(x % 120), black_box(x / 120 % 40), cell);
            x = x.wrapping_add(1);
        });
    });

    group.finish();
}

// =============================================================================
// DIFF RENDERER BENCHMARKS
// =============================================================================

fn bench_diff_renderer(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff_renderer");
    let translator = AttrTranslator::new(Capabilities { italic: true });
    let bold = TermCell::new('B', Attr::BOLD, translator.translate(Attr::BOLD));

    for (w, h) in [(80u16, 24u16), (200, 60)] {
        group.throughput(Throughput::Elements(u64::from(w) * u64::from(h)));
        group.bench_function(format!("full_{w}x{h}"), |b| {
            let mut buffer = CellBuffer::new(w, h);
            let mut renderer = DiffRenderer::new();
            let mut output = Vec::with_capacity(64 * 1024);
            b.iter(|| {
                output.clear();
                buffer.mark_all_dirty();
                renderer
                    .flush(&mut buffer, &mut output, (0, 0))
                    .unwrap_or_default()
            });
        });
    }

    group.bench_function("ten_percent_80x24", |b| {
        let mut buffer = CellBuffer::new(80, 24);
        let mut renderer = DiffRenderer::new();
        let mut output = Vec::with_capacity(64 * 1024);
        let mut frame = 0i32;
        b.iter(|| {
            output.clear();
            for i in 0..192 {
                let idx = (i * 10 + frame) % 1920;
                buffer.set(idx % 80, idx / 80, bold);
            }
            frame = frame.wrapping_add(1);
            renderer
                .flush(&mut buffer, &mut output, (0, 0))
                .unwrap_or_default()
        });
    });

    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let translator = AttrTranslator::new(Capabilities { italic: false });
    c.bench_function("attr_translate", |b| {
        b.iter(|| translator.translate(black_box(Attr::ITALIC | Attr::UNDERLINE | Attr::DIM)));
    });
}

criterion_group!(
    benches,
    bench_cell_buffer_set,
    bench_diff_renderer,
    bench_translate
);
criterion_main!(benches);
