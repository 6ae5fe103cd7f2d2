use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use image::{Rgba, RgbaImage};
use panelpdf::{BitmapRasterizer, ExportConfig, Exporter, VecPanelSource};

fn gradient_panel(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

fn bench_export(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("build runtime");

    let mut group = c.benchmark_group("export");
    for panel_count in [1usize, 4, 16] {
        let panels = vec![gradient_panel(256, 362); panel_count];
        let exporter = Exporter::new(
            VecPanelSource::new(panels),
            BitmapRasterizer::new(),
            ExportConfig::default(),
        );

        group.bench_with_input(
            BenchmarkId::from_parameter(panel_count),
            &exporter,
            |b, exporter| {
                b.iter(|| {
                    let payload = runtime.block_on(exporter.export()).expect("export");
                    assert!(!payload.bytes.is_empty());
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_export);
criterion_main!(benches);
