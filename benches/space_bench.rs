#![deny(warnings)]

use coordcanvas::*;
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

fn units_benchmark(c: &mut Criterion) {
    let ctx = UnitContext {
        ppi: 300.0,
        default_unit: Unit::PercentWidth,
        canvas_size: (1920.0, 1080.0),
        coord_size: (360.0, 180.0),
    };
    let dists = ["2cm", "12.5", "0.7%min", "(1 + 2) * 3.5x", "10 / 4 * 2pt"];
    let mut group = c.benchmark_group("units");
    group
        .throughput(Throughput::Elements(dists.len() as u64))
        .bench_function("parse", |b| {
            b.iter(|| {
                for dist in dists {
                    black_box(Length::parse(black_box(dist), Unit::Px).expect("valid distance"));
                }
            })
        })
        .bench_function("to_px", |b| {
            let dists: Vec<Dist> = dists.iter().map(|dist| Dist::from(*dist)).collect();
            b.iter(|| {
                for dist in dists.iter() {
                    black_box(ctx.to_px(dist).expect("valid distance"));
                }
            })
        });
    group.finish();
}

fn space_benchmark(c: &mut Criterion) {
    let bbox = CoordBBox::new(-180.0, 90.0, 180.0, -90.0);
    let space = CoordinateSpace::geographic(1920, 1080).expect("valid space");
    let mut group = c.benchmark_group("space");
    group
        .throughput(Throughput::Elements(1))
        .bench_function("custom", |b| {
            b.iter(|| CoordinateSpace::custom(1920, 1080, black_box(bbox), true))
        })
        .bench_function("zoom target", |b| {
            b.iter(|| space.zoom_target(-10.0, -10.0, 30.0, 20.0, Some(Conform::Fit)))
        })
        .bench_function("rotated", |b| b.iter(|| space.rotated(black_box(30.0))));
    group.finish();
}

fn canvas_benchmark(c: &mut Criterion) {
    let mut canvas = Canvas::new(512, 512).expect("valid canvas");
    canvas.geographic_space().expect("valid space");
    let style = ShapeStyle::default();
    for lon in (-180..180).step_by(10) {
        for lat in (-90..90).step_by(10) {
            canvas
                .draw_circle((lon as Scalar, lat as Scalar), &style)
                .expect("valid style");
        }
    }

    let mut group = c.benchmark_group("canvas");
    group.throughput(Throughput::Elements(512 * 512));
    group.sample_size(20);
    group.bench_function("zoom", |b| {
        b.iter_batched(
            || canvas.copy(),
            |mut canvas| canvas.zoom_factor(2.0, None).expect("valid zoom"),
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function("rotate", |b| {
        b.iter_batched(
            || canvas.copy(),
            |mut canvas| canvas.rotate(30.0).expect("valid rotation"),
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function("rotate expand", |b| {
        b.iter_batched(
            || canvas.copy(),
            |mut canvas| canvas.rotate_expand(30.0).expect("valid rotation"),
            criterion::BatchSize::LargeInput,
        )
    });
    group.bench_function("fill circle", |b| {
        let mut canvas = canvas.copy();
        let style = ShapeStyle::default().with_size("20%min");
        b.iter(|| canvas.draw_circle((0.0, 0.0), &style).expect("valid style"))
    });
    group.finish();
}

criterion_group!(benches, units_benchmark, space_benchmark, canvas_benchmark);
criterion_main!(benches);
