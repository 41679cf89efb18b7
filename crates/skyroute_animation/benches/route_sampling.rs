use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use skyroute_animation::{
    AnimatedMarker, DeliverySequence, Projection, QuadCurve, RouteAnimator, SceneConfig, SphereArc,
};
use std::hint::black_box;

fn bench_curve_sampling(c: &mut Criterion) {
    let config = SceneConfig::global_delivery();
    let projection = Projection::default();
    let routes = config.routes().expect("preset routes are valid");
    let curves: Vec<QuadCurve> = routes
        .iter()
        .map(|route| QuadCurve::for_route(route, &projection, config.arc_lift))
        .collect();

    let mut group = c.benchmark_group("curve_sampling");
    for &segments in &[16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(segments), &segments, |b, &n| {
            b.iter(|| {
                for curve in &curves {
                    black_box(curve.sample(black_box(n)));
                }
            })
        });
    }
    group.finish();
}

fn bench_sphere_trail(c: &mut Criterion) {
    let arc = SphereArc::new((40.0, -100.0), (50.0, 15.0), 8.0, 2.65);

    c.bench_function("sphere_trail_100", |b| {
        b.iter(|| black_box(arc.trail(black_box(100))))
    });

    c.bench_function("sphere_pose", |b| {
        b.iter(|| black_box(arc.pose_at(black_box(0.37))))
    });
}

fn bench_frame_step(c: &mut Criterion) {
    let config = SceneConfig::global_delivery();
    let projection = config.projection();

    c.bench_function("animator_step_and_frame", |b| {
        let mut animator = RouteAnimator::new(config.routes().expect("preset routes are valid"));
        for route in 0..animator.routes().len() {
            animator.spawn(AnimatedMarker::with_duration(route, 2.0).looping(true));
        }
        b.iter(|| {
            animator.step(black_box(1.0 / 60.0));
            black_box(animator.frame(&projection, config.arc_lift))
        })
    });

    c.bench_function("delivery_tick", |b| {
        let mut sequence = DeliverySequence::default();
        b.iter(|| {
            black_box(sequence.tick(black_box(1.0 / 60.0)));
            black_box(sequence.plane_pose())
        })
    });
}

criterion_group!(
    benches,
    bench_curve_sampling,
    bench_sphere_trail,
    bench_frame_step
);
criterion_main!(benches);
