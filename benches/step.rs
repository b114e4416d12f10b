use criterion::{criterion_group, criterion_main, Criterion};
use smoke_sim::{RelaxScheme, SimParams, Simulation};

fn params(scheme: RelaxScheme) -> SimParams {
    SimParams {
        resolution: 64,
        diffusion: 0.0001,
        viscosity: 0.0002,
        dt: 1.0 / 60.0,
        density_decay: 0.2,
        source_magnitude: 50.0,
        scheme,
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick_64");
    for (name, scheme) in [
        ("gauss_seidel", RelaxScheme::GaussSeidel),
        ("jacobi", RelaxScheme::Jacobi),
    ] {
        group.bench_function(name, |b| {
            let mut sim = Simulation::new(params(scheme)).unwrap();
            b.iter(|| {
                sim.step_with(|sources| {
                    let amount = sources.magnitude();
                    sources.add_density(32, 2, amount);
                    sources.add_velocity(32, 2, 0.0, 4.0);
                });
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
