use iai_callgrind::{library_benchmark, library_benchmark_group, main};
use starbuild::{CentralConditions, Composition, IntegrationParams, Integrator, Profile};
use std::hint::black_box;

fn inputs(r_max: f64) -> (Integrator, CentralConditions, Composition) {
    (
        Integrator::new(IntegrationParams {
            r_max,
            steps: 100_000,
        }),
        CentralConditions::new(1.5e7, 1e18).unwrap(),
        Composition::new(0.7, 0.28).unwrap(),
    )
}

#[library_benchmark]
#[bench::surface(args = (1e12), setup = inputs)]
#[bench::exhausted(args = (1e6), setup = inputs)]
fn bench_integrate(inputs: (Integrator, CentralConditions, Composition)) -> Profile {
    let (integrator, central, composition) = inputs;
    black_box(integrator.integrate(central, composition).unwrap())
}

library_benchmark_group!(
    name = bench_integrate_group;
    benchmarks = bench_integrate
);

main!(library_benchmark_groups = bench_integrate_group);
