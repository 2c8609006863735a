#[macro_use]
extern crate criterion;

use criterion::Criterion;
use hybrid_rs::config::{Config, DistributionInput, GridInput, PlasmaInput};
use hybrid_rs::distributions::generate;
use hybrid_rs::{DensityRegistry, GeneratorKind, ParameterRecord};

fn record(kind: GeneratorKind) -> ParameterRecord {
    let cfg = Config {
        grid: GridInput {
            nx: Some(128),
            ny: Some(64),
            nz: Some(0),
            ..Default::default()
        },
        plasma: PlasmaInput {
            np: Some(100_000),
            ..Default::default()
        },
        distribution: DistributionInput {
            kind: Some(kind),
            seed: Some(1),
            ..Default::default()
        },
        ..Default::default()
    };
    ParameterRecord::new(&cfg).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    for &(name, kind) in GeneratorKind::NAMES {
        let rec = record(kind);
        c.bench_function(&format!("generate {} 100k", name), move |b| {
            let registry = DensityRegistry::with_builtins();
            let density = registry.get(&rec.profile.name).ok();
            b.iter(|| generate(&rec, density).unwrap())
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
