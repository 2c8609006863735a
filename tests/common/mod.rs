#![allow(dead_code)]
use hybrid_rs::config::{Config, DistributionInput, GridInput, PlasmaInput};
use hybrid_rs::{GeneratorKind, ParameterRecord};

// A small 2D unit box, 16 x 8 cells, with a fixed seed so every
// stochastic test is reproducible.
pub fn setup_config(kind: GeneratorKind, np: Option<i64>) -> Config {
    Config {
        grid: GridInput {
            nx: Some(16),
            ny: Some(8),
            nz: Some(0),
            ..Default::default()
        },
        plasma: PlasmaInput {
            np,
            ..Default::default()
        },
        distribution: DistributionInput {
            kind: Some(kind),
            seed: Some(1234),
            workers: Some(4),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn setup_record(kind: GeneratorKind, np: Option<i64>) -> ParameterRecord {
    ParameterRecord::new(&setup_config(kind, np)).unwrap()
}
