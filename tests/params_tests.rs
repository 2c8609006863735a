mod common;

use hybrid_rs::config::{BoundaryInput, Config, GridInput};
use hybrid_rs::{
    BoundaryType, FieldBoundary, GeneratorKind, InitError, ParameterRecord, ParticleBoundary,
};

#[test]
fn spacing_alone_sets_cell_count() {
    let cfg = Config::from_toml(
        r#"
        [grid]
        dx = 0.1
        ny = 0
        nz = 0
        "#,
    )
    .unwrap();
    let record = ParameterRecord::new(&cfg).unwrap();
    assert_eq!(record.grid.x.n, 10);
    assert!((record.grid.x.delta - 0.1).abs() < 1e-12);
    assert_eq!(record.grid.dimensions(), 1);
    assert_eq!(record.np, 10);
}

#[test]
fn velocity_broadcast_then_override() {
    let cfg = Config::from_toml(
        r#"
        [grid]
        nx = 4
        ny = 4
        nz = 4
        [ions]
        v0 = 5.0
        v0y = 9.0
        "#,
    )
    .unwrap();
    let record = ParameterRecord::new(&cfg).unwrap();
    assert_eq!(record.ions.v0, [5.0, 9.0, 5.0]);
    assert_eq!(record.electrons.v0, [0.0, 0.0, 0.0]);
}

#[test]
fn periodic_on_one_face_only_is_rejected() {
    let mut cfg = common::setup_config(GeneratorKind::UniformCoordinates, None);
    cfg.boundary = BoundaryInput {
        x0: Some(BoundaryType::Periodic),
        x1: Some(BoundaryType::Dirichlet),
        ..Default::default()
    };
    let err = ParameterRecord::new(&cfg).unwrap_err();
    assert_eq!(
        err,
        InitError::AsymmetricPeriodic {
            axis: 'x',
            lower: BoundaryType::Periodic,
            upper: BoundaryType::Dirichlet,
        }
    );
    assert!(err.is_configuration());
}

#[test]
fn boundary_tags_follow_face_types() {
    let mut cfg = common::setup_config(GeneratorKind::UniformCoordinates, None);
    cfg.boundary = BoundaryInput {
        x0: Some(BoundaryType::Injection),
        x1: Some(BoundaryType::Reflection),
        y0: Some(BoundaryType::Dirichlet),
        y1: Some(BoundaryType::Neumann),
        ..Default::default()
    };
    let record = ParameterRecord::new(&cfg).unwrap();
    let b = &record.boundaries;
    assert_eq!(b.x.field, [FieldBoundary::Dirichlet, FieldBoundary::Neumann]);
    assert_eq!(
        b.x.particle,
        [ParticleBoundary::Injection, ParticleBoundary::Reflection]
    );
    assert_eq!(b.y.particle, [ParticleBoundary::Reflection; 2]);
    assert!(b.z.is_periodic());
}

#[test]
fn missing_axis_is_reported_by_name() {
    let cfg = Config {
        grid: GridInput {
            nx: Some(4),
            nz: Some(4),
            ..Default::default()
        },
        ..Default::default()
    };
    let err = ParameterRecord::new(&cfg).unwrap_err();
    assert_eq!(err, InitError::UnresolvedAxis { axis: 'y' });
    assert!(err.to_string().contains("y axis"));
}

#[test]
fn temperature_gives_thermal_speed() {
    let cfg = Config::from_toml(
        r#"
        [grid]
        nx = 2
        ny = 2
        nz = 2
        [electrons]
        t = 11604.5
        "#,
    )
    .unwrap();
    let record = ParameterRecord::new(&cfg).unwrap();
    let e = &record.electrons;
    let expected = (2.0 * hybrid_rs::consts::KB * 11604.5 / e.m).sqrt();
    for v in e.vt.iter() {
        assert!(((v - expected) / expected).abs() < 1e-12);
    }
    assert_eq!(e.t, 11604.5);
}

#[test]
fn huge_grid_is_a_configuration_error() {
    let cfg = Config::from_toml(
        r#"
        [grid]
        nx = 4194304
        ny = 4194304
        nz = 4194304
        "#,
    )
    .unwrap();
    let err = ParameterRecord::new(&cfg).unwrap_err();
    assert!(matches!(err, InitError::SiteOverflow { .. }));
    assert!(err.is_configuration());
}
