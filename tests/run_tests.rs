mod common;

use hybrid_rs::{run, GeneratorKind};
use std::fs;

#[test]
fn run_writes_echo_and_positions() {
    let dir = std::env::temp_dir().join(format!("hybrid_rs_run_{}", std::process::id()));
    let mut cfg = common::setup_config(GeneratorKind::UniformCellCentered, Some(256));
    cfg.output.dir = dir.to_string_lossy().into_owned();
    cfg.output.write_positions = true;
    cfg.output.stride = 2;

    run(cfg).unwrap();

    let echo = fs::read_to_string(dir.join("options.txt")).unwrap();
    assert!(echo.starts_with("#Input Options\n"));
    assert!(echo.contains("#End of Input Options\n#Common Parameter Values\n"));
    assert!(echo.contains("kind = \"uniform-cell-centered\"\n"));
    assert!(echo.contains("Np = 256\n"));
    assert!(echo.contains("generator = uniform-cell-centered\n"));
    assert!(echo.contains("seed = 1234\n"));
    for name in &["x.npy", "y.npy", "z.npy"] {
        assert!(dir.join(name).exists(), "{}", name);
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn run_reports_configuration_errors() {
    let mut cfg = common::setup_config(GeneratorKind::Sobol, None);
    cfg.output.dir = std::env::temp_dir()
        .join("hybrid_rs_never_written")
        .to_string_lossy()
        .into_owned();
    let err = run(cfg).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("explicit particle count"), "{}", msg);
}
