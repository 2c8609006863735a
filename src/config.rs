//! Raw run parameters as read from a TOML file.
//!
//! Every key is optional. Nothing here is validated beyond its type; the
//! defaulting and derivation rules live in [`crate::params`].
use crate::boundary::BoundaryType;
use crate::distributions::GeneratorKind;
use crate::params::{LhsType, RhsType};
use crate::Float;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridInput,
    pub boundary: BoundaryInput,
    pub plasma: PlasmaInput,
    pub electrons: SpeciesInput,
    pub ions: SpeciesInput,
    pub neutrals: NeutralInput,
    pub solver: SolverInput,
    pub distribution: DistributionInput,
    pub density: DensityInput,
    pub output: Output,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GridInput {
    pub nx: Option<i64>,
    pub ny: Option<i64>,
    pub nz: Option<i64>,
    pub dx: Option<Float>,
    pub dy: Option<Float>,
    pub dz: Option<Float>,
    pub x0: Option<Float>,
    pub x1: Option<Float>,
    pub y0: Option<Float>,
    pub y1: Option<Float>,
    pub z0: Option<Float>,
    pub z1: Option<Float>,
}

/// Boundary selection for each of the six faces.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct BoundaryInput {
    pub x0: Option<BoundaryType>,
    pub x1: Option<BoundaryType>,
    pub y0: Option<BoundaryType>,
    pub y1: Option<BoundaryType>,
    pub z0: Option<BoundaryType>,
    pub z1: Option<BoundaryType>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct PlasmaInput {
    pub np: Option<i64>,
    pub n0: Option<Float>,
    pub b0: Option<Float>,
    pub e0: Option<Float>,
    pub gamma_e: Option<Float>,
}

/// Per-species constants. `v0` and `vt` are broadcast to all three
/// components before the per-component keys are applied.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SpeciesInput {
    pub q: Option<Float>,
    pub m: Option<Float>,
    pub nu: Option<Float>,
    pub v0: Option<Float>,
    pub v0x: Option<Float>,
    pub v0y: Option<Float>,
    pub v0z: Option<Float>,
    pub vt: Option<Float>,
    pub vtx: Option<Float>,
    pub vty: Option<Float>,
    pub vtz: Option<Float>,
    pub t: Option<Float>,
}

/// Neutrals are uncharged and take their thermal speed from `t`, so only
/// these keys are accepted in `[neutrals]`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct NeutralInput {
    pub m: Option<Float>,
    pub nu: Option<Float>,
    pub t: Option<Float>,
    pub v0: Option<Float>,
    pub v0x: Option<Float>,
    pub v0y: Option<Float>,
    pub v0z: Option<Float>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct SolverInput {
    pub lhs: Option<LhsType>,
    pub rhs: Option<RhsType>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DistributionInput {
    pub kind: Option<GeneratorKind>,
    pub seed: Option<u64>,
    pub workers: Option<usize>,
    pub max_attempts: Option<u64>,
    pub upper_bound: Option<Float>,
    pub bound_margin: Option<Float>,
}

/// Density profile used by rejection sampling.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct DensityInput {
    pub name: Option<String>,
    pub amplitude: Option<Float>,
    pub wavenumber: Option<Float>,
    pub offset: Option<Float>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct Output {
    pub dir: String,
    pub echo: String,
    pub write_positions: bool,
    pub stride: usize,
}

impl Default for Output {
    fn default() -> Output {
        Output {
            dir: "output".to_string(),
            echo: "options.txt".to_string(),
            write_positions: false,
            stride: 1,
        }
    }
}

impl Config {
    pub fn new() -> Result<Config> {
        Config::from_file("config.toml")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not open the {} file", path.display()))?;
        Config::from_toml(&contents)
            .with_context(|| format!("Could not parse {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Config> {
        toml::from_str(contents).context("Could not parse Config file")
    }

    /// The options as given, absent keys left out.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(self).context("Could not serialize Config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert!(cfg.grid.nx.is_none());
        assert!(cfg.boundary.x0.is_none());
        assert_eq!(cfg.output.dir, "output");
        assert_eq!(cfg.output.stride, 1);
    }

    #[test]
    fn reads_sections() {
        let cfg = Config::from_toml(
            r#"
            [grid]
            nx = 10
            x1 = 2.0
            [boundary]
            x0 = "dirichlet"
            x1 = "neumann"
            [electrons]
            v0 = 5.0
            v0y = 9.0
            [distribution]
            kind = "sobol"
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(cfg.grid.nx, Some(10));
        assert_eq!(cfg.grid.x1, Some(2.0));
        assert_eq!(cfg.boundary.x0, Some(BoundaryType::Dirichlet));
        assert_eq!(cfg.boundary.x1, Some(BoundaryType::Neumann));
        assert_eq!(cfg.electrons.v0y, Some(9.0));
        assert_eq!(cfg.distribution.kind, Some(GeneratorKind::Sobol));
        assert_eq!(cfg.distribution.seed, Some(42));
    }

    #[test]
    fn given_options_survive_serialization() {
        let text = "[grid]\nnx = 10\n[boundary]\nx0 = \"injection\"\n[distribution]\nkind = \"sobol\"\n";
        let cfg = Config::from_toml(text).unwrap();
        let echoed = cfg.to_toml().unwrap();
        assert!(!echoed.contains("ny ="), "{}", echoed);
        let again = Config::from_toml(&echoed).unwrap();
        assert_eq!(again.grid.nx, Some(10));
        assert_eq!(again.boundary.x0, Some(BoundaryType::Injection));
        assert_eq!(again.distribution.kind, Some(GeneratorKind::Sobol));
        assert_eq!(again.output.echo, "options.txt");
    }

    #[test]
    fn rejects_unknown_boundary_name() {
        let err = Config::from_toml("[boundary]\nx0 = \"sticky\"\n").unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("sticky"), "{}", msg);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(Config::from_toml("[grid]\nnq = 3\n").is_err());
    }

    #[test]
    fn neutrals_take_no_charge_or_thermal_speed() {
        let cfg = Config::from_toml("[neutrals]\nt = 300.0\nv0y = 2.0\nnu = 5.0\n").unwrap();
        assert_eq!(cfg.neutrals.t, Some(300.0));
        assert_eq!(cfg.neutrals.v0y, Some(2.0));
        for key in &["q = 1.0", "vt = 300.0", "vtx = 1.0", "vty = 1.0", "vtz = 1.0"] {
            let err = Config::from_toml(&format!("[neutrals]\n{}\n", key)).unwrap_err();
            let msg = format!("{:#}", err);
            assert!(msg.contains("unknown field"), "{}: {}", key, msg);
        }
    }
}
