//! The fully resolved parameter record of a run.
//!
//! [`ParameterRecord::new`] is the one place where raw input is defaulted,
//! derived and checked. Anomalies in the input are logged and replaced by a
//! default; anything that leaves the record inconsistent is an error and no
//! generator gets to run.
pub mod grid;
pub mod species;

pub use grid::{Axis, Grid};
pub use species::{Species, SpeciesDefaults};

use crate::boundary::{Boundaries, Faces};
use crate::config::{Config, DensityInput, DistributionInput};
use crate::consts::{ME, MP, Q};
use crate::distributions::GeneratorKind;
use crate::error::{InitError, InitResult};
use crate::{Float, PI};
use log::{info, warn};
use rand::prelude::*;

named_enum! {
    /// Operator family handed to the field solver.
    pub enum LhsType: "LHS type" {
        Identity => "identity",
        Laplacian => "laplacian",
        Full => "full",
    }
}

named_enum! {
    /// Source term family handed to the field solver.
    pub enum RhsType: "RHS type" {
        Constant => "constant",
        Sinusoidal => "sinusoidal",
        Full => "full",
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solver {
    pub lhs: LhsType,
    pub rhs: RhsType,
}

/// Parameters of the density profile used by rejection sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub amplitude: Float,
    pub wavenumber: Float,
    pub offset: Float,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sampling {
    pub kind: GeneratorKind,
    pub seed: u64,
    pub workers: usize,
    pub max_attempts: u64,
    pub upper_bound: Option<Float>,
    pub bound_margin: Float,
}

const DEFAULT_BOUND_MARGIN: Float = 0.1;
const ATTEMPTS_PER_PARTICLE: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    pub grid: Grid,
    /// Boundary selection per face, as given.
    pub faces: Faces,
    /// Field and particle rules derived from `faces`.
    pub boundaries: Boundaries,
    pub electrons: Species,
    pub ions: Species,
    pub neutrals: Species,
    /// Background magnetic field [T].
    pub b0: Float,
    /// Background electric field [N/C].
    pub e0: Float,
    /// Number of simulated particles.
    pub np: usize,
    /// Reference number density [m^-3].
    pub n0: Float,
    /// Electron adiabatic index.
    pub gamma_e: Float,
    pub solver: Solver,
    pub profile: Profile,
    pub sampling: Sampling,
}

impl ParameterRecord {
    pub fn new(cfg: &Config) -> InitResult<ParameterRecord> {
        let grid = Grid::new(&cfg.grid)?;
        let faces = Faces::new(&cfg.boundary);
        let boundaries = Boundaries::classify(&faces)?;

        let plasma = &cfg.plasma;
        let b0 = plasma.b0.unwrap_or(0.0);
        let e0 = plasma.e0.unwrap_or(0.0);
        let n0 = plasma.n0.unwrap_or(1.0);

        let electrons = Species::new(
            "electrons",
            &cfg.electrons,
            SpeciesDefaults {
                q: -Q,
                m: ME,
                nu: 1.0,
            },
            b0,
        );
        let ions = Species::new(
            "ions",
            &cfg.ions,
            SpeciesDefaults {
                q: Q,
                m: MP,
                nu: 1.0,
            },
            b0,
        );
        let neutrals = Species::neutral(
            &cfg.neutrals,
            cfg.neutrals.m.unwrap_or(ions.m),
            cfg.neutrals.t.unwrap_or(ions.t),
        );

        let kind = cfg
            .distribution
            .kind
            .unwrap_or(GeneratorKind::UniformCoordinates);
        let np = resolve_particle_count(plasma.np, kind, &grid)?;

        Ok(ParameterRecord {
            grid,
            faces,
            boundaries,
            electrons,
            ions,
            neutrals,
            b0,
            e0,
            np,
            n0,
            gamma_e: plasma.gamma_e.unwrap_or(1.0),
            solver: Solver {
                lhs: cfg.solver.lhs.unwrap_or(LhsType::Full),
                rhs: cfg.solver.rhs.unwrap_or(RhsType::Full),
            },
            profile: resolve_profile(&cfg.density, n0, &grid),
            sampling: resolve_sampling(&cfg.distribution, kind, np),
        })
    }
}

fn resolve_particle_count(np: Option<i64>, kind: GeneratorKind, grid: &Grid) -> InitResult<usize> {
    match np {
        Some(n) if n <= 0 => Err(InitError::NonPositiveParticleCount(n)),
        Some(n) => Ok(n as usize),
        None => match kind {
            GeneratorKind::UniformCoordinates | GeneratorKind::UniformCellCentered => {
                info!("Np not given, placing one particle per lattice site");
                Ok(grid.sites())
            }
            other => Err(InitError::MissingParticleCount(other.name())),
        },
    }
}

fn resolve_profile(input: &DensityInput, n0: Float, grid: &Grid) -> Profile {
    let lx = grid.x.length();
    let default_k = if lx != 0.0 { 2.0 * PI / lx } else { 0.0 };
    Profile {
        name: input
            .name
            .clone()
            .unwrap_or_else(|| "sinusoidal".to_string()),
        amplitude: input.amplitude.unwrap_or(n0),
        wavenumber: input.wavenumber.unwrap_or(default_k),
        offset: input.offset.unwrap_or(n0),
    }
}

fn resolve_sampling(input: &DistributionInput, kind: GeneratorKind, np: usize) -> Sampling {
    let seed = match input.seed {
        Some(s) => s,
        None => {
            let s: u64 = thread_rng().gen();
            info!("no seed given, using {}", s);
            s
        }
    };
    let workers = match input.workers {
        Some(0) => {
            warn!("Ignoring zero worker count");
            rayon::current_num_threads()
        }
        Some(w) => w,
        None => rayon::current_num_threads(),
    };
    let bound_margin = match input.bound_margin {
        Some(m) if !(m >= 0.0) => {
            warn!("Ignoring negative bound margin: {}", m);
            DEFAULT_BOUND_MARGIN
        }
        Some(m) => m,
        None => DEFAULT_BOUND_MARGIN,
    };
    Sampling {
        kind,
        seed,
        workers,
        max_attempts: input
            .max_attempts
            .unwrap_or_else(|| (np as u64).saturating_mul(ATTEMPTS_PER_PARTICLE)),
        upper_bound: input.upper_bound,
        bound_margin,
    }
}
