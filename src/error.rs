use crate::boundary::BoundaryType;
use crate::Float;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InitError {
    #[error("Configuration error: cannot resolve the {axis} axis, neither N{axis} nor d{axis} was given")]
    UnresolvedAxis { axis: char },

    #[error("Configuration error: the {axis} axis has a {lower} lower face and a {upper} upper face; periodic must be set on both faces")]
    AsymmetricPeriodic {
        axis: char,
        lower: BoundaryType,
        upper: BoundaryType,
    },

    #[error("Configuration error: a {nx} x {ny} x {nz} grid has more lattice sites than can be indexed")]
    SiteOverflow { nx: usize, ny: usize, nz: usize },

    #[error("Configuration error: particle count must be positive, got {0}")]
    NonPositiveParticleCount(i64),

    #[error("Configuration error: the {0} generator needs an explicit particle count")]
    MissingParticleCount(&'static str),

    #[error("Configuration error: unknown {kind} '{name}', expected one of: {expected}")]
    UnknownName {
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error("Configuration error: no density profile named '{0}' is registered")]
    UnknownDensity(String),

    #[error("Configuration error: rejection sampling exceeded {attempts} attempts with {accepted} of {requested} particles accepted")]
    AttemptCeiling {
        requested: usize,
        accepted: usize,
        attempts: u64,
    },

    #[error("Configuration error: density upper bound did not settle after {0} re-estimations")]
    BoundNotConverged(usize),

    #[error("Configuration error: density is zero everywhere in the domain")]
    ZeroDensity,

    #[error("Configuration error: the Sobol sequence supports at most {max} points, {requested} requested")]
    SequenceExhausted { requested: usize, max: usize },

    #[error("Density returned {value} at ({x}, {y}, {z}); densities must be finite and non-negative")]
    InvalidDensity {
        value: Float,
        x: Float,
        y: Float,
        z: Float,
    },
}

impl InitError {
    /// Errors caused by the run configuration, as opposed to a misbehaving
    /// density function.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, InitError::InvalidDensity { .. })
    }
}

pub type InitResult<T> = Result<T, InitError>;
