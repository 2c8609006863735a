use anyhow::{Context, Result};
use log::info;
use std::path::Path;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

pub(crate) const PI: Float = std::f64::consts::PI as Float;

/// Declares a closed enum together with a static name <-> tag table.
/// Unknown names are rejected when parsing, including through serde, and
/// serialization writes the name back.
macro_rules! named_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $kind:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Deserialize)]
        #[serde(try_from = "String")]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const NAMES: &'static [(&'static str, $name)] = &[$(($text, $name::$variant)),+];

            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn from_name(name: &str) -> $crate::error::InitResult<$name> {
                Self::NAMES
                    .iter()
                    .find(|(text, _)| *text == name)
                    .map(|&(_, tag)| tag)
                    .ok_or_else(|| $crate::error::InitError::UnknownName {
                        kind: $kind,
                        name: name.to_string(),
                        expected: Self::NAMES
                            .iter()
                            .map(|(text, _)| *text)
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }

        impl std::convert::TryFrom<String> for $name {
            type Error = $crate::error::InitError;
            fn try_from(name: String) -> Result<Self, Self::Error> {
                Self::from_name(&name)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::InitError;
            fn from_str(name: &str) -> Result<Self, Self::Err> {
                Self::from_name(name)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.name())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

pub mod boundary;
pub mod config;
pub mod consts;
pub mod density;
pub mod distributions;
pub mod error;
pub mod params;
pub mod save;

pub use boundary::{Boundaries, BoundaryType, FieldBoundary, ParticleBoundary};
pub use config::Config;
pub use density::{Density, DensityRegistry};
pub use distributions::{GeneratorKind, Positions};
pub use error::{InitError, InitResult};
pub use params::{ParameterRecord, Species};

/// Everything the particle push needs to start a run. The positions are
/// owned by this struct and handed over as a whole.
pub struct InitialState {
    pub record: ParameterRecord,
    pub positions: Positions,
}

impl InitialState {
    pub fn electrons(&self) -> &Species {
        &self.record.electrons
    }
    pub fn ions(&self) -> &Species {
        &self.record.ions
    }
    pub fn neutrals(&self) -> &Species {
        &self.record.neutrals
    }
    pub fn boundaries(&self) -> &Boundaries {
        &self.record.boundaries
    }
}

/// Resolves the parameter record and runs the configured generator.
pub fn initialize(cfg: &Config, registry: &DensityRegistry) -> InitResult<InitialState> {
    let record = ParameterRecord::new(cfg)?;
    let density = match record.sampling.kind {
        GeneratorKind::Rejection => Some(registry.get(&record.profile.name)?),
        _ => None,
    };
    info!(
        "generating {} particles with the {} generator",
        record.np, record.sampling.kind
    );
    let positions = distributions::generate(&record, density)?;
    Ok(InitialState { record, positions })
}

pub fn run(cfg: Config) -> Result<()> {
    let registry = DensityRegistry::with_builtins();
    let state =
        initialize(&cfg, &registry).context("Could not initialize the particle population")?;

    let outdir = Path::new(&cfg.output.dir);
    std::fs::create_dir_all(outdir).context("Unable to create output directory")?;
    save::echo_params(&cfg, &state.record, &outdir.join(&cfg.output.echo))?;
    if cfg.output.write_positions {
        save::save_positions(&state.positions, outdir, cfg.output.stride)?;
    }
    info!(
        "placed {} particles in [{}, {}] x [{}, {}] x [{}, {}]",
        state.positions.len(),
        state.record.grid.x.lo,
        state.record.grid.x.hi,
        state.record.grid.y.lo,
        state.record.grid.y.hi,
        state.record.grid.z.lo,
        state.record.grid.z.hi,
    );
    Ok(())
}
