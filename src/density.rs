//! Number density profiles for rejection sampling.
use crate::error::{InitError, InitResult};
use crate::params::ParameterRecord;
use crate::Float;
use std::collections::BTreeMap;

/// A number density over the domain.
///
/// Implementations must be deterministic and return a finite, non-negative
/// value for every position inside the grid extents.
pub trait Density: Send + Sync {
    fn density(&self, pos: [Float; 3], record: &ParameterRecord) -> Float;

    /// A value no smaller than the density anywhere in the domain, when one
    /// is known analytically. Returning `None` makes the sampler estimate it.
    fn upper_bound(&self, _record: &ParameterRecord) -> Option<Float> {
        None
    }
}

/// `n0` everywhere.
pub struct Constant;

impl Density for Constant {
    fn density(&self, _pos: [Float; 3], record: &ParameterRecord) -> Float {
        record.n0
    }

    fn upper_bound(&self, record: &ParameterRecord) -> Option<Float> {
        Some(record.n0)
    }
}

/// `A sin(k x) + offset`, clipped at zero. The amplitude, wavenumber and
/// offset come from the record's density profile.
pub struct Sinusoidal;

impl Density for Sinusoidal {
    fn density(&self, pos: [Float; 3], record: &ParameterRecord) -> Float {
        let p = &record.profile;
        (p.amplitude * (p.wavenumber * pos[0]).sin() + p.offset).max(0.0)
    }

    fn upper_bound(&self, record: &ParameterRecord) -> Option<Float> {
        let p = &record.profile;
        Some((p.amplitude.abs() + p.offset).max(0.0))
    }
}

/// Wraps a closure as a density profile.
pub struct FnDensity<F>(pub F);

impl<F> Density for FnDensity<F>
where
    F: Fn([Float; 3], &ParameterRecord) -> Float + Send + Sync,
{
    fn density(&self, pos: [Float; 3], record: &ParameterRecord) -> Float {
        (self.0)(pos, record)
    }
}

/// Density profiles selectable by name.
pub struct DensityRegistry {
    profiles: BTreeMap<String, Box<dyn Density>>,
}

impl DensityRegistry {
    pub fn empty() -> DensityRegistry {
        DensityRegistry {
            profiles: BTreeMap::new(),
        }
    }

    pub fn with_builtins() -> DensityRegistry {
        let mut registry = DensityRegistry::empty();
        registry.register("constant", Box::new(Constant));
        registry.register("sinusoidal", Box::new(Sinusoidal));
        registry
    }

    /// Adds a profile, replacing any profile of the same name.
    pub fn register(&mut self, name: &str, density: Box<dyn Density>) {
        self.profiles.insert(name.to_string(), density);
    }

    pub fn get(&self, name: &str) -> InitResult<&dyn Density> {
        self.profiles
            .get(name)
            .map(|d| d.as_ref())
            .ok_or_else(|| InitError::UnknownDensity(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(|k| k.as_str())
    }
}
