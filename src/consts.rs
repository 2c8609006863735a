//! Physical constants in SI units.
use crate::Float;

/// Elementary charge [C].
pub const Q: Float = 1.602_176_634e-19;
/// Electron mass [kg].
pub const ME: Float = 9.109_383_701_5e-31;
/// Proton mass [kg].
pub const MP: Float = 1.672_621_923_69e-27;
/// Boltzmann constant [J/K].
pub const KB: Float = 1.380_649e-23;
