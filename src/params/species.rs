use crate::config::{NeutralInput, SpeciesInput};
use crate::consts::KB;
use crate::Float;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Species {
    pub name: &'static str,
    pub q: Float,
    pub m: Float,
    /// Collision frequency [s^-1].
    pub nu: Float,
    /// Drift velocity [m/s].
    pub v0: [Float; 3],
    /// Thermal velocity [m/s].
    pub vt: [Float; 3],
    /// Temperature [K].
    pub t: Float,
    /// Cyclotron frequency in the background field [s^-1].
    pub omega: Float,
    /// Magnetization, omega / nu.
    pub kappa: Float,
}

/// Defaults that differ from one species to the next.
pub struct SpeciesDefaults {
    pub q: Float,
    pub m: Float,
    pub nu: Float,
}

/// Fan a scalar out to all three components, then let explicit components
/// override it. The order is fixed here and never depends on the order of the
/// keys in the input.
pub fn resolve_vector(common: Option<Float>, parts: [Option<Float>; 3]) -> [Float; 3] {
    let mut v = [common.unwrap_or(0.0); 3];
    for (c, part) in v.iter_mut().zip(parts.iter()) {
        if let Some(p) = part {
            *c = *p;
        }
    }
    v
}

pub fn thermal_speed(t: Float, m: Float) -> Float {
    (2.0 * KB * t / m).sqrt()
}

fn temperature(vt: &[Float; 3], m: Float) -> Float {
    let mean_sq = vt.iter().map(|v| v * v).sum::<Float>() / 3.0;
    m * mean_sq / (2.0 * KB)
}

impl Species {
    pub fn new(
        name: &'static str,
        input: &SpeciesInput,
        defaults: SpeciesDefaults,
        b0: Float,
    ) -> Species {
        let q = input.q.unwrap_or(defaults.q);
        let m = input.m.unwrap_or(defaults.m);
        let nu = input.nu.unwrap_or(defaults.nu);
        let v0 = resolve_vector(input.v0, [input.v0x, input.v0y, input.v0z]);

        let thermal_given = input.vt.is_some()
            || input.vtx.is_some()
            || input.vty.is_some()
            || input.vtz.is_some();
        let (vt, t) = match (thermal_given, input.t) {
            (false, Some(t)) => ([thermal_speed(t, m); 3], t),
            (true, Some(t)) => (
                resolve_vector(input.vt, [input.vtx, input.vty, input.vtz]),
                t,
            ),
            (true, None) => {
                let vt = resolve_vector(input.vt, [input.vtx, input.vty, input.vtz]);
                (vt, temperature(&vt, m))
            }
            (false, None) => ([0.0; 3], 0.0),
        };

        let omega = q.abs() * b0 / m;
        let kappa = if nu > 0.0 { omega / nu } else { Float::INFINITY };
        Species {
            name,
            q,
            m,
            nu,
            v0,
            vt,
            t,
            omega,
            kappa,
        }
    }

    /// Neutrals carry no charge and a single isotropic thermal speed derived
    /// from their temperature.
    pub fn neutral(input: &NeutralInput, m: Float, t: Float) -> Species {
        let v0 = resolve_vector(input.v0, [input.v0x, input.v0y, input.v0z]);
        Species {
            name: "neutrals",
            q: 0.0,
            m,
            nu: input.nu.unwrap_or(0.0),
            v0,
            vt: [thermal_speed(t, m); 3],
            t,
            omega: 0.0,
            kappa: 0.0,
        }
    }

    pub fn is_magnetized(&self) -> bool {
        self.kappa > 1.0
    }
}
