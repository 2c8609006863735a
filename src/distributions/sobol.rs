//! Sobol low-discrepancy sequence, up to three dimensions.
//!
//! Direction numbers follow Joe & Kuo (new-joe-kuo-6.21201); points are in
//! Gray-code order, so point `i` can be computed without generating the
//! ones before it.
use super::Layout;
use crate::error::{InitError, InitResult};
use crate::params::{Axis, Grid};
use crate::Float;

const BITS: usize = 32;
const SCALE: f64 = 1.0 / (1u64 << BITS) as f64;

/// (degree, coefficients, initial direction numbers) of the primitive
/// polynomial for dimensions 2 and 3. Dimension 1 is the van der Corput
/// sequence.
const POLYNOMIALS: [(usize, u32, [u32; 2]); 2] = [(1, 0, [1, 0]), (2, 1, [1, 3])];

pub const MAX_DIMENSIONS: usize = 3;

#[derive(Debug, Clone)]
pub struct SobolSequence {
    directions: Vec<[u32; BITS]>,
}

impl SobolSequence {
    pub fn new(dimensions: usize) -> SobolSequence {
        assert!(dimensions <= MAX_DIMENSIONS);
        let mut directions = Vec::with_capacity(dimensions);
        for d in 0..dimensions {
            let mut v = [0u32; BITS];
            if d == 0 {
                for (k, vk) in v.iter_mut().enumerate() {
                    *vk = 1 << (BITS - 1 - k);
                }
            } else {
                let (s, a, m) = POLYNOMIALS[d - 1];
                for k in 0..s {
                    v[k] = m[k] << (BITS - 1 - k);
                }
                for k in s..BITS {
                    let mut vk = v[k - s] ^ (v[k - s] >> s);
                    for j in 1..s {
                        if (a >> (s - 1 - j)) & 1 == 1 {
                            vk ^= v[k - j];
                        }
                    }
                    v[k] = vk;
                }
            }
            directions.push(v);
        }
        SobolSequence { directions }
    }

    pub fn dimensions(&self) -> usize {
        self.directions.len()
    }

    /// Largest number of distinct points the 32-bit tables can address.
    pub fn capacity() -> usize {
        1usize << BITS.min(usize::BITS as usize - 1)
    }

    /// Component `dim` of point `index`, in [0, 1).
    pub fn component(&self, index: u32, dim: usize) -> f64 {
        let gray = index ^ (index >> 1);
        let v = &self.directions[dim];
        let mut x = 0u32;
        let mut bits = gray;
        let mut k = 0;
        while bits != 0 {
            if bits & 1 == 1 {
                x ^= v[k];
            }
            bits >>= 1;
            k += 1;
        }
        x as f64 * SCALE
    }

    pub fn point(&self, index: u32) -> Vec<f64> {
        (0..self.dimensions())
            .map(|d| self.component(index, d))
            .collect()
    }
}

/// Sobol points scaled into the extents of the active axes. Dimensions are
/// assigned to active axes in x, y, z order.
pub struct SobolLayout {
    sequence: SobolSequence,
    axes: [Axis; 3],
    dims: [Option<usize>; 3],
}

impl SobolLayout {
    pub fn new(grid: &Grid, np: usize) -> InitResult<SobolLayout> {
        if np > SobolSequence::capacity() {
            return Err(InitError::SequenceExhausted {
                requested: np,
                max: SobolSequence::capacity(),
            });
        }
        let axes = [grid.x, grid.y, grid.z];
        let mut dims = [None; 3];
        let mut next = 0;
        for (dim, axis) in dims.iter_mut().zip(axes.iter()) {
            if axis.is_active() {
                *dim = Some(next);
                next += 1;
            }
        }
        Ok(SobolLayout {
            sequence: SobolSequence::new(next),
            axes,
            dims,
        })
    }
}

impl Layout for SobolLayout {
    #[inline(always)]
    fn position(&self, index: usize) -> [Float; 3] {
        let mut pos = [0.0; 3];
        for (p, (axis, dim)) in pos.iter_mut().zip(self.axes.iter().zip(self.dims.iter())) {
            *p = match dim {
                Some(d) => {
                    let u = self.sequence.component(index as u32, *d) as Float;
                    axis.lo + u * axis.length()
                }
                None => axis.lo,
            };
        }
        pos
    }
}
