//! Initial particle placement.
//!
//! Every generator returns exactly `np` positions or an error, never a
//! partially filled array. The work is split into `workers` contiguous
//! ranges of the particle index and the ranges are run on the rayon pool.
pub mod rejection;
pub mod sobol;
pub mod uniform;

use crate::density::Density;
use crate::error::{InitError, InitResult};
use crate::params::ParameterRecord;
use crate::Float;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::ops::Range;

named_enum! {
    /// Selects the placement strategy.
    pub enum GeneratorKind: "generator" {
        Uniform => "uniform",
        UniformCoordinates => "uniform-coordinates",
        UniformCellCentered => "uniform-cell-centered",
        Sobol => "sobol",
        Rejection => "rejection",
    }
}

/// Particle positions, one array per axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Positions {
    pub x: Vec<Float>,
    pub y: Vec<Float>,
    pub z: Vec<Float>,
}

impl Positions {
    pub fn with_capacity(n: usize) -> Positions {
        Positions {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, p: [Float; 3]) {
        self.x.push(p[0]);
        self.y.push(p[1]);
        self.z.push(p[2]);
    }

    pub fn get(&self, i: usize) -> [Float; 3] {
        [self.x[i], self.y[i], self.z[i]]
    }

    pub fn append(&mut self, other: &mut Positions) {
        self.x.append(&mut other.x);
        self.y.append(&mut other.y);
        self.z.append(&mut other.z);
    }

    pub fn iter(&self) -> impl Iterator<Item = [Float; 3]> + '_ {
        itertools::izip!(&self.x, &self.y, &self.z).map(|(&x, &y, &z)| [x, y, z])
    }

    pub fn concat(parts: Vec<Positions>) -> Positions {
        let n = parts.iter().map(|p| p.len()).sum();
        let mut out = Positions::with_capacity(n);
        for mut part in parts {
            out.append(&mut part);
        }
        out
    }
}

/// A placement where the position of particle `i` depends on `i` alone.
/// Such layouts can be split over workers without changing the result.
pub trait Layout: Sync {
    fn position(&self, index: usize) -> [Float; 3];

    fn generate_range(&self, range: Range<usize>) -> Positions {
        let mut out = Positions::with_capacity(range.len());
        for i in range {
            out.push(self.position(i));
        }
        out
    }
}

/// Splits `0..n` into `workers` contiguous ranges whose lengths differ by
/// at most one. Earlier ranges take the remainder.
pub fn partition(n: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let base = n / workers;
    let rem = n % workers;
    let mut start = 0;
    (0..workers)
        .map(|w| {
            let len = base + if w < rem { 1 } else { 0 };
            let r = start..start + len;
            start += len;
            r
        })
        .collect()
}

/// Runs a layout over `0..np`, one range per worker.
pub fn generate_layout<L: Layout>(layout: &L, np: usize, workers: usize) -> Positions {
    let parts: Vec<Positions> = partition(np, workers)
        .into_par_iter()
        .map(|r| layout.generate_range(r))
        .collect();
    Positions::concat(parts)
}

/// Independent random stream for one worker of one sampling pass.
pub(crate) fn worker_rng(seed: u64, pass: u64, worker: usize) -> StdRng {
    let mix = seed
        ^ pass.wrapping_mul(0xD1B5_4A32_D192_ED03)
        ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    StdRng::seed_from_u64(mix)
}

/// Runs the generator selected in the record. `density` is only consulted
/// by rejection sampling, which fails without one.
pub fn generate(record: &ParameterRecord, density: Option<&dyn Density>) -> InitResult<Positions> {
    let np = record.np;
    let workers = record.sampling.workers;
    let positions = match record.sampling.kind {
        GeneratorKind::Uniform => uniform::random(&record.grid, np, workers, record.sampling.seed),
        GeneratorKind::UniformCoordinates => {
            generate_layout(&uniform::Lattice::vertices(&record.grid, np), np, workers)
        }
        GeneratorKind::UniformCellCentered => {
            generate_layout(&uniform::Lattice::cell_centers(&record.grid, np), np, workers)
        }
        GeneratorKind::Sobol => {
            generate_layout(&sobol::SobolLayout::new(&record.grid, np)?, np, workers)
        }
        GeneratorKind::Rejection => {
            let density = density
                .ok_or_else(|| InitError::UnknownDensity(record.profile.name.clone()))?;
            rejection::sample(density, record)?
        }
    };
    if !cfg!(feature = "unchecked") {
        assert_eq!(positions.len(), np);
    }
    Ok(positions)
}
