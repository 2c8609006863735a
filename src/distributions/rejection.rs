//! Accept/reject sampling of an arbitrary density.
//!
//! Candidates are uniform over the grid extents and accepted with
//! probability `density / bound`. The result is only unbiased if `bound` is
//! a true upper bound, so every worker reports the largest density it saw;
//! if that exceeds the bound, the bound is raised to the larger of that value
//! and a lattice scan of the density, and the whole sample is drawn again.
//!
//! Workers split the particle count, not the domain: each one samples the
//! full extents with its own random stream. Counts are summed after every
//! pass and any shortfall is handed out again until `np` particles are
//! accepted or the attempt ceiling is spent.
use super::uniform::uniform_point;
use super::{partition, worker_rng, Positions};
use crate::density::Density;
use crate::error::{InitError, InitResult};
use crate::params::ParameterRecord;
use crate::Float;
use log::{debug, info, warn};
use rand::prelude::*;
use rand_distr::Standard;
use rayon::prelude::*;

/// How often the bound may be raised before giving up.
pub const MAX_BOUND_REFINEMENTS: usize = 8;
/// Scan points per cell along each active axis when estimating the bound.
const SCAN_REFINE: usize = 4;
const SCAN_MAX_POINTS: usize = 1 << 20;

struct Draw {
    positions: Positions,
    attempts: u64,
    max_seen: Float,
}

enum Outcome {
    Done(Positions),
    BoundExceeded(Float),
}

pub fn sample(density: &dyn Density, record: &ParameterRecord) -> InitResult<Positions> {
    if record.np == 0 {
        return Err(InitError::NonPositiveParticleCount(0));
    }
    let margin = record.sampling.bound_margin;
    let mut bound = initial_bound(density, record)?;
    if !(bound > 0.0) || !bound.is_finite() {
        return Err(InitError::ZeroDensity);
    }

    let mut attempts: u64 = 0;
    let mut pass: u64 = 0;
    let mut scanned: Option<Float> = None;
    for _ in 0..=MAX_BOUND_REFINEMENTS {
        debug!("rejection sampling with bound {}", bound);
        match draw_all(density, record, bound, &mut attempts, &mut pass)? {
            Outcome::Done(positions) => {
                info!(
                    "accepted {} particles in {} attempts ({:.1}%)",
                    positions.len(),
                    attempts,
                    100.0 * positions.len() as f64 / attempts as f64
                );
                return Ok(positions);
            }
            Outcome::BoundExceeded(seen) => {
                warn!(
                    "density reached {} above the bound {}; raising the bound and resampling",
                    seen, bound
                );
                let peak = match scanned {
                    Some(p) => p,
                    None => {
                        let p = scan_maximum(density, record)?;
                        scanned = Some(p);
                        p
                    }
                };
                bound = seen.max(peak) * (1.0 + margin);
            }
        }
    }
    Err(InitError::BoundNotConverged(MAX_BOUND_REFINEMENTS))
}

/// Explicit bound from the configuration, then the density's own bound,
/// then a lattice scan widened by the configured margin.
pub fn initial_bound(density: &dyn Density, record: &ParameterRecord) -> InitResult<Float> {
    match record.sampling.upper_bound {
        Some(m) if m > 0.0 => return Ok(m),
        Some(m) => warn!("Ignoring non-positive density upper bound: {}", m),
        None => {}
    }
    if let Some(m) = density.upper_bound(record) {
        return Ok(m);
    }
    let peak = scan_maximum(density, record)?;
    Ok(peak * (1.0 + record.sampling.bound_margin))
}

/// Largest density on a lattice `SCAN_REFINE` times finer than the mesh,
/// end points included.
pub fn scan_maximum(density: &dyn Density, record: &ParameterRecord) -> InitResult<Float> {
    let grid = &record.grid;
    let dims = grid.dimensions().max(1);
    let cap = (SCAN_MAX_POINTS as f64).powf(1.0 / dims as f64).floor() as usize;
    let counts: Vec<usize> = grid
        .axes()
        .iter()
        .map(|a| {
            if a.is_active() {
                a.n.saturating_mul(SCAN_REFINE).saturating_add(1).min(cap).max(2)
            } else {
                1
            }
        })
        .collect();
    let axes = grid.axes();
    let total = counts.iter().product::<usize>();

    (0..total)
        .into_par_iter()
        .map(|i| {
            let idx = [
                i % counts[0],
                (i / counts[0]) % counts[1],
                i / (counts[0] * counts[1]),
            ];
            let mut pos = [0.0; 3];
            for k in 0..3 {
                pos[k] = if counts[k] > 1 {
                    axes[k].lo + axes[k].length() * idx[k] as Float / (counts[k] - 1) as Float
                } else {
                    axes[k].lo
                };
            }
            checked(density, pos, record)
        })
        .try_reduce(|| 0.0, |a, b| Ok(a.max(b)))
}

fn checked(density: &dyn Density, pos: [Float; 3], record: &ParameterRecord) -> InitResult<Float> {
    let f = density.density(pos, record);
    if !(f >= 0.0) || !f.is_finite() {
        return Err(InitError::InvalidDensity {
            value: f,
            x: pos[0],
            y: pos[1],
            z: pos[2],
        });
    }
    Ok(f)
}

/// Draws until `np` particles are accepted under a fixed bound.
fn draw_all(
    density: &dyn Density,
    record: &ParameterRecord,
    bound: Float,
    attempts: &mut u64,
    pass: &mut u64,
) -> InitResult<Outcome> {
    let np = record.np;
    let max_attempts = record.sampling.max_attempts;
    let mut accepted: Vec<Positions> = Vec::new();
    let mut remaining = np;

    while remaining > 0 {
        let budget = max_attempts.saturating_sub(*attempts);
        if budget == 0 {
            return Err(InitError::AttemptCeiling {
                requested: np,
                accepted: np - remaining,
                attempts: *attempts,
            });
        }
        let quotas: Vec<usize> = partition(remaining, record.sampling.workers)
            .into_iter()
            .map(|r| r.len())
            .collect();
        let budgets = split_budget(budget, &quotas);
        let seed = record.sampling.seed;
        let this_pass = *pass;

        let draws = quotas
            .into_par_iter()
            .zip(budgets)
            .enumerate()
            .map(|(w, (quota, budget))| {
                let mut rng = worker_rng(seed, this_pass, w);
                draw(density, record, bound, quota, budget, &mut rng)
            })
            .collect::<InitResult<Vec<Draw>>>()?;
        *pass += 1;

        let used: u64 = draws.iter().map(|d| d.attempts).sum();
        let seen = draws.iter().map(|d| d.max_seen).fold(0.0, Float::max);
        let count: usize = draws.iter().map(|d| d.positions.len()).sum();
        *attempts += used;
        debug!(
            "pass {}: {} accepted of {} wanted in {} attempts",
            this_pass, count, remaining, used
        );
        if seen > bound {
            return Ok(Outcome::BoundExceeded(seen));
        }
        remaining -= count;
        accepted.extend(draws.into_iter().map(|d| d.positions));
    }
    Ok(Outcome::Done(Positions::concat(accepted)))
}

/// Shares the attempt budget among the workers that still have particles to
/// place. At least one of them always gets a non-zero share.
fn split_budget(budget: u64, quotas: &[usize]) -> Vec<u64> {
    let busy = quotas.iter().filter(|&&q| q > 0).count() as u64;
    if busy == 0 {
        return vec![0; quotas.len()];
    }
    let base = budget / busy;
    let mut rem = budget % busy;
    quotas
        .iter()
        .map(|&q| {
            if q == 0 {
                return 0;
            }
            let extra = if rem > 0 {
                rem -= 1;
                1
            } else {
                0
            };
            base + extra
        })
        .collect()
}

fn draw<R: Rng>(
    density: &dyn Density,
    record: &ParameterRecord,
    bound: Float,
    quota: usize,
    budget: u64,
    rng: &mut R,
) -> InitResult<Draw> {
    let mut positions = Positions::with_capacity(quota);
    let mut attempts = 0;
    let mut max_seen: Float = 0.0;
    while positions.len() < quota && attempts < budget {
        attempts += 1;
        let candidate = uniform_point(&record.grid, rng);
        let f = checked(density, candidate, record)?;
        if f > max_seen {
            max_seen = f;
        }
        if f > bound {
            // this worker's sample is void, stop early
            break;
        }
        let r: Float = rng.sample(Standard);
        if f > 0.0 && r * bound <= f {
            positions.push(candidate);
        }
    }
    Ok(Draw {
        positions,
        attempts,
        max_seen,
    })
}
