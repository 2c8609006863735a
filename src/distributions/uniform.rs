use super::{partition, worker_rng, Layout, Positions};
use crate::params::{Axis, Grid};
use crate::Float;
use rand::prelude::*;
use rand_distr::Standard;
use rayon::prelude::*;

/// Regular placement on the mesh, x fastest.
///
/// With fewer particles than sites, particle `p` takes site
/// `p * sites / np`, so the population still spans the whole domain.
/// Otherwise particle `p` goes to site `p % sites` and every site gets
/// either `np / sites` or one more; the extra ones are spread along the cell
/// diagonal, one layer per `1 / layers` of a cell.
pub struct Lattice {
    axes: [Axis; 3],
    sites: [usize; 3],
    total: usize,
    np: usize,
    layers: usize,
    shift: Float,
}

impl Lattice {
    /// One particle per mesh vertex when `np` equals the number of sites.
    pub fn vertices(grid: &Grid, np: usize) -> Lattice {
        Lattice::new(grid, np, 0.0)
    }

    /// Same as [`Lattice::vertices`], moved by half a cell (half a layer
    /// when sites are shared) so no particle sits on a cell face.
    pub fn cell_centers(grid: &Grid, np: usize) -> Lattice {
        Lattice::new(grid, np, 0.5)
    }

    fn new(grid: &Grid, np: usize, shift: Float) -> Lattice {
        let sites = [grid.x.sites(), grid.y.sites(), grid.z.sites()];
        // Grid::new refuses grids whose site count overflows
        let total = grid.sites().max(1);
        let layers = (np / total + usize::from(np % total != 0)).max(1);
        Lattice {
            axes: [grid.x, grid.y, grid.z],
            sites,
            total,
            np,
            layers,
            shift,
        }
    }

    pub fn layers(&self) -> usize {
        self.layers
    }
}

impl Layout for Lattice {
    #[inline(always)]
    fn position(&self, index: usize) -> [Float; 3] {
        let (site, layer) = if self.np < self.total {
            let stride = index as u128 * self.total as u128 / self.np as u128;
            (stride as usize, 0)
        } else {
            (index % self.total, index / self.total)
        };
        let frac = (layer as Float + self.shift) / self.layers as Float;
        let idx = [
            site % self.sites[0],
            (site / self.sites[0]) % self.sites[1],
            site / (self.sites[0] * self.sites[1]),
        ];
        let mut pos = [0.0; 3];
        for (p, (axis, &i)) in pos.iter_mut().zip(self.axes.iter().zip(idx.iter())) {
            *p = if axis.is_active() {
                axis.lo + (i as Float + frac) * axis.delta
            } else {
                axis.lo
            };
        }
        pos
    }
}

/// Independent uniform draws over the extents, one random stream per worker.
pub fn random(grid: &Grid, np: usize, workers: usize, seed: u64) -> Positions {
    let parts: Vec<Positions> = partition(np, workers)
        .into_par_iter()
        .enumerate()
        .map(|(w, range)| {
            let mut rng = worker_rng(seed, 0, w);
            let mut out = Positions::with_capacity(range.len());
            for _ in range {
                out.push(uniform_point(grid, &mut rng));
            }
            out
        })
        .collect();
    Positions::concat(parts)
}

/// A point drawn uniformly over the active axes; collapsed axes stay at `lo`.
#[inline(always)]
pub(crate) fn uniform_point<R: Rng>(grid: &Grid, rng: &mut R) -> [Float; 3] {
    let mut pos = [0.0; 3];
    for (p, axis) in pos.iter_mut().zip(grid.axes().iter()) {
        *p = if axis.is_active() {
            let r: Float = rng.sample(Standard);
            axis.lo + r * axis.length()
        } else {
            axis.lo
        };
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridInput;
    use crate::distributions::generate_layout;

    fn grid(nx: i64, ny: i64, nz: i64) -> Grid {
        Grid::new(&GridInput {
            nx: Some(nx),
            ny: Some(ny),
            nz: Some(nz),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn one_particle_per_vertex() {
        let g = grid(4, 2, 0);
        let pos = generate_layout(&Lattice::vertices(&g, 8), 8, 3);
        assert_eq!(pos.len(), 8);
        assert_eq!(pos.get(0), [0.0, 0.0, 0.0]);
        assert_eq!(pos.get(1), [0.25, 0.0, 0.0]);
        assert_eq!(pos.get(4), [0.0, 0.5, 0.0]);
        assert_eq!(pos.get(7), [0.75, 0.5, 0.0]);
    }

    #[test]
    fn cell_centers_are_offset_by_half_a_cell() {
        let g = grid(4, 2, 0);
        let pos = generate_layout(&Lattice::cell_centers(&g, 8), 8, 1);
        assert_eq!(pos.get(0), [0.125, 0.25, 0.0]);
        assert_eq!(pos.get(7), [0.875, 0.75, 0.0]);
    }

    #[test]
    fn remainder_goes_round_robin() {
        let g = grid(4, 0, 0);
        let lattice = Lattice::vertices(&g, 6);
        assert_eq!(lattice.layers(), 2);
        let pos = generate_layout(&lattice, 6, 2);
        let xs: Vec<Float> = pos.x.clone();
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 0.125, 0.375]);
    }

    #[test]
    fn sparse_lattice_spans_the_domain() {
        let g = grid(16, 8, 0);
        let pos = generate_layout(&Lattice::vertices(&g, 16), 16, 3);
        assert_eq!(pos.len(), 16);
        let mut ys = pos.y.clone();
        ys.dedup();
        assert_eq!(ys, (0..8).map(|j| j as Float / 8.0).collect::<Vec<_>>());
        assert_eq!(pos.get(1), [0.5, 0.0, 0.0]);
        assert_eq!(pos.get(15), [0.5, 0.875, 0.0]);

        let pos = generate_layout(&Lattice::cell_centers(&g, 5), 5, 2);
        let mut sites: Vec<(Float, Float)> = pos.iter().map(|p| (p[0], p[1])).collect();
        sites.dedup();
        assert_eq!(sites.len(), 5);
        assert!(pos.y.iter().any(|&y| y > 0.5));
    }

    #[test]
    fn worker_count_does_not_change_lattice() {
        let g = grid(5, 3, 2);
        let lattice = Lattice::cell_centers(&g, 97);
        let one = generate_layout(&lattice, 97, 1);
        let many = generate_layout(&lattice, 97, 7);
        assert_eq!(one, many);
    }

    #[test]
    fn random_points_stay_inside() {
        let g = grid(4, 4, 0);
        let pos = random(&g, 500, 4, 9);
        assert_eq!(pos.len(), 500);
        for [x, y, z] in pos.iter() {
            assert!(x >= 0.0 && x < 1.0);
            assert!(y >= 0.0 && y < 1.0);
            assert_eq!(z, 0.0);
        }
        assert_eq!(pos, random(&g, 500, 4, 9));
    }
}
