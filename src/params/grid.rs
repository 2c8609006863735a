use crate::config::GridInput;
use crate::error::{InitError, InitResult};
use crate::Float;
use log::warn;

/// One axis of the mesh. `n == 0` marks a collapsed axis that takes no
/// part in particle placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub n: usize,
    pub lo: Float,
    pub hi: Float,
    pub delta: Float,
}

impl Axis {
    pub fn length(&self) -> Float {
        self.hi - self.lo
    }

    pub fn is_active(&self) -> bool {
        self.n > 0
    }

    /// Number of lattice sites along this axis. A collapsed axis still
    /// contributes a single site at `lo`.
    pub fn sites(&self) -> usize {
        self.n.max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub x: Axis,
    pub y: Axis,
    pub z: Axis,
}

impl Grid {
    pub fn new(input: &GridInput) -> InitResult<Grid> {
        let grid = Grid {
            x: resolve_axis(
                'x',
                input.nx,
                input.dx,
                input.x0.unwrap_or(0.0),
                input.x1.unwrap_or(1.0),
            )?,
            y: resolve_axis(
                'y',
                input.ny,
                input.dy,
                input.y0.unwrap_or(0.0),
                input.y1.unwrap_or(1.0),
            )?,
            z: resolve_axis(
                'z',
                input.nz,
                input.dz,
                input.z0.unwrap_or(0.0),
                input.z1.unwrap_or(1.0),
            )?,
        };
        grid.checked_sites().ok_or(InitError::SiteOverflow {
            nx: grid.x.n,
            ny: grid.y.n,
            nz: grid.z.n,
        })?;
        Ok(grid)
    }

    pub fn axes(&self) -> [&Axis; 3] {
        [&self.x, &self.y, &self.z]
    }

    /// Number of axes with at least one cell.
    pub fn dimensions(&self) -> usize {
        self.axes().iter().filter(|a| a.is_active()).count()
    }

    /// Lattice sites in the whole domain, one per cell on every active axis.
    /// Saturates for grids that did not come from [`Grid::new`].
    pub fn sites(&self) -> usize {
        self.checked_sites().unwrap_or(usize::MAX)
    }

    fn checked_sites(&self) -> Option<usize> {
        self.x
            .sites()
            .checked_mul(self.y.sites())?
            .checked_mul(self.z.sites())
    }
}

/// Resolve one axis from the optional cell count and spacing.
///
/// A negative count or a non-positive spacing is ignored with a warning.
/// When both survive, the count wins and the spacing is re-derived from it.
pub fn resolve_axis(
    name: char,
    n: Option<i64>,
    d: Option<Float>,
    lo: Float,
    hi: Float,
) -> InitResult<Axis> {
    let n = match n {
        Some(v) if v < 0 => {
            warn!("Ignoring negative value for N{}: {}", name, v);
            None
        }
        Some(v) => Some(v as usize),
        None => None,
    };
    let d = match d {
        Some(v) if !(v > 0.0) => {
            warn!("Ignoring non-positive value for d{}: {}", name, v);
            None
        }
        other => other,
    };
    if hi == lo {
        warn!("zero-width {} dimension", name);
    }
    let length = hi - lo;

    let n = match (n, d) {
        (Some(n), Some(d)) => {
            if n > 0 && !close(length / n as Float, d) {
                warn!(
                    "Both N{0} = {1} and d{0} = {2} given; using N{0}, d{0} becomes {3}",
                    name,
                    n,
                    d,
                    length / n as Float
                );
            }
            n
        }
        (Some(n), None) => n,
        (None, Some(d)) => {
            let n = (length.abs() / d).round() as usize;
            if n > 0 && !close(length / n as Float, d) {
                warn!(
                    "d{} = {} does not divide the domain; using {} cells of width {}",
                    name,
                    d,
                    n,
                    length / n as Float
                );
            }
            n
        }
        (None, None) => return Err(InitError::UnresolvedAxis { axis: name }),
    };
    let delta = if n > 0 { length / n as Float } else { 0.0 };

    Ok(Axis { n, lo, hi, delta })
}

fn close(a: Float, b: Float) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_from_count() {
        let axis = resolve_axis('x', Some(10), None, 0.0, 1.0).unwrap();
        assert_eq!(axis.n, 10);
        assert!((axis.delta - 0.1).abs() < 1e-12);
    }

    #[test]
    fn count_from_spacing() {
        let axis = resolve_axis('y', None, Some(0.25), -1.0, 1.0).unwrap();
        assert_eq!(axis.n, 8);
        assert!((axis.delta - 0.25).abs() < 1e-12);
    }

    #[test]
    fn count_wins_over_spacing() {
        let axis = resolve_axis('x', Some(4), Some(0.1), 0.0, 2.0).unwrap();
        assert_eq!(axis.n, 4);
        assert!((axis.delta - 0.5).abs() < 1e-12);
    }

    #[test]
    fn inexact_spacing_is_rederived() {
        let axis = resolve_axis('x', None, Some(0.3), 0.0, 1.0).unwrap();
        assert_eq!(axis.n, 3);
        assert!((axis.delta * 3.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn negative_count_falls_back_to_spacing() {
        let axis = resolve_axis('z', Some(-3), Some(0.5), 0.0, 1.0).unwrap();
        assert_eq!(axis.n, 2);
    }

    #[test]
    fn negative_count_without_spacing_is_unresolved() {
        let err = resolve_axis('z', Some(-3), None, 0.0, 1.0).unwrap_err();
        assert_eq!(err, InitError::UnresolvedAxis { axis: 'z' });
        assert!(err.is_configuration());
    }

    #[test]
    fn nothing_given_is_unresolved() {
        assert!(resolve_axis('x', None, None, 0.0, 1.0).is_err());
    }

    #[test]
    fn zero_width_axis_continues() {
        let axis = resolve_axis('x', Some(4), None, 1.0, 1.0).unwrap();
        assert_eq!(axis.n, 4);
        assert_eq!(axis.delta, 0.0);
        let axis = resolve_axis('x', None, Some(0.1), 1.0, 1.0).unwrap();
        assert!(!axis.is_active());
    }

    #[test]
    fn overflowing_site_count_is_refused() {
        let n = 1 << 22;
        let input = GridInput {
            nx: Some(n),
            ny: Some(n),
            nz: Some(n),
            ..Default::default()
        };
        let err = Grid::new(&input).unwrap_err();
        assert_eq!(
            err,
            InitError::SiteOverflow {
                nx: 1 << 22,
                ny: 1 << 22,
                nz: 1 << 22,
            }
        );
        assert!(err.is_configuration());

        let flat = Grid::new(&GridInput {
            nx: Some(n),
            ny: Some(n),
            nz: Some(0),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(flat.sites(), (n * n) as usize);
    }

    #[test]
    fn collapsed_axis_has_one_site() {
        let axis = resolve_axis('y', Some(0), None, 0.0, 1.0).unwrap();
        assert!(!axis.is_active());
        assert_eq!(axis.sites(), 1);
        assert_eq!(axis.delta, 0.0);
    }
}
