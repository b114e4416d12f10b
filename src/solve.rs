use rayon::prelude::*;
use std::sync::OnceLock;

use crate::boundary::{enforce, BoundaryKind};
use crate::field::Field;
use crate::grid::Grid;

/// Fixed relaxation budget per linear solve. Never run to convergence: the
/// bounded per-frame cost is the contract, residual stiffness is accepted.
pub const SWEEPS: usize = 20;

const PAR_THRESHOLD_DEFAULT: usize = 65_536;
const PAR_MIN_WORK_PER_THREAD: usize = 2048;

fn parallel_threshold() -> usize {
    static THRESHOLD: OnceLock<usize> = OnceLock::new();
    *THRESHOLD.get_or_init(|| {
        std::env::var("SMOKE_PAR_THRESHOLD")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(PAR_THRESHOLD_DEFAULT)
    })
}

pub(crate) fn should_parallel(len: usize) -> bool {
    if len < parallel_threshold() {
        return false;
    }
    let threads = rayon::current_num_threads().max(1);
    len / threads >= PAR_MIN_WORK_PER_THREAD
}

/// Relaxation strategy behind diffusion and the pressure solve.
///
/// Solves `x[i,j] - a*(sum of the four neighbors of x) = x0[i,j]` with
/// diagonal `c`, by exactly [`SWEEPS`] fixed-point sweeps, enforcing `kind`
/// on `x` after every sweep. The two implementations are different
/// iterations with different fixed points; callers pick one at construction
/// and must not expect bit-identical fields across them.
pub trait LinSolve {
    fn solve(&mut self, x: &mut Field, x0: &Field, a: f32, c: f32, kind: BoundaryKind);
}

/// Sequential in-place sweeps. Neighbor reads within a sweep see values
/// already updated earlier in the same sweep, which speeds convergence.
pub struct GaussSeidel;

impl LinSolve for GaussSeidel {
    fn solve(&mut self, x: &mut Field, x0: &Field, a: f32, c: f32, kind: BoundaryKind) {
        assert_eq!(x.grid(), x0.grid(), "field grid mismatch");
        let n = x.grid().n();
        let c_recip = 1.0 / c;
        for _ in 0..SWEEPS {
            for j in 1..=n {
                for i in 1..=n {
                    let neighbors =
                        x.get(i - 1, j) + x.get(i + 1, j) + x.get(i, j - 1) + x.get(i, j + 1);
                    x.set(i, j, (x0.get(i, j) + a * neighbors) * c_recip);
                }
            }
            enforce(x, kind);
        }
    }
}

/// Double-buffered sweeps. Every sweep reads only the sweep-start snapshot
/// and writes a distinct destination; the buffers then swap roles, a pointer
/// reassignment of the backing storage rather than a copy. Interior rows of
/// a sweep carry no cross-cell write dependency, so large grids fan the rows
/// out over the rayon pool.
pub struct Jacobi {
    next: Field,
}

impl Jacobi {
    pub fn new(grid: Grid) -> Self {
        Self {
            next: Field::new(grid),
        }
    }
}

impl LinSolve for Jacobi {
    fn solve(&mut self, x: &mut Field, x0: &Field, a: f32, c: f32, kind: BoundaryKind) {
        assert_eq!(x.grid(), x0.grid(), "field grid mismatch");
        assert_eq!(self.next.grid(), x.grid(), "scratch grid mismatch");
        let n = x.grid().n();
        let stride = x.grid().padded();
        let c_recip = 1.0 / c;
        for _ in 0..SWEEPS {
            {
                let cur = x.values();
                let src = x0.values();
                let dst = self.next.values_mut();
                let sweep_row = |j: usize, row: &mut [f32]| {
                    let base = j * stride;
                    for i in 1..=n {
                        let k = base + i;
                        let neighbors = cur[k - 1] + cur[k + 1] + cur[k - stride] + cur[k + stride];
                        row[i] = (src[k] + a * neighbors) * c_recip;
                    }
                };
                if should_parallel(cur.len()) {
                    dst.par_chunks_mut(stride)
                        .enumerate()
                        .skip(1)
                        .take(n)
                        .for_each(|(j, row)| sweep_row(j, row));
                } else {
                    for (j, row) in dst.chunks_mut(stride).enumerate().skip(1).take(n) {
                        sweep_row(j, row);
                    }
                }
            }
            // The destination's ghost ring is stale after the swap; the
            // boundary pass rewrites it before the next sweep reads it.
            std::mem::swap(x, &mut self.next);
            enforce(x, kind);
        }
    }
}

/// Advance `x` toward a diffused copy of `x0` by implicitly solving
/// `dx/dt = rate * laplacian(x)`, unconditionally stable at any `dt`.
pub fn diffuse(
    solver: &mut dyn LinSolve,
    x: &mut Field,
    x0: &Field,
    kind: BoundaryKind,
    rate: f32,
    dt: f32,
) {
    let n = x.grid().n() as f32;
    let a = dt * rate * n * n;
    solver.solve(x, x0, a, 1.0 + 4.0 * a, kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn spike(n: usize, i: usize, j: usize, amount: f32) -> Field {
        let mut field = Field::new(Grid::new(n));
        field.set(i, j, amount);
        enforce(&mut field, BoundaryKind::Continuity);
        field
    }

    fn check_zero_rate_is_identity(solver: &mut dyn LinSolve) {
        let n = 4;
        let x0 = spike(n, 2, 3, 10.0);
        let mut x = Field::new(Grid::new(n));
        diffuse(solver, &mut x, &x0, BoundaryKind::Continuity, 0.0, 0.1);
        for j in 1..=n {
            for i in 1..=n {
                assert_close(x.get(i, j), x0.get(i, j), 1e-6);
            }
        }
    }

    #[test]
    fn gauss_seidel_zero_rate_is_identity() {
        check_zero_rate_is_identity(&mut GaussSeidel);
    }

    #[test]
    fn jacobi_zero_rate_is_identity() {
        check_zero_rate_is_identity(&mut Jacobi::new(Grid::new(4)));
    }

    fn check_spike_smooths(solver: &mut dyn LinSolve) {
        let n = 4;
        let x0 = spike(n, 2, 2, 10.0);
        let mut x = Field::new(Grid::new(n));
        diffuse(solver, &mut x, &x0, BoundaryKind::Continuity, 1.0, 0.1);
        let center = x.get(2, 2);
        let neighbor = x.get(3, 2);
        assert!(center < 10.0, "spike should flatten, got {center}");
        assert!(neighbor > 0.0, "mass should reach the neighbor");
        assert!(center > neighbor, "peak should stay at the source cell");
    }

    #[test]
    fn gauss_seidel_smooths_a_spike() {
        check_spike_smooths(&mut GaussSeidel);
    }

    #[test]
    fn jacobi_smooths_a_spike() {
        check_spike_smooths(&mut Jacobi::new(Grid::new(4)));
    }

    #[test]
    fn jacobi_scratch_is_reusable_across_solves() {
        let n = 4;
        let mut solver = Jacobi::new(Grid::new(n));
        let x0 = spike(n, 2, 2, 10.0);
        let mut first = Field::new(Grid::new(n));
        diffuse(&mut solver, &mut first, &x0, BoundaryKind::Continuity, 0.5, 0.1);
        let mut second = Field::new(Grid::new(n));
        diffuse(&mut solver, &mut second, &x0, BoundaryKind::Continuity, 0.5, 0.1);
        for j in 1..=n {
            for i in 1..=n {
                assert_close(second.get(i, j), first.get(i, j), 1e-6);
            }
        }
    }
}
