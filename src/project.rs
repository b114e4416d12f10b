use crate::boundary::{enforce, BoundaryKind};
use crate::field::Field;
use crate::solve::LinSolve;

/// Central-difference divergence of `(u, v)` over the interior, in the same
/// scaling the projection uses. The ghost ring of `out` is refreshed so the
/// result is a well-formed field.
pub fn divergence_into(out: &mut Field, u: &Field, v: &Field) {
    assert_eq!(out.grid(), u.grid(), "field grid mismatch");
    assert_eq!(out.grid(), v.grid(), "field grid mismatch");
    let n = out.grid().n();
    let scale = -0.5 * n as f32;
    for j in 1..=n {
        for i in 1..=n {
            let d = (u.get(i + 1, j) - u.get(i - 1, j)) + (v.get(i, j + 1) - v.get(i, j - 1));
            out.set(i, j, scale * d);
        }
    }
    enforce(out, BoundaryKind::Continuity);
}

/// Remove the divergent component of `(u, v)` by discrete Hodge
/// decomposition: solve a Poisson equation for pressure in `p` (sourced by
/// the divergence in `div`) and subtract its gradient. `p` and `div` are
/// plain scratch; their prior contents are discarded.
///
/// The pressure solve reuses the fixed-sweep relaxation with unit
/// off-diagonal and diagonal 4, treating the Laplacian directly.
pub fn project(
    solver: &mut dyn LinSolve,
    u: &mut Field,
    v: &mut Field,
    p: &mut Field,
    div: &mut Field,
) {
    divergence_into(div, u, v);
    p.fill(0.0);
    enforce(p, BoundaryKind::Continuity);
    solver.solve(p, div, 1.0, 4.0, BoundaryKind::Continuity);
    let n = u.grid().n();
    let scale = 0.5 / n as f32;
    for j in 1..=n {
        for i in 1..=n {
            u.add(i, j, -scale * (p.get(i + 1, j) - p.get(i - 1, j)));
            v.add(i, j, -scale * (p.get(i, j + 1) - p.get(i, j - 1)));
        }
    }
    enforce(u, BoundaryKind::ReflectVertical);
    enforce(v, BoundaryKind::ReflectHorizontal);
}
