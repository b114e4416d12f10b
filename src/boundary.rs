use crate::field::Field;

/// How the ghost ring of a field relates to its interior.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Ghost cells copy the adjacent interior value. Scalars: density,
    /// pressure, divergence.
    Continuity,
    /// Ghost cells negate across the top and bottom walls, so vertical flow
    /// vanishes there. Used for the vertical velocity component.
    ReflectHorizontal,
    /// Ghost cells negate across the left and right walls. Used for the
    /// horizontal velocity component.
    ReflectVertical,
}

/// Fill the ghost ring from the interior. Must run after every pass that
/// leaves the ring stale, including after each individual relaxation sweep:
/// the next sweep reads neighbor values that sit on the ring.
pub fn enforce(field: &mut Field, kind: BoundaryKind) {
    let n = field.grid().n();
    let (sx, sy) = match kind {
        BoundaryKind::Continuity => (1.0, 1.0),
        BoundaryKind::ReflectVertical => (-1.0, 1.0),
        BoundaryKind::ReflectHorizontal => (1.0, -1.0),
    };
    for k in 1..=n {
        field.set(0, k, sx * field.get(1, k));
        field.set(n + 1, k, sx * field.get(n, k));
        field.set(k, 0, sy * field.get(k, 1));
        field.set(k, n + 1, sy * field.get(k, n));
    }
    // Corners average their two orthogonal edge-ghost neighbors, which the
    // loop above has already updated.
    field.set(0, 0, 0.5 * (field.get(1, 0) + field.get(0, 1)));
    field.set(0, n + 1, 0.5 * (field.get(1, n + 1) + field.get(0, n)));
    field.set(n + 1, 0, 0.5 * (field.get(n, 0) + field.get(n + 1, 1)));
    field.set(
        n + 1,
        n + 1,
        0.5 * (field.get(n, n + 1) + field.get(n + 1, n)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!(
            (a - b).abs() <= tol,
            "expected {a} to be within {tol} of {b}"
        );
    }

    fn interior_pattern(n: usize) -> Field {
        Field::from_fn(Grid::new(n), |i, j| {
            if (1..=n).contains(&i) && (1..=n).contains(&j) {
                (i * 10 + j) as f32
            } else {
                0.0
            }
        })
    }

    #[test]
    fn continuity_copies_edges_and_averages_corners() {
        let n = 4;
        let mut field = interior_pattern(n);
        enforce(&mut field, BoundaryKind::Continuity);
        for k in 1..=n {
            assert_close(field.get(0, k), field.get(1, k), 1e-6);
            assert_close(field.get(n + 1, k), field.get(n, k), 1e-6);
            assert_close(field.get(k, 0), field.get(k, 1), 1e-6);
            assert_close(field.get(k, n + 1), field.get(k, n), 1e-6);
        }
        assert_close(
            field.get(0, 0),
            0.5 * (field.get(1, 0) + field.get(0, 1)),
            1e-6,
        );
        assert_close(
            field.get(n + 1, n + 1),
            0.5 * (field.get(n, n + 1) + field.get(n + 1, n)),
            1e-6,
        );
    }

    #[test]
    fn reflect_vertical_negates_left_right_only() {
        let n = 4;
        let mut field = interior_pattern(n);
        enforce(&mut field, BoundaryKind::ReflectVertical);
        for k in 1..=n {
            assert_close(field.get(0, k), -field.get(1, k), 1e-6);
            assert_close(field.get(n + 1, k), -field.get(n, k), 1e-6);
            // top/bottom behave as continuity
            assert_close(field.get(k, 0), field.get(k, 1), 1e-6);
            assert_close(field.get(k, n + 1), field.get(k, n), 1e-6);
        }
    }

    #[test]
    fn reflect_horizontal_negates_top_bottom_only() {
        let n = 4;
        let mut field = interior_pattern(n);
        enforce(&mut field, BoundaryKind::ReflectHorizontal);
        for k in 1..=n {
            assert_close(field.get(k, 0), -field.get(k, 1), 1e-6);
            assert_close(field.get(k, n + 1), -field.get(k, n), 1e-6);
            assert_close(field.get(0, k), field.get(1, k), 1e-6);
            assert_close(field.get(n + 1, k), field.get(n, k), 1e-6);
        }
    }

    #[test]
    fn one_cell_interior_is_accepted() {
        let mut field = Field::from_fn(Grid::new(1), |i, j| {
            if i == 1 && j == 1 {
                4.0
            } else {
                0.0
            }
        });
        enforce(&mut field, BoundaryKind::Continuity);
        assert_close(field.get(0, 1), 4.0, 1e-6);
        assert_close(field.get(0, 0), 4.0, 1e-6);
    }
}
