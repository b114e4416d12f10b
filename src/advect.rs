use rayon::prelude::*;

use crate::boundary::{enforce, BoundaryKind};
use crate::field::Field;
use crate::solve::should_parallel;

/// Semi-Lagrangian transport of `d0` into `d` along the backward
/// characteristic of `(u, v)`. Always out-of-place: the pass reads only
/// frozen sources, so it is valid in both execution regimes. The transporting
/// pair is caller-supplied and need not be the field being advected.
///
/// Each backtraced coordinate is clamped to `[0.5, N + 0.5]`, which keeps the
/// bilinear footprint inside the padded buffer, touching but never crossing
/// the ghost ring.
pub fn advect(d: &mut Field, d0: &Field, u: &Field, v: &Field, kind: BoundaryKind, dt: f32) {
    assert_eq!(d.grid(), d0.grid(), "field grid mismatch");
    assert_eq!(d.grid(), u.grid(), "field grid mismatch");
    assert_eq!(d.grid(), v.grid(), "field grid mismatch");
    let n = d.grid().n();
    let stride = d.grid().padded();
    let dt0 = dt * n as f32;
    let max_coord = n as f32 + 0.5;
    {
        let src = d0.values();
        let us = u.values();
        let vs = v.values();
        let trace_row = |j: usize, row: &mut [f32]| {
            let base = j * stride;
            for i in 1..=n {
                let k = base + i;
                let x = (i as f32 - dt0 * us[k]).clamp(0.5, max_coord);
                let y = (j as f32 - dt0 * vs[k]).clamp(0.5, max_coord);
                let i0 = x.floor() as usize;
                let j0 = y.floor() as usize;
                let s1 = x - i0 as f32;
                let s0 = 1.0 - s1;
                let t1 = y - j0 as f32;
                let t0 = 1.0 - t1;
                let q00 = src[i0 + j0 * stride];
                let q01 = src[i0 + (j0 + 1) * stride];
                let q10 = src[i0 + 1 + j0 * stride];
                let q11 = src[i0 + 1 + (j0 + 1) * stride];
                row[i] = s0 * (t0 * q00 + t1 * q01) + s1 * (t0 * q10 + t1 * q11);
            }
        };
        let dst = d.values_mut();
        if should_parallel(dst.len()) {
            dst.par_chunks_mut(stride)
                .enumerate()
                .skip(1)
                .take(n)
                .for_each(|(j, row)| trace_row(j, row));
        } else {
            for (j, row) in dst.chunks_mut(stride).enumerate().skip(1).take(n) {
                trace_row(j, row);
            }
        }
    }
    enforce(d, kind);
}
