use crate::grid::Grid;

/// Scalar buffer over the padded `(N+2) x (N+2)` index space. Interior cells
/// run `1..=N` per axis; index `0` and `N+1` form the ghost ring, whose
/// values are derived from the interior by the boundary pass, never by the
/// solver stages themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    grid: Grid,
    data: Vec<f32>,
}

impl Field {
    pub fn new(grid: Grid) -> Self {
        let data = vec![0.0; grid.size()];
        Self { grid, data }
    }

    pub fn from_fn(grid: Grid, f: impl Fn(usize, usize) -> f32) -> Self {
        let padded = grid.padded();
        let data = (0..grid.size())
            .map(|k| f(k % padded, k / padded))
            .collect();
        Self { grid, data }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.idx(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f32) {
        let k = self.grid.idx(i, j);
        self.data[k] = value;
    }

    pub fn add(&mut self, i: usize, j: usize, amount: f32) {
        let k = self.grid.idx(i, j);
        self.data[k] += amount;
    }

    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    pub fn update_with_index(&mut self, f: impl Fn(usize, usize, f32) -> f32) {
        let padded = self.grid.padded();
        for (k, value) in self.data.iter_mut().enumerate() {
            *value = f(k % padded, k / padded, *value);
        }
    }

    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }

    pub fn interior_sum(&self) -> f32 {
        let n = self.grid.n();
        let padded = self.grid.padded();
        let mut total = 0.0;
        for j in 1..=n {
            let row = &self.data[j * padded..(j + 1) * padded];
            total += row[1..=n].iter().sum::<f32>();
        }
        total
    }

    pub fn max_abs(&self) -> f32 {
        self.data.iter().map(|v| v.abs()).fold(0.0_f32, f32::max)
    }

    pub(crate) fn values(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }
}
