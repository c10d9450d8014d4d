//! Symmetric skyline (variable-band) matrix with in-place Cholesky.
//!
//! Only the lower triangle is stored, row by row. Row `i` holds columns
//! `first_column(i)..=i` contiguously and ends just before `row_ends[i]`, so
//! the diagonal sits at `row_ends[i] - 1` and entry `(i, j)` at
//! `row_ends[i] - 1 - (i - j)`.
//!
//! ```text
//! row_ends = [1, 3, 5, 9]
//!
//! | a00             |      values = [a00,
//! | a10 a11         |                a10, a11,
//! |     a21 a22     |                a21, a22,
//! | a30 a31 a32 a33 |                a30, a31, a32, a33]
//! ```

use crate::error::{HeatFilmError, Result};

/// Symmetric matrix in skyline storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SkylineMatrix {
    row_ends: Vec<usize>,
    values: Vec<f64>,
}

impl SkylineMatrix {
    /// Create a zero matrix with the given cumulative row ends.
    pub fn new(row_ends: &[usize]) -> Self {
        let len = row_ends.last().copied().unwrap_or(0);
        Self {
            row_ends: row_ends.to_vec(),
            values: vec![0.0; len],
        }
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.row_ends.len()
    }

    /// Number of stored entries.
    pub fn stored_len(&self) -> usize {
        self.values.len()
    }

    /// Row `i` starts at this flattened index.
    #[inline]
    fn row_start(&self, i: usize) -> usize {
        if i == 0 {
            0
        } else {
            self.row_ends[i - 1]
        }
    }

    /// Leftmost stored column of row `i`.
    #[inline]
    pub fn first_column(&self, i: usize) -> usize {
        i + 1 - (self.row_ends[i] - self.row_start(i))
    }

    /// Flattened index of `(row, col)`, if stored. Order of the indices does
    /// not matter.
    #[inline]
    pub fn position(&self, row: usize, col: usize) -> Option<usize> {
        let (i, j) = if col > row { (col, row) } else { (row, col) };
        if j < self.first_column(i) {
            None
        } else {
            Some(self.row_ends[i] - 1 - (i - j))
        }
    }

    /// Entry `(row, col)`; zero outside the stored band.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.position(row, col).map_or(0.0, |p| self.values[p])
    }

    /// Store `value` at `(row, col)`.
    ///
    /// Writing zero outside the band is a no-op; any other value there is an
    /// error.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        match self.position(row, col) {
            Some(p) => {
                self.values[p] = value;
                Ok(())
            }
            None if value == 0.0 => Ok(()),
            None => Err(self.outside_band(row, col)),
        }
    }

    /// Add `value` to `(row, col)`, with the same band rules as [`set`](Self::set).
    pub fn add(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        match self.position(row, col) {
            Some(p) => {
                self.values[p] += value;
                Ok(())
            }
            None if value == 0.0 => Ok(()),
            None => Err(self.outside_band(row, col)),
        }
    }

    fn outside_band(&self, row: usize, col: usize) -> HeatFilmError {
        let i = row.max(col);
        HeatFilmError::OutsideBand {
            row,
            col,
            first_column: self.first_column(i),
        }
    }

    /// Reset every stored entry to zero.
    pub fn clear(&mut self) {
        self.values.fill(0.0);
    }

    /// Flattened stored values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Overwrite with the entrywise sum of matrices sharing this layout.
    pub fn assign_sum(&mut self, parts: &[&SkylineMatrix]) {
        debug_assert!(parts.iter().all(|m| m.row_ends == self.row_ends));
        for (p, value) in self.values.iter_mut().enumerate() {
            *value = parts.iter().map(|m| m.values[p]).sum();
        }
    }

    /// Symmetric matrix-vector product.
    pub fn mul_vec(&self, x: &[f64]) -> Vec<f64> {
        let mut y = vec![0.0; self.size()];
        for i in 0..self.size() {
            let first = self.first_column(i);
            let start = self.row_start(i);
            for j in first..i {
                let a = self.values[start + (j - first)];
                y[i] += a * x[j];
                y[j] += a * x[i];
            }
            y[i] += self.values[self.row_ends[i] - 1] * x[i];
        }
        y
    }

    /// Factor in place into `L L^T`, overwriting the lower triangle with `L`.
    ///
    /// No pivoting. Fails with [`HeatFilmError::NotPositiveDefinite`] at the
    /// first pivot that is not strictly positive; the stored values are then
    /// partially factored and must be reassembled before reuse.
    pub fn factor(&mut self) -> Result<()> {
        for i in 0..self.size() {
            let fi = self.first_column(i);
            let si = self.row_start(i);

            for j in fi..i {
                let fj = self.first_column(j);
                let sj = self.row_start(j);
                let k0 = fi.max(fj);
                let dot: f64 = (k0..j)
                    .map(|k| self.values[si + (k - fi)] * self.values[sj + (k - fj)])
                    .sum();
                let diag = self.values[self.row_ends[j] - 1];
                let p = si + (j - fi);
                self.values[p] = (self.values[p] - dot) / diag;
            }

            let d = si + (i - fi);
            let sq: f64 = self.values[si..d].iter().map(|l| l * l).sum();
            let pivot = self.values[d] - sq;
            // also rejects NaN
            if !(pivot > 0.0) {
                return Err(HeatFilmError::NotPositiveDefinite {
                    equation: i,
                    pivot,
                });
            }
            self.values[d] = pivot.sqrt();
        }
        Ok(())
    }

    /// Solve `L L^T x = rhs` in place, using the factor produced by
    /// [`factor`](Self::factor).
    pub fn solve(&self, rhs: &mut [f64]) {
        let n = self.size();

        // forward: L y = b
        for i in 0..n {
            let fi = self.first_column(i);
            let si = self.row_start(i);
            let dot: f64 = (fi..i).map(|k| self.values[si + (k - fi)] * rhs[k]).sum();
            rhs[i] = (rhs[i] - dot) / self.values[self.row_ends[i] - 1];
        }

        // backward: L^T x = y, column-oriented over the stored rows
        for i in (0..n).rev() {
            let fi = self.first_column(i);
            let si = self.row_start(i);
            rhs[i] /= self.values[self.row_ends[i] - 1];
            let xi = rhs[i];
            for k in fi..i {
                rhs[k] -= self.values[si + (k - fi)] * xi;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Row ends for half-bandwidths 1, 2, 2, 4.
    const PROFILE: [usize; 4] = [1, 3, 5, 9];

    #[test]
    fn test_first_column() {
        let m = SkylineMatrix::new(&PROFILE);
        assert_eq!(m.first_column(0), 0);
        assert_eq!(m.first_column(1), 0);
        assert_eq!(m.first_column(2), 1);
        assert_eq!(m.first_column(3), 0);
        assert_eq!(m.stored_len(), 9);
    }

    #[test]
    fn test_lookup_outside_band_is_zero() {
        let mut m = SkylineMatrix::new(&PROFILE);
        for i in 0..4 {
            for j in 0..=i {
                let _ = m.set(i, j, 1.0 + (i * 4 + j) as f64);
            }
        }
        assert_eq!(m.get(2, 0), 0.0);
        assert_eq!(m.get(0, 2), 0.0);
    }

    #[test]
    fn test_symmetric_lookup_returns_last_store() {
        let mut m = SkylineMatrix::new(&PROFILE);
        m.set(3, 1, 2.0).unwrap();
        m.set(1, 3, 7.5).unwrap();
        assert_eq!(m.get(3, 1), 7.5);
        assert_eq!(m.get(1, 3), 7.5);

        m.add(2, 1, 1.0).unwrap();
        m.add(1, 2, 1.0).unwrap();
        assert_eq!(m.get(2, 1), 2.0);
    }

    #[test]
    fn test_store_sequence_against_dense_model() {
        let mut m = SkylineMatrix::new(&PROFILE);
        let mut dense = [[0.0f64; 4]; 4];
        let in_band = |i: usize, j: usize| {
            let (r, c) = if j > i { (j, i) } else { (i, j) };
            !(r == 2 && c == 0)
        };

        for step in 0..40usize {
            let i = (step * 7) % 4;
            let j = (step * 3 + 1) % 4;
            let value = step as f64 * 0.5 - 3.0;
            let result = m.set(i, j, value);
            if in_band(i, j) {
                result.unwrap();
                dense[i][j] = value;
                dense[j][i] = value;
            } else {
                assert!(matches!(result, Err(HeatFilmError::OutsideBand { .. })));
            }
        }

        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(m.get(i, j), dense[i][j]);
            }
        }
    }

    #[test]
    fn test_zero_outside_band_is_noop() {
        let mut m = SkylineMatrix::new(&PROFILE);
        m.set(2, 0, 0.0).unwrap();
        m.add(0, 2, 0.0).unwrap();
        assert!(m.values().iter().all(|v| *v == 0.0));
        let err = m.set(2, 0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            HeatFilmError::OutsideBand {
                row: 2,
                col: 0,
                first_column: 1
            }
        ));
    }

    #[test]
    fn test_single_dof_solve() {
        let mut m = SkylineMatrix::new(&[1]);
        m.set(0, 0, 4.0).unwrap();
        m.factor().unwrap();
        let mut b = [8.0];
        m.solve(&mut b);
        assert_relative_eq!(b[0], 2.0, epsilon = 1e-15);
    }

    fn spd() -> SkylineMatrix {
        let mut m = SkylineMatrix::new(&PROFILE);
        let entries = [
            (0, 0, 4.0),
            (1, 0, -1.0),
            (1, 1, 4.0),
            (2, 1, -1.0),
            (2, 2, 4.0),
            (3, 0, -1.0),
            (3, 1, 0.5),
            (3, 2, -1.0),
            (3, 3, 4.0),
        ];
        for (i, j, v) in entries {
            m.set(i, j, v).unwrap();
        }
        m
    }

    #[test]
    fn test_factor_and_solve_spd() {
        let a = spd();
        let x_true = [1.0, -2.0, 0.5, 3.0];
        let mut b = a.mul_vec(&x_true);

        let mut l = a.clone();
        l.factor().unwrap();
        l.solve(&mut b);

        for (x, e) in b.iter().zip(x_true) {
            assert_relative_eq!(*x, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_factor_reproduces_matrix() {
        let a = spd();
        let mut l = a.clone();
        l.factor().unwrap();
        for i in 0..4 {
            for j in 0..=i {
                let sum: f64 = (0..=j)
                    .map(|k| {
                        let lik = if k <= i { l.get(i, k) } else { 0.0 };
                        lik * l.get(j, k)
                    })
                    .sum();
                assert_relative_eq!(sum, a.get(i, j), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_not_positive_definite() {
        let mut m = SkylineMatrix::new(&[1, 3]);
        m.set(0, 0, 1.0).unwrap();
        m.set(1, 0, 2.0).unwrap();
        m.set(1, 1, 1.0).unwrap();
        let err = m.factor().unwrap_err();
        match err {
            HeatFilmError::NotPositiveDefinite { equation, pivot } => {
                assert_eq!(equation, 1);
                assert_relative_eq!(pivot, -3.0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nan_pivot_is_rejected() {
        let mut m = SkylineMatrix::new(&[1]);
        m.set(0, 0, f64::NAN).unwrap();
        assert!(m.factor().is_err());
    }

    #[test]
    fn test_assign_sum() {
        let mut a = SkylineMatrix::new(&PROFILE);
        let mut b = SkylineMatrix::new(&PROFILE);
        a.set(3, 0, 1.0).unwrap();
        b.set(3, 0, 2.5).unwrap();
        b.set(1, 1, 4.0).unwrap();
        let mut sum = SkylineMatrix::new(&PROFILE);
        sum.assign_sum(&[&a, &b]);
        assert_eq!(sum.get(0, 3), 3.5);
        assert_eq!(sum.get(1, 1), 4.0);
    }
}
