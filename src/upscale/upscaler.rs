//! Depth integration and elevation lookup inside columns.
//!
//! Properties of the fine grid are integrated down each column,
//!
//! ```text
//! dpt[r] = Σ_{s ≤ r} val[s] × hgt[s]
//! ```
//!
//! and the accumulated table is used both ways: [`VertEqUpscaler::eval`]
//! reads the integral down to an [`Elevation`], and [`VertEqUpscaler::find`]
//! solves for the elevation where the integral reaches a target. Within a
//! block the integral is linear, so both directions interpolate on the block
//! fraction and are exact at block boundaries.
//!
//! All operations take a column index and work on buffers of at least
//! [`VertEqUpscaler::num_rows`] entries; allocate them once with
//! [`VertEqUpscaler::max_vert_res`] and reuse them for every column.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use verteq::mesh::{CartesianGridBuilder, TopSurf};
//! use verteq::upscale::{UpscaleMapping, VertEqUpscaler};
//!
//! let fine = Arc::new(
//!     CartesianGridBuilder::new(1, 1, 3)
//!         .with_layer_thickness(vec![1.0, 2.0, 3.0])
//!         .build()
//!         .unwrap(),
//! );
//! let ts = Arc::new(TopSurf::create(&fine).unwrap());
//! let mapping = Arc::new(UpscaleMapping::new(fine, ts).unwrap());
//! let up = VertEqUpscaler::new(mapping);
//!
//! // integrate a porosity of 0.5 down the column
//! let mut dpt = vec![0.0; up.max_vert_res()];
//! up.wgt_dpt(0, &[0.5, 0.5, 0.5], &mut dpt);
//! assert_eq!(dpt, vec![0.5, 1.5, 3.0]);
//!
//! // where has the integral reached 2.25?
//! let zeta = up.find(0, &dpt, 2.25);
//! assert_eq!((zeta.block(), zeta.fraction()), (2, 0.5));
//! assert_eq!(up.height(0, zeta), 4.5);
//! ```

use std::sync::Arc;

use super::mapping::UpscaleMapping;
use crate::runlen::RunLenData;
use crate::types::{Elevation, MAX_FRACTION};

/// Column integrator on top of an [`UpscaleMapping`].
#[derive(Clone, Debug)]
pub struct VertEqUpscaler {
    mapping: Arc<UpscaleMapping>,
}

impl VertEqUpscaler {
    /// Create an upscaler that uses the block heights of `mapping`.
    pub fn new(mapping: Arc<UpscaleMapping>) -> Self {
        Self { mapping }
    }

    /// Column geometry used as integration weights.
    #[inline]
    pub fn mapping(&self) -> &UpscaleMapping {
        &self.mapping
    }

    /// Buffer length that fits any column.
    #[inline]
    pub fn max_vert_res(&self) -> usize {
        self.mapping.top_surf().max_vert_res
    }

    /// Number of blocks in column `col`.
    #[inline]
    pub fn num_rows(&self, col: usize) -> usize {
        self.mapping.top_surf().num_rows(col)
    }

    /// Elevation of the bottom of column `col`.
    #[inline]
    pub fn bottom(&self, col: usize) -> Elevation {
        Elevation::bottom(self.num_rows(col))
    }

    /// Copy a fine-grid property of column `col` into `buf`, top to bottom.
    ///
    /// The value of fine cell `i` is read from `data[i * stride + offset]`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is too short, and in debug mode if `buf` cannot hold
    /// the column.
    pub fn gather(&self, col: usize, buf: &mut [f64], data: &[f64], stride: usize, offset: usize) {
        let cells = self.mapping.top_surf().column(col);
        debug_assert!(
            buf.len() >= cells.len(),
            "Buffer too small: {} < {}",
            buf.len(),
            cells.len()
        );
        for (slot, &cell) in buf.iter_mut().zip(cells) {
            *slot = data[cell * stride + offset];
        }
    }

    /// Integral of `val` from the top of column `col` down to and including
    /// each block, written to `res`.
    ///
    /// `val` holds one integrand value per block (see [`Self::gather`]). The
    /// last entry is the integral over the whole column.
    pub fn wgt_dpt(&self, col: usize, val: &[f64], res: &mut [f64]) {
        let cells = self.mapping.top_surf().column(col);
        debug_assert!(val.len() >= cells.len(), "Integrand too short");
        debug_assert!(res.len() >= cells.len(), "Result buffer too small");

        let mut running_total = 0.0;
        for ((out, &v), &cell) in res.iter_mut().zip(val).zip(cells) {
            running_total += v * self.mapping.height(cell);
            *out = running_total;
        }
    }

    /// Depth-weighted average of `val` (one value per block) over column `col`.
    pub fn dpt_avg(&self, col: usize, val: &[f64]) -> f64 {
        let cells = self.mapping.top_surf().column(col);
        debug_assert!(val.len() >= cells.len(), "Integrand too short");

        let mut running_total = 0.0;
        for (&v, &cell) in val.iter().zip(cells) {
            running_total += v * self.mapping.height(cell);
        }
        running_total / self.mapping.total_height(col)
    }

    /// Plain sum of a fine-grid property over the cells of column `col`.
    ///
    /// For quantities given per cell regardless of its size, such as
    /// volumetric source terms. `val` covers the entire fine grid.
    pub fn sum(&self, col: usize, val: &[f64]) -> f64 {
        self.mapping
            .top_surf()
            .column(col)
            .iter()
            .map(|&cell| val[cell])
            .sum()
    }

    /// Integral of `dpt` down to elevation `zeta`.
    ///
    /// `dpt` is an accumulated table from [`Self::wgt_dpt`]. Between the
    /// accumulated values around block `zeta.block()` the result is
    /// interpolated linearly on the fraction.
    pub fn eval(&self, col: usize, dpt: &[f64], zeta: Elevation) -> f64 {
        let block = zeta.block();
        debug_assert!(
            block < self.num_rows(col),
            "Block {} outside column {} with {} rows",
            block,
            col,
            self.num_rows(col)
        );

        let prev = if block == 0 { 0.0 } else { dpt[block - 1] };
        let f = zeta.fraction();
        (1.0 - f) * prev + f * dpt[block]
    }

    /// Elevation where the integral in `dpt` reaches `target`.
    ///
    /// Solves `eval(col, dpt, zeta) = target` for `zeta`, where `dpt` is a
    /// non-decreasing accumulated table from [`Self::wgt_dpt`]. Targets at
    /// or above the column total give the bottom, targets at or below zero
    /// give the top. Otherwise the result lies in the first block whose
    /// accumulated value reaches the target, so blocks that add nothing to
    /// the integral are never chosen over the block above them.
    ///
    /// A target exactly on a block boundary gives the end of the upper block,
    /// `(b, MAX_FRACTION)`, not the start of the next one.
    pub fn find(&self, col: usize, dpt: &[f64], target: f64) -> Elevation {
        let n = self.num_rows(col);
        let dpt = &dpt[..n];
        debug_assert!(!target.is_nan(), "Target must be a number");

        if target <= 0.0 {
            return Elevation::TOP;
        }
        if target >= dpt[n - 1] {
            return self.bottom(col);
        }

        let block = dpt.partition_point(|&d| d < target);
        let prev = if block == 0 { 0.0 } else { dpt[block - 1] };
        let increment = dpt[block] - prev;
        let fraction = if increment > 0.0 {
            ((target - prev) / increment).clamp(0.0, MAX_FRACTION)
        } else {
            0.0
        };
        Elevation::new(block, fraction)
    }

    /// Depth below the top of column `col` at elevation `zeta`.
    #[inline]
    pub fn height(&self, col: usize, zeta: Elevation) -> f64 {
        self.eval(col, self.mapping.cumulative_height(col), zeta)
    }

    /// Elevation at `depth` below the top of column `col`.
    #[inline]
    pub fn elevation(&self, col: usize, depth: f64) -> Elevation {
        self.find(col, self.mapping.cumulative_height(col), depth)
    }

    /// Accumulated integral tables of a fine-grid property for every column.
    ///
    /// Combines [`Self::gather`] and [`Self::wgt_dpt`]; the value of fine
    /// cell `i` is read from `data[i * stride + offset]`.
    pub fn integrate(&self, data: &[f64], stride: usize, offset: usize) -> RunLenData<f64> {
        let mut dpt = RunLenData::<f64>::new(&self.mapping.top_surf().col_cellpos);

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            let columns: Vec<&mut [f64]> = dpt.columns_mut().collect();
            columns.into_par_iter().enumerate().for_each_init(
                || vec![0.0; self.max_vert_res()],
                |buf, (col, res)| {
                    self.gather(col, buf, data, stride, offset);
                    self.wgt_dpt(col, buf, res);
                },
            );
        }

        #[cfg(not(feature = "parallel"))]
        {
            let mut buf = vec![0.0; self.max_vert_res()];
            for (col, res) in dpt.columns_mut().enumerate() {
                self.gather(col, &mut buf, data, stride, offset);
                self.wgt_dpt(col, &buf, res);
            }
        }

        dpt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{CartesianGridBuilder, TopSurf};
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-12;

    fn upscaler(builder: CartesianGridBuilder) -> VertEqUpscaler {
        let fine = Arc::new(builder.build().unwrap());
        let ts = Arc::new(TopSurf::create(&fine).unwrap());
        VertEqUpscaler::new(Arc::new(UpscaleMapping::new(fine, ts).unwrap()))
    }

    /// One column with block heights 1, 2 and 3.
    fn three_blocks() -> VertEqUpscaler {
        upscaler(CartesianGridBuilder::new(1, 1, 3).with_layer_thickness(vec![1.0, 2.0, 3.0]))
    }

    #[test]
    fn test_num_rows_and_bottom() {
        let up = three_blocks();
        assert_eq!(up.num_rows(0), 3);
        assert_eq!(up.max_vert_res(), 3);
        assert_eq!(up.bottom(0), Elevation::new(2, 1.0));
        assert_eq!(up.mapping().cumulative_height(0), &[1.0, 3.0, 6.0]);
    }

    #[test]
    fn test_gather_strided() {
        let up = upscaler(CartesianGridBuilder::new(2, 1, 2));
        // column 1 holds fine cells 1 and 3
        let data: Vec<f64> = (0..8).map(f64::from).collect();
        let mut buf = vec![0.0; 2];
        up.gather(1, &mut buf, &data, 2, 1);
        assert_eq!(buf, vec![3.0, 7.0]);
    }

    #[test]
    fn test_wgt_dpt_of_one_is_cumulative_height() {
        let up = three_blocks();
        let mut res = vec![0.0; 3];
        up.wgt_dpt(0, &[1.0; 3], &mut res);
        assert_eq!(res, up.mapping().cumulative_height(0));
    }

    #[test]
    fn test_dpt_avg() {
        let up = three_blocks();
        let val = [0.3, 0.2, 0.1];
        let expected = (0.3 * 1.0 + 0.2 * 2.0 + 0.1 * 3.0) / 6.0;
        assert_relative_eq!(up.dpt_avg(0, &val), expected, epsilon = TOL);

        let mut res = vec![0.0; 3];
        up.wgt_dpt(0, &val, &mut res);
        assert_eq!(up.dpt_avg(0, &val), res[2] / up.mapping().total_height(0));
    }

    #[test]
    fn test_sum_ignores_heights() {
        let up = upscaler(CartesianGridBuilder::new(2, 1, 3).with_layer_thickness(vec![1.0, 5.0, 9.0]));
        let src = [1.0, 10.0, 2.0, 20.0, 3.0, 30.0];
        assert_eq!(up.sum(0, &src), 6.0);
        assert_eq!(up.sum(1, &src), 60.0);
    }

    #[test]
    fn test_eval_endpoints() {
        let up = three_blocks();
        let dpt = [0.1, 0.3, 0.7];
        assert_eq!(up.eval(0, &dpt, Elevation::TOP), 0.0);
        assert_eq!(up.eval(0, &dpt, up.bottom(0)), 0.7);
        assert_eq!(up.eval(0, &dpt, Elevation::new(1, 0.0)), 0.1);
        assert_eq!(up.eval(0, &dpt, Elevation::new(2, 0.0)), 0.3);
    }

    #[test]
    fn test_eval_interpolates_within_block() {
        let up = three_blocks();
        let dpt = [2.0, 5.0, 9.0];
        assert_relative_eq!(up.eval(0, &dpt, Elevation::new(0, 0.5)), 1.0, epsilon = TOL);
        assert_relative_eq!(up.eval(0, &dpt, Elevation::new(2, 0.25)), 6.0, epsilon = TOL);
    }

    #[test]
    fn test_find_exact_boundary() {
        let up = three_blocks();
        let dpt = [2.0, 5.0, 9.0];
        let zeta = up.find(0, &dpt, 5.0);
        assert_eq!(zeta.block(), 1);
        assert!(zeta.fraction() < 1.0);
        assert_relative_eq!(up.eval(0, &dpt, zeta), 5.0, epsilon = TOL);
    }

    #[test]
    fn test_find_within_block() {
        let up = three_blocks();
        let dpt = [2.0, 5.0, 9.0];
        assert_eq!(up.find(0, &dpt, 7.0), Elevation::new(2, 0.5));
        assert_eq!(up.find(0, &dpt, 1.0), Elevation::new(0, 0.5));
    }

    #[test]
    fn test_find_clamps() {
        let up = three_blocks();
        let dpt = [2.0, 5.0, 9.0];
        assert_eq!(up.find(0, &dpt, 0.0), Elevation::TOP);
        assert_eq!(up.find(0, &dpt, -3.0), Elevation::TOP);
        assert_eq!(up.find(0, &dpt, 9.0), up.bottom(0));
        assert_eq!(up.find(0, &dpt, 100.0), up.bottom(0));
    }

    #[test]
    fn test_find_picks_first_block_on_ties() {
        let up = three_blocks();
        // middle block adds nothing
        let dpt = [1.0, 1.0, 3.0];
        let zeta = up.find(0, &dpt, 1.0);
        assert_eq!(zeta.block(), 0);
        assert_relative_eq!(zeta.fraction(), 1.0, epsilon = TOL);
        assert!(zeta.fraction() < 1.0);
        assert_relative_eq!(up.eval(0, &dpt, zeta), 1.0, epsilon = TOL);

        // just past the tie the search moves on to the last block
        let zeta = up.find(0, &dpt, 1.5);
        assert_eq!(zeta.block(), 2);
        assert_relative_eq!(zeta.fraction(), 0.25, epsilon = TOL);
    }

    #[test]
    fn test_find_skips_leading_empty_blocks() {
        let up = three_blocks();
        let dpt = [0.0, 0.0, 4.0];
        assert_eq!(up.find(0, &dpt, 1.0), Elevation::new(2, 0.25));
    }

    #[test]
    fn test_find_eval_roundtrip() {
        let up = three_blocks();
        let dpt = [0.4, 0.4, 2.9];
        for i in 0..=100 {
            let target = 2.9 * i as f64 / 100.0;
            let zeta = up.find(0, &dpt, target);
            assert!(zeta.fraction() >= 0.0 && zeta.fraction() <= 1.0);
            assert_relative_eq!(up.eval(0, &dpt, zeta), target, epsilon = TOL);
        }
    }

    #[test]
    fn test_height_and_elevation() {
        let up = three_blocks();
        let zeta = up.elevation(0, 4.5);
        assert_eq!(zeta, Elevation::new(2, 0.5));
        assert_relative_eq!(up.height(0, zeta), 4.5, epsilon = TOL);
        assert_eq!(up.height(0, up.bottom(0)), 6.0);
        assert_eq!(up.elevation(0, 7.0), up.bottom(0));
    }

    #[test]
    fn test_integrate_matches_per_column() {
        let up = upscaler(
            CartesianGridBuilder::new(3, 2, 3)
                .with_layer_thickness(vec![0.5, 1.0, 2.0])
                .with_active(vec![
                    true, true, true, true, true, true, //
                    true, false, true, true, true, true, //
                    true, false, true, false, true, true,
                ]),
        );
        let n = up.mapping().num_elems;
        let data: Vec<f64> = (0..n).map(|i| 0.1 + 0.01 * i as f64).collect();

        let dpt = up.integrate(&data, 1, 0);
        let mut buf = vec![0.0; up.max_vert_res()];
        let mut res = vec![0.0; up.max_vert_res()];
        for col in 0..up.mapping().num_cols {
            let rows = up.num_rows(col);
            up.gather(col, &mut buf, &data, 1, 0);
            up.wgt_dpt(col, &buf, &mut res);
            assert_eq!(dpt.column(col), &res[..rows]);
        }
        assert_eq!(dpt.size(1), 1);
        assert_eq!(dpt.size(3), 2);
    }
}
