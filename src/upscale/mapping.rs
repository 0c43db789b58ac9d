//! Geometry of the columns: block heights and accumulated volumes.
//!
//! For each fine cell the height is the depth difference between the centroid
//! of its `Down` face and the centroid of its `Up` face. A single pass down
//! each column then accumulates heights and volumes:
//!
//! ```text
//! acc_hgt[c][r] = Σ_{s ≤ r} hgt[cell(c, s)]
//! acc_vol[cell(c, r)] = Σ_{s ≤ r} vol[cell(c, s)]
//! tot_vol[c] = acc_vol[cell(c, last)]
//! ```
//!
//! The volume totals give the weights of the volume-weighted average used to
//! move fine-scale rock properties onto the top surface.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::VertEqConfig;
use crate::error::{Result, VertEqError};
use crate::mesh::{FineGrid, TopSurf};
use crate::runlen::{RunLenData, RunLenView};
use crate::types::Side3D;

/// Map from fine cells to top-surface columns, with column geometry.
#[derive(Clone, Debug)]
pub struct UpscaleMapping {
    /// Number of dimensions of the coarse grid
    pub num_dims: usize,
    /// Number of columns (coarse elements)
    pub num_cols: usize,
    /// Number of fine elements
    pub num_elems: usize,

    fine: Arc<FineGrid>,
    coarse: Arc<TopSurf>,

    /// Height of each fine cell
    hgt: Vec<f64>,
    /// Height from the top of the column to the bottom of each block
    acc_hgt: RunLenData<f64>,
    /// Volume from the top of the column down to and including each fine cell
    acc_vol: Vec<f64>,
    /// Volume of each column
    tot_vol: Vec<f64>,
}

impl UpscaleMapping {
    /// Build the mapping, rejecting only columns without extent.
    ///
    /// `coarse` must be a top surface of `fine`.
    pub fn new(fine: Arc<FineGrid>, coarse: Arc<TopSurf>) -> Result<Self> {
        Self::with_config(fine, coarse, &VertEqConfig::default())
    }

    /// Build the mapping with explicit degenerate-column thresholds.
    pub fn with_config(
        fine: Arc<FineGrid>,
        coarse: Arc<TopSurf>,
        config: &VertEqConfig,
    ) -> Result<Self> {
        if coarse.number_of_fine_cells != fine.number_of_cells {
            return Err(VertEqError::SizeMismatch {
                what: "top surface fine cells",
                expected: fine.number_of_cells,
                actual: coarse.number_of_fine_cells,
            });
        }

        let hgt = compute_heights(&fine)?;
        let inverted = hgt.iter().filter(|&&h| h < 0.0).count();
        if inverted > 0 {
            warn!(
                title = %config.title,
                cells = inverted,
                "cells with negative height; up and down faces may be swapped"
            );
        }

        // running height down each column
        let mut acc_hgt = RunLenData::<f64>::new(&coarse.col_cellpos);
        for (acc, cells) in acc_hgt.columns_mut().zip(coarse.columns().iter()) {
            let mut running_total = 0.0;
            for (slot, &cell) in acc.iter_mut().zip(cells) {
                running_total += hgt[cell];
                *slot = running_total;
            }
        }

        // running volume down each column, stored per fine cell
        let mut acc_vol = vec![0.0; fine.number_of_cells];
        let mut tot_vol = vec![0.0; coarse.number_of_cells];
        for (total, cells) in tot_vol.iter_mut().zip(coarse.columns().iter()) {
            let mut running_total = 0.0;
            for &cell in cells {
                running_total += fine.cell_volumes[cell];
                acc_vol[cell] = running_total;
            }
            *total = running_total;
        }

        for col in 0..coarse.number_of_cells {
            let total_height = acc_hgt.last(col).copied().unwrap_or(0.0);
            let total_volume = tot_vol[col];
            if config.is_degenerate(total_height, total_volume) {
                return Err(VertEqError::DegenerateColumn {
                    column: col,
                    total_height,
                    total_volume,
                });
            }
        }

        debug!(
            title = %config.title,
            columns = coarse.number_of_cells,
            fine_cells = fine.number_of_cells,
            max_vert_res = coarse.max_vert_res,
            "computed column geometry"
        );

        Ok(Self {
            num_dims: TopSurf::DIMENSIONS,
            num_cols: coarse.number_of_cells,
            num_elems: fine.number_of_cells,
            fine,
            coarse,
            hgt,
            acc_hgt,
            acc_vol,
            tot_vol,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Fine grid the mapping was built from.
    #[inline]
    pub fn fine_grid(&self) -> &FineGrid {
        &self.fine
    }

    /// Top surface the mapping was built for.
    #[inline]
    pub fn top_surf(&self) -> &TopSurf {
        &self.coarse
    }

    /// Shared handle to the top surface.
    #[inline]
    pub fn top_surf_arc(&self) -> Arc<TopSurf> {
        Arc::clone(&self.coarse)
    }

    /// Height of fine cell `cell`.
    #[inline]
    pub fn height(&self, cell: usize) -> f64 {
        self.hgt[cell]
    }

    /// Heights of all fine cells.
    #[inline]
    pub fn heights(&self) -> &[f64] {
        &self.hgt
    }

    /// Accumulated height down column `col`, one entry per block.
    #[inline]
    pub fn cumulative_height(&self, col: usize) -> &[f64] {
        self.acc_hgt.column(col)
    }

    /// Accumulated heights of all columns.
    #[inline]
    pub fn cumulative_heights(&self) -> RunLenView<'_, f64> {
        self.acc_hgt.view()
    }

    /// Total height of column `col`.
    #[inline]
    pub fn total_height(&self, col: usize) -> f64 {
        self.acc_hgt.last(col).copied().unwrap_or(0.0)
    }

    /// Volume from the top of its column down to and including `cell`.
    #[inline]
    pub fn cumulative_volume(&self, cell: usize) -> f64 {
        self.acc_vol[cell]
    }

    /// Accumulated volumes of all fine cells.
    #[inline]
    pub fn cumulative_volumes(&self) -> &[f64] {
        &self.acc_vol
    }

    /// Volume of column `col`.
    #[inline]
    pub fn total_volume(&self, col: usize) -> f64 {
        self.tot_vol[col]
    }

    /// Volumes of all columns.
    #[inline]
    pub fn total_volumes(&self) -> &[f64] {
        &self.tot_vol
    }

    // =========================================================================
    // Volume-weighted average
    // =========================================================================

    /// Volume-weighted average of a fine-grid property, per column.
    ///
    /// The value of fine cell `i` is read from `fine_data[i * fine_stride +
    /// fine_ofs]` and the result for column `c` is written to
    /// `col_data[c * col_stride + col_ofs]`, so one component of a record
    /// (e.g. a tensor entry) can be averaged at a time.
    ///
    /// ```text
    /// col_data[c] = Σ_{i ∈ c} v_i x_i / Σ_{i ∈ c} v_i
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if either array is too short for the given stride and offset,
    /// and in debug mode if an offset is not smaller than its stride.
    pub fn vol_avg(
        &self,
        fine_data: &[f64],
        fine_ofs: usize,
        fine_stride: usize,
        col_data: &mut [f64],
        col_ofs: usize,
        col_stride: usize,
    ) {
        debug_assert!(col_ofs < col_stride, "Output offset must be below stride");
        debug_assert!(
            col_data.len() >= self.num_cols * col_stride,
            "Output buffer too small: {} < {}",
            col_data.len(),
            self.num_cols * col_stride
        );

        for (col, record) in col_data
            .chunks_mut(col_stride)
            .take(self.num_cols)
            .enumerate()
        {
            record[col_ofs] = self.column_average(col, fine_data, fine_ofs, fine_stride);
        }
    }

    /// Parallel version of [`Self::vol_avg`], one task per column.
    ///
    /// Produces bit-identical results to the serial version.
    #[cfg(feature = "parallel")]
    pub fn vol_avg_parallel(
        &self,
        fine_data: &[f64],
        fine_ofs: usize,
        fine_stride: usize,
        col_data: &mut [f64],
        col_ofs: usize,
        col_stride: usize,
    ) {
        use rayon::prelude::*;

        debug_assert!(col_ofs < col_stride, "Output offset must be below stride");
        debug_assert!(
            col_data.len() >= self.num_cols * col_stride,
            "Output buffer too small"
        );

        col_data
            .par_chunks_mut(col_stride)
            .take(self.num_cols)
            .enumerate()
            .for_each(|(col, record)| {
                record[col_ofs] = self.column_average(col, fine_data, fine_ofs, fine_stride);
            });
    }

    /// Allocating volume-weighted average of a scalar property.
    pub fn vol_avg_scalar(&self, fine_data: &[f64]) -> Vec<f64> {
        let mut col_data = vec![0.0; self.num_cols];
        self.vol_avg(fine_data, 0, 1, &mut col_data, 0, 1);
        col_data
    }

    /// Volume-weighted average over one column.
    ///
    /// Accumulated as deviations from the top value, so a property that is
    /// constant down the column is reproduced exactly.
    fn column_average(&self, col: usize, fine_data: &[f64], ofs: usize, stride: usize) -> f64 {
        let cells = self.coarse.column(col);
        let base = fine_data[cells[0] * stride + ofs];
        let weighted: f64 = cells
            .iter()
            .map(|&cell| (fine_data[cell * stride + ofs] - base) * self.fine.cell_volumes[cell])
            .sum();
        base + weighted / self.tot_vol[col]
    }
}

/// Height of a cell from its up and down face centroids.
fn cell_height(fine: &FineGrid, cell: usize) -> Result<f64> {
    let up = fine.find_face(cell, Side3D::Up)?;
    let down = fine.find_face(cell, Side3D::Down)?;
    Ok(fine.face_depth(down) - fine.face_depth(up))
}

fn compute_heights(fine: &FineGrid) -> Result<Vec<f64>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        (0..fine.number_of_cells)
            .into_par_iter()
            .map(|cell| cell_height(fine, cell))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        (0..fine.number_of_cells)
            .map(|cell| cell_height(fine, cell))
            .collect()
    }
}
