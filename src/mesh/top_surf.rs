//! Two-dimensional top surface of a fine grid.
//!
//! Every element of the top surface is a column of fine cells. The columns
//! are stored as a run-length table of fine-cell indices, ordered from the
//! top of the column to the bottom, together with the reverse map from fine
//! cell to column.

use tracing::debug;

use super::fine_grid::FineGrid;
use crate::error::{Result, VertEqError};
use crate::runlen::RunLenView;

/// Coarse 2D grid whose elements are columns of the fine grid.
#[derive(Clone, Debug)]
pub struct TopSurf {
    /// Number of columns (coarse elements)
    pub number_of_cells: usize,

    /// Number of fine cells covered by the columns
    pub number_of_fine_cells: usize,

    /// Start of each column in `col_cells`, length = columns + 1
    pub col_cellpos: Vec<usize>,

    /// Fine-cell indices of every column, top to bottom
    pub col_cells: Vec<usize>,

    /// Column that owns each fine cell
    pub fine_col: Vec<usize>,

    /// Largest number of blocks in any column
    pub max_vert_res: usize,

    /// Horizontal centroid of each column: [x, y]
    pub cell_centroids: Vec<[f64; 2]>,
}

impl TopSurf {
    /// Number of dimensions of the top surface.
    pub const DIMENSIONS: usize = 2;

    /// Build a top surface from explicit columns of fine cells.
    ///
    /// Each column must list its cells from the top down. The columns must
    /// cover every fine cell exactly once and none may be empty.
    pub fn from_columns(fine: &FineGrid, columns: &[Vec<usize>]) -> Result<Self> {
        let n_fine = fine.number_of_cells;
        let mut fine_col = vec![usize::MAX; n_fine];
        let mut col_cellpos = Vec::with_capacity(columns.len() + 1);
        let mut col_cells = Vec::with_capacity(n_fine);
        let mut cell_centroids = Vec::with_capacity(columns.len());
        col_cellpos.push(0);

        for (col, cells) in columns.iter().enumerate() {
            let Some(&top) = cells.first() else {
                return Err(VertEqError::InvalidGrid(format!("column {} is empty", col)));
            };
            for &cell in cells {
                if cell >= n_fine {
                    return Err(VertEqError::InvalidGrid(format!(
                        "column {} refers to cell {} ({} fine cells)",
                        col, cell, n_fine
                    )));
                }
                if fine_col[cell] != usize::MAX {
                    return Err(VertEqError::InvalidGrid(format!(
                        "cell {} belongs to columns {} and {}",
                        cell, fine_col[cell], col
                    )));
                }
                fine_col[cell] = col;
                col_cells.push(cell);
            }
            col_cellpos.push(col_cells.len());
            let [x, y, _] = fine.cell_centroids[top];
            cell_centroids.push([x, y]);
        }

        if let Some(cell) = fine_col.iter().position(|&c| c == usize::MAX) {
            return Err(VertEqError::InvalidGrid(format!(
                "cell {} is not in any column",
                cell
            )));
        }

        let max_vert_res = columns.iter().map(Vec::len).max().unwrap_or(0);
        debug!(
            columns = columns.len(),
            fine_cells = n_fine,
            max_vert_res,
            "built top surface"
        );

        Ok(Self {
            number_of_cells: columns.len(),
            number_of_fine_cells: n_fine,
            col_cellpos,
            col_cells,
            fine_col,
            max_vert_res,
            cell_centroids,
        })
    }

    /// Build the top surface of a fine grid from its logical structure.
    ///
    /// Cells with the same logical (i, j) form a column, ordered by layer `k`.
    /// Logical columns without active cells are left out. Columns are
    /// numbered by increasing `i + nx * j`.
    pub fn create(fine: &FineGrid) -> Result<Self> {
        fine.validate()?;
        let [nx, ny, _] = fine.cartdims;

        let mut logical: Vec<Vec<(usize, usize)>> = vec![Vec::new(); nx * ny];
        for cell in 0..fine.number_of_cells {
            let [i, j, k] = fine.logical_ijk(cell);
            logical[i + nx * j].push((k, cell));
        }

        let columns: Vec<Vec<usize>> = logical
            .into_iter()
            .filter(|cells| !cells.is_empty())
            .map(|mut cells| {
                cells.sort_unstable();
                cells.into_iter().map(|(_, cell)| cell).collect()
            })
            .collect();

        Self::from_columns(fine, &columns)
    }

    /// Fine cells of every column.
    #[inline]
    pub fn columns(&self) -> RunLenView<'_, usize> {
        RunLenView::new(&self.col_cellpos, &self.col_cells)
    }

    /// Fine cells of column `col`, top to bottom.
    #[inline]
    pub fn column(&self, col: usize) -> &[usize] {
        &self.col_cells[self.col_cellpos[col]..self.col_cellpos[col + 1]]
    }

    /// Number of blocks in column `col`.
    #[inline]
    pub fn num_rows(&self, col: usize) -> usize {
        self.col_cellpos[col + 1] - self.col_cellpos[col]
    }

    /// Column that owns fine cell `cell`.
    #[inline]
    pub fn column_of(&self, cell: usize) -> usize {
        self.fine_col[cell]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CartesianGridBuilder;

    #[test]
    fn test_create_from_cartesian() {
        let fine = CartesianGridBuilder::new(3, 2, 4).build().unwrap();
        let ts = TopSurf::create(&fine).unwrap();

        assert_eq!(ts.number_of_cells, 6);
        assert_eq!(ts.max_vert_res, 4);
        assert_eq!(ts.col_cells.len(), 24);

        // column 4 is (i=1, j=1); its cells are 4, 10, 16, 22
        assert_eq!(ts.column(4), &[4, 10, 16, 22]);
        for col in ts.columns().columns() {
            for &cell in ts.columns().each(col) {
                assert_eq!(ts.column_of(cell), col);
            }
        }
    }

    #[test]
    fn test_columns_are_ordered_top_down() {
        let fine = CartesianGridBuilder::new(2, 2, 3).build().unwrap();
        let ts = TopSurf::create(&fine).unwrap();
        for col in 0..ts.number_of_cells {
            let depths: Vec<f64> = ts
                .column(col)
                .iter()
                .map(|&c| fine.cell_centroids[c][2])
                .collect();
            assert!(depths.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_inactive_cells_give_variable_columns() {
        // 2x1x3 with the two lower cells of column 1 inactive
        let active = vec![true, true, true, false, true, false];
        let fine = CartesianGridBuilder::new(2, 1, 3)
            .with_active(active)
            .build()
            .unwrap();
        let ts = TopSurf::create(&fine).unwrap();

        assert_eq!(ts.number_of_cells, 2);
        assert_eq!(ts.num_rows(0), 3);
        assert_eq!(ts.num_rows(1), 1);
        assert_eq!(ts.max_vert_res, 3);
        assert_eq!(ts.col_cellpos, vec![0, 3, 4]);
    }

    #[test]
    fn test_empty_logical_column_is_dropped() {
        let active = vec![true, false, true, false];
        let fine = CartesianGridBuilder::new(2, 1, 2)
            .with_active(active)
            .build()
            .unwrap();
        let ts = TopSurf::create(&fine).unwrap();
        assert_eq!(ts.number_of_cells, 1);
        assert_eq!(ts.column(0), &[0, 1]);
    }

    #[test]
    fn test_centroids() {
        let fine = CartesianGridBuilder::new(2, 1, 2)
            .with_cell_size(10.0, 4.0, 1.0)
            .build()
            .unwrap();
        let ts = TopSurf::create(&fine).unwrap();
        assert_eq!(ts.cell_centroids, vec![[5.0, 2.0], [15.0, 2.0]]);
    }

    #[test]
    fn test_from_columns_rejects_overlap_and_gaps() {
        let fine = CartesianGridBuilder::new(1, 1, 3).build().unwrap();
        assert!(TopSurf::from_columns(&fine, &[vec![0, 1, 2]]).is_ok());
        assert!(TopSurf::from_columns(&fine, &[vec![0, 1], vec![1, 2]]).is_err());
        assert!(TopSurf::from_columns(&fine, &[vec![0, 1]]).is_err());
        assert!(TopSurf::from_columns(&fine, &[vec![0, 1, 2], vec![]]).is_err());
        assert!(TopSurf::from_columns(&fine, &[vec![0, 1, 2, 3]]).is_err());
    }
}
