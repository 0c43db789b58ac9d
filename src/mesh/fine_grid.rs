//! Three-dimensional fine grid.
//!
//! The grid stores only what the upscaling needs from an unstructured
//! reservoir grid:
//! - Cell volumes and centroids
//! - Cell-to-face connectivity as a run-length table, with a side tag per entry
//! - Face centroids
//! - Logical Cartesian index of every active cell
//!
//! Depth (z) grows downwards, following reservoir deck convention.
//! Cells are numbered in logical order `i + nx * (j + ny * k)` with inactive
//! cells left out, so `k` (the layer) varies slowest.

use std::collections::HashMap;

use crate::error::{Result, VertEqError};
use crate::runlen::{validate_offsets, RunLenView};
use crate::types::{Dim3D, Side3D};

/// Fine 3D grid of hexahedral cells.
#[derive(Clone, Debug)]
pub struct FineGrid {
    /// Number of (active) cells
    pub number_of_cells: usize,

    /// Number of faces
    pub number_of_faces: usize,

    /// Volume of each cell
    pub cell_volumes: Vec<f64>,

    /// Centroid of each cell: [x, y, z]
    pub cell_centroids: Vec<[f64; 3]>,

    /// Start of each cell's face list in `cell_faces`, length = cells + 1
    pub cell_facepos: Vec<usize>,

    /// Face indices for every cell, grouped by cell
    pub cell_faces: Vec<usize>,

    /// Side tag of each entry in `cell_faces`
    pub cell_facetag: Vec<Side3D>,

    /// Centroid of each face: [x, y, z]
    pub face_centroids: Vec<[f64; 3]>,

    /// Logical Cartesian dimensions [nx, ny, nz]
    pub cartdims: [usize; 3],

    /// Logical Cartesian index of each active cell
    pub global_cell: Vec<usize>,
}

impl FineGrid {
    /// Check that all arrays agree with the cell and face counts.
    pub fn validate(&self) -> Result<()> {
        let n = self.number_of_cells;
        check_len("cell_volumes", n, self.cell_volumes.len())?;
        check_len("cell_centroids", n, self.cell_centroids.len())?;
        check_len("global_cell", n, self.global_cell.len())?;
        check_len("cell_facepos", n + 1, self.cell_facepos.len())?;
        check_len(
            "face_centroids",
            self.number_of_faces,
            self.face_centroids.len(),
        )?;
        check_len(
            "cell_facetag",
            self.cell_faces.len(),
            self.cell_facetag.len(),
        )?;
        validate_offsets(&self.cell_facepos, self.cell_faces.len())?;

        if let Some(&face) = self
            .cell_faces
            .iter()
            .find(|&&f| f >= self.number_of_faces)
        {
            return Err(VertEqError::InvalidGrid(format!(
                "face index {} out of range ({} faces)",
                face, self.number_of_faces
            )));
        }

        let n_logical: usize = self.cartdims.iter().product();
        if let Some(&g) = self.global_cell.iter().find(|&&g| g >= n_logical) {
            return Err(VertEqError::InvalidGrid(format!(
                "global cell {} outside logical dimensions {:?}",
                g, self.cartdims
            )));
        }
        Ok(())
    }

    /// Face indices of every cell.
    #[inline]
    pub fn cell_faces(&self) -> RunLenView<'_, usize> {
        RunLenView::new(&self.cell_facepos, &self.cell_faces)
    }

    /// Side tags of every cell's faces, aligned with [`Self::cell_faces`].
    #[inline]
    pub fn cell_face_tags(&self) -> RunLenView<'_, Side3D> {
        RunLenView::new(&self.cell_facepos, &self.cell_facetag)
    }

    /// Face of `cell` that lies on `side`.
    ///
    /// Assumes a structured grid where exactly one face of each cell carries
    /// each tag; the first match is returned. Only the face list of `cell` is
    /// read, so calling this for every cell stays linear in the grid size.
    pub fn find_face(&self, cell: usize, side: Side3D) -> Result<usize> {
        let start = self.cell_facepos[cell];
        let end = self.cell_facepos[cell + 1];
        self.cell_facetag[start..end]
            .iter()
            .position(|&tag| tag == side)
            .map(|local| self.cell_faces[start + local])
            .ok_or(VertEqError::MissingFace { cell, side })
    }

    /// Depth of a face centroid.
    #[inline]
    pub fn face_depth(&self, face: usize) -> f64 {
        self.face_centroids[face][Dim3D::Z.index()]
    }

    /// Logical (i, j, k) position of a cell.
    #[inline]
    pub fn logical_ijk(&self, cell: usize) -> [usize; 3] {
        let [nx, ny, _] = self.cartdims;
        let g = self.global_cell[cell];
        [g % nx, (g / nx) % ny, g / (nx * ny)]
    }

    /// Sum of all cell volumes.
    pub fn total_volume(&self) -> f64 {
        self.cell_volumes.iter().sum()
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(VertEqError::SizeMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

// =============================================================================
// Cartesian builder
// =============================================================================

/// Builder for layered Cartesian grids.
///
/// Every column has the same layer thicknesses, but its own top depth. Cells
/// can be deactivated, which gives columns with different numbers of blocks.
///
/// # Example
///
/// ```
/// use verteq::mesh::CartesianGridBuilder;
///
/// let grid = CartesianGridBuilder::new(2, 1, 3)
///     .with_layer_thickness(vec![1.0, 2.0, 3.0])
///     .build()
///     .unwrap();
///
/// assert_eq!(grid.number_of_cells, 6);
/// assert_eq!(grid.logical_ijk(5), [1, 0, 2]);
/// ```
#[derive(Clone, Debug)]
pub struct CartesianGridBuilder {
    dims: [usize; 3],
    dx: f64,
    dy: f64,
    thickness: Vec<f64>,
    top: Option<Vec<f64>>,
    active: Option<Vec<bool>>,
}

impl CartesianGridBuilder {
    /// Unit cells, top at depth zero, all cells active.
    pub fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self {
            dims: [nx, ny, nz],
            dx: 1.0,
            dy: 1.0,
            thickness: vec![1.0; nz],
            top: None,
            active: None,
        }
    }

    /// Uniform cell size.
    pub fn with_cell_size(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.dx = dx;
        self.dy = dy;
        self.thickness = vec![dz; self.dims[2]];
        self
    }

    /// Thickness of each layer, top layer first.
    pub fn with_layer_thickness(mut self, thickness: Vec<f64>) -> Self {
        self.thickness = thickness;
        self
    }

    /// Depth of the top of each column, indexed by `i + nx * j`.
    pub fn with_top_depth(mut self, top: Vec<f64>) -> Self {
        self.top = Some(top);
        self
    }

    /// Active flag of each logical cell, indexed by `i + nx * (j + ny * k)`.
    pub fn with_active(mut self, active: Vec<bool>) -> Self {
        self.active = Some(active);
        self
    }

    /// Build the grid.
    pub fn build(self) -> Result<FineGrid> {
        let [nx, ny, nz] = self.dims;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(VertEqError::InvalidGrid(format!(
                "need at least one cell in each direction, got {:?}",
                self.dims
            )));
        }
        if !(self.dx > 0.0 && self.dy > 0.0) {
            return Err(VertEqError::InvalidGrid(format!(
                "cell size must be positive, got dx={} dy={}",
                self.dx, self.dy
            )));
        }
        check_len("layer thickness", nz, self.thickness.len())?;
        if let Some(&dz) = self.thickness.iter().find(|&&dz| !(dz >= 0.0)) {
            return Err(VertEqError::InvalidGrid(format!(
                "layer thickness must be non-negative, got {}",
                dz
            )));
        }
        if let Some(top) = &self.top {
            check_len("top depth", nx * ny, top.len())?;
        }
        if let Some(active) = &self.active {
            check_len("active", nx * ny * nz, active.len())?;
        }

        // depth of the top of each layer below the column top
        let mut layer_top = Vec::with_capacity(nz + 1);
        let mut z = 0.0;
        layer_top.push(z);
        for &dz in &self.thickness {
            z += dz;
            layer_top.push(z);
        }

        let mut grid = FineGrid {
            number_of_cells: 0,
            number_of_faces: 0,
            cell_volumes: Vec::new(),
            cell_centroids: Vec::new(),
            cell_facepos: vec![0],
            cell_faces: Vec::new(),
            cell_facetag: Vec::new(),
            face_centroids: Vec::new(),
            cartdims: self.dims,
            global_cell: Vec::new(),
        };

        // faces are keyed by their position in the face lattice so that
        // neighboring cells share them
        let mut face_ids: HashMap<(Dim3D, usize, usize, usize), usize> = HashMap::new();

        for k in 0..nz {
            for j in 0..ny {
                for i in 0..nx {
                    let g = i + nx * (j + ny * k);
                    if let Some(active) = &self.active {
                        if !active[g] {
                            continue;
                        }
                    }

                    let top = self.top.as_ref().map_or(0.0, |t| t[i + nx * j]);
                    let x0 = i as f64 * self.dx;
                    let y0 = j as f64 * self.dy;
                    let z0 = top + layer_top[k];
                    let z1 = top + layer_top[k + 1];
                    let xc = x0 + 0.5 * self.dx;
                    let yc = y0 + 0.5 * self.dy;
                    let zc = 0.5 * (z0 + z1);

                    for side in Side3D::ALL {
                        let (key, centroid) = match side {
                            Side3D::West => ((Dim3D::X, i, j, k), [x0, yc, zc]),
                            Side3D::East => ((Dim3D::X, i + 1, j, k), [x0 + self.dx, yc, zc]),
                            Side3D::South => ((Dim3D::Y, i, j, k), [xc, y0, zc]),
                            Side3D::North => ((Dim3D::Y, i, j + 1, k), [xc, y0 + self.dy, zc]),
                            Side3D::Up => ((Dim3D::Z, i, j, k), [xc, yc, z0]),
                            Side3D::Down => ((Dim3D::Z, i, j, k + 1), [xc, yc, z1]),
                        };
                        let face = *face_ids.entry(key).or_insert_with(|| {
                            grid.face_centroids.push(centroid);
                            grid.face_centroids.len() - 1
                        });
                        grid.cell_faces.push(face);
                        grid.cell_facetag.push(side);
                    }

                    grid.cell_facepos.push(grid.cell_faces.len());
                    grid.cell_volumes.push(self.dx * self.dy * (z1 - z0));
                    grid.cell_centroids.push([xc, yc, zc]);
                    grid.global_cell.push(g);
                }
            }
        }

        grid.number_of_cells = grid.global_cell.len();
        grid.number_of_faces = grid.face_centroids.len();
        grid.validate()?;
        Ok(grid)
    }
}
