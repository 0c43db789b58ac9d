//! Grid representation.
//!
//! Provides the two grids the upscaling works between:
//! - 3D fine grid with cell-to-face connectivity and side tags
//! - 2D top surface whose elements are columns of fine cells
//! - Builder for layered Cartesian fine grids

mod fine_grid;
mod top_surf;

pub use fine_grid::{CartesianGridBuilder, FineGrid};
pub use top_surf::TopSurf;
