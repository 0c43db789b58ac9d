//! Rock and fluid property interface.
//!
//! The same interface is served by the fine-scale source and by the upscaled
//! top-surface properties, so a simulator can run on either grid.

use crate::error::Result;

// =============================================================================
// IncompProperties Trait
// =============================================================================

/// Properties of an incompressible multiphase rock/fluid system.
///
/// Rock properties vary per cell. Porosity holds one value per cell and
/// permeability one row-major `d x d` tensor per cell, where `d` is
/// [`Self::num_dimensions`]. Fluid properties hold one value per phase.
///
/// Implementations must be thread-safe (`Send + Sync`) so they can be shared
/// behind an `Arc`.
pub trait IncompProperties: Send + Sync {
    /// Number of spatial dimensions of the grid the properties live on.
    fn num_dimensions(&self) -> usize;

    /// Number of cells the properties are defined for.
    fn num_cells(&self) -> usize;

    /// Porosity per cell.
    fn porosity(&self) -> &[f64];

    /// Absolute permeability, `num_dimensions()^2` entries per cell.
    fn permeability(&self) -> &[f64];

    /// Number of fluid phases.
    fn num_phases(&self) -> usize;

    /// Viscosity per phase.
    fn viscosity(&self) -> &[f64];

    /// Reservoir density per phase.
    fn density(&self) -> &[f64];

    /// Surface density per phase.
    fn surface_density(&self) -> &[f64];

    /// Relative permeability of every phase at saturations `s` in `cells`.
    ///
    /// `kr` receives `num_phases()` values per cell; `dkrds`, if given,
    /// receives the `num_phases()^2` derivatives per cell.
    fn relperm(
        &self,
        s: &[f64],
        cells: &[usize],
        kr: &mut [f64],
        dkrds: Option<&mut [f64]>,
    ) -> Result<()>;

    /// Capillary pressure at saturations `s` in `cells`.
    fn cap_press(
        &self,
        s: &[f64],
        cells: &[usize],
        pc: &mut [f64],
        dpcds: Option<&mut [f64]>,
    ) -> Result<()>;

    /// Saturation range of every phase in `cells`.
    fn sat_range(&self, cells: &[usize], smin: &mut [f64], smax: &mut [f64]) -> Result<()>;
}
