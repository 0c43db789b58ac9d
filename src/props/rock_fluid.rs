//! Fine-scale rock and fluid properties held in plain arrays.

use tracing::debug;

use super::traits::IncompProperties;
use crate::error::{Result, VertEqError};

/// Rock and fluid properties of a 3D fine grid.
///
/// Permeability is stored as a row-major 3x3 tensor per cell. Surface
/// densities default to the reservoir densities.
///
/// No saturation functions are carried: relative permeability, capillary
/// pressure and saturation range return [`VertEqError::NotImplemented`].
///
/// # Example
///
/// ```
/// use verteq::{IncompProperties, RockFluidProps};
///
/// let props = RockFluidProps::from_diagonal(
///     vec![0.2, 0.3],
///     &[[100.0, 100.0, 10.0], [200.0, 200.0, 20.0]],
///     vec![1e-3, 5e-5],
///     vec![1000.0, 700.0],
/// )
/// .unwrap();
///
/// assert_eq!(props.num_cells(), 2);
/// assert_eq!(props.num_phases(), 2);
/// assert_eq!(props.permeability()[9 + 4], 200.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RockFluidProps {
    porosity: Vec<f64>,
    permeability: Vec<f64>,
    viscosity: Vec<f64>,
    density: Vec<f64>,
    surface_density: Vec<f64>,
}

impl RockFluidProps {
    /// Number of spatial dimensions of the fine grid.
    pub const DIMENSIONS: usize = 3;

    /// Build from per-cell rock arrays and per-phase fluid arrays.
    pub fn new(
        porosity: Vec<f64>,
        permeability: Vec<f64>,
        viscosity: Vec<f64>,
        density: Vec<f64>,
    ) -> Result<Self> {
        let num_cells = porosity.len();
        let perm_len = num_cells * Self::DIMENSIONS * Self::DIMENSIONS;
        if permeability.len() != perm_len {
            return Err(VertEqError::SizeMismatch {
                what: "permeability",
                expected: perm_len,
                actual: permeability.len(),
            });
        }
        if density.len() != viscosity.len() {
            return Err(VertEqError::SizeMismatch {
                what: "density",
                expected: viscosity.len(),
                actual: density.len(),
            });
        }

        debug!(
            cells = num_cells,
            phases = viscosity.len(),
            "loaded fine-scale rock/fluid properties"
        );

        let surface_density = density.clone();
        Ok(Self {
            porosity,
            permeability,
            viscosity,
            density,
            surface_density,
        })
    }

    /// Build with a diagonal permeability tensor `[kx, ky, kz]` per cell.
    pub fn from_diagonal(
        porosity: Vec<f64>,
        diagonal: &[[f64; 3]],
        viscosity: Vec<f64>,
        density: Vec<f64>,
    ) -> Result<Self> {
        if diagonal.len() != porosity.len() {
            return Err(VertEqError::SizeMismatch {
                what: "permeability",
                expected: porosity.len(),
                actual: diagonal.len(),
            });
        }
        let mut permeability = vec![0.0; diagonal.len() * 9];
        for (tensor, k) in permeability.chunks_exact_mut(9).zip(diagonal) {
            tensor[0] = k[0];
            tensor[4] = k[1];
            tensor[8] = k[2];
        }
        Self::new(porosity, permeability, viscosity, density)
    }

    /// Replace the surface densities.
    pub fn with_surface_density(mut self, surface_density: Vec<f64>) -> Result<Self> {
        if surface_density.len() != self.viscosity.len() {
            return Err(VertEqError::SizeMismatch {
                what: "surface density",
                expected: self.viscosity.len(),
                actual: surface_density.len(),
            });
        }
        self.surface_density = surface_density;
        Ok(self)
    }
}

impl IncompProperties for RockFluidProps {
    fn num_dimensions(&self) -> usize {
        Self::DIMENSIONS
    }

    fn num_cells(&self) -> usize {
        self.porosity.len()
    }

    fn porosity(&self) -> &[f64] {
        &self.porosity
    }

    fn permeability(&self) -> &[f64] {
        &self.permeability
    }

    fn num_phases(&self) -> usize {
        self.viscosity.len()
    }

    fn viscosity(&self) -> &[f64] {
        &self.viscosity
    }

    fn density(&self) -> &[f64] {
        &self.density
    }

    fn surface_density(&self) -> &[f64] {
        &self.surface_density
    }

    fn relperm(
        &self,
        _s: &[f64],
        _cells: &[usize],
        _kr: &mut [f64],
        _dkrds: Option<&mut [f64]>,
    ) -> Result<()> {
        Err(VertEqError::NotImplemented("relative permeability"))
    }

    fn cap_press(
        &self,
        _s: &[f64],
        _cells: &[usize],
        _pc: &mut [f64],
        _dpcds: Option<&mut [f64]>,
    ) -> Result<()> {
        Err(VertEqError::NotImplemented("capillary pressure"))
    }

    fn sat_range(&self, _cells: &[usize], _smin: &mut [f64], _smax: &mut [f64]) -> Result<()> {
        Err(VertEqError::NotImplemented("saturation range"))
    }
}
