//! Rock and fluid properties upscaled onto the top surface.
//!
//! Porosity and the horizontal block of the permeability tensor are
//! volume-averaged down each column once, at construction. For the fine
//! tensor `K` (row-major 3x3, stride 9) and the coarse tensor `k` (row-major
//! 2x2, stride 4):
//!
//! ```text
//! k_xx = <K[0]>    k_xy = <K[1]>    k_yy = <K[4]>    k_yx = k_xy
//! ```
//!
//! The `yx` entry is copied, not averaged, so the coarse tensor is exactly
//! symmetric. Fluid properties do not vary in space and are forwarded to the
//! fine-scale source.

use std::sync::Arc;

use tracing::debug;

use super::traits::IncompProperties;
use crate::error::{Result, VertEqError};
use crate::upscale::UpscaleMapping;

/// Upscaled properties over the columns of a top surface.
#[derive(Clone, Debug)]
pub struct VertEqProps<P: IncompProperties> {
    fine_props: Arc<P>,
    num_cols: usize,
    porosity: Vec<f64>,
    permeability: Vec<f64>,
}

const FINE_DIMS: usize = 3;
const COARSE_DIMS: usize = 2;

/// Fine tensor entry, coarse tensor entry
const AVERAGED_ENTRIES: [(usize, usize); 3] = [
    (0, 0), // xx
    (1, 1), // xy
    (FINE_DIMS + 1, COARSE_DIMS + 1), // yy
];

impl<P: IncompProperties> VertEqProps<P> {
    /// Average the fine-scale rock properties over every column of `mapping`.
    pub fn new(mapping: &UpscaleMapping, fine_props: Arc<P>) -> Result<Self> {
        if fine_props.num_dimensions() != FINE_DIMS {
            return Err(VertEqError::SizeMismatch {
                what: "fine property dimensions",
                expected: FINE_DIMS,
                actual: fine_props.num_dimensions(),
            });
        }
        if fine_props.num_cells() != mapping.num_elems {
            return Err(VertEqError::SizeMismatch {
                what: "fine property cells",
                expected: mapping.num_elems,
                actual: fine_props.num_cells(),
            });
        }
        let fine_poro = fine_props.porosity();
        if fine_poro.len() != mapping.num_elems {
            return Err(VertEqError::SizeMismatch {
                what: "porosity",
                expected: mapping.num_elems,
                actual: fine_poro.len(),
            });
        }
        let fine_perm = fine_props.permeability();
        let fine_stride = FINE_DIMS * FINE_DIMS;
        if fine_perm.len() != mapping.num_elems * fine_stride {
            return Err(VertEqError::SizeMismatch {
                what: "permeability",
                expected: mapping.num_elems * fine_stride,
                actual: fine_perm.len(),
            });
        }

        let num_cols = mapping.num_cols;
        let coarse_stride = COARSE_DIMS * COARSE_DIMS;

        let mut porosity = vec![0.0; num_cols];
        average(mapping, fine_poro, 0, 1, &mut porosity, 0, 1);

        let mut permeability = vec![0.0; num_cols * coarse_stride];
        for (fine_ofs, coarse_ofs) in AVERAGED_ENTRIES {
            average(
                mapping,
                fine_perm,
                fine_ofs,
                fine_stride,
                &mut permeability,
                coarse_ofs,
                coarse_stride,
            );
        }
        for tensor in permeability.chunks_exact_mut(coarse_stride) {
            tensor[COARSE_DIMS] = tensor[1];
        }

        debug!(columns = num_cols, "upscaled rock properties");

        Ok(Self {
            fine_props,
            num_cols,
            porosity,
            permeability,
        })
    }

    /// The fine-scale source.
    pub fn fine_props(&self) -> &P {
        &self.fine_props
    }

    /// Upscaled permeability tensor of column `col`, row-major.
    #[inline]
    pub fn permeability_of(&self, col: usize) -> [f64; 4] {
        let stride = COARSE_DIMS * COARSE_DIMS;
        let k = &self.permeability[col * stride..(col + 1) * stride];
        [k[0], k[1], k[2], k[3]]
    }
}

fn average(
    mapping: &UpscaleMapping,
    fine_data: &[f64],
    fine_ofs: usize,
    fine_stride: usize,
    col_data: &mut [f64],
    col_ofs: usize,
    col_stride: usize,
) {
    #[cfg(feature = "parallel")]
    mapping.vol_avg_parallel(fine_data, fine_ofs, fine_stride, col_data, col_ofs, col_stride);

    #[cfg(not(feature = "parallel"))]
    mapping.vol_avg(fine_data, fine_ofs, fine_stride, col_data, col_ofs, col_stride);
}

impl<P: IncompProperties> IncompProperties for VertEqProps<P> {
    fn num_dimensions(&self) -> usize {
        COARSE_DIMS
    }

    fn num_cells(&self) -> usize {
        self.num_cols
    }

    fn porosity(&self) -> &[f64] {
        &self.porosity
    }

    fn permeability(&self) -> &[f64] {
        &self.permeability
    }

    fn num_phases(&self) -> usize {
        self.fine_props.num_phases()
    }

    fn viscosity(&self) -> &[f64] {
        self.fine_props.viscosity()
    }

    fn density(&self) -> &[f64] {
        self.fine_props.density()
    }

    fn surface_density(&self) -> &[f64] {
        self.fine_props.surface_density()
    }

    fn relperm(
        &self,
        _s: &[f64],
        _cells: &[usize],
        _kr: &mut [f64],
        _dkrds: Option<&mut [f64]>,
    ) -> Result<()> {
        Err(VertEqError::NotImplemented("upscaled relative permeability"))
    }

    fn cap_press(
        &self,
        _s: &[f64],
        _cells: &[usize],
        _pc: &mut [f64],
        _dpcds: Option<&mut [f64]>,
    ) -> Result<()> {
        Err(VertEqError::NotImplemented("upscaled capillary pressure"))
    }

    fn sat_range(&self, _cells: &[usize], _smin: &mut [f64], _smax: &mut [f64]) -> Result<()> {
        Err(VertEqError::NotImplemented("upscaled saturation range"))
    }
}
