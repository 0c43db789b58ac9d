//! Vertical-equilibrium model of a fine grid.
//!
//! [`VertEq::create`] collapses a 3D grid and its rock properties onto the
//! 2D top surface in one go:
//!
//! 1. group the fine cells into columns ([`TopSurf`])
//! 2. compute block heights and column volumes ([`UpscaleMapping`])
//! 3. average the rock properties down each column ([`VertEqProps`])
//!
//! The resulting surface grid and properties are what a 2D simulator runs
//! on; the [`VertEqUpscaler`] converts between surface quantities and depths
//! inside the columns.

use std::sync::Arc;

use tracing::info;

use crate::config::VertEqConfig;
use crate::error::Result;
use crate::mesh::{FineGrid, TopSurf};
use crate::props::{IncompProperties, VertEqProps};
use crate::upscale::{UpscaleMapping, VertEqUpscaler};

/// Upscaled model: top surface, column geometry and properties.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use verteq::{CartesianGridBuilder, IncompProperties, RockFluidProps, VertEq, VertEqConfig};
///
/// let fine = CartesianGridBuilder::new(2, 2, 3).build().unwrap();
/// let n = fine.number_of_cells;
/// let rock = RockFluidProps::from_diagonal(
///     vec![0.25; n],
///     &vec![[500.0, 500.0, 50.0]; n],
///     vec![8e-5, 3e-4],
///     vec![700.0, 1000.0],
/// )
/// .unwrap();
///
/// let ve = VertEq::create(&VertEqConfig::new("box"), Arc::new(fine), Arc::new(rock)).unwrap();
///
/// assert_eq!(ve.grid().number_of_cells, 4);
/// assert_eq!(ve.props().porosity(), &[0.25; 4]);
/// assert_eq!(ve.title(), "box");
/// ```
#[derive(Debug)]
pub struct VertEq<P: IncompProperties> {
    title: String,
    top_surf: Arc<TopSurf>,
    mapping: Arc<UpscaleMapping>,
    props: VertEqProps<P>,
    upscaler: VertEqUpscaler,
}

impl<P: IncompProperties> VertEq<P> {
    /// Build the upscaled model of `fine_grid` with properties `fine_props`.
    pub fn create(
        config: &VertEqConfig,
        fine_grid: Arc<FineGrid>,
        fine_props: Arc<P>,
    ) -> Result<Self> {
        let top_surf = Arc::new(TopSurf::create(&fine_grid)?);
        let mapping = Arc::new(UpscaleMapping::with_config(
            fine_grid,
            Arc::clone(&top_surf),
            config,
        )?);
        let props = VertEqProps::new(&mapping, fine_props)?;
        let upscaler = VertEqUpscaler::new(Arc::clone(&mapping));

        info!(
            title = %config.title,
            columns = mapping.num_cols,
            fine_cells = mapping.num_elems,
            max_vert_res = top_surf.max_vert_res,
            "vertical equilibrium model ready"
        );

        Ok(Self {
            title: config.title.clone(),
            top_surf,
            mapping,
            props,
            upscaler,
        })
    }

    /// Case title from the configuration.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The 2D top surface the model lives on.
    pub fn grid(&self) -> &TopSurf {
        &self.top_surf
    }

    /// Upscaled rock and fluid properties.
    pub fn props(&self) -> &VertEqProps<P> {
        &self.props
    }

    /// Column geometry shared with the upscaler.
    pub fn mapping(&self) -> &UpscaleMapping {
        &self.mapping
    }

    /// Integrator for quantities inside the columns.
    pub fn upscaler(&self) -> &VertEqUpscaler {
        &self.upscaler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CartesianGridBuilder;
    use crate::props::RockFluidProps;
    use crate::VertEqError;

    fn rock(n: usize) -> RockFluidProps {
        RockFluidProps::from_diagonal(
            vec![0.2; n],
            &vec![[100.0, 100.0, 10.0]; n],
            vec![1.0, 2.0],
            vec![1.0, 2.0],
        )
        .unwrap()
    }

    #[test]
    fn test_create_shares_top_surface() {
        let fine = Arc::new(CartesianGridBuilder::new(3, 2, 2).build().unwrap());
        let props = Arc::new(rock(fine.number_of_cells));
        let ve = VertEq::create(&VertEqConfig::default(), fine, props).unwrap();

        assert_eq!(ve.title(), "verteq");
        assert_eq!(ve.grid().number_of_cells, 6);
        assert_eq!(ve.mapping().num_cols, 6);
        assert_eq!(ve.props().num_cells(), 6);
        assert_eq!(ve.upscaler().max_vert_res(), 2);
        assert!(std::ptr::eq(ve.grid(), ve.mapping().top_surf()));
    }

    #[test]
    fn test_create_propagates_errors() {
        let fine = Arc::new(
            CartesianGridBuilder::new(1, 1, 2)
                .with_layer_thickness(vec![1.0, 1.0])
                .build()
                .unwrap(),
        );
        let config = VertEqConfig::new("thick").with_min_column_height(5.0);
        let err = VertEq::create(&config, Arc::clone(&fine), Arc::new(rock(2))).unwrap_err();
        assert!(matches!(err, VertEqError::DegenerateColumn { column: 0, .. }));

        let err = VertEq::create(&VertEqConfig::default(), fine, Arc::new(rock(3))).unwrap_err();
        assert!(matches!(err, VertEqError::SizeMismatch { .. }));
    }
}
