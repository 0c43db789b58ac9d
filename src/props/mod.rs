//! Rock and fluid properties on the fine grid and on the top surface.

mod rock_fluid;
mod traits;
mod verteq_props;

pub use rock_fluid::RockFluidProps;
pub use traits::IncompProperties;
pub use verteq_props::VertEqProps;
