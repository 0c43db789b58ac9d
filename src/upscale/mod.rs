//! Upscaling from the fine grid onto columns of the top surface.
//!
//! - [`UpscaleMapping`]: block heights, accumulated heights and volumes, and
//!   the volume-weighted average used for rock properties
//! - [`VertEqUpscaler`]: depth integration down a column and conversion
//!   between integrated values and [`Elevation`](crate::types::Elevation)s

mod mapping;
mod upscaler;

pub use mapping::UpscaleMapping;
pub use upscaler::VertEqUpscaler;
