//! # verteq
//!
//! Vertical-equilibrium upscaling of 3D reservoir grids onto their 2D top
//! surface.
//!
//! Under vertical equilibrium the fluid distribution inside each vertical
//! column of a fine grid is fixed by the position of an interface, so the
//! column can be replaced by a single 2D element. This crate provides the
//! building blocks for that reduction:
//! - Run-length column storage ([`runlen`])
//! - Fine grid and its top surface of columns ([`mesh`])
//! - Block heights, column volumes and volume-weighted averages ([`UpscaleMapping`])
//! - Depth integration and elevation lookup inside columns ([`VertEqUpscaler`])
//! - Upscaled rock and fluid properties ([`VertEqProps`])
//!
//! Enable the `parallel` feature to process columns on the rayon thread pool.

pub mod config;
pub mod error;
pub mod mesh;
pub mod props;
pub mod runlen;
pub mod types;
pub mod upscale;
pub mod verteq;

// Re-export main types for convenience
pub use config::VertEqConfig;
pub use error::{Result, VertEqError};
pub use mesh::{CartesianGridBuilder, FineGrid, TopSurf};
pub use props::{IncompProperties, RockFluidProps, VertEqProps};
pub use runlen::{RunLenData, RunLenView, RunLenViewMut};
pub use types::{Elevation, Side3D};
pub use upscale::{UpscaleMapping, VertEqUpscaler};
pub use verteq::VertEq;
