//! Small value types shared across the crate.
//!
//! - [`Side3D`]: which side of a hexahedral cell a face bounds
//! - [`Elevation`]: discretized depth position inside a column
//!
//! # Example
//!
//! ```
//! use verteq::types::{Elevation, Side3D};
//!
//! let up = Side3D::from_tag(4).unwrap();
//! assert_eq!(up, Side3D::Up);
//!
//! let bottom = Elevation::bottom(3);
//! assert_eq!((bottom.block(), bottom.fraction()), (2, 1.0));
//! ```

mod elevation;
mod sides;

pub use elevation::{Elevation, MAX_FRACTION};
pub use sides::{Dim3D, Dir, Side3D};
