//! Discretized depth position inside a column.

use std::fmt;

/// Largest fraction strictly below one.
///
/// Interior positions found by inverse lookup are clamped to this so that
/// `fraction < 1` holds everywhere except at the bottom of a column.
pub const MAX_FRACTION: f64 = 1.0 - f64::EPSILON / 2.0;

/// Discretized height inside a column: `block` whole blocks skipped from the
/// top, then `fraction` of the way through the next block.
///
/// Storing the block number instead of an absolute z makes property lookups a
/// table access. The same elevation refers to different physical depths in
/// different columns, since neither the top nor the block heights line up.
///
/// The invariant is `0 <= fraction < 1`, with one exception: the bottom of a
/// column is `(last_block, 1.0)`.
///
/// # Example
///
/// ```
/// use verteq::types::Elevation;
///
/// let zeta = Elevation::new(2, 0.25);
/// assert_eq!(zeta.block(), 2);
/// assert_eq!(zeta.fraction(), 0.25);
/// assert!(Elevation::TOP.is_top());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Elevation {
    block: usize,
    fraction: f64,
}

impl Elevation {
    /// Top of the column.
    pub const TOP: Self = Self {
        block: 0,
        fraction: 0.0,
    };

    /// Create an elevation from its parts.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `fraction` is outside `[0, 1]`.
    #[inline]
    pub fn new(block: usize, fraction: f64) -> Self {
        debug_assert!(
            (0.0..=1.0).contains(&fraction),
            "Elevation fraction must be in [0, 1], got {}",
            fraction
        );
        Self { block, fraction }
    }

    /// Bottom of a column with `num_rows` blocks.
    ///
    /// # Panics
    ///
    /// Panics in debug mode for an empty column.
    #[inline]
    pub fn bottom(num_rows: usize) -> Self {
        debug_assert!(num_rows > 0, "Empty column has no bottom");
        Self {
            block: num_rows.saturating_sub(1),
            fraction: 1.0,
        }
    }

    /// Number of whole blocks above this position; the position lies within
    /// the block with this row number.
    #[inline]
    pub fn block(self) -> usize {
        self.block
    }

    /// Fraction of the block above this position.
    #[inline]
    pub fn fraction(self) -> f64 {
        self.fraction
    }

    /// Whether this is the top of the column.
    #[inline]
    pub fn is_top(self) -> bool {
        self.block == 0 && self.fraction == 0.0
    }
}

impl Default for Elevation {
    fn default() -> Self {
        Self::TOP
    }
}

impl fmt::Display for Elevation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} + {:.4}", self.block, self.fraction)
    }
}

impl From<Elevation> for (usize, f64) {
    fn from(zeta: Elevation) -> Self {
        (zeta.block, zeta.fraction)
    }
}
