//! Upscaling configuration.

/// Settings for building a vertical-equilibrium upscaling.
///
/// # Example
///
/// ```
/// use verteq::VertEqConfig;
///
/// let config = VertEqConfig::new("sleipner")
///     .with_min_column_height(1e-3)
///     .with_min_column_volume(1e-6);
///
/// assert_eq!(config.title, "sleipner");
/// assert!(config.is_degenerate(5e-4, 1.0));
/// assert!(!config.is_degenerate(1.0, 1.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct VertEqConfig {
    /// Case title, used in log messages
    pub title: String,
    /// Columns with total height at or below this are rejected
    pub min_column_height: f64,
    /// Columns with total volume at or below this are rejected
    pub min_column_volume: f64,
}

impl VertEqConfig {
    /// Create a configuration that only rejects columns without extent.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            min_column_height: 0.0,
            min_column_volume: 0.0,
        }
    }

    /// Set the total-height threshold for degenerate columns.
    pub fn with_min_column_height(mut self, min_column_height: f64) -> Self {
        self.min_column_height = min_column_height.max(0.0);
        self
    }

    /// Set the total-volume threshold for degenerate columns.
    pub fn with_min_column_volume(mut self, min_column_volume: f64) -> Self {
        self.min_column_volume = min_column_volume.max(0.0);
        self
    }

    /// Check whether a column with these totals cannot be averaged over.
    #[inline]
    pub fn is_degenerate(&self, total_height: f64, total_volume: f64) -> bool {
        !(total_height > self.min_column_height && total_volume > self.min_column_volume)
    }
}

impl Default for VertEqConfig {
    fn default() -> Self {
        Self::new("verteq")
    }
}
