//! Run-length encoded column storage.
//!
//! A run-length matrix buckets values into a fixed number of columns, each
//! with its own number of rows, stored back to back in one flat array. An
//! offset table `pos` of length `num_cols + 1` tells where each column starts:
//! column `c` owns `data[pos[c]..pos[c + 1]]`, and `pos[num_cols]` is the total
//! number of values. This is the layout grids use for cell-to-face tables and
//! top surfaces use for column-to-cell tables.
//!
//! The values of a matrix can be changed, its sparsity cannot: no element can
//! be added to or removed from a column after construction.
//!
//! - [`RunLenView`] borrows an existing offset table and value array.
//! - [`RunLenViewMut`] borrows them with write access to the values.
//! - [`RunLenData`] owns a value array sized from an offset table.
//!
//! # Example
//!
//! ```
//! use verteq::runlen::{RunLenData, RunLenView};
//!
//! // three columns with 2, 0 and 3 faces
//! let pos = [0, 2, 2, 5];
//! let faces = [10, 11, 20, 21, 22];
//! let view = RunLenView::new(&pos, &faces);
//!
//! assert_eq!(view.num_cols(), 3);
//! assert_eq!(view.size(2), 3);
//! assert_eq!(view[2][0], 20);
//! assert_eq!(view.last(0), Some(&11));
//! assert!(view.each(1).next().is_none());
//!
//! // owned storage with the same shape
//! let mut acc = RunLenData::<f64>::new(&pos);
//! acc[2][1] = 4.5;
//! assert_eq!(acc.all().len(), 5);
//! assert_eq!(acc.column(2), &[0.0, 4.5, 0.0]);
//! ```

use std::ops::{Index, IndexMut, Range};

use crate::error::{Result, VertEqError};

/// Check that `pos` is a valid offset table for `len` values.
///
/// The table must be non-empty, start at zero, be non-decreasing and end at
/// `len`.
pub fn validate_offsets(pos: &[usize], len: usize) -> Result<()> {
    let Some(&first) = pos.first() else {
        return Err(VertEqError::InvalidOffsets(
            "offset table must have at least one entry".into(),
        ));
    };
    if first != 0 {
        return Err(VertEqError::InvalidOffsets(format!(
            "first offset must be 0, got {}",
            first
        )));
    }
    if let Some(col) = pos.windows(2).position(|w| w[1] < w[0]) {
        return Err(VertEqError::InvalidOffsets(format!(
            "offsets decrease at column {}: {} > {}",
            col,
            pos[col],
            pos[col + 1]
        )));
    }
    let total = pos[pos.len() - 1];
    if total != len {
        return Err(VertEqError::InvalidOffsets(format!(
            "offsets cover {} values, storage has {}",
            total, len
        )));
    }
    Ok(())
}

#[inline]
fn column_range(pos: &[usize], col: usize) -> Range<usize> {
    pos[col]..pos[col + 1]
}

// =============================================================================
// Borrowed views
// =============================================================================

/// Read-only view of a run-length encoded matrix.
///
/// The view is only valid as long as the underlying arrays live; it never
/// copies or owns them.
#[derive(Debug)]
pub struct RunLenView<'a, T> {
    pos: &'a [usize],
    data: &'a [T],
}

impl<T> Clone for RunLenView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RunLenView<'_, T> {}

impl<'a, T> RunLenView<'a, T> {
    /// Create a view over an offset table and its values.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the offsets do not describe `data`. Use
    /// [`validate_offsets`] first for arrays from outside the crate.
    #[inline]
    pub fn new(pos: &'a [usize], data: &'a [T]) -> Self {
        debug_assert!(
            validate_offsets(pos, data.len()).is_ok(),
            "Invalid run-length offsets"
        );
        Self { pos, data }
    }

    /// Number of columns.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.pos.len().saturating_sub(1)
    }

    /// Number of values stored in column `col`.
    #[inline]
    pub fn size(&self, col: usize) -> usize {
        self.pos[col + 1] - self.pos[col]
    }

    /// Values of column `col`, top to bottom.
    #[inline]
    pub fn column(&self, col: usize) -> &'a [T] {
        &self.data[column_range(self.pos, col)]
    }

    /// Last value of column `col`; with accumulated data this is the total.
    #[inline]
    pub fn last(&self, col: usize) -> Option<&'a T> {
        self.column(col).last()
    }

    /// Indices of all columns.
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        0..self.num_cols()
    }

    /// Iterate over the values of one column.
    #[inline]
    pub fn each(&self, col: usize) -> std::slice::Iter<'a, T> {
        self.column(col).iter()
    }

    /// Iterate over the columns as slices.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'a [T]> + 'a {
        let (pos, data) = (self.pos, self.data);
        pos.windows(2).map(move |w| &data[w[0]..w[1]])
    }

    /// All values, regardless of column.
    #[inline]
    pub fn all(&self) -> &'a [T] {
        self.data
    }

    /// Offset table.
    #[inline]
    pub fn offsets(&self) -> &'a [usize] {
        self.pos
    }
}

impl<T> Index<usize> for RunLenView<'_, T> {
    type Output = [T];

    #[inline]
    fn index(&self, col: usize) -> &[T] {
        self.column(col)
    }
}

/// View of a run-length encoded matrix with write access to the values.
#[derive(Debug)]
pub struct RunLenViewMut<'a, T> {
    pos: &'a [usize],
    data: &'a mut [T],
}

impl<'a, T> RunLenViewMut<'a, T> {
    /// Create a mutable view over an offset table and its values.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the offsets do not describe `data`.
    #[inline]
    pub fn new(pos: &'a [usize], data: &'a mut [T]) -> Self {
        debug_assert!(
            validate_offsets(pos, data.len()).is_ok(),
            "Invalid run-length offsets"
        );
        Self { pos, data }
    }

    /// Number of columns.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.pos.len().saturating_sub(1)
    }

    /// Number of values stored in column `col`.
    #[inline]
    pub fn size(&self, col: usize) -> usize {
        self.pos[col + 1] - self.pos[col]
    }

    /// Values of column `col`.
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[column_range(self.pos, col)]
    }

    /// Mutable values of column `col`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        &mut self.data[column_range(self.pos, col)]
    }

    /// Indices of all columns.
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        0..self.num_cols()
    }

    /// Split the values into one disjoint mutable slice per column.
    #[inline]
    pub fn columns_mut(&mut self) -> ColumnsMut<'_, T> {
        ColumnsMut::new(self.pos, self.data)
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn as_view(&self) -> RunLenView<'_, T> {
        RunLenView {
            pos: self.pos,
            data: self.data,
        }
    }
}

impl<T> Index<usize> for RunLenViewMut<'_, T> {
    type Output = [T];

    #[inline]
    fn index(&self, col: usize) -> &[T] {
        self.column(col)
    }
}

impl<T> IndexMut<usize> for RunLenViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, col: usize) -> &mut [T] {
        self.column_mut(col)
    }
}

/// Iterator over disjoint mutable column slices.
///
/// Every column can be written independently, which lets callers hand the
/// columns to worker threads without synchronization.
pub struct ColumnsMut<'a, T> {
    bounds: std::slice::Windows<'a, usize>,
    rest: &'a mut [T],
}

impl<'a, T> ColumnsMut<'a, T> {
    fn new(pos: &'a [usize], data: &'a mut [T]) -> Self {
        Self {
            bounds: pos.windows(2),
            rest: data,
        }
    }
}

impl<'a, T> Iterator for ColumnsMut<'a, T> {
    type Item = &'a mut [T];

    fn next(&mut self) -> Option<Self::Item> {
        let w = self.bounds.next()?;
        let rest = std::mem::take(&mut self.rest);
        let (head, tail) = rest.split_at_mut(w[1] - w[0]);
        self.rest = tail;
        Some(head)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bounds.size_hint()
    }
}

impl<T> ExactSizeIterator for ColumnsMut<'_, T> {}

// =============================================================================
// Owned storage
// =============================================================================

/// Run-length encoded matrix that owns its values.
///
/// Use this to attach extra per-element data to an existing run-length
/// layout, e.g. one accumulated height per block of every column. The value
/// buffer is allocated once, sized from the last offset, and released when
/// the matrix is dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct RunLenData<T> {
    pos: Vec<usize>,
    data: Vec<T>,
}

impl<T: Clone + Default> RunLenData<T> {
    /// Allocate default-initialized storage shaped by `pos`.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `pos` is not a valid offset table.
    pub fn new(pos: &[usize]) -> Self {
        let len = pos.last().copied().unwrap_or(0);
        debug_assert!(
            validate_offsets(pos, len).is_ok(),
            "Invalid run-length offsets"
        );
        Self {
            pos: pos.to_vec(),
            data: vec![T::default(); len],
        }
    }
}

impl<T> RunLenData<T> {
    /// Take ownership of an offset table and matching values.
    pub fn from_parts(pos: Vec<usize>, data: Vec<T>) -> Result<Self> {
        validate_offsets(&pos, data.len())?;
        Ok(Self { pos, data })
    }

    /// Give back the offset table and values.
    pub fn into_parts(self) -> (Vec<usize>, Vec<T>) {
        (self.pos, self.data)
    }

    /// Read-only view.
    #[inline]
    pub fn view(&self) -> RunLenView<'_, T> {
        RunLenView {
            pos: &self.pos,
            data: &self.data,
        }
    }

    /// Mutable view.
    #[inline]
    pub fn view_mut(&mut self) -> RunLenViewMut<'_, T> {
        RunLenViewMut {
            pos: &self.pos,
            data: &mut self.data,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn num_cols(&self) -> usize {
        self.pos.len().saturating_sub(1)
    }

    /// Number of values stored in column `col`.
    #[inline]
    pub fn size(&self, col: usize) -> usize {
        self.pos[col + 1] - self.pos[col]
    }

    /// Values of column `col`.
    #[inline]
    pub fn column(&self, col: usize) -> &[T] {
        &self.data[column_range(&self.pos, col)]
    }

    /// Mutable values of column `col`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [T] {
        &mut self.data[column_range(&self.pos, col)]
    }

    /// Last value of column `col`.
    #[inline]
    pub fn last(&self, col: usize) -> Option<&T> {
        self.column(col).last()
    }

    /// Indices of all columns.
    #[inline]
    pub fn columns(&self) -> Range<usize> {
        0..self.num_cols()
    }

    /// Iterate over the values of one column.
    #[inline]
    pub fn each(&self, col: usize) -> std::slice::Iter<'_, T> {
        self.column(col).iter()
    }

    /// Split the values into one disjoint mutable slice per column.
    #[inline]
    pub fn columns_mut(&mut self) -> ColumnsMut<'_, T> {
        ColumnsMut::new(&self.pos, &mut self.data)
    }

    /// All values, regardless of column.
    #[inline]
    pub fn all(&self) -> &[T] {
        &self.data
    }

    /// All values, mutable.
    #[inline]
    pub fn all_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Offset table.
    #[inline]
    pub fn offsets(&self) -> &[usize] {
        &self.pos
    }
}

impl<T> Index<usize> for RunLenData<T> {
    type Output = [T];

    #[inline]
    fn index(&self, col: usize) -> &[T] {
        self.column(col)
    }
}

impl<T> IndexMut<usize> for RunLenData<T> {
    #[inline]
    fn index_mut(&mut self, col: usize) -> &mut [T] {
        self.column_mut(col)
    }
}
