//! Ragged two-level array stored contiguously (CSR layout).
//!
//! Row `i` occupies `values[offsets[i]..offsets[i + 1]]`. Used for polygon
//! vertex lists as well as for the adjacency tables of both meshes, where the
//! flat value position doubles as the half-edge position.

use serde::{Deserialize, Serialize};
use std::ops::{Index, Range};

/// Contiguous storage for variable-length rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiVector<T> {
    offsets: Vec<usize>,
    values: Vec<T>,
}

impl<T> Default for MultiVector<T> {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            values: Vec::new(),
        }
    }
}

impl<T> MultiVector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate rows of the given sizes, every slot set to `fill`.
    ///
    /// Row capacities are fixed afterwards; rows are only rewritten in place.
    pub fn with_sizes<I>(sizes: I, fill: T) -> Self
    where
        I: IntoIterator<Item = usize>,
        T: Clone,
    {
        let mut offsets = vec![0];
        let mut total = 0usize;
        for size in sizes {
            total += size;
            offsets.push(total);
        }
        Self {
            offsets,
            values: vec![fill; total],
        }
    }

    /// Append a row.
    pub fn push_back<I>(&mut self, row: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.values.extend(row);
        self.offsets.push(self.values.len());
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn offset(&self, row: usize) -> usize {
        self.offsets[row]
    }

    #[inline]
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.offsets[row]..self.offsets[row + 1]
    }

    #[inline]
    pub fn row_len(&self, row: usize) -> usize {
        self.offsets[row + 1] - self.offsets[row]
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.values[self.row_range(row)]
    }

    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        let range = self.row_range(row);
        &mut self.values[range]
    }

    pub fn get(&self, row: usize) -> Option<&[T]> {
        if row < self.len() {
            Some(self.row(row))
        } else {
            None
        }
    }

    /// All values, row after row.
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Row containing the flat value position `flat`.
    pub fn row_of(&self, flat: usize) -> Option<usize> {
        if flat >= self.values.len() {
            return None;
        }
        // first offset strictly greater than `flat`, minus one; empty rows are skipped
        Some(self.offsets.partition_point(|&o| o <= flat) - 1)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.len()).map(move |i| self.row(i))
    }
}

impl<T> Index<usize> for MultiVector<T> {
    type Output = [T];

    #[inline]
    fn index(&self, row: usize) -> &[T] {
        self.row(row)
    }
}

impl<T, R> FromIterator<R> for MultiVector<T>
where
    R: IntoIterator<Item = T>,
{
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut mv = MultiVector::new();
        for row in iter {
            mv.push_back(row);
        }
        mv
    }
}

impl<T> From<Vec<Vec<T>>> for MultiVector<T> {
    fn from(rows: Vec<Vec<T>>) -> Self {
        rows.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_and_offsets() {
        let mv = MultiVector::from(vec![vec![0, 1, 2], vec![], vec![3, 4]]);
        assert_eq!(mv.len(), 3);
        assert_eq!(mv.row(0), &[0, 1, 2]);
        assert!(mv.row(1).is_empty());
        assert_eq!(&mv[2], &[3, 4]);
        assert_eq!(mv.row_range(2), 3..5);
        assert_eq!(mv.values(), &[0, 1, 2, 3, 4]);
        assert!(mv.get(3).is_none());
    }

    #[test]
    fn row_of_skips_empty_rows() {
        let mv = MultiVector::from(vec![vec![7, 7], vec![], vec![], vec![8]]);
        assert_eq!(mv.row_of(0), Some(0));
        assert_eq!(mv.row_of(1), Some(0));
        assert_eq!(mv.row_of(2), Some(3));
        assert_eq!(mv.row_of(3), None);
    }

    #[test]
    fn with_sizes_is_fixed_capacity() {
        let mut mv = MultiVector::with_sizes([2, 3], -1i32);
        assert_eq!(mv.values().len(), 5);
        mv.row_mut(1).copy_from_slice(&[4, 5, 6]);
        assert_eq!(mv.row(0), &[-1, -1]);
        assert_eq!(mv.row(1), &[4, 5, 6]);
    }

    #[test]
    fn empty_default() {
        let mv: MultiVector<u8> = MultiVector::default();
        assert!(mv.is_empty());
        assert_eq!(mv.iter().count(), 0);
    }
}
