//! # Matrix
//!
//! Row-major point storage: rows are points, columns are vector
//! components. Vectors are stored contiguously (cache-friendly), the
//! same layout the search kernels expect.

use bonsai_core::error::{Error, Result};

/// Row-major matrix of `f32` values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Create a zeroed matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix from a flat row-major buffer
    pub fn from_vec(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::Configuration {
                message: format!(
                    "Matrix buffer length {} does not match {}x{}",
                    data.len(),
                    rows,
                    cols
                ),
            });
        }
        Ok(Self { data, rows, cols })
    }

    /// Create a matrix from row slices; all rows must share one length
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of points
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Vector dimensionality
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row accessor
    #[inline]
    pub fn row(&self, i: usize) -> &[f32] {
        let start = i * self.cols;
        &self.data[start..start + self.cols]
    }

    /// Mutable row accessor
    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        let start = i * self.cols;
        &mut self.data[start..start + self.cols]
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.cols)
    }

    /// Flat backing buffer
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Concatenate the rows of `self` and `other` into a new matrix.
    /// Column counts must agree.
    pub fn stacked(&self, other: &Matrix) -> Result<Matrix> {
        if other.cols != self.cols {
            return Err(Error::DimensionMismatch {
                expected: self.cols,
                got: other.cols,
            });
        }
        let mut data = Vec::with_capacity((self.rows + other.rows) * self.cols);
        data.extend_from_slice(&self.data);
        data.extend_from_slice(&other.data);
        Ok(Matrix {
            data,
            rows: self.rows + other.rows,
            cols: self.cols,
        })
    }
}
