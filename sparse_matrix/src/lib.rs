//! Sparse integer matrices stored as a dictionary of keys.
//!
//! A [`SparseMatrix`] keeps only its nonzero cells, keyed by `(row, col)`.
//! Matrices are loaded from a small coordinate-list text format (see
//! [`SparseMatrix::from_source`]) and combined with [`add`], [`subtract`]
//! and [`multiply`], each of which returns a new matrix.
//!
//! ```
//! use sparse_matrix::{multiply, SparseMatrix};
//!
//! let a = SparseMatrix::from_source("rows=2\ncols=2\n(0, 0, 1)\n(1, 1, 1)\n")?;
//! let b = SparseMatrix::from_entries(2, 2, [(0, 1, 3), (1, 0, 2)]);
//! assert_eq!(multiply(&a, &b)?, b);
//! # Ok::<(), sparse_matrix::Error>(())
//! ```

mod arithmetic;
mod entry;
mod error;
mod format;
mod matrix;

pub use arithmetic::{add, multiply, subtract, Operation};
pub use entry::MatrixEntry;
pub use error::{Error, Result, UnknownOperation};
pub use matrix::SparseMatrix;
