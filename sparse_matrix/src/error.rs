//! Error types for sparse matrix parsing and arithmetic

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using this crate's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or combining matrices
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed coordinate-list input
    #[error("Input file has wrong format (line {line}: {reason})")]
    Format {
        /// 1-based line number of the offending line
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// Addition or subtraction operands have different shapes
    #[error("Matrices dimensions must match for {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        /// "addition" or "subtraction"
        op: &'static str,
        /// Shape of the left operand
        left: (u32, u32),
        /// Shape of the right operand
        right: (u32, u32),
    },

    /// Multiplication operands have incompatible inner dimensions
    #[error(
        "Number of columns in the first matrix ({left_cols}) must be equal to the number of rows in the second matrix ({right_rows})"
    )]
    DimensionDisagreement {
        /// Columns of the left operand
        left_cols: u32,
        /// Rows of the right operand
        right_rows: u32,
    },

    /// An element value does not fit in an i64
    #[error("Integer overflow during {op}")]
    Overflow {
        /// The operation that overflowed
        op: &'static str,
    },

    /// Reading a matrix file failed
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// An operation name or menu number that is not recognised
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown operation `{0}` (expected 1/add, 2/subtract or 3/multiply)")]
pub struct UnknownOperation(pub String);

impl Error {
    pub(crate) fn format(line: usize, reason: impl Into<String>) -> Self {
        Self::Format {
            line,
            reason: reason.into(),
        }
    }

    /// Whether this is a malformed-input error.
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Whether addition or subtraction operands had different shapes.
    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, Self::DimensionMismatch { .. })
    }

    /// Whether multiplication operands had incompatible inner dimensions.
    pub fn is_dimension_disagreement(&self) -> bool {
        matches!(self, Self::DimensionDisagreement { .. })
    }
}
