use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::entry::MatrixEntry;
use crate::error::{Error, Result};
use crate::format;

/// Dictionary-of-keys sparse integer matrix.
///
/// Only nonzero cells are stored; a missing key reads as 0. Coordinates are
/// not checked against the dimensions on either `get_element` or
/// `set_element`.
#[cfg_attr(feature = "serde", derive(Serialize), serde(into = "MatrixData"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseMatrix {
    rows: u32,
    cols: u32,
    pub(crate) elements: BTreeMap<(i64, i64), i64>,
}

#[cfg(feature = "serde")]
#[derive(Serialize)]
struct MatrixData {
    rows: u32,
    cols: u32,
    values: Vec<MatrixEntry>,
}

#[cfg(feature = "serde")]
impl From<SparseMatrix> for MatrixData {
    fn from(m: SparseMatrix) -> Self {
        Self {
            rows: m.rows,
            cols: m.cols,
            values: m.entries().collect(),
        }
    }
}

impl SparseMatrix {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows,
            cols,
            elements: BTreeMap::new(),
        }
    }

    /// Builds a matrix by setting each entry in order; later entries win and
    /// zero values clear earlier ones.
    pub fn from_entries<I>(rows: u32, cols: u32, entries: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64, i64)>,
    {
        entries
            .into_iter()
            .fold(Self::new(rows, cols), |mut m, (row, col, value)| {
                m.set_element(row, col, value);
                m
            })
    }

    /// Parses the coordinate-list text format.
    pub fn from_source(text: &str) -> Result<Self> {
        format::parse(text)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_source(&text)
    }

    pub fn num_rows(&self) -> u32 {
        self.rows
    }

    pub fn num_cols(&self) -> u32 {
        self.cols
    }

    pub fn shape(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Number of stored (nonzero) elements.
    pub fn nnz(&self) -> usize {
        self.elements.len()
    }

    pub fn get_element(&self, row: i64, col: i64) -> i64 {
        self.elements.get(&(row, col)).copied().unwrap_or(0)
    }

    pub fn set_element(&mut self, row: i64, col: i64, value: i64) {
        if value != 0 {
            self.elements.insert((row, col), value);
        } else {
            self.elements.remove(&(row, col));
        }
    }

    /// Whether `(row, col)` has a stored entry.
    pub fn contains(&self, row: i64, col: i64) -> bool {
        self.elements.contains_key(&(row, col))
    }

    /// Nonzero entries in ascending `(row, col)` order.
    pub fn entries(&self) -> impl Iterator<Item = MatrixEntry> + '_ {
        self.elements
            .iter()
            .map(|(&(row, col), &value)| MatrixEntry { row, col, value })
    }

    /// Human-readable rendering, e.g. `Rows: 2, Cols: 2, Elements: [(0, 0, 1)]`.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Renders the coordinate-list format accepted by [`SparseMatrix::from_source`].
    pub fn to_source(&self) -> String {
        format::render(self)
    }
}

impl fmt::Display for SparseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rows: {}, Cols: {}, Elements: [", self.rows, self.cols)?;
        for (i, e) in self.entries().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}

impl FromStr for SparseMatrix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_source(s)
    }
}
