//! Addition, subtraction and multiplication of sparse matrices
//!
//! Every operation borrows its operands and returns a freshly allocated
//! result; nothing is produced when the shapes are incompatible.

use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result, UnknownOperation};
use crate::matrix::SparseMatrix;

pub fn add(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    elementwise(a, b, "addition", i64::checked_add)
}

pub fn subtract(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    elementwise(a, b, "subtraction", i64::checked_sub)
}

fn elementwise(
    a: &SparseMatrix,
    b: &SparseMatrix,
    op: &'static str,
    f: fn(i64, i64) -> Option<i64>,
) -> Result<SparseMatrix> {
    if a.shape() != b.shape() {
        return Err(Error::DimensionMismatch {
            op,
            left: a.shape(),
            right: b.shape(),
        });
    }

    let mut result = SparseMatrix::new(a.num_rows(), a.num_cols());

    // Union of both key sets; cells that are zero in both are never visited.
    let only_b = b.elements.keys().filter(|k| !a.elements.contains_key(*k));
    for &(row, col) in a.elements.keys().chain(only_b) {
        let value = f(a.get_element(row, col), b.get_element(row, col))
            .ok_or(Error::Overflow { op })?;
        result.set_element(row, col, value);
    }

    debug!(
        "{}: {}x{} matrices with {} and {} nonzeros -> {} nonzeros",
        op,
        a.num_rows(),
        a.num_cols(),
        a.nnz(),
        b.nnz(),
        result.nnz()
    );
    Ok(result)
}

pub fn multiply(a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
    if a.num_cols() != b.num_rows() {
        return Err(Error::DimensionDisagreement {
            left_cols: a.num_cols(),
            right_rows: b.num_rows(),
        });
    }

    // Nonzeros of b grouped by row, limited to columns 0..b.num_cols.
    let cols = i64::from(b.num_cols());
    let mut b_rows: HashMap<i64, Vec<(i64, i64)>> = HashMap::new();
    for (&(k, j), &value) in &b.elements {
        if (0..cols).contains(&j) {
            b_rows.entry(k).or_default().push((j, value));
        }
    }

    // Partial sums are i128 so they may leave the i64 range before settling.
    let mut sums: BTreeMap<(i64, i64), i128> = BTreeMap::new();
    for (&(i, k), &v1) in &a.elements {
        let Some(row) = b_rows.get(&k) else {
            continue;
        };
        for &(j, v2) in row {
            let sum = sums.entry((i, j)).or_insert(0);
            *sum = sum
                .checked_add(i128::from(v1) * i128::from(v2))
                .ok_or(Error::Overflow {
                    op: "multiplication",
                })?;
        }
    }

    let mut result = SparseMatrix::new(a.num_rows(), b.num_cols());
    for ((i, j), sum) in sums {
        let value = i64::try_from(sum).map_err(|_| Error::Overflow {
            op: "multiplication",
        })?;
        result.set_element(i, j, value);
    }

    debug!(
        "multiplication: {}x{} by {}x{} -> {} nonzeros",
        a.num_rows(),
        a.num_cols(),
        b.num_rows(),
        b.num_cols(),
        result.nnz()
    );
    Ok(result)
}

/// One of the three supported binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
}

impl Operation {
    /// In menu order; the menu number of an operation is its index plus one.
    pub const ALL: [Operation; 3] = [Operation::Add, Operation::Subtract, Operation::Multiply];

    pub fn title(self) -> &'static str {
        match self {
            Self::Add => "Addition",
            Self::Subtract => "Subtraction",
            Self::Multiply => "Multiplication",
        }
    }

    pub fn apply(self, a: &SparseMatrix, b: &SparseMatrix) -> Result<SparseMatrix> {
        match self {
            Self::Add => add(a, b),
            Self::Subtract => subtract(a, b),
            Self::Multiply => multiply(a, b),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "addition"),
            Self::Subtract => write!(f, "subtraction"),
            Self::Multiply => write!(f, "multiplication"),
        }
    }
}

/// Accepts the menu numbers `1`-`3` as well as the operation names.
impl FromStr for Operation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "add" | "addition" => Ok(Self::Add),
            "2" | "sub" | "subtract" | "subtraction" => Ok(Self::Subtract),
            "3" | "mul" | "multiply" | "multiplication" => Ok(Self::Multiply),
            _ => Err(UnknownOperation(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: u32, cols: u32, entries: &[(i64, i64, i64)]) -> SparseMatrix {
        SparseMatrix::from_entries(rows, cols, entries.iter().copied())
    }

    #[test]
    fn test_add() {
        let a = m(2, 2, &[(0, 0, 1), (0, 1, 2)]);
        let b = m(2, 2, &[(0, 1, 3), (1, 0, 4)]);
        assert_eq!(add(&a, &b).unwrap(), m(2, 2, &[(0, 0, 1), (0, 1, 5), (1, 0, 4)]));
    }

    #[test]
    fn test_add_cancellation_drops_entry() {
        let a = m(2, 2, &[(0, 0, 5), (1, 1, 1)]);
        let b = m(2, 2, &[(0, 0, -5)]);
        let sum = add(&a, &b).unwrap();
        assert!(!sum.contains(0, 0));
        assert_eq!(sum, m(2, 2, &[(1, 1, 1)]));
    }

    #[test]
    fn test_subtract() {
        let a = m(2, 3, &[(0, 0, 4), (1, 2, 6)]);
        let b = m(2, 3, &[(0, 0, 1), (1, 1, 2), (1, 2, 6)]);
        assert_eq!(subtract(&a, &b).unwrap(), m(2, 3, &[(0, 0, 3), (1, 1, -2)]));
    }

    #[test]
    fn test_subtract_self_is_empty() {
        let a = m(3, 3, &[(0, 0, 4), (2, 1, -9)]);
        let diff = subtract(&a, &a).unwrap();
        assert_eq!(diff.nnz(), 0);
        assert_eq!(diff.shape(), (3, 3));
    }

    #[test]
    fn test_operands_untouched() {
        let a = m(2, 2, &[(0, 0, 1)]);
        let b = m(2, 2, &[(0, 0, -1)]);
        let (a0, b0) = (a.clone(), b.clone());
        add(&a, &b).unwrap();
        subtract(&a, &b).unwrap();
        multiply(&a, &b).unwrap();
        assert_eq!(a, a0);
        assert_eq!(b, b0);
    }

    #[test]
    fn test_add_subtract_shape_mismatch() {
        let a = m(2, 2, &[]);
        let b = m(2, 3, &[]);
        let err = add(&a, &b).unwrap_err();
        assert!(err.is_dimension_mismatch());
        assert!(matches!(
            subtract(&a, &b),
            Err(Error::DimensionMismatch {
                op: "subtraction",
                left: (2, 2),
                right: (2, 3),
            })
        ));
    }

    #[test]
    fn test_multiply_identity() {
        let a = m(2, 2, &[(0, 0, 1), (1, 1, 1)]);
        let b = m(2, 2, &[(0, 0, 5), (0, 1, 3), (1, 0, 2), (1, 1, 4)]);
        assert_eq!(multiply(&a, &b).unwrap(), b);
    }

    #[test]
    fn test_multiply_rectangular() {
        // [1 0 2]   [1 0]   [7 0]
        // [0 3 0] x [0 2] = [0 6]
        //           [3 0]
        let a = m(2, 3, &[(0, 0, 1), (0, 2, 2), (1, 1, 3)]);
        let b = m(3, 2, &[(0, 0, 1), (1, 1, 2), (2, 0, 3)]);
        let product = multiply(&a, &b).unwrap();
        assert_eq!(product.shape(), (2, 2));
        assert_eq!(product, m(2, 2, &[(0, 0, 7), (1, 1, 6)]));
    }

    #[test]
    fn test_multiply_cancellation() {
        let a = m(1, 2, &[(0, 0, 1), (0, 1, 1)]);
        let b = m(2, 1, &[(0, 0, 3), (1, 0, -3)]);
        let product = multiply(&a, &b).unwrap();
        assert_eq!(product.nnz(), 0);
        assert_eq!(product.shape(), (1, 1));
    }

    #[test]
    fn test_multiply_dimension_disagreement() {
        let a = m(2, 3, &[(0, 0, 1)]);
        let b = m(2, 2, &[(0, 0, 1)]);
        let err = multiply(&a, &b).unwrap_err();
        assert!(err.is_dimension_disagreement());
        assert!(!err.is_dimension_mismatch());
    }

    // Only columns 0..b.num_cols of b take part in the product; rows of a
    // outside its declared shape are carried through.
    #[test]
    fn test_multiply_out_of_bounds_entries() {
        let a = m(1, 2, &[(0, 1, 2), (5, 0, 1)]);
        let b = m(2, 2, &[(1, 0, 4), (1, 7, 9), (0, -1, 3)]);
        assert_eq!(multiply(&a, &b).unwrap(), m(1, 2, &[(0, 0, 8)]));
    }

    #[test]
    fn test_overflow() {
        let a = m(1, 1, &[(0, 0, i64::MAX)]);
        let b = m(1, 1, &[(0, 0, 1)]);
        assert!(matches!(add(&a, &b), Err(Error::Overflow { op: "addition" })));
        assert!(matches!(
            subtract(&m(1, 1, &[(0, 0, i64::MIN)]), &b),
            Err(Error::Overflow { op: "subtraction" })
        ));
        assert!(matches!(
            multiply(&a, &m(1, 1, &[(0, 0, 2)])),
            Err(Error::Overflow { op: "multiplication" })
        ));
    }

    #[test]
    fn test_multiply_accumulator_overflow() {
        let a = m(1, 4, &[(0, 0, i64::MIN), (0, 1, i64::MIN), (0, 2, i64::MIN), (0, 3, i64::MIN)]);
        let b = m(4, 1, &[(0, 0, i64::MIN), (1, 0, i64::MIN), (2, 0, i64::MIN), (3, 0, i64::MIN)]);
        assert!(matches!(
            multiply(&a, &b),
            Err(Error::Overflow { op: "multiplication" })
        ));

        let a = m(1, 2, &[(0, 0, i64::MIN), (0, 1, i64::MIN)]);
        let b = m(2, 1, &[(0, 0, i64::MIN), (1, 0, i64::MIN)]);
        assert!(matches!(
            multiply(&a, &b),
            Err(Error::Overflow { op: "multiplication" })
        ));
    }

    #[test]
    fn test_multiply_partial_sums_may_exceed_i64() {
        let a = m(1, 3, &[(0, 0, i64::MAX), (0, 1, 1), (0, 2, -1)]);
        let b = m(3, 1, &[(0, 0, 1), (1, 0, 1), (2, 0, 1)]);
        assert_eq!(multiply(&a, &b).unwrap(), m(1, 1, &[(0, 0, i64::MAX)]));
    }

    #[test]
    fn test_operation_parse() {
        assert_eq!("1".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!(" Subtract ".parse::<Operation>().unwrap(), Operation::Subtract);
        assert_eq!("multiplication".parse::<Operation>().unwrap(), Operation::Multiply);
        assert_eq!("4".parse::<Operation>().unwrap_err().0, "4");
    }

    #[test]
    fn test_operation_apply() {
        let a = m(2, 2, &[(0, 0, 2), (1, 0, 1)]);
        let b = m(2, 2, &[(0, 0, 3), (0, 1, 1)]);
        assert_eq!(Operation::Add.apply(&a, &b).unwrap(), add(&a, &b).unwrap());
        assert_eq!(Operation::Subtract.apply(&a, &b).unwrap(), subtract(&a, &b).unwrap());
        assert_eq!(Operation::Multiply.apply(&a, &b).unwrap(), multiply(&a, &b).unwrap());
        for (i, op) in Operation::ALL.into_iter().enumerate() {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
            assert_eq!(op.title().parse::<Operation>().unwrap(), op);
            assert_eq!((i + 1).to_string().parse::<Operation>().unwrap(), op);
        }
    }
}
