//! Coordinate-list text format
//!
//! ```text
//! rows=3
//! cols=3
//! (0, 0, 5)
//! (2, 1, -1)
//! ```
//!
//! Two dimension headers followed by one `(row, col, value)` tuple per line.
//! Blank lines are ignored. Zero values are accepted and store nothing.

use log::debug;

use crate::error::{Error, Result};
use crate::matrix::SparseMatrix;

pub(crate) fn parse(text: &str) -> Result<SparseMatrix> {
    let end = text.lines().count() + 1;
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    let rows = parse_header(&mut lines, "rows", end)?;
    let cols = parse_header(&mut lines, "cols", end)?;

    let mut matrix = SparseMatrix::new(rows, cols);
    for (line, content) in lines {
        if content.is_empty() {
            continue;
        }
        let (row, col, value) = parse_entry(line, content)?;
        matrix.set_element(row, col, value);
    }

    debug!(
        "parsed {}x{} matrix with {} nonzero elements",
        rows,
        cols,
        matrix.nnz()
    );
    Ok(matrix)
}

fn parse_header<'a, I>(lines: &mut I, key: &str, end: usize) -> Result<u32>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let (line, content) = lines
        .find(|(_, l)| !l.is_empty())
        .ok_or_else(|| Error::format(end, format!("missing `{}=` line", key)))?;

    let value = content
        .split_once('=')
        .filter(|(k, _)| k.trim_end() == key)
        .map(|(_, v)| v.trim())
        .ok_or_else(|| Error::format(line, format!("expected `{}=<integer>`", key)))?;

    value
        .parse()
        .map_err(|_| Error::format(line, format!("`{}` is not a valid {} count", value, key)))
}

fn parse_entry(line: usize, content: &str) -> Result<(i64, i64, i64)> {
    let inner = content
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| Error::format(line, "entry must be wrapped in parentheses"))?;

    let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
    if fields.len() != 3 {
        return Err(Error::format(
            line,
            format!("expected 3 comma-separated fields, found {}", fields.len()),
        ));
    }

    let int = |s: &str| {
        s.parse::<i64>()
            .map_err(|_| Error::format(line, format!("`{}` is not an integer", s)))
    };
    Ok((int(fields[0])?, int(fields[1])?, int(fields[2])?))
}

pub(crate) fn render(matrix: &SparseMatrix) -> String {
    let mut out = format!("rows={}\ncols={}\n", matrix.num_rows(), matrix.num_cols());
    for e in matrix.entries() {
        out.push_str(&format!("{}\n", e));
    }
    out
}
