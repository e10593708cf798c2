use anyhow::{Context, Result};
use log::info;
use sparse_matrix::{Operation, SparseMatrix};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "sparse-matrix",
    about = "Add, subtract or multiply two sparse matrices"
)]
struct Opt {
    /// First matrix file [default: <input-dir>/matrix1.txt]
    #[structopt(parse(from_os_str))]
    left: Option<PathBuf>,

    /// Second matrix file [default: <input-dir>/matrix2.txt]
    #[structopt(parse(from_os_str))]
    right: Option<PathBuf>,

    /// Directory holding the default input files
    #[structopt(long, default_value = "sample_inputs", parse(from_os_str))]
    input_dir: PathBuf,

    /// Operation to run: 1/add, 2/subtract or 3/multiply. Prompts when omitted
    #[structopt(long)]
    op: Option<Operation>,

    /// Print the result as JSON
    #[structopt(long)]
    json: bool,
}

impl Opt {
    fn input_paths(&self) -> (PathBuf, PathBuf) {
        let left = self
            .left
            .clone()
            .unwrap_or_else(|| self.input_dir.join("matrix1.txt"));
        let right = self
            .right
            .clone()
            .unwrap_or_else(|| self.input_dir.join("matrix2.txt"));
        (left, right)
    }
}

fn load(path: &Path) -> Result<SparseMatrix> {
    let m = SparseMatrix::from_path(path)
        .with_context(|| format!("Failed to load matrix from {}", path.display()))?;
    info!(
        "loaded {} ({}x{}, {} nonzeros)",
        path.display(),
        m.num_rows(),
        m.num_cols(),
        m.nnz()
    );
    Ok(m)
}

/// Asks for an operation on `out` and reads the answer from `input`.
/// Returns `None` when the answer is not a known operation.
fn prompt_operation(input: &mut impl BufRead, out: &mut impl Write) -> Result<Option<Operation>> {
    let menu: Vec<String> = Operation::ALL
        .iter()
        .enumerate()
        .map(|(i, op)| format!("{}. {}", i + 1, op.title()))
        .collect();
    writeln!(out, "Choose operation: {}", menu.join(" "))?;
    out.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("Failed to read operation choice")?;
    Ok(line.parse().ok())
}

fn render(result: &SparseMatrix, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(result).context("Failed to render result as JSON")
    } else {
        Ok(result.to_text())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let (left, right) = opt.input_paths();
    let a = load(&left)?;
    let b = load(&right)?;

    let op = match opt.op {
        Some(op) => op,
        None => match prompt_operation(&mut io::stdin().lock(), &mut io::stdout())? {
            Some(op) => op,
            None => {
                println!("Invalid choice");
                return Ok(());
            }
        },
    };

    let result = op
        .apply(&a, &b)
        .with_context(|| format!("Matrix {} failed", op))?;
    println!("{}", render(&result, opt.json)?);

    Ok(())
}
