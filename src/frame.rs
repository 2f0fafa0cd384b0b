use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use ndarray::Array2;
use std::fs::File;
use std::path::Path;

/// Field spellings read as a missing value, compared case-insensitively.
const NULL_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null"];

/// A single table cell. Numeric parsing happens once at read time; anything
/// that is neither a finite number nor a null token stays as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Num(f64),
    Text(String),
}

impl Cell {
    fn parse(raw: &str) -> Cell {
        let trimmed = raw.trim();
        if NULL_TOKENS.contains(&trimmed.to_ascii_lowercase().as_str()) {
            return Cell::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Num(v),
            // "nan"/"inf" parse as floats but carry no usable value.
            Ok(_) => Cell::Null,
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Cell::Num(v) => Some(*v),
            _ => None,
        }
    }
}

/// In-memory table with named columns, stored column-major.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    names: Vec<String>,
    cols: Vec<Vec<Cell>>,
}

impl Frame {
    /// Reads a headed CSV file. Ragged records are a hard error; the `csv`
    /// reader enforces equal field counts per record.
    pub fn read_csv(path: &Path) -> Result<Frame> {
        let file =
            File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let names: Vec<String> = rdr
            .headers()
            .with_context(|| format!("reading header row of {}", path.display()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut cols: Vec<Vec<Cell>> = vec![Vec::new(); names.len()];
        for (idx, record) in rdr.records().enumerate() {
            let record = record
                .with_context(|| format!("parsing record {} of {}", idx + 1, path.display()))?;
            for (c, field) in record.iter().enumerate() {
                cols[c].push(Cell::parse(field));
            }
        }

        Ok(Frame { names, cols })
    }

    pub fn n_rows(&self) -> usize {
        self.cols.first().map_or(0, Vec::len)
    }

    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> Option<&[Cell]> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&self.cols[idx])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Vec<Cell>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(&mut self.cols[idx])
    }

    /// Number of columns whose every cell is null. A zero-row column counts
    /// as fully null, so a headers-only file reports all of its columns.
    pub fn fully_null_column_count(&self) -> usize {
        self.cols
            .iter()
            .filter(|col| col.iter().all(Cell::is_null))
            .count()
    }

    /// Appends `other`'s rows below this frame's. The header sets must be
    /// identical; batch files with diverging schemas stop the run here.
    pub fn append(&mut self, other: Frame) -> Result<()> {
        if self.names.is_empty() {
            *self = other;
            return Ok(());
        }
        if self.names != other.names {
            bail!(
                "column mismatch between batch files: [{}] vs [{}]",
                self.names.join(", "),
                other.names.join(", ")
            );
        }
        for (col, extra) in self.cols.iter_mut().zip(other.cols) {
            col.extend(extra);
        }
        Ok(())
    }

    /// Removes the named columns. Any absent name is an error.
    pub fn drop_columns(&mut self, names: &[String]) -> Result<()> {
        let missing: Vec<&String> = names
            .iter()
            .filter(|n| !self.names.contains(n))
            .collect();
        if !missing.is_empty() {
            bail!(
                "cannot drop absent column(s): {}",
                missing
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        let keep: Vec<usize> = (0..self.names.len())
            .filter(|i| !names.contains(&self.names[*i]))
            .collect();
        self.names = keep.iter().map(|&i| self.names[i].clone()).collect();
        self.cols = keep.iter().map(|&i| std::mem::take(&mut self.cols[i])).collect();
        Ok(())
    }

    /// Removes and returns the named column, or `None` if absent.
    pub fn take_column(&mut self, name: &str) -> Option<Vec<Cell>> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.names.remove(idx);
        Some(self.cols.remove(idx))
    }

    /// Converts to a dense numeric matrix. Any null or text cell is an
    /// error naming the offending column and row.
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        let (n_rows, n_cols) = (self.n_rows(), self.n_cols());
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for r in 0..n_rows {
            for (c, col) in self.cols.iter().enumerate() {
                match col[r].as_num() {
                    Some(v) => data.push(v),
                    None => bail!(
                        "non-numeric value in column {} at row {}",
                        self.names[c],
                        r
                    ),
                }
            }
        }
        Array2::from_shape_vec((n_rows, n_cols), data)
            .context("assembling feature matrix")
    }
}
