use crate::config::BUCKETS;
use crate::core::Amount;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

//==============================================================================
// Raw Cells
//==============================================================================

/// A single spreadsheet value, independent of the reader that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Int(i64),
    Bool(bool),
}

impl Cell {
    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form of the cell, `None` when blank
    ///
    /// Integral floats render without a fraction (`1.0` → `"1"`), so a
    /// numeric identifier and its text spelling compare equal.
    pub fn render(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::Number(f) => Some(f.to_string()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Number(f)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Positional rows with no header assumption
pub type Grid = Vec<Vec<Cell>>;

//==============================================================================
// Ledger
//==============================================================================

/// A ledger whose header row has been resolved
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTable {
    pub headers: Vec<String>,
    /// Every row is padded to `headers.len()`
    pub rows: Vec<Vec<Cell>>,
}

impl LedgerTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Column positions of the fields the pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSchema {
    pub customer_id: usize,
    pub company: usize,
    /// Indexed like [`BUCKETS`]
    pub buckets: [usize; 7],
}

/// One classified data row
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    /// Position in [`LedgerTable::rows`]
    pub index: usize,
    /// Canonical identifier key (see [`Cell::render`])
    pub customer_id: String,
    /// Trimmed company name
    pub company: String,
    pub buckets: [Amount; 7],
}

/// A data row after the owner join
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRow {
    pub row: LedgerRow,
    pub owner: String,
}

//==============================================================================
// Owner Directory
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OwnerDirectoryEntry {
    /// Identifier exactly as read, for output
    pub number: Cell,
    /// Canonical identifier key; empty when the cell was blank
    pub key: String,
    pub name: String,
    pub salesman: String,
}

//==============================================================================
// Pivot Output
//==============================================================================

/// Aging-bucket totals for one owner
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub owner: String,
    pub buckets: [Amount; 7],
    pub total: Amount,
}

impl Serialize for PivotRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(BUCKETS.len() + 2))?;
        map.serialize_entry("Salesman", &self.owner)?;
        for (name, amount) in BUCKETS.iter().zip(self.buckets.iter()) {
            map.serialize_entry(name, amount)?;
        }
        map.serialize_entry("Total", &self.total)?;
        map.end()
    }
}

/// A value in a table handed to the exporter
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Amount(Amount),
}

impl From<&Cell> for OutputCell {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Empty => OutputCell::Empty,
            Cell::Text(s) => OutputCell::Text(s.clone()),
            Cell::Number(f) => OutputCell::Number(*f),
            Cell::Int(i) => OutputCell::Number(*i as f64),
            Cell::Bool(b) => OutputCell::Bool(*b),
        }
    }
}

/// A named table, one worksheet in the output workbook
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<OutputCell>>,
}

impl OutputTable {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<OutputCell>) {
        self.rows.push(row);
    }
}

/// Everything one run produces for the chosen company
#[derive(Debug, Clone)]
pub struct PivotReport {
    pub company: String,
    pub pivot: Vec<PivotRow>,
    /// Deduplicated directory, first occurrence order
    pub directory: Vec<OwnerDirectoryEntry>,
    /// Filtered, owner-resolved, bucket-normalized rows
    pub raw: OutputTable,
    pub row_count: usize,
    pub unassigned_rows: usize,
}

//==============================================================================
// Run Outcome
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub company: String,
    pub output: PathBuf,
    pub rows: usize,
    pub owners: usize,
    pub unassigned_rows: usize,
}

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The operator backed out; nothing was written
    Cancelled,
}
