//! Excel importer implementation - Excel (.xlsx) → cell grids

use crate::core::header::table_with_header_at;
use crate::error::{ArError, ArResult};
use crate::types::{Cell, Grid, LedgerTable};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads worksheets of one .xlsx file
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn open(&self) -> ArResult<Xlsx<BufReader<File>>> {
        open_workbook(&self.path).map_err(|e| {
            ArError::Import(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    pub fn sheet_names(&self) -> ArResult<Vec<String>> {
        Ok(self.open()?.sheet_names().to_vec())
    }

    /// Read a sheet as positional rows anchored at A1, with no header assumption
    ///
    /// Row and column indexes of the grid match the sheet's own positions.
    pub fn read_grid(&self, sheet_name: &str) -> ArResult<Grid> {
        let range = self.sheet_range(sheet_name)?;
        let grid = Self::anchored_grid(&range);
        debug!(
            file = %self.path.display(),
            sheet = sheet_name,
            rows = grid.len(),
            first_used = ?range.start(),
            "sheet read"
        );
        Ok(grid)
    }

    /// Read a sheet whose first used row is the header
    pub fn read_table(&self, sheet_name: &str) -> ArResult<LedgerTable> {
        let range = self.sheet_range(sheet_name)?;
        Ok(table_with_header_at(Self::range_to_grid(&range), 0))
    }

    fn sheet_range(&self, sheet_name: &str) -> ArResult<Range<Data>> {
        let mut workbook = self.open()?;

        let available = workbook.sheet_names().to_vec();
        if !available.iter().any(|name| name == sheet_name) {
            return Err(ArError::SheetNotFound {
                sheet: sheet_name.to_string(),
                available,
            });
        }

        workbook
            .worksheet_range(sheet_name)
            .map_err(|e| ArError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e)))
    }

    /// Rows of the used range, preceded by the blank rows and columns above
    /// and left of it
    fn anchored_grid(range: &Range<Data>) -> Grid {
        let Some((top, left)) = range.start() else {
            return Vec::new();
        };

        let mut grid: Grid = vec![Vec::new(); top as usize];
        grid.extend(range.rows().map(|row| {
            let mut cells = vec![Cell::Empty; left as usize];
            cells.extend(row.iter().map(Self::convert_cell));
            cells
        }));
        grid
    }

    /// Rows of the used range; cells before the first used row/column are dropped
    fn range_to_grid(range: &Range<Data>) -> Grid {
        if range.is_empty() {
            return Vec::new();
        }

        range
            .rows()
            .map(|row| row.iter().map(Self::convert_cell).collect())
            .collect()
    }

    /// Convert one calamine cell; error cells (`#N/A`, ...) read as empty
    fn convert_cell(cell: &Data) -> Cell {
        match cell {
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Int(*i),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => Cell::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
            _ => Cell::Empty,
        }
    }
}
