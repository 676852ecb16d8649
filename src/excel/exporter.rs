//! Excel exporter implementation - output tables → .xlsx

use crate::core::amount::SCALE;
use crate::error::{ArError, ArResult};
use crate::types::{OutputCell, OutputTable};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::debug;

/// Writes output tables as worksheets of one workbook
pub struct ExcelExporter {
    tables: Vec<OutputTable>,
}

impl ExcelExporter {
    /// Create a new Excel exporter; worksheets follow the order of `tables`
    pub fn new(tables: Vec<OutputTable>) -> Self {
        Self { tables }
    }

    /// Export all tables to an Excel .xlsx file, replacing any existing file
    pub fn export(&self, output_path: &Path) -> ArResult<()> {
        let mut workbook = Workbook::new();

        let header_format = Format::new().set_bold();
        let amount_format = Format::new().set_num_format(amount_pattern());

        for table in &self.tables {
            let worksheet = workbook.add_worksheet();
            Self::export_table(worksheet, table, &header_format, &amount_format)?;
        }

        workbook.save(output_path).map_err(|e| {
            ArError::Export(format!(
                "Failed to save Excel file {}: {}",
                output_path.display(),
                e
            ))
        })?;

        debug!(
            file = %output_path.display(),
            sheets = self.tables.len(),
            "workbook saved"
        );
        Ok(())
    }

    /// Export a single table to a worksheet
    fn export_table(
        worksheet: &mut Worksheet,
        table: &OutputTable,
        header_format: &Format,
        amount_format: &Format,
    ) -> ArResult<()> {
        worksheet
            .set_name(&table.name)
            .map_err(|e| ArError::Export(format!("Failed to set worksheet name: {}", e)))?;

        for (col_idx, header) in table.headers.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col_idx as u16, header, header_format)
                .map_err(|e| ArError::Export(format!("Failed to write header: {}", e)))?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let excel_row = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                Self::write_cell(worksheet, excel_row, col_idx as u16, cell, amount_format)?;
            }
        }

        worksheet
            .set_freeze_panes(1, 0)
            .map_err(|e| ArError::Export(format!("Failed to freeze header row: {}", e)))?;
        worksheet.autofit();

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &OutputCell,
        amount_format: &Format,
    ) -> ArResult<()> {
        let written = match cell {
            OutputCell::Empty => return Ok(()),
            OutputCell::Text(value) => worksheet.write_string(row, col, value),
            OutputCell::Number(value) => worksheet.write_number(row, col, *value),
            OutputCell::Bool(value) => worksheet.write_boolean(row, col, *value),
            OutputCell::Amount(amount) => {
                worksheet.write_number_with_format(row, col, amount.to_f64(), amount_format)
            }
        };

        written
            .map(|_| ())
            .map_err(|e| ArError::Export(format!("Failed to write cell ({}, {}): {}", row, col, e)))
    }
}

/// `0.00000` for a scale of five
fn amount_pattern() -> String {
    format!("0.{}", "0".repeat(SCALE as usize))
}
