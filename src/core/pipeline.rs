//! End-to-end pivot pipeline
//!
//! Header → classification → catalog happen once when the ledger is
//! prepared; the company-specific join and aggregation run per report.

use crate::config::{
    PivotConfig, BUCKETS, DIRECTORY_NAME_COLUMN, DIRECTORY_NUMBER_COLUMN,
    DIRECTORY_SALESMAN_COLUMN, DIRECTORY_SHEET, PIVOT_SHEET, RAW_SHEET, TOTAL_COLUMN,
};
use crate::core::aggregator::aggregate;
use crate::core::amount::NumberParser;
use crate::core::catalog::CompanyCatalog;
use crate::core::classifier::RowMask;
use crate::core::header::{locate_header, resolve_schema, table_with_header_at};
use crate::core::resolver::{select_company_rows, OwnerDirectory, SalesmanResolver};
use crate::error::{ArError, ArResult};
use crate::types::{
    Grid, LedgerSchema, LedgerTable, OutputCell, OutputTable, PivotReport, PivotRow, ResolvedRow,
};
use tracing::info;

/// A validated ledger with its data-row mask and company catalog
pub struct PreparedLedger {
    table: LedgerTable,
    schema: LedgerSchema,
    mask: RowMask,
    catalog: CompanyCatalog,
    parser: NumberParser,
    header_row: usize,
}

impl PreparedLedger {
    /// Resolve the header, validate columns, classify rows, build the catalog
    pub fn from_grid(grid: Grid) -> ArResult<Self> {
        let header_row = locate_header(&grid);
        let table = table_with_header_at(grid, header_row);
        let schema = resolve_schema(&table)?;

        let parser = NumberParser::new()?;
        let mask = RowMask::classify(&table, &schema, &parser);
        let catalog = CompanyCatalog::from_rows(&table, &schema, &mask)?;

        info!(
            header_row,
            rows = table.row_count(),
            data_rows = mask.data_count(),
            companies = catalog.len(),
            "ledger prepared"
        );

        Ok(Self {
            table,
            schema,
            mask,
            catalog,
            parser,
            header_row,
        })
    }

    pub fn catalog(&self) -> &CompanyCatalog {
        &self.catalog
    }

    pub fn table(&self) -> &LedgerTable {
        &self.table
    }

    /// Zero-based row of the grid used as header
    pub fn header_row(&self) -> usize {
        self.header_row
    }

    pub fn data_row_count(&self) -> usize {
        self.mask.data_count()
    }

    /// Filter to `company`, join owners, and aggregate
    pub fn build_report(
        &self,
        company: &str,
        directory: &OwnerDirectory,
        config: &PivotConfig,
    ) -> ArResult<PivotReport> {
        if !self.catalog.contains(company) {
            return Err(ArError::UnknownCompany(company.to_string()));
        }

        let rows = select_company_rows(
            &self.table,
            &self.schema,
            &self.mask,
            &self.parser,
            company,
        )?;

        let resolver = SalesmanResolver::new(directory, &config.unassigned_label);
        let resolved = resolver.resolve(rows);
        let unassigned_rows = resolved
            .iter()
            .filter(|r| r.owner == config.unassigned_label)
            .count();

        let pivot = aggregate(&resolved)?;
        let raw = self.raw_table(&resolved);

        info!(
            company,
            rows = resolved.len(),
            owners = pivot.len(),
            unassigned_rows,
            "report built"
        );

        Ok(PivotReport {
            company: company.to_string(),
            pivot,
            directory: directory.entries().to_vec(),
            raw,
            row_count: resolved.len(),
            unassigned_rows,
        })
    }

    /// Original columns with normalized buckets and the owner column
    fn raw_table(&self, resolved: &[ResolvedRow]) -> OutputTable {
        let mut headers = self.table.headers.clone();
        let salesman_col = match headers.iter().position(|h| h == DIRECTORY_SALESMAN_COLUMN) {
            Some(idx) => idx,
            None => {
                headers.push(DIRECTORY_SALESMAN_COLUMN.to_string());
                headers.len() - 1
            }
        };

        let mut table = OutputTable::new(RAW_SHEET, headers);
        for item in resolved {
            let mut cells: Vec<OutputCell> = self.table.rows[item.row.index]
                .iter()
                .map(OutputCell::from)
                .collect();
            cells.resize(table.headers.len(), OutputCell::Empty);

            for (col, amount) in self.schema.buckets.iter().zip(item.row.buckets.iter()) {
                cells[*col] = OutputCell::Amount(*amount);
            }
            cells[salesman_col] = OutputCell::Text(item.owner.clone());

            table.push_row(cells);
        }

        table
    }
}

impl PivotReport {
    /// The `Pivot`, `Default Sales` and `Raw` tables, in that order
    pub fn tables(&self) -> Vec<OutputTable> {
        vec![
            pivot_table(&self.pivot),
            directory_table(self),
            self.raw.clone(),
        ]
    }
}

fn pivot_table(pivot: &[PivotRow]) -> OutputTable {
    let mut headers = vec![DIRECTORY_SALESMAN_COLUMN.to_string()];
    headers.extend(BUCKETS.iter().map(|b| b.to_string()));
    headers.push(TOTAL_COLUMN.to_string());

    let mut table = OutputTable::new(PIVOT_SHEET, headers);
    for row in pivot {
        let mut cells = vec![OutputCell::Text(row.owner.clone())];
        cells.extend(row.buckets.iter().map(|a| OutputCell::Amount(*a)));
        cells.push(OutputCell::Amount(row.total));
        table.push_row(cells);
    }
    table
}

fn directory_table(report: &PivotReport) -> OutputTable {
    let mut table = OutputTable::new(
        DIRECTORY_SHEET,
        vec![
            DIRECTORY_NUMBER_COLUMN.to_string(),
            DIRECTORY_NAME_COLUMN.to_string(),
            DIRECTORY_SALESMAN_COLUMN.to_string(),
        ],
    );
    for entry in &report.directory {
        table.push_row(vec![
            OutputCell::from(&entry.number),
            OutputCell::Text(entry.name.clone()),
            OutputCell::Text(entry.salesman.clone()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Cell {
        Cell::from(s)
    }

    fn ledger_grid() -> Grid {
        let mut header = vec![text("Customer ID"), text("Customer Name"), text("Company")];
        header.extend(BUCKETS.iter().map(|b| text(b)));

        let data = |id: i64, name: &str, company: &str, current: f64, late: f64| {
            let mut row = vec![Cell::Int(id), text(name), text(company), Cell::Number(current)];
            row.extend([Cell::Number(late), Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty]);
            row.push(Cell::Empty);
            row
        };

        vec![
            vec![text("Aged Receivables by Company")],
            vec![text("Run date: 2024-06-30")],
            header,
            vec![text("Acme Co")],
            data(1, "Alpha", "Acme Co", 0.1, 1.0),
            data(2, "Beta", "Acme Co", 0.2, 2.0),
            data(99, "Orphan", "Acme Co", 0.3, 0.0),
            data(3, "Gamma", "Bolt Ltd", 50.0, 0.0),
            vec![Cell::Empty, Cell::Empty, text("All Companies"), Cell::Number(50.6)],
        ]
    }

    fn directory() -> OwnerDirectory {
        OwnerDirectory::from_entries(vec![
            (Cell::Int(1), "Alpha".to_string(), "Smith".to_string()),
            (Cell::Int(2), "Beta".to_string(), "Jones".to_string()),
            (Cell::Int(1), "Alpha again".to_string(), "Jones".to_string()),
            (Cell::Int(3), "Gamma".to_string(), "Lee".to_string()),
        ])
    }

    #[test]
    fn test_prepare_finds_header_and_catalog() {
        let ledger = PreparedLedger::from_grid(ledger_grid()).unwrap();
        assert_eq!(ledger.header_row(), 2);
        assert_eq!(ledger.data_row_count(), 4);
        assert_eq!(ledger.catalog().companies(), &["Acme Co", "Bolt Ltd"]);
    }

    #[test]
    fn test_report_for_company() {
        let ledger = PreparedLedger::from_grid(ledger_grid()).unwrap();
        let report = ledger
            .build_report("Acme Co", &directory(), &PivotConfig::default())
            .unwrap();

        assert_eq!(report.row_count, 3);
        assert_eq!(report.unassigned_rows, 1);

        let summary: Vec<(String, String, String, String)> = report
            .pivot
            .iter()
            .map(|p| {
                (
                    p.owner.clone(),
                    p.buckets[0].to_string(),
                    p.buckets[1].to_string(),
                    p.total.to_string(),
                )
            })
            .collect();
        let expected: Vec<(String, String, String, String)> = [
            ("Jones", "0.20000", "2.00000", "2.20000"),
            ("Smith", "0.10000", "1.00000", "1.10000"),
            ("Unassigned", "0.30000", "0.00000", "0.30000"),
        ]
        .iter()
        .map(|(a, b, c, d)| (a.to_string(), b.to_string(), c.to_string(), d.to_string()))
        .collect();
        assert_eq!(summary, expected);
    }

    #[test]
    fn test_report_tables() {
        let ledger = PreparedLedger::from_grid(ledger_grid()).unwrap();
        let report = ledger
            .build_report("Acme Co", &directory(), &PivotConfig::default())
            .unwrap();
        let tables = report.tables();

        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Pivot", "Default Sales", "Raw"]);

        let pivot = &tables[0];
        assert_eq!(pivot.headers.first().map(String::as_str), Some("Salesman"));
        assert_eq!(pivot.headers.last().map(String::as_str), Some("Total"));
        assert_eq!(pivot.rows.len(), 3);

        let directory = &tables[1];
        assert_eq!(directory.rows.len(), 3, "duplicate number 1 dropped");
        assert_eq!(directory.rows[0][2], OutputCell::Text("Smith".to_string()));

        let raw = &tables[2];
        assert_eq!(raw.headers.len(), 11);
        assert_eq!(raw.headers[10], "Salesman");
        assert_eq!(raw.rows.len(), 3);
        assert_eq!(raw.rows[0][1], OutputCell::Text("Alpha".to_string()));
        assert!(matches!(raw.rows[0][3], OutputCell::Amount(a) if a.to_string() == "0.10000"));
        assert!(matches!(raw.rows[0][5], OutputCell::Amount(a) if a.is_zero()));
        assert_eq!(raw.rows[2][10], OutputCell::Text("Unassigned".to_string()));
    }

    #[test]
    fn test_unknown_company_rejected_before_join() {
        let ledger = PreparedLedger::from_grid(ledger_grid()).unwrap();
        let result = ledger.build_report("All Companies", &directory(), &PivotConfig::default());
        assert!(matches!(result, Err(ArError::UnknownCompany(_))));
    }

    #[test]
    fn test_missing_columns_fail_preparation() {
        let grid = vec![vec![text("Customer ID"), text("Company"), text("Current")]];
        assert!(matches!(
            PreparedLedger::from_grid(grid),
            Err(ArError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let run = || {
            let ledger = PreparedLedger::from_grid(ledger_grid()).unwrap();
            ledger
                .build_report("Acme Co", &directory(), &PivotConfig::default())
                .unwrap()
                .tables()
        };
        assert_eq!(run(), run());
    }
}
