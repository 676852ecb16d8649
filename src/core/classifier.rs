//! Data-row classification
//!
//! A row is ledger data iff it has a customer identifier and at least one
//! numeric aging bucket. Titles, subtotals and blank separators fail one of
//! the two tests. The resulting mask is the single source of truth for both
//! the company catalog and the per-company filter.

use crate::core::amount::NumberParser;
use crate::types::{LedgerSchema, LedgerTable};
use tracing::debug;

/// Per-row data/non-data flags for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMask {
    flags: Vec<bool>,
}

impl RowMask {
    /// Evaluate the data-row predicate for every row of `table`
    pub fn classify(table: &LedgerTable, schema: &LedgerSchema, parser: &NumberParser) -> Self {
        let flags: Vec<bool> = (0..table.row_count())
            .map(|row| is_data_row(table, schema, parser, row))
            .collect();

        debug!(
            rows = flags.len(),
            data_rows = flags.iter().filter(|f| **f).count(),
            "rows classified"
        );

        Self { flags }
    }

    pub fn is_data(&self, row: usize) -> bool {
        self.flags.get(row).copied().unwrap_or(false)
    }

    /// Indices of data rows, ascending
    pub fn data_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag)
            .map(|(idx, _)| idx)
    }

    pub fn data_count(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// The data-row predicate for a single row
pub fn is_data_row(
    table: &LedgerTable,
    schema: &LedgerSchema,
    parser: &NumberParser,
    row: usize,
) -> bool {
    if table.cell(row, schema.customer_id).is_blank() {
        return false;
    }

    schema
        .buckets
        .iter()
        .any(|col| parser.is_numeric(table.cell(row, *col)))
}
