//! Header row detection and column resolution
//!
//! Exported ledgers often carry report titles and filter notes above the
//! real column header. The header is the first row mentioning both a
//! customer column and the `Current` bucket.

use crate::config::{BUCKETS, COMPANY_TOKEN, CUSTOMER_ID_COLUMN};
use crate::error::{ArError, ArResult};
use crate::types::{Cell, Grid, LedgerSchema, LedgerTable};
use std::collections::HashMap;
use tracing::{debug, warn};

const CUSTOMER_TOKEN: &str = "customer";
const CURRENT_TOKEN: &str = "current";

/// Index of the true header row in a headerless grid
///
/// Falls back to row 0 when no row qualifies; column validation then
/// reports what is actually wrong with the sheet.
pub fn locate_header(grid: &Grid) -> usize {
    for (index, row) in grid.iter().enumerate() {
        if is_header_row(row) {
            debug!(row = index, "header row located");
            return index;
        }
    }

    warn!("no row mentions both 'Customer' and 'Current'; assuming row 0 is the header");
    0
}

fn is_header_row(row: &[Cell]) -> bool {
    let mut has_customer = false;
    let mut has_current = false;

    for text in row.iter().filter_map(Cell::render) {
        let lowered = text.to_lowercase();
        has_customer |= lowered.contains(CUSTOMER_TOKEN);
        has_current |= lowered.contains(CURRENT_TOKEN);
        if has_customer && has_current {
            return true;
        }
    }

    false
}

/// Use `header_row` as column labels and every later row as data
pub fn table_with_header_at(grid: Grid, header_row: usize) -> LedgerTable {
    let mut rows = grid.into_iter().skip(header_row);
    let header = rows.next().unwrap_or_default();
    let body: Vec<Vec<Cell>> = rows.collect();

    let width = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let headers = label_columns(&header, width);
    let rows = body
        .into_iter()
        .map(|mut row| {
            row.resize(width, Cell::Empty);
            row
        })
        .collect();

    LedgerTable { headers, rows }
}

/// Trimmed labels; blanks become `col_<n>`, repeats get a `.<n>` suffix
fn label_columns(header: &[Cell], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::with_capacity(width);

    for col in 0..width {
        let base = header
            .get(col)
            .and_then(Cell::render)
            .unwrap_or_else(|| format!("col_{}", col));

        let count = seen.entry(base.clone()).or_insert(0);
        let label = if *count == 0 {
            base
        } else {
            format!("{}.{}", base, count)
        };
        *count += 1;
        labels.push(label);
    }

    labels
}

/// Position of each named column, or one error naming every missing column
pub fn require_columns(
    table: &LedgerTable,
    names: &[&str],
    table_label: &str,
) -> ArResult<Vec<usize>> {
    let mut found = Vec::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        match table.column_index(name) {
            Some(idx) => found.push(idx),
            None => missing.push((*name).to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(ArError::MissingColumns {
            table: table_label.to_string(),
            missing,
        });
    }

    Ok(found)
}

/// The company column: an exact (case-insensitive) `company` label, else
/// the only label containing `company`
pub fn find_company_column(headers: &[String]) -> ArResult<usize> {
    if let Some(idx) = headers
        .iter()
        .position(|h| h.trim().to_lowercase() == COMPANY_TOKEN)
    {
        return Ok(idx);
    }

    let candidates: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.to_lowercase().contains(COMPANY_TOKEN))
        .map(|(idx, _)| idx)
        .collect();

    match candidates.as_slice() {
        [idx] => Ok(*idx),
        [] => Err(ArError::NoCompanyColumn(
            "no column is named or contains 'Company'".to_string(),
        )),
        _ => Err(ArError::NoCompanyColumn(format!(
            "several columns contain 'Company': {}",
            candidates
                .iter()
                .map(|idx| headers[*idx].as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Validate the ledger columns and record where each field lives
pub fn resolve_schema(table: &LedgerTable) -> ArResult<LedgerSchema> {
    let mut required = vec![CUSTOMER_ID_COLUMN];
    required.extend(BUCKETS);
    let found = require_columns(table, &required, "Raw sheet")?;

    let company = find_company_column(&table.headers)?;

    let mut buckets = [0usize; 7];
    buckets.copy_from_slice(&found[1..]);

    Ok(LedgerSchema {
        customer_id: found[0],
        company,
        buckets,
    })
}
