//! Company filtering and the salesman join
//!
//! The owner directory is deduplicated by identifier (first occurrence wins)
//! before any lookup, so the join is a left-outer join that can never fan
//! one ledger row out into several.

use crate::config::{
    DIRECTORY_NAME_COLUMN, DIRECTORY_NUMBER_COLUMN, DIRECTORY_SALESMAN_COLUMN,
};
use crate::core::amount::{Amount, NumberParser};
use crate::core::classifier::RowMask;
use crate::core::header::require_columns;
use crate::error::{ArError, ArResult};
use crate::types::{Cell, LedgerRow, LedgerSchema, LedgerTable, OwnerDirectoryEntry, ResolvedRow};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Customer → salesman lookup, unique by identifier
#[derive(Debug, Clone, Default)]
pub struct OwnerDirectory {
    entries: Vec<OwnerDirectoryEntry>,
    by_key: HashMap<String, usize>,
    duplicates_dropped: usize,
}

impl OwnerDirectory {
    /// Build from a directory sheet with `Number`, `Name` and `Salesman` columns
    pub fn from_table(table: &LedgerTable) -> ArResult<Self> {
        let cols = require_columns(
            table,
            &[
                DIRECTORY_NUMBER_COLUMN,
                DIRECTORY_NAME_COLUMN,
                DIRECTORY_SALESMAN_COLUMN,
            ],
            "Customer sheet",
        )?;
        let (number_col, name_col, salesman_col) = (cols[0], cols[1], cols[2]);

        let directory = Self::from_entries((0..table.row_count()).map(|row| {
            (
                table.cell(row, number_col).clone(),
                table.cell(row, name_col).render().unwrap_or_default(),
                table.cell(row, salesman_col).render().unwrap_or_default(),
            )
        }));

        if directory.duplicates_dropped > 0 {
            warn!(
                dropped = directory.duplicates_dropped,
                "duplicate customer numbers in directory; keeping first occurrence"
            );
        }
        debug!(entries = directory.len(), "owner directory loaded");

        Ok(directory)
    }

    /// Deduplicate `(number, name, salesman)` triples, keeping the first per number
    pub fn from_entries<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (Cell, String, String)>,
    {
        let mut directory = Self::default();

        for (number, name, salesman) in rows {
            let key = number.render().unwrap_or_default();
            if directory.by_key.contains_key(&key) {
                directory.duplicates_dropped += 1;
                continue;
            }

            directory.by_key.insert(key.clone(), directory.entries.len());
            directory.entries.push(OwnerDirectoryEntry {
                number,
                key,
                name,
                salesman,
            });
        }

        directory
    }

    /// Deduplicated entries, first-occurrence order
    pub fn entries(&self) -> &[OwnerDirectoryEntry] {
        &self.entries
    }

    pub fn lookup(&self, key: &str) -> Option<&OwnerDirectoryEntry> {
        self.by_key.get(key).map(|idx| &self.entries[*idx])
    }

    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Data rows of one company with buckets normalized to [`Amount`]
///
/// `company` is compared against the trimmed company cell. An empty result
/// is an error: a chosen company must contribute at least one row.
pub fn select_company_rows(
    table: &LedgerTable,
    schema: &LedgerSchema,
    mask: &RowMask,
    parser: &NumberParser,
    company: &str,
) -> ArResult<Vec<LedgerRow>> {
    let wanted = company.trim();

    let rows: Vec<LedgerRow> = mask
        .data_rows()
        .filter(|row| table.cell(*row, schema.company).render().as_deref() == Some(wanted))
        .map(|row| LedgerRow {
            index: row,
            customer_id: table
                .cell(row, schema.customer_id)
                .render()
                .unwrap_or_default(),
            company: wanted.to_string(),
            buckets: std::array::from_fn(|b| {
                Amount::from_cell(table.cell(row, schema.buckets[b]), parser)
            }),
        })
        .collect();

    if rows.is_empty() {
        return Err(ArError::NoRecordsForCompany(wanted.to_string()));
    }

    debug!(company = wanted, rows = rows.len(), "company rows selected");
    Ok(rows)
}

/// Assigns an owner to every ledger row
pub struct SalesmanResolver<'a> {
    directory: &'a OwnerDirectory,
    unassigned: &'a str,
}

impl<'a> SalesmanResolver<'a> {
    pub fn new(directory: &'a OwnerDirectory, unassigned: &'a str) -> Self {
        Self {
            directory,
            unassigned,
        }
    }

    /// Owner for a customer key; unknown customers and blank salesmen get the sentinel
    pub fn owner_of(&self, customer_id: &str) -> &str {
        self.directory
            .lookup(customer_id)
            .map(|entry| entry.salesman.as_str())
            .filter(|salesman| !salesman.is_empty())
            .unwrap_or(self.unassigned)
    }

    /// Left-outer join: one output row per input row, in input order
    pub fn resolve(&self, rows: Vec<LedgerRow>) -> Vec<ResolvedRow> {
        rows.into_iter()
            .map(|row| {
                let owner = self.owner_of(&row.customer_id).to_string();
                ResolvedRow { row, owner }
            })
            .collect()
    }
}
