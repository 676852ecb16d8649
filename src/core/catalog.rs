//! Selectable company names

use crate::config::ALL_COMPANIES;
use crate::core::classifier::RowMask;
use crate::error::{ArError, ArResult};
use crate::types::{LedgerSchema, LedgerTable};
use std::collections::BTreeSet;
use tracing::debug;

/// Distinct, trimmed, sorted company names drawn from data rows only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyCatalog {
    companies: Vec<String>,
}

impl CompanyCatalog {
    /// Build from the data rows flagged in `mask`
    ///
    /// Fails with [`ArError::EmptyCatalog`] when no data row names a company.
    pub fn from_rows(
        table: &LedgerTable,
        schema: &LedgerSchema,
        mask: &RowMask,
    ) -> ArResult<Self> {
        let catalog = Self::from_names(
            mask.data_rows()
                .filter_map(|row| table.cell(row, schema.company).render()),
        );

        if catalog.is_empty() {
            return Err(ArError::EmptyCatalog);
        }

        debug!(companies = catalog.len(), "company catalog built");
        Ok(catalog)
    }

    /// Normalize arbitrary names the same way data rows are
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let companies: BTreeSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty() && !is_aggregate(name))
            .collect();

        Self {
            companies: companies.into_iter().collect(),
        }
    }

    pub fn companies(&self) -> &[String] {
        &self.companies
    }

    /// Exact, case-sensitive membership
    pub fn contains(&self, name: &str) -> bool {
        self.companies.binary_search_by(|c| c.as_str().cmp(name)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

/// The reserved summary pseudo-company, in any case
pub fn is_aggregate(name: &str) -> bool {
    name.trim().to_lowercase() == ALL_COMPANIES.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amount::NumberParser;
    use crate::core::header::{resolve_schema, table_with_header_at};
    use crate::types::Cell;

    fn ledger(rows: &[(&str, &str, Option<f64>)]) -> (LedgerTable, LedgerSchema, RowMask) {
        let mut grid = vec![[
            "Customer ID", "Company", "Current", "1-30", "31-60", "61-90", "91-365", "366-730",
            "731+",
        ]
        .iter()
        .map(|s| Cell::from(*s))
        .collect::<Vec<_>>()];

        for (id, company, current) in rows {
            let mut cells = vec![Cell::from(*id), Cell::from(*company)];
            cells.push(current.map(Cell::Number).unwrap_or(Cell::Empty));
            grid.push(cells);
        }

        let table = table_with_header_at(grid, 0);
        let schema = resolve_schema(&table).unwrap();
        let mask = RowMask::classify(&table, &schema, &NumberParser::new().unwrap());
        (table, schema, mask)
    }

    #[test]
    fn test_catalog_trims_dedups_and_sorts() {
        let (table, schema, mask) = ledger(&[
            ("C1", "  Zeta Ltd ", Some(1.0)),
            ("C2", "Acme Co", Some(2.0)),
            ("C3", "Zeta Ltd", Some(3.0)),
            ("C4", "acme co", Some(4.0)),
        ]);
        let catalog = CompanyCatalog::from_rows(&table, &schema, &mask).unwrap();
        assert_eq!(catalog.companies(), &["Acme Co", "Zeta Ltd", "acme co"]);
        assert!(catalog.contains("Zeta Ltd"));
        assert!(!catalog.contains("zeta ltd"));
    }

    #[test]
    fn test_catalog_excludes_aggregate_in_any_case() {
        let (table, schema, mask) = ledger(&[
            ("C1", "All Companies", Some(1.0)),
            ("C2", "ALL COMPANIES", Some(1.0)),
            ("C3", " all companies ", Some(1.0)),
            ("C4", "Acme Co", Some(1.0)),
        ]);
        let catalog = CompanyCatalog::from_rows(&table, &schema, &mask).unwrap();
        assert_eq!(catalog.companies(), &["Acme Co"]);
    }

    #[test]
    fn test_is_aggregate_folds_case_like_search() {
        assert!(is_aggregate("aLL cOMPANIES"));
        assert!(is_aggregate("\tAll Companies "));
        assert!(!is_aggregate("All Companies Ltd"));
        assert!(!is_aggregate("AllCompanies"));
    }

    #[test]
    fn test_catalog_ignores_non_data_rows() {
        let (table, schema, mask) = ledger(&[
            ("C1", "Ghost Corp", None),
            ("", "Blank Id Inc", Some(5.0)),
            ("C2", "Acme Co", Some(1.0)),
            ("C3", "   ", Some(1.0)),
        ]);
        let catalog = CompanyCatalog::from_rows(&table, &schema, &mask).unwrap();
        assert_eq!(catalog.companies(), &["Acme Co"]);
    }

    #[test]
    fn test_empty_catalog_is_an_error() {
        let (table, schema, mask) = ledger(&[("C1", "All Companies", Some(1.0))]);
        assert!(matches!(
            CompanyCatalog::from_rows(&table, &schema, &mask),
            Err(ArError::EmptyCatalog)
        ));
    }
}
