//! AR Pivot - aged-receivables pivot by salesman
//!
//! Reads an aged-receivables ledger exported from an accounting system,
//! isolates one company's rows, joins each customer to its salesman and
//! sums the seven aging buckets per salesman with exact 5-digit decimals.
//!
//! # Features
//!
//! - Header detection below free-form title rows
//! - Data-row classification (titles, totals and blanks are skipped)
//! - Ranked, debounced company search for interactive selection
//! - Fixed-point aggregation with round-half-up at 5 fractional digits
//! - Excel import/export (`Pivot`, `Default Sales`, `Raw` sheets)
//!
//! # Example
//!
//! ```no_run
//! use ar_pivot::config::PivotConfig;
//! use ar_pivot::core::{OwnerDirectory, PreparedLedger};
//! use ar_pivot::excel::{ExcelExporter, ExcelImporter};
//! use std::path::Path;
//!
//! let config = PivotConfig::default();
//! let grid = ExcelImporter::new("ledger.xlsx").read_grid(&config.raw_sheet)?;
//! let ledger = PreparedLedger::from_grid(grid)?;
//!
//! let table = ExcelImporter::new("customers.xlsx").read_table(&config.directory_sheet)?;
//! let directory = OwnerDirectory::from_table(&table)?;
//!
//! let report = ledger.build_report("Acme Co", &directory, &config)?;
//! ExcelExporter::new(report.tables()).export(Path::new("pivot.xlsx"))?;
//! # Ok::<(), ar_pivot::error::ArError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;

// Re-export commonly used types
pub use error::{ArError, ArResult};
pub use types::{Cell, LedgerTable, OutputTable, PivotReport, PivotRow, RunOutcome, RunSummary};
