//! Excel import/export
//!
//! - Import: ledger and directory worksheets → cell grids
//! - Export: output tables → one worksheet each

mod exporter;
mod importer;

pub use exporter::ExcelExporter;
pub use importer::ExcelImporter;
