//! CLI command handlers

pub mod commands;

pub use commands::{
    companies, default_output_path, list_companies, pivot, CompanyPicker, FixedPicker,
    PivotRequest, TerminalPicker,
};
