//! Workbook fixtures shared by the integration tests

#![allow(dead_code)]

use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A fixture cell
#[derive(Clone, Copy)]
pub enum V {
    S(&'static str),
    N(f64),
    Blank,
}

pub const BUCKET_HEADERS: [&str; 7] = [
    "Current", "1-30", "31-60", "61-90", "91-365", "366-730", "731+",
];

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<V>]) {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            match value {
                V::S(s) => {
                    worksheet.write_string(r as u32, c as u16, *s).unwrap();
                }
                V::N(n) => {
                    worksheet.write_number(r as u32, c as u16, *n).unwrap();
                }
                V::Blank => {}
            }
        }
    }
}

/// Save one workbook with the given `(sheet, rows)` pairs
pub fn write_workbook(path: &Path, sheets: &[(&str, Vec<Vec<V>>)]) {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        write_rows(worksheet, rows);
    }
    workbook.save(path).unwrap();
}

pub fn ledger_header() -> Vec<V> {
    let mut header = vec![V::S("Customer ID"), V::S("Customer Name"), V::S("Company")];
    header.extend(BUCKET_HEADERS.into_iter().map(V::S));
    header
}

pub fn entry(id: V, name: &'static str, company: &'static str, buckets: [V; 7]) -> Vec<V> {
    let mut row = vec![id, V::S(name), V::S(company)];
    row.extend(buckets);
    row
}

pub const B: V = V::Blank;

/// Aged-receivables export: title rows, a blank line, header on row 3,
/// a section title, data rows, a non-data note, and an aggregate total row
pub fn ledger_rows() -> Vec<Vec<V>> {
    vec![
        vec![V::S("Aged Receivables by Company")],
        vec![V::S("As of 2024-06-30")],
        vec![],
        ledger_header(),
        vec![V::Blank, V::Blank, V::S("Acme Co")],
        entry(V::N(1001.0), "Alpha", "Acme Co", [V::N(0.1), V::N(10.000005), B, B, B, B, B]),
        entry(V::N(1002.0), "Beta", "Acme Co", [V::N(0.2), B, B, B, B, B, V::S("1,000.50")]),
        entry(V::N(1003.0), "Gamma", "Acme Co", [V::N(0.3), B, B, B, B, B, B]),
        entry(V::S("C-9"), "Walk-in", " Acme Co ", [V::N(1.5), B, B, B, B, B, B]),
        entry(V::S("Note"), "unaudited", "Acme Co", [V::S("n/a"), B, B, B, B, B, B]),
        vec![V::Blank, V::Blank, V::S("Acme Co"), V::N(2.1)],
        vec![V::Blank, V::Blank, V::S("Bolt Ltd")],
        entry(V::N(2001.0), "Delta", "Bolt Ltd", [V::N(50.0), B, B, B, B, B, B]),
        entry(V::N(9999.0), "Total", "ALL COMPANIES", [V::N(52.1), B, B, B, B, B, B]),
    ]
}

/// Ledger whose used range starts at sheet row 3 and column B: two blank
/// rows, a title on row 3, the header on row 4
pub fn offset_ledger_rows() -> Vec<Vec<V>> {
    let shift = |row: Vec<V>| {
        let mut shifted = vec![V::Blank];
        shifted.extend(row);
        shifted
    };
    vec![
        vec![],
        vec![],
        shift(vec![V::S("Aged Receivables by Company")]),
        shift(ledger_header()),
        shift(entry(V::N(1001.0), "Alpha", "Acme Co", [V::N(3.0), B, B, B, B, B, B])),
        shift(entry(V::N(2001.0), "Delta", "Bolt Ltd", [V::N(7.0), B, B, B, B, B, B])),
    ]
}

/// Customer directory: duplicate 1001 (first wins), 1003 with no salesman
pub fn directory_rows() -> Vec<Vec<V>> {
    vec![
        vec![V::S("Number"), V::S("Name"), V::S("Salesman")],
        vec![V::N(1001.0), V::S("Alpha"), V::S("Smith")],
        vec![V::N(1002.0), V::S("Beta"), V::S("Jones")],
        vec![V::N(1001.0), V::S("Alpha (old)"), V::S("Brown")],
        vec![V::N(1003.0), V::S("Gamma")],
        vec![V::N(2001.0), V::S("Delta"), V::S("Lee")],
    ]
}

/// Ledger and directory workbooks in a fresh temp dir
pub struct Fixture {
    pub dir: TempDir,
    pub raw: PathBuf,
    pub directory: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_ledger(ledger_rows())
    }

    pub fn with_ledger(ledger: Vec<Vec<V>>) -> Self {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("ledger.xlsx");
        let directory = dir.path().join("customers.xlsx");

        write_workbook(&raw, &[("Cover", vec![vec![V::S("Report")]]), ("Raw", ledger)]);
        write_workbook(&directory, &[("export", directory_rows())]);

        Self {
            dir,
            raw,
            directory,
        }
    }

    pub fn output(&self) -> PathBuf {
        self.dir.path().join("pivot.xlsx")
    }
}
