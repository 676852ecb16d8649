use crate::config::{PivotConfig, SearchConfig};
use crate::core::{
    CompanyCatalog, OwnerDirectory, PreparedLedger, SearchIndex, SearchSession, Selection,
};
use crate::error::{ArError, ArResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::types::{RunOutcome, RunSummary};
use chrono::{Local, NaiveDate};
use colored::Colorize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Suggestions shown when `--company` names nothing in the catalog
const MAX_SUGGESTIONS: usize = 5;

/// Chooses one company from a catalog, or backs out
pub trait CompanyPicker {
    fn pick(&mut self, catalog: &CompanyCatalog, config: &SearchConfig) -> ArResult<Selection>;
}

/// Picker for a name given up front (`--company`)
pub struct FixedPicker {
    name: String,
}

impl FixedPicker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl CompanyPicker for FixedPicker {
    fn pick(&mut self, catalog: &CompanyCatalog, config: &SearchConfig) -> ArResult<Selection> {
        if catalog.contains(&self.name) {
            return Ok(Selection::Chosen(self.name.clone()));
        }

        let index = SearchIndex::new(catalog, config.clone());
        let suggestions: Vec<&str> = index
            .matches(&self.name)
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .collect();
        if !suggestions.is_empty() {
            eprintln!("   {} {}", "Did you mean:".yellow(), suggestions.join(", "));
        }

        Err(ArError::UnknownCompany(self.name.clone()))
    }
}

/// Line-oriented interactive picker
///
/// Each line replaces the query. `#N` picks the Nth listed result, an empty
/// line confirms the typed query as an exact company name, and `:q` or end
/// of input cancels.
pub struct TerminalPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPicker<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn show(&mut self, session: &SearchSession) -> ArResult<()> {
        let config = session.index().config();
        let results = session.results();

        if results.is_empty() {
            let typed = SearchIndex::normalize(session.query()).chars().count();
            if session.index().is_lazy() && typed < config.lazy_min_query_len {
                writeln!(
                    self.output,
                    "   Type at least {} characters to search {} companies",
                    config.lazy_min_query_len,
                    session.index().len()
                )?;
            } else {
                writeln!(self.output, "   No matches")?;
            }
            return Ok(());
        }

        for (pos, name) in results.iter().take(config.display_limit).enumerate() {
            writeln!(self.output, "   {:>3}. {}", pos + 1, name)?;
        }
        if results.len() > config.display_limit {
            writeln!(
                self.output,
                "        ... {} more",
                results.len() - config.display_limit
            )?;
        }
        Ok(())
    }
}

/// Highlight the `n`th (1-based) listed result and confirm it
fn confirm_numbered(session: &mut SearchSession, n: usize) -> ArResult<Selection> {
    let pos = n
        .checked_sub(1)
        .ok_or_else(|| ArError::Selection("results are numbered from 1".to_string()))?;
    session.highlight(pos)?;
    session.confirm()
}

impl<R: BufRead, W: Write> CompanyPicker for TerminalPicker<R, W> {
    fn pick(&mut self, catalog: &CompanyCatalog, config: &SearchConfig) -> ArResult<Selection> {
        let mut session = SearchSession::new(SearchIndex::new(catalog, config.clone()));

        writeln!(
            self.output,
            "{} companies. Type to filter, #N to pick, Enter to confirm, :q to cancel.",
            catalog.len()
        )?;
        self.show(&session)?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(session.cancel());
            }
            let line = line.trim_end_matches(['\r', '\n']);

            if line == ":q" {
                return Ok(session.cancel());
            }

            let pick = line
                .strip_prefix('#')
                .and_then(|n| n.trim().parse::<usize>().ok());

            let attempt = match pick {
                Some(n) => confirm_numbered(&mut session, n),
                None if line.is_empty() => session.confirm(),
                None => {
                    session.type_query(line, Instant::now());
                    session.settle();
                    self.show(&session)?;
                    continue;
                }
            };

            match attempt {
                Ok(selection) => return Ok(selection),
                Err(ArError::Selection(msg)) => {
                    writeln!(self.output, "   {}", msg.yellow())?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Inputs of one `pivot` run
#[derive(Debug, Clone)]
pub struct PivotRequest {
    pub raw: PathBuf,
    pub directory: PathBuf,
    pub output: Option<PathBuf>,
    pub config: PivotConfig,
    /// Print the Pivot table as JSON on stdout instead of status lines
    pub json: bool,
}

/// Execute the pivot command
pub fn pivot(request: &PivotRequest, picker: &mut dyn CompanyPicker) -> ArResult<RunOutcome> {
    let quiet = request.json;
    let config = &request.config;

    if !quiet {
        println!("{}", "📊 AR Pivot - Aged receivables by salesman".bold().green());
        println!("   Ledger:    {}", request.raw.display());
        println!("   Directory: {}", request.directory.display());
        println!();
    }

    let ledger = load_ledger(&request.raw, &config.raw_sheet)?;
    if !quiet {
        println!(
            "   Header found on row {}, {} data rows, {} companies",
            ledger.header_row() + 1,
            ledger.data_row_count(),
            ledger.catalog().len()
        );
    }

    let directory_table =
        ExcelImporter::new(&request.directory).read_table(&config.directory_sheet)?;
    let directory = OwnerDirectory::from_table(&directory_table)?;
    if !quiet && directory.duplicates_dropped() > 0 {
        println!(
            "   {} {} duplicate customer numbers ignored (first kept)",
            "⚠".yellow(),
            directory.duplicates_dropped()
        );
    }

    let company = match picker.pick(ledger.catalog(), &config.search)? {
        Selection::Chosen(company) => company,
        Selection::Cancelled => {
            debug!("company selection cancelled");
            return Ok(RunOutcome::Cancelled);
        }
    };

    let report = ledger.build_report(&company, &directory, config)?;

    let output = request
        .output
        .clone()
        .unwrap_or_else(|| {
            default_output_path(&request.raw, &company, Local::now().date_naive())
        });
    debug!(output = %output.display(), "exporting workbook");

    ExcelExporter::new(report.tables()).export(&output)?;

    if quiet {
        println!("{}", serde_json::to_string_pretty(&report.pivot)?);
    } else {
        println!();
        println!("   Company: {}", company.bright_blue().bold());
        for row in &report.pivot {
            println!("   {:<30} {:>18}", row.owner, row.total.to_string());
        }
        if report.unassigned_rows > 0 {
            println!(
                "   {} {} rows have no salesman",
                "⚠".yellow(),
                report.unassigned_rows
            );
        }
        println!();
        println!("{}", "✅ Pivot exported successfully!".bold().green());
        println!("   Output: {}", output.display());
    }

    Ok(RunOutcome::Completed(RunSummary {
        company,
        output,
        rows: report.row_count,
        owners: report.pivot.len(),
        unassigned_rows: report.unassigned_rows,
    }))
}

/// Execute the companies command
pub fn companies(raw: &Path, query: Option<&str>, config: &PivotConfig) -> ArResult<()> {
    let ledger = load_ledger(raw, &config.raw_sheet)?;
    for name in list_companies(ledger.catalog(), query, &config.search) {
        println!("{}", name);
    }
    Ok(())
}

/// Whole catalog, or the ranked matches for `query`
pub fn list_companies(
    catalog: &CompanyCatalog,
    query: Option<&str>,
    config: &SearchConfig,
) -> Vec<String> {
    match query {
        Some(q) => SearchIndex::new(catalog, config.clone())
            .matches(q)
            .into_iter()
            .map(str::to_string)
            .collect(),
        None => catalog.companies().to_vec(),
    }
}

/// `AR_Pivot_<company>_<YYYYMMDD>.xlsx` next to the raw ledger
pub fn default_output_path(raw: &Path, company: &str, date: NaiveDate) -> PathBuf {
    let sanitized: String = company
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let file_name = format!("AR_Pivot_{}_{}.xlsx", sanitized, date.format("%Y%m%d"));

    match raw.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

fn load_ledger(raw: &Path, sheet: &str) -> ArResult<PreparedLedger> {
    let grid = ExcelImporter::new(raw).read_grid(sheet)?;
    PreparedLedger::from_grid(grid)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
