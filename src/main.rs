use ar_pivot::cli::{self, CompanyPicker, FixedPicker, PivotRequest, TerminalPicker};
use ar_pivot::config::PivotConfig;
use ar_pivot::error::ArResult;
use ar_pivot::types::RunOutcome;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ar-pivot")]
#[command(about = "Aged-receivables pivot by salesman, with exact decimal totals")]
#[command(long_about = "AR Pivot - aged receivables by salesman

Reads the aged-receivables ledger (sheet 'Raw'), finds its header row,
keeps one company's data rows, assigns every customer its salesman from the
customer directory (sheet 'export'), and sums the seven aging buckets per
salesman with exact 5-digit decimals.

OUTPUT SHEETS:
  Pivot          - Salesman, Current .. 731+, Total
  Default Sales  - the deduplicated customer directory
  Raw            - the company's rows with their Salesman

EXAMPLES:
  ar-pivot pivot ledger.xlsx customers.xlsx                 # pick interactively
  ar-pivot pivot ledger.xlsx customers.xlsx --company \"Acme Co\" -o acme.xlsx
  ar-pivot companies ledger.xlsx --query acme

EXIT CODES:
  0 success or cancelled, 1 selection error, 2 invalid input, 3 export failure")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Build the salesman pivot for one company.

Without --company an interactive picker runs on the terminal:
  <text>   filter companies (prefix matches first, then substring matches)
  #N       pick the Nth listed company
  <Enter>  confirm the typed text as an exact company name
  :q       cancel (nothing is written)")]
    /// Build the salesman pivot for one company
    Pivot {
        /// Aged-receivables ledger workbook
        raw: PathBuf,

        /// Customer directory workbook (Number, Name, Salesman)
        directory: PathBuf,

        /// Output workbook (default: AR_Pivot_<company>_<YYYYMMDD>.xlsx next to the ledger)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Company to report on (exact name); skips the interactive picker
        #[arg(short, long, env = "AR_COMPANY")]
        company: Option<String>,

        /// Ledger sheet name
        #[arg(long, default_value = "Raw", env = "AR_RAW_SHEET")]
        raw_sheet: String,

        /// Directory sheet name
        #[arg(long, default_value = "export", env = "AR_DIRECTORY_SHEET")]
        directory_sheet: String,

        /// Print the Pivot table as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Show debug logging on stderr
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the companies found in a ledger
    Companies {
        /// Aged-receivables ledger workbook
        raw: PathBuf,

        /// Only show ranked matches for this query
        #[arg(short, long)]
        query: Option<String>,

        /// Ledger sheet name
        #[arg(long, default_value = "Raw", env = "AR_RAW_SHEET")]
        raw_sheet: String,

        /// Show debug logging on stderr
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "ar_pivot=debug"
    } else {
        "ar_pivot=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(io::stderr)
        .init();
}

fn run(command: Commands) -> ArResult<()> {
    match command {
        Commands::Pivot {
            raw,
            directory,
            output,
            company,
            raw_sheet,
            directory_sheet,
            json,
            verbose,
        } => {
            init_tracing(verbose);

            let request = PivotRequest {
                raw,
                directory,
                output,
                config: PivotConfig {
                    raw_sheet,
                    directory_sheet,
                    ..PivotConfig::default()
                },
                json,
            };

            let mut picker: Box<dyn CompanyPicker> = match company {
                Some(name) => Box::new(FixedPicker::new(name)),
                None => {
                    // Keep stdout clean for --json
                    let prompt: Box<dyn Write> = if json {
                        Box::new(io::stderr())
                    } else {
                        Box::new(io::stdout())
                    };
                    Box::new(TerminalPicker::new(io::stdin().lock(), prompt))
                }
            };

            if let RunOutcome::Cancelled = cli::pivot(&request, picker.as_mut())? {
                tracing::debug!("run cancelled; no output written");
            }
            Ok(())
        }

        Commands::Companies {
            raw,
            query,
            raw_sheet,
            verbose,
        } => {
            init_tracing(verbose);

            let config = PivotConfig {
                raw_sheet,
                ..PivotConfig::default()
            };
            cli::companies(&raw, query.as_deref(), &config)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".bold().red(), e);
            ExitCode::from(e.exit_code())
        }
    }
}
