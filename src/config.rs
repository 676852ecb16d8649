//! Run configuration and fixed ledger constants

use std::time::Duration;

/// Aging-bucket columns, in output order
pub const BUCKETS: [&str; 7] = [
    "Current", "1-30", "31-60", "61-90", "91-365", "366-730", "731+",
];

pub const CUSTOMER_ID_COLUMN: &str = "Customer ID";
pub const COMPANY_TOKEN: &str = "company";

/// Aggregate pseudo-company that marks summary rows
pub const ALL_COMPANIES: &str = "All Companies";

pub const DIRECTORY_NUMBER_COLUMN: &str = "Number";
pub const DIRECTORY_NAME_COLUMN: &str = "Name";
pub const DIRECTORY_SALESMAN_COLUMN: &str = "Salesman";

pub const PIVOT_SHEET: &str = "Pivot";
pub const DIRECTORY_SHEET: &str = "Default Sales";
pub const RAW_SHEET: &str = "Raw";
pub const TOTAL_COLUMN: &str = "Total";

/// Settings for one pivot run
#[derive(Debug, Clone)]
pub struct PivotConfig {
    /// Sheet holding the aged-receivables ledger
    pub raw_sheet: String,
    /// Sheet holding the customer → salesman directory
    pub directory_sheet: String,
    /// Owner assigned when a customer has no directory entry
    pub unassigned_label: String,
    pub search: SearchConfig,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            raw_sheet: "Raw".to_string(),
            directory_sheet: "export".to_string(),
            unassigned_label: "Unassigned".to_string(),
            search: SearchConfig::default(),
        }
    }
}

/// Tuning for the interactive company search
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before a typed query is evaluated
    pub debounce: Duration,
    /// Catalogs larger than this never list unfiltered
    pub lazy_threshold: usize,
    /// Minimum query length (chars) in lazy mode
    pub lazy_min_query_len: usize,
    /// Prefix-match count at which the substring pass is skipped
    pub prefix_cap: usize,
    /// Results shown per prompt by the terminal picker
    pub display_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            lazy_threshold: 1000,
            lazy_min_query_len: 2,
            prefix_cap: 5000,
            display_limit: 20,
        }
    }
}
