//! Ledger pipeline: header detection, row classification, company search,
//! salesman join and exact aggregation

pub mod aggregator;
pub mod amount;
pub mod catalog;
pub mod classifier;
pub mod header;
pub mod pipeline;
pub mod resolver;
pub mod search;

pub use aggregator::{aggregate, DecimalAggregator};
pub use amount::{Amount, NumberParser};
pub use catalog::CompanyCatalog;
pub use classifier::RowMask;
pub use pipeline::PreparedLedger;
pub use resolver::{OwnerDirectory, SalesmanResolver};
pub use search::{SearchIndex, SearchSession, Selection};
