//! loantree: typed Account/Loan/Collateral trees with containment rules,
//! selection, layered layout and JSON export.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
