//! Shared helpers for the donor registry crates: logging bootstrap,
//! startup directory checks and the small JSON bodies every handler returns.

pub mod types;
pub mod utils;
pub mod env;
