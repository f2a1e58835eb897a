//! Storage abstractions for service layer
//!
//! Contains the file-backed tabular store services persist through.

pub mod csv_table_store;

pub use csv_table_store::{CsvTableStore, TableRow};
