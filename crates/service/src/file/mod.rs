//! File-backed implementations of the service repositories.

pub mod donor_table;
