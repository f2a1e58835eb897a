//! Service layer for the donor registry.
//! - `donors` holds the domain model, validation rules and the donor service.
//! - `storage` holds the whole-file tabular store the service persists through.
//! - `file` wires the donor repository onto that store.

pub mod errors;
pub mod storage;
pub mod file;
pub mod donors;
#[cfg(test)]
pub mod test_support;
