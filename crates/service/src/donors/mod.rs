//! Donor records: domain model, validation, repository seam and service.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{BloodType, DonorInput, DonorPatch, DonorRecord, DonorRow, NewDonor};
pub use repository::DonorRepository;
pub use service::DonorService;
