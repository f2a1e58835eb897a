use async_trait::async_trait;

use crate::donors::domain::DonorRecord;
use crate::errors::ServiceError;

/// Trait abstraction for the donor table.
/// The service performs one `load` and at most one `save` per operation.
#[async_trait]
pub trait DonorRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<DonorRecord>, ServiceError>;
    async fn save(&self, donors: &[DonorRecord]) -> Result<(), ServiceError>;
}
