use std::path::PathBuf;
use std::sync::Arc;

use crate::donors::domain::DonorRecord;
use crate::donors::repository::DonorRepository;
use crate::errors::ServiceError;
use crate::storage::CsvTableStore;

/// File-backed `Donors` table.
/// Persists donor rows as CSV with the header
/// `ID,Name,Age,Blood Type,Last Donation Date`.
#[derive(Clone)]
pub struct DonorTable {
    store: Arc<CsvTableStore<DonorRecord>>,
}

impl DonorTable {
    /// Open the table at the given path. Creates the file (header only) if missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let store = CsvTableStore::<DonorRecord>::open(path).await?;
        Ok(Arc::new(Self { store }))
    }

    pub fn path(&self) -> &std::path::Path {
        self.store.path()
    }
}

#[async_trait::async_trait]
impl DonorRepository for DonorTable {
    async fn load(&self) -> Result<Vec<DonorRecord>, ServiceError> { self.store.load().await }
    async fn save(&self, donors: &[DonorRecord]) -> Result<(), ServiceError> { self.store.save(donors).await }
}
