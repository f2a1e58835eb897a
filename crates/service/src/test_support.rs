#![cfg(test)]
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::donors::domain::DonorRecord;
use crate::donors::repository::DonorRepository;
use crate::errors::ServiceError;

/// In-memory donor table for service tests; counts saves and can be told to fail them.
#[derive(Default)]
pub struct MemoryDonorRepository {
    rows: Mutex<Vec<DonorRecord>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryDonorRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl DonorRepository for MemoryDonorRepository {
    async fn load(&self) -> Result<Vec<DonorRecord>, ServiceError> {
        Ok(self.rows.lock().await.clone())
    }

    async fn save(&self, donors: &[DonorRecord]) -> Result<(), ServiceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("disk full".into()));
        }
        *self.rows.lock().await = donors.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
