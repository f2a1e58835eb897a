use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::donors::domain::{DonorInput, DonorRecord};
use crate::donors::repository::DonorRepository;
use crate::errors::ServiceError;

/// Source of "today" for the future-date check.
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Next id for an insertion: one more than the largest id present.
pub fn next_id(donors: &[DonorRecord]) -> Result<u64, ServiceError> {
    donors
        .iter()
        .map(|d| d.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| ServiceError::Storage("donor id space exhausted".into()))
}

/// Application service for donor records.
///
/// Every operation loads the whole table, works on it, and writes it back if
/// it changed. Operations are not isolated from each other.
#[derive(Clone)]
pub struct DonorService {
    repo: Arc<dyn DonorRepository>,
    today: Clock,
}

impl DonorService {
    pub fn new(repo: Arc<dyn DonorRepository>) -> Self {
        Self { repo, today: local_today }
    }

    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }

    /// Validate and append a donor; returns the stored record with its id.
    #[instrument(skip(self, input))]
    pub async fn add(&self, input: DonorInput) -> Result<DonorRecord, ServiceError> {
        let donor = input.into_new_donor((self.today)())?;
        let mut donors = self.repo.load().await?;
        let record = donor.into_record(next_id(&donors)?);
        donors.push(record.clone());
        self.repo.save(&donors).await?;
        info!(donor_id = record.id, blood_type = %record.blood_type, "donor_added");
        Ok(record)
    }

    /// All donors in storage order.
    pub async fn list(&self) -> Result<Vec<DonorRecord>, ServiceError> {
        self.repo.load().await
    }

    pub async fn get(&self, id: u64) -> Result<DonorRecord, ServiceError> {
        self.repo
            .load()
            .await?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or_else(|| ServiceError::not_found("Donor"))
    }

    /// Apply the provided fields to the donor with `id`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: u64, input: DonorInput) -> Result<DonorRecord, ServiceError> {
        let patch = input.into_patch((self.today)())?;
        let mut donors = self.repo.load().await?;
        let donor = donors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| ServiceError::not_found("Donor"))?;
        patch.apply(donor);
        let updated = donor.clone();
        self.repo.save(&donors).await?;
        info!(donor_id = id, "donor_updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: u64) -> Result<DonorRecord, ServiceError> {
        let mut donors = self.repo.load().await?;
        let pos = donors
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| ServiceError::not_found("Donor"))?;
        let removed = donors.remove(pos);
        self.repo.save(&donors).await?;
        info!(donor_id = id, "donor_deleted");
        Ok(removed)
    }

    pub async fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.repo.load().await?.len())
    }

    /// Donors whose stored blood type is exactly `blood_type`.
    pub async fn search(&self, blood_type: &str) -> Result<Vec<DonorRecord>, ServiceError> {
        let found: Vec<DonorRecord> = self
            .repo
            .load()
            .await?
            .into_iter()
            .filter(|d| d.blood_type.as_str() == blood_type)
            .collect();
        if found.is_empty() {
            return Err(ServiceError::NotFound(
                "No donors found with the specified blood type.".into(),
            ));
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::donors::domain::BloodType;
    use crate::file::donor_table::DonorTable;
    use crate::test_support::MemoryDonorRepository;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn service(repo: Arc<MemoryDonorRepository>) -> DonorService {
        DonorService::new(repo).with_clock(fixed_today)
    }

    fn input(name: &str, age: i64, blood_type: &str) -> DonorInput {
        DonorInput {
            name: Some(name.into()),
            age: Some(age),
            blood_type: Some(blood_type.into()),
            last_donation_date: Some("2024-03-10".into()),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_from_one() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            let rec = svc.add(input(name, 25, "A+")).await?;
            assert_eq!(rec.id, i as u64 + 1);
        }
        assert_eq!(svc.count().await?, 4);
        let ids: Vec<u64> = svc.list().await?.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[tokio::test]
    async fn next_id_follows_the_largest_remaining_id() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        svc.add(input("a", 25, "A+")).await?;
        svc.add(input("b", 25, "A+")).await?;
        svc.add(input("c", 25, "A+")).await?;
        svc.delete(2).await?;
        assert_eq!(svc.add(input("d", 25, "A+")).await?.id, 4);
        Ok(())
    }

    #[tokio::test]
    async fn add_after_max_id_is_a_storage_error() -> Result<(), anyhow::Error> {
        let repo = MemoryDonorRepository::new();
        let mut last = input("a", 25, "A+").into_new_donor(fixed_today())?.into_record(u64::MAX);
        last.name = "last".into();
        repo.save(&[last]).await?;
        let svc = service(repo.clone());

        let err = svc.add(input("b", 26, "B+")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        assert_eq!(repo.saves(), 1);
        assert_eq!(svc.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_add_leaves_table_untouched() -> Result<(), anyhow::Error> {
        let repo = MemoryDonorRepository::new();
        let svc = service(repo.clone());
        let err = svc.add(input("a", 70, "A+")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(repo.saves(), 0);
        assert_eq!(svc.count().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn lowercase_blood_type_is_stored_uppercase() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        let rec = svc.add(input("a", 25, "a+")).await?;
        assert_eq!(rec.blood_type, BloodType::APositive);
        assert_eq!(svc.search("A+").await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_changes_only_provided_fields() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        svc.add(input("Lena", 33, "B+")).await?;
        let before = svc.get(1).await?;

        let after = svc
            .update(1, DonorInput { name: Some("Lena K".into()), ..Default::default() })
            .await?;
        assert_eq!(after.name, "Lena K");
        assert_eq!(after.age, before.age);
        assert_eq!(after.blood_type, before.blood_type);
        assert_eq!(after.last_donation_date, before.last_donation_date);
        assert_eq!(svc.get(1).await?, after);
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() -> Result<(), anyhow::Error> {
        let repo = MemoryDonorRepository::new();
        let svc = service(repo.clone());
        svc.add(input("a", 25, "A+")).await?;
        let err = svc
            .update(42, DonorInput { age: Some(30), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Donor not found!"));
        assert_eq!(repo.saves(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_invalid_fields() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        svc.add(input("a", 25, "A+")).await?;
        let err = svc
            .update(1, DonorInput { blood_type: Some("Q+".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(svc.get(1).await?.blood_type, BloodType::APositive);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_record() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        svc.add(input("a", 25, "A+")).await?;
        svc.add(input("b", 26, "O-")).await?;
        svc.add(input("c", 27, "A+")).await?;

        let removed = svc.delete(2).await?;
        assert_eq!(removed.name, "b");
        assert_eq!(svc.count().await?, 2);
        assert!(matches!(svc.get(2).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(2).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn search_returns_all_and_only_matches() -> Result<(), anyhow::Error> {
        let svc = service(MemoryDonorRepository::new());
        svc.add(input("a", 25, "A+")).await?;
        svc.add(input("b", 26, "O-")).await?;
        svc.add(input("c", 27, "A+")).await?;

        let names: Vec<String> = svc.search("A+").await?.into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["a", "c"]);

        let err = svc.search("AB-").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "No donors found with the specified blood type."));
        Ok(())
    }

    #[tokio::test]
    async fn storage_failures_surface_as_storage_errors() -> Result<(), anyhow::Error> {
        let repo = MemoryDonorRepository::new();
        repo.fail_saves(true);
        let svc = service(repo.clone());
        let err = svc.add(input("a", 25, "A+")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        Ok(())
    }

    #[tokio::test]
    async fn file_backed_service_survives_restart() -> Result<(), anyhow::Error> {
        let tmp = std::env::temp_dir().join(format!("svc_donor_service_{}/Donors.csv", uuid::Uuid::new_v4()));
        let svc = DonorService::new(DonorTable::open(&tmp).await?).with_clock(fixed_today);
        svc.add(input("a", 25, "A+")).await?;
        svc.add(input("b", 26, "B+")).await?;
        svc.update(2, DonorInput { age: Some(45), ..Default::default() }).await?;

        let reopened = DonorService::new(DonorTable::open(&tmp).await?).with_clock(fixed_today);
        assert_eq!(reopened.count().await?, 2);
        assert_eq!(reopened.get(2).await?.age, 45);

        let _ = tokio::fs::remove_dir_all(tmp.parent().unwrap()).await;
        Ok(())
    }
}
