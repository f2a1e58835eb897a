use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::storage::TableRow;

pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 60;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// ABO/Rh blood group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
        BloodType::OPositive,
        BloodType::ONegative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = ServiceError;

    /// Case-insensitive: `"ab-"` parses as `AB-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        BloodType::ALL
            .into_iter()
            .find(|bt| bt.as_str() == upper)
            .ok_or_else(|| ServiceError::validation("Invalid blood type."))
    }
}

/// One row of the `Donors` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DonorRecord {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Age")]
    pub age: i64,
    #[serde(rename = "Blood Type")]
    pub blood_type: BloodType,
    #[serde(rename = "Last Donation Date")]
    pub last_donation_date: NaiveDate,
}

impl TableRow for DonorRecord {
    const TABLE: &'static str = "Donors";
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Age", "Blood Type", "Last Donation Date"];
}

impl DonorRecord {
    pub fn to_row(&self) -> DonorRow {
        DonorRow(
            self.id,
            self.name.clone(),
            self.age,
            self.blood_type,
            self.last_donation_date,
        )
    }
}

/// Positional view of a record, serialized as
/// `[id, name, age, blood_type, last_donation_date]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DonorRow(pub u64, pub String, pub i64, pub BloodType, pub NaiveDate);

/// Raw donor fields as they arrive from a client. Every field is optional so
/// the same shape serves both add (all required) and update (any subset);
/// `null` is treated as absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DonorInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub blood_type: Option<String>,
    #[serde(default)]
    pub last_donation_date: Option<String>,
}

/// Validated fields for a new donor; the id is assigned by the service.
#[derive(Clone, Debug, PartialEq)]
pub struct NewDonor {
    pub name: String,
    pub age: i64,
    pub blood_type: BloodType,
    pub last_donation_date: NaiveDate,
}

impl NewDonor {
    pub fn into_record(self, id: u64) -> DonorRecord {
        DonorRecord {
            id,
            name: self.name,
            age: self.age,
            blood_type: self.blood_type,
            last_donation_date: self.last_donation_date,
        }
    }
}

/// Validated partial update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DonorPatch {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub blood_type: Option<BloodType>,
    pub last_donation_date: Option<NaiveDate>,
}

impl DonorPatch {
    /// Overwrite only the fields present in the patch. The id is never touched.
    pub fn apply(self, record: &mut DonorRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(age) = self.age {
            record.age = age;
        }
        if let Some(blood_type) = self.blood_type {
            record.blood_type = blood_type;
        }
        if let Some(date) = self.last_donation_date {
            record.last_donation_date = date;
        }
    }
}

impl DonorInput {
    /// Validate whichever fields are present.
    ///
    /// Checks run in a fixed order (age, blood type, date, name) and the first
    /// failure wins.
    pub fn into_patch(self, today: NaiveDate) -> Result<DonorPatch, ServiceError> {
        let age = self.age.map(validate_age).transpose()?;
        let blood_type = self.blood_type.as_deref().map(str::parse::<BloodType>).transpose()?;
        let last_donation_date = self
            .last_donation_date
            .as_deref()
            .map(|d| validate_donation_date(d, today))
            .transpose()?;
        let name = self.name.map(validate_name).transpose()?;
        Ok(DonorPatch { name, age, blood_type, last_donation_date })
    }

    /// Validate a complete donor for insertion.
    pub fn into_new_donor(self, today: NaiveDate) -> Result<NewDonor, ServiceError> {
        let patch = self.into_patch(today)?;
        Ok(NewDonor {
            name: patch.name.ok_or_else(|| ServiceError::validation("Name is required."))?,
            age: patch.age.ok_or_else(|| missing("age"))?,
            blood_type: patch.blood_type.ok_or_else(|| missing("blood_type"))?,
            last_donation_date: patch.last_donation_date.ok_or_else(|| missing("last_donation_date"))?,
        })
    }
}

fn missing(field: &str) -> ServiceError {
    ServiceError::validation(format!("Missing field: {field}."))
}

pub fn validate_age(age: i64) -> Result<i64, ServiceError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ServiceError::validation("Age must be between 18-60."));
    }
    Ok(age)
}

pub fn validate_donation_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ServiceError> {
    let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ServiceError::validation("Invalid date format. Use YYYY-MM-DD."))?;
    if date > today {
        return Err(ServiceError::validation("Last donation date cannot be in the future."));
    }
    Ok(date)
}

pub fn validate_name(name: String) -> Result<String, ServiceError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation("Name is required."));
    }
    Ok(trimmed.to_string())
}
