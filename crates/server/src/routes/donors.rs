use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use common::types::{Count, Message};
use service::donors::{BloodType, DonorInput, DonorRecord, DonorRow};

use crate::errors::JsonApiError;
use crate::state::ServerState;

/// Keyed JSON view of a single donor.
#[derive(Debug, Serialize)]
pub struct DonorView {
    pub id: u64,
    pub name: String,
    pub age: i64,
    pub blood_type: BloodType,
    pub last_donation_date: NaiveDate,
}

impl From<DonorRecord> for DonorView {
    fn from(d: DonorRecord) -> Self {
        Self {
            id: d.id,
            name: d.name,
            age: d.age,
            blood_type: d.blood_type,
            last_donation_date: d.last_donation_date,
        }
    }
}

fn rows(donors: Vec<DonorRecord>) -> Vec<DonorRow> {
    donors.iter().map(DonorRecord::to_row).collect()
}

#[utoipa::path(
    post, path = "/add_donor", tag = "donors",
    request_body = crate::openapi::DonorInputDoc,
    responses(
        (status = 200, description = "Donor added", body = crate::openapi::MessageDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::MessageDoc)
    )
)]
pub async fn add_donor(
    State(state): State<ServerState>,
    payload: Result<Json<DonorInput>, JsonRejection>,
) -> Result<Json<Message>, JsonApiError> {
    let Json(input) = payload?;
    state.donors.add(input).await?;
    Ok(Json(Message::new("Donor added successfully!")))
}

#[utoipa::path(
    get, path = "/view_donors", tag = "donors",
    responses((status = 200, description = "Rows of [id, name, age, blood_type, last_donation_date]"))
)]
pub async fn view_donors(State(state): State<ServerState>) -> Result<Json<Vec<DonorRow>>, JsonApiError> {
    Ok(Json(rows(state.donors.list().await?)))
}

#[utoipa::path(
    get, path = "/donors/{id}", tag = "donors",
    params(("id" = u64, Path, description = "Donor id")),
    responses(
        (status = 200, description = "Donor", body = crate::openapi::DonorDoc),
        (status = 404, description = "Donor not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn get_donor(
    State(state): State<ServerState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<DonorView>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.donors.get(id).await?.into()))
}

#[utoipa::path(
    put, path = "/update_donor/{id}", tag = "donors",
    params(("id" = u64, Path, description = "Donor id")),
    request_body = crate::openapi::DonorInputDoc,
    responses(
        (status = 200, description = "Donor updated", body = crate::openapi::MessageDoc),
        (status = 400, description = "Validation failed", body = crate::openapi::MessageDoc),
        (status = 404, description = "Donor not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn update_donor(
    State(state): State<ServerState>,
    id: Result<Path<u64>, PathRejection>,
    payload: Result<Json<DonorInput>, JsonRejection>,
) -> Result<Json<Message>, JsonApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    state.donors.update(id, input).await?;
    Ok(Json(Message::new("Donor updated successfully!")))
}

#[utoipa::path(
    delete, path = "/delete_donor/{id}", tag = "donors",
    params(("id" = u64, Path, description = "Donor id")),
    responses(
        (status = 200, description = "Donor deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Donor not found", body = crate::openapi::MessageDoc)
    )
)]
pub async fn delete_donor(
    State(state): State<ServerState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<Message>, JsonApiError> {
    let Path(id) = id?;
    state.donors.delete(id).await?;
    Ok(Json(Message::new("Donor deleted successfully!")))
}

#[utoipa::path(
    get, path = "/count_donors", tag = "donors",
    responses((status = 200, description = "Number of donors", body = crate::openapi::CountDoc))
)]
pub async fn count_donors(State(state): State<ServerState>) -> Result<Json<Count>, JsonApiError> {
    let count = state.donors.count().await?;
    Ok(Json(Count { count }))
}

#[utoipa::path(
    get, path = "/search_donors/{blood_type}", tag = "donors",
    params(("blood_type" = String, Path, description = "Exact blood type, e.g. AB-")),
    responses(
        (status = 200, description = "Matching rows"),
        (status = 404, description = "No donors with that blood type", body = crate::openapi::MessageDoc)
    )
)]
pub async fn search_donors(
    State(state): State<ServerState>,
    blood_type: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<DonorRow>>, JsonApiError> {
    let Path(blood_type) = blood_type?;
    Ok(Json(rows(state.donors.search(&blood_type).await?)))
}
