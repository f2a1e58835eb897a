use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct CountDoc { pub count: u64 }

/// Body of add (all fields required) and update (any subset).
#[derive(ToSchema)]
pub struct DonorInputDoc {
    pub name: Option<String>,
    pub age: Option<i64>,
    /// One of A+, A-, B+, B-, AB+, AB-, O+, O- (case-insensitive).
    pub blood_type: Option<String>,
    /// YYYY-MM-DD, not in the future.
    pub last_donation_date: Option<String>,
}

#[derive(ToSchema)]
pub struct DonorDoc {
    pub id: u64,
    pub name: String,
    pub age: i64,
    pub blood_type: String,
    pub last_donation_date: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::donors::add_donor,
        crate::routes::donors::view_donors,
        crate::routes::donors::get_donor,
        crate::routes::donors::update_donor,
        crate::routes::donors::delete_donor,
        crate::routes::donors::count_donors,
        crate::routes::donors::search_donors,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            CountDoc,
            DonorInputDoc,
            DonorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "donors")
    )
)]
pub struct ApiDoc;
