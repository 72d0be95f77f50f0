//! # Plat Handlers
//!
//! Catalog endpoints: allergen/category filtered listing, single plat
//! details and availability-date lookup.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};

use crate::error::{ApiError, bad_request, not_found};
use crate::handlers::types::PlatView;
use crate::repositories::PlatRepository;
use crate::server::AppState;
use crate::services::UtilisateurService;

/// Plats filtered by the caller's allergies and the requested categories
///
/// `userId` selects whose allergies to exclude; `categories[]` (repeated)
/// selects the categories to include.
#[utoipa::path(
    get,
    path = "/api/plat/filtered",
    params(
        ("userId" = i32, Query, description = "Utilisateur whose allergies are excluded"),
        ("categories[]" = Vec<String>, Query, description = "Categorie names to include")
    ),
    responses(
        (status = 200, description = "Matching plats", body = Vec<PlatView>),
        (status = 400, description = "Missing categories or unknown utilisateur", body = ApiError)
    ),
    tag = "plats"
)]
pub async fn filtered(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<PlatView>>, ApiError> {
    let categories: Vec<String> = params
        .iter()
        .filter(|(key, _)| key == "categories[]" || key == "categories")
        .map(|(_, value)| value.clone())
        .collect();

    if categories.is_empty() {
        return Err(bad_request("Categories must be an array"));
    }

    let user_id: i32 = params
        .iter()
        .find(|(key, _)| key == "userId")
        .and_then(|(_, value)| value.parse().ok())
        .ok_or_else(|| bad_request("userId is required"))?;

    let allergies = UtilisateurService::new(&state.db)
        .user_allergy_names(user_id)
        .await
        .map_err(|err| bad_request(&err.to_string()))?;

    tracing::info!(
        user_id,
        allergies = allergies.join(", "),
        categories = categories.join(", "),
        "Filtering plats"
    );

    let plats = PlatRepository::new(&state.db)
        .find_filtered(&allergies, &categories)
        .await?;

    Ok(Json(plats.iter().map(PlatView::from_model).collect()))
}

/// Details of a single plat
#[utoipa::path(
    get,
    path = "/api/plat/details/{id}",
    params(
        ("id" = i32, Path, description = "Plat id")
    ),
    responses(
        (status = 200, description = "Plat details", body = PlatView),
        (status = 404, description = "Unknown plat", body = ApiError)
    ),
    tag = "plats"
)]
pub async fn details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PlatView>, ApiError> {
    let plat = PlatRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("Plat not found"))?;

    Ok(Json(PlatView::from_model(&plat)))
}

/// Plats available on a given date
#[utoipa::path(
    get,
    path = "/api/plat/available",
    params(
        ("date" = String, Query, description = "Availability date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Plats available that day", body = Vec<PlatView>),
        (status = 400, description = "Missing or invalid date", body = ApiError)
    ),
    tag = "plats"
)]
pub async fn available(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<PlatView>>, ApiError> {
    let raw_date = params
        .iter()
        .find(|(key, _)| key == "date")
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| bad_request("Date is required"))?;

    let date = raw_date
        .parse::<chrono::NaiveDate>()
        .map_err(|_| bad_request("Invalid date format"))?;

    let plats = PlatRepository::new(&state.db).find_by_date(date).await?;

    Ok(Json(plats.iter().map(PlatView::from_model).collect()))
}
