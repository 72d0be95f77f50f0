//! # Commande Handlers
//!
//! Order lifecycle endpoints. Creation requires a bearer identity that
//! resolves to a known utilisateur and a non-empty plat id list; every
//! other failure mode leaves the store untouched.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use metrics::counter;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, bad_request, not_found, unauthorized};
use crate::handlers::types::CommandeView;
use crate::models::commande;
use crate::repositories::{
    CommandeDefaults, CommandeRepository, PlatRepository, UpdateCommandeRequest,
    UtilisateurRepository,
};
use crate::server::AppState;

/// Request payload for creating a commande
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateCommandeRequest {
    /// Plat ids to order, in order, duplicates allowed
    #[serde(default)]
    pub plats: Vec<i32>,
}

/// Request payload for updating a commande
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateCommandeBody {
    pub etat: Option<String>,
    pub quantite: Option<i32>,
    pub note: Option<String>,
    pub commentaire: Option<String>,
    /// Review timestamp (ISO 8601)
    pub date_avis: Option<chrono::DateTime<chrono::FixedOffset>>,
}

/// Build the full commande view, loading owner and plat lines explicitly.
async fn commande_view(
    db: &DatabaseConnection,
    commande: &commande::Model,
) -> Result<CommandeView, ApiError> {
    let repo = CommandeRepository::new(db);

    let utilisateur = repo
        .utilisateur_for(commande)
        .await?
        .ok_or_else(|| not_found("User not found"))?;
    let plats = repo.plats_for(commande.id).await?;

    Ok(CommandeView::from_parts(commande, &utilisateur, &plats))
}

/// List all commandes
#[utoipa::path(
    get,
    path = "/api/commande",
    responses(
        (status = 200, description = "All commandes", body = Vec<CommandeView>)
    ),
    tag = "commandes"
)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CommandeView>>, ApiError> {
    let commandes = CommandeRepository::new(&state.db).find_all().await?;

    let mut views = Vec::with_capacity(commandes.len());
    for commande in &commandes {
        views.push(commande_view(&state.db, commande).await?);
    }

    Ok(Json(views))
}

/// Create a commande owned by the authenticated utilisateur
#[utoipa::path(
    post,
    path = "/api/commande",
    security(("bearer_auth" = [])),
    request_body = CreateCommandeRequest,
    responses(
        (status = 201, description = "Commande created", body = CommandeView),
        (status = 400, description = "Empty plat list or unknown plat id", body = ApiError),
        (status = 401, description = "Missing or invalid identity", body = ApiError)
    ),
    tag = "commandes"
)]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
    payload: Result<Json<CreateCommandeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CommandeView>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let utilisateur = UtilisateurRepository::new(&state.db)
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| unauthorized(Some("Invalid token")))?;

    if request.plats.is_empty() {
        return Err(bad_request("No plats provided"));
    }

    // Resolve every plat before writing anything; the first unknown id
    // aborts the whole commande.
    let plat_repo = PlatRepository::new(&state.db);
    for plat_id in &request.plats {
        if plat_repo.find_by_id(*plat_id).await?.is_none() {
            return Err(bad_request(&format!("Invalid plat ID: {}", plat_id)));
        }
    }

    let commande = CommandeRepository::new(&state.db)
        .create(
            utilisateur.id,
            &request.plats,
            CommandeDefaults {
                quantite: state.config.default_quantite,
            },
        )
        .await?;

    counter!("commandes_created_total").increment(1);
    tracing::info!(
        commande_id = commande.id,
        utilisateur_id = utilisateur.id,
        plats = request.plats.len(),
        "Commande created"
    );

    let view = commande_view(&state.db, &commande).await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// Show a single commande
#[utoipa::path(
    get,
    path = "/api/commande/{id}",
    params(
        ("id" = i32, Path, description = "Commande id")
    ),
    responses(
        (status = 200, description = "Commande details", body = CommandeView),
        (status = 404, description = "Unknown commande", body = ApiError)
    ),
    tag = "commandes"
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CommandeView>, ApiError> {
    let commande = CommandeRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("Commande not found"))?;

    let view = commande_view(&state.db, &commande).await?;

    Ok(Json(view))
}

/// Update a commande
#[utoipa::path(
    put,
    path = "/api/commande/{id}",
    params(
        ("id" = i32, Path, description = "Commande id")
    ),
    request_body = UpdateCommandeBody,
    responses(
        (status = 200, description = "Updated commande", body = CommandeView),
        (status = 404, description = "Unknown commande", body = ApiError)
    ),
    tag = "commandes"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateCommandeBody>, JsonRejection>,
) -> Result<Json<CommandeView>, ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let commande = CommandeRepository::new(&state.db)
        .update(
            id,
            UpdateCommandeRequest {
                etat: request.etat,
                quantite: request.quantite,
                note: request.note,
                commentaire: request.commentaire,
                date_avis: request.date_avis,
            },
        )
        .await?;

    let view = commande_view(&state.db, &commande).await?;

    Ok(Json(view))
}

/// Delete a commande
#[utoipa::path(
    delete,
    path = "/api/commande/{id}",
    params(
        ("id" = i32, Path, description = "Commande id")
    ),
    responses(
        (status = 204, description = "Commande deleted"),
        (status = 404, description = "Unknown commande", body = ApiError)
    ),
    tag = "commandes"
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    CommandeRepository::new(&state.db).delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
