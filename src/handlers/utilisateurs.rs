//! # Utilisateur Handlers
//!
//! Profile endpoints: the bearer-gated `/me` lookup plus standard CRUD.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::CurrentUser;
use crate::error::{ApiError, bad_request, internal_error, not_found, unauthorized};
use crate::handlers::types::UtilisateurView;
use crate::password;
use crate::repositories::{
    CreateUtilisateurRequest, EntrepriseRepository, UpdateUtilisateurRequest,
    UtilisateurRepository,
};
use crate::server::AppState;

/// Request payload for creating an utilisateur directly
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUtilisateurBody {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub password: String,
    #[schema(example = "1990-04-02")]
    pub date_de_naissance: chrono::NaiveDate,
    pub telephone: String,
    pub roles: Vec<String>,
    pub entreprise_id: i32,
}

/// Request payload for updating an utilisateur profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUtilisateurBody {
    pub nom: String,
    pub prenom: String,
    pub email: String,
    #[schema(example = "1990-04-02")]
    pub date_de_naissance: chrono::NaiveDate,
    pub telephone: String,
    pub roles: Vec<String>,
    pub entreprise_id: i32,
}

/// Profile of the authenticated utilisateur
#[utoipa::path(
    get,
    path = "/api/utilisateur/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Authenticated profile", body = UtilisateurView),
        (status = 401, description = "Missing or invalid identity", body = ApiError)
    ),
    tag = "utilisateurs"
)]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> Result<Json<UtilisateurView>, ApiError> {
    let user = UtilisateurRepository::new(&state.db)
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| unauthorized(Some("Invalid token")))?;

    Ok(Json(UtilisateurView::from_model(&user)))
}

/// Profile of a single utilisateur
#[utoipa::path(
    get,
    path = "/api/utilisateur/{id}",
    params(
        ("id" = i32, Path, description = "Utilisateur id")
    ),
    responses(
        (status = 200, description = "Profile", body = UtilisateurView),
        (status = 404, description = "Unknown utilisateur", body = ApiError)
    ),
    tag = "utilisateurs"
)]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UtilisateurView>, ApiError> {
    let user = UtilisateurRepository::new(&state.db)
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("User not found"))?;

    Ok(Json(UtilisateurView::from_model(&user)))
}

/// Create an utilisateur tied to an entreprise by id
#[utoipa::path(
    post,
    path = "/api/utilisateur",
    request_body = CreateUtilisateurBody,
    responses(
        (status = 201, description = "Utilisateur created", body = UtilisateurView),
        (status = 400, description = "Invalid entreprise id", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError)
    ),
    tag = "utilisateurs"
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateUtilisateurBody>, JsonRejection>,
) -> Result<(StatusCode, Json<UtilisateurView>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let entreprise = EntrepriseRepository::new(&state.db)
        .find_by_id(request.entreprise_id)
        .await?
        .ok_or_else(|| bad_request("Invalid entreprise ID"))?;

    let password_hash = password::hash_password(&request.password).map_err(|err| {
        tracing::error!(error = %err, "Password hashing failed");
        internal_error("Unable to hash password")
    })?;

    let user = UtilisateurRepository::new(&state.db)
        .create(CreateUtilisateurRequest {
            nom: request.nom,
            prenom: request.prenom,
            email: request.email,
            password_hash,
            date_de_naissance: request.date_de_naissance,
            telephone: request.telephone,
            roles: serde_json::json!(request.roles),
            entreprise_id: entreprise.id,
            allergene_ids: Vec::new(),
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UtilisateurView::from_model(&user))))
}

/// Update an utilisateur profile
#[utoipa::path(
    put,
    path = "/api/utilisateur/{id}",
    params(
        ("id" = i32, Path, description = "Utilisateur id")
    ),
    request_body = UpdateUtilisateurBody,
    responses(
        (status = 200, description = "Updated profile", body = UtilisateurView),
        (status = 400, description = "Invalid entreprise id", body = ApiError),
        (status = 404, description = "Unknown utilisateur", body = ApiError)
    ),
    tag = "utilisateurs"
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateUtilisateurBody>, JsonRejection>,
) -> Result<Json<UtilisateurView>, ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let entreprise = EntrepriseRepository::new(&state.db)
        .find_by_id(request.entreprise_id)
        .await?
        .ok_or_else(|| bad_request("Invalid entreprise ID"))?;

    let user = UtilisateurRepository::new(&state.db)
        .update(
            id,
            UpdateUtilisateurRequest {
                nom: request.nom,
                prenom: request.prenom,
                email: request.email,
                date_de_naissance: request.date_de_naissance,
                telephone: request.telephone,
                roles: serde_json::json!(request.roles),
                entreprise_id: entreprise.id,
            },
        )
        .await?;

    Ok(Json(UtilisateurView::from_model(&user)))
}
