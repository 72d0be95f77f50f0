//! # Authentication Handlers
//!
//! Registration, login and logout endpoints. Registration is gated by an
//! entreprise join code; both registration and login answer with the user
//! projection plus a freshly issued bearer token.

use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use metrics::counter;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth;
use crate::error::{ApiError, RepositoryError, bad_request, internal_error, unauthorized};
use crate::handlers::types::{AllergeneView, AuthResponse, UtilisateurView};
use crate::password;
use crate::repositories::{
    AllergeneRepository, CreateUtilisateurRequest, EntrepriseRepository, UtilisateurRepository,
};
use crate::server::AppState;

/// Request payload for registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub nom: String,
    pub prenom: String,
    #[schema(example = "alice.martin@example.com")]
    pub email: String,
    #[schema(example = "1990-04-02")]
    pub date_de_naissance: chrono::NaiveDate,
    pub telephone: String,
    pub password: String,
    /// Entreprise join code
    #[serde(rename = "codeEntreprise")]
    #[schema(example = "AB12C")]
    pub code_entreprise: String,
    /// Optional allergene ids; unresolvable ids are skipped
    #[serde(default)]
    pub allergenes: Vec<i32>,
}

/// Request payload for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response payload for logout
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// Register a new utilisateur tied to an existing entreprise
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Utilisateur created", body = AuthResponse),
        (status = 400, description = "Invalid payload or unknown entreprise code", body = ApiError),
        (status = 409, description = "Email already registered", body = ApiError),
        (status = 500, description = "Persistence failure", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let entreprise = EntrepriseRepository::new(&state.db)
        .find_by_code(&request.code_entreprise)
        .await?
        .ok_or_else(|| bad_request("Invalid entreprise Code"))?;

    let password_hash = password::hash_password(&request.password).map_err(|err| {
        tracing::error!(error = %err, "Password hashing failed");
        internal_error("Unable to hash password")
    })?;

    // Unresolvable allergene ids are skipped, not rejected.
    let allergenes = AllergeneRepository::new(&state.db)
        .find_by_ids(&request.allergenes)
        .await?;

    let user = UtilisateurRepository::new(&state.db)
        .create(CreateUtilisateurRequest {
            nom: request.nom,
            prenom: request.prenom,
            email: request.email,
            password_hash,
            date_de_naissance: request.date_de_naissance,
            telephone: request.telephone,
            roles: serde_json::json!(["ROLE_USER"]),
            entreprise_id: entreprise.id,
            allergene_ids: allergenes.iter().map(|a| a.id).collect(),
        })
        .await
        .map_err(|err| match err {
            RepositoryError::Database { source } => {
                let api: ApiError = source.into();
                if api.status == StatusCode::CONFLICT {
                    api
                } else {
                    internal_error(&format!("Unable to save user: {}", api.message))
                }
            }
            other => other.into(),
        })?;

    let token = auth::issue_token(&state.config, &user).map_err(|err| {
        tracing::error!(error = %err, "Token issuance failed");
        internal_error("Unable to issue token")
    })?;

    counter!("registrations_total").increment(1);
    tracing::info!(utilisateur_id = user.id, entreprise_id = entreprise.id, "Utilisateur registered");

    let view = UtilisateurView::from_model(&user)
        .with_allergenes(allergenes.iter().map(AllergeneView::from_model).collect());

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse { user: view, token }),
    ))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload.map_err(ApiError::from)?;

    let repo = UtilisateurRepository::new(&state.db);
    let user = repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| unauthorized(Some("Invalid credentials")))?;

    let verified = password::verify_password(&request.password, &user.password).map_err(|err| {
        tracing::error!(utilisateur_id = user.id, error = %err, "Stored password hash is unreadable");
        unauthorized(Some("Invalid credentials"))
    })?;

    if !verified {
        return Err(unauthorized(Some("Invalid credentials")));
    }

    // Transparent hash upgrade for credentials imported with outdated
    // parameters; a failure here must not block the login.
    if password::needs_rehash(&user.password) {
        match password::hash_password(&request.password) {
            Ok(new_hash) => {
                if let Err(err) = repo.upgrade_password(user.id, new_hash).await {
                    tracing::warn!(utilisateur_id = user.id, error = %err, "Password upgrade failed");
                }
            }
            Err(err) => {
                tracing::warn!(utilisateur_id = user.id, error = %err, "Password rehash failed");
            }
        }
    }

    let token = auth::issue_token(&state.config, &user).map_err(|err| {
        tracing::error!(error = %err, "Token issuance failed");
        internal_error("Unable to issue token")
    })?;

    counter!("logins_total").increment(1);

    Ok(Json(AuthResponse {
        user: UtilisateurView::from_model(&user),
        token,
    }))
}

/// Stateless logout acknowledgement
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse)
    ),
    tag = "auth"
)]
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        message: "Logout successful".to_string(),
    })
}
