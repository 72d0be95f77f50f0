//! # Tests for Handlers
//!
//! End-to-end handler tests driving the full router against an in-memory
//! database.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::auth;
use crate::config::AppConfig;
use crate::models::{Commande, CommandePlat, Utilisateur};
use crate::password;
use crate::repositories::{
    AllergeneRepository, CategorieRepository, CreateEntrepriseRequest, CreatePlatRequest,
    CreateUtilisateurRequest, EntrepriseRepository, PlatRepository, UtilisateurRepository,
};
use crate::server::{AppState, create_app, create_test_app_state};
use migration::MigratorTrait;
use sea_orm::{Database, EntityTrait};

async fn setup_test_app() -> (AppState, Router) {
    // A single connection keeps every query on the same in-memory
    // database.
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let config = AppConfig {
        profile: "test".to_string(),
        jwt_secret: Some("handler-test-secret".to_string()),
        ..Default::default()
    };

    let state = create_test_app_state(config, db);
    let app = create_app(state.clone());
    (state, app)
}

/// Seeded world shared by most scenarios
struct Fixture {
    entreprise_id: i32,
    user_id: i32,
    token: String,
    gluten_id: i32,
    lactose_id: i32,
    /// Dessert carrying gluten
    tarte_id: i32,
    /// Dessert without allergene
    salade_id: i32,
    /// Entrée without allergene
    carottes_id: i32,
}

const TEST_PASSWORD: &str = "secret";

async fn seed_fixture(db: &DatabaseConnection, config: &AppConfig) -> Fixture {
    let entreprise = EntrepriseRepository::new(db)
        .create(CreateEntrepriseRequest {
            nom: "Acme".to_string(),
            telephone: "0102030405".to_string(),
            code_entreprise: "AB12C".to_string(),
            rue: Some("1 rue des Lilas".to_string()),
            ville: Some("Lyon".to_string()),
            pays: Some("France".to_string()),
        })
        .await
        .unwrap();

    let allergenes = AllergeneRepository::new(db);
    let gluten = allergenes.create("Gluten").await.unwrap();
    let lactose = allergenes.create("Lactose").await.unwrap();

    let user = UtilisateurRepository::new(db)
        .create(CreateUtilisateurRequest {
            nom: "Martin".to_string(),
            prenom: "Alice".to_string(),
            email: "alice.martin@example.com".to_string(),
            password_hash: password::hash_password(TEST_PASSWORD).unwrap(),
            date_de_naissance: chrono::NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            telephone: "0601020304".to_string(),
            roles: json!(["ROLE_USER"]),
            entreprise_id: entreprise.id,
            allergene_ids: vec![gluten.id],
        })
        .await
        .unwrap();

    let token = auth::issue_token(config, &user).unwrap();

    let categories = CategorieRepository::new(db);
    let entree = categories.create("Entrée").await.unwrap();
    let dessert = categories.create("Dessert").await.unwrap();

    let plats = PlatRepository::new(db);
    let date = chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

    let tarte = plats
        .create(CreatePlatRequest {
            nom: "Tarte aux pommes".to_string(),
            image: None,
            ingredients: Some(json!(["pommes", "farine"])),
            date_disponibilite: date,
            categorie_id: dessert.id,
            allergene_ids: vec![gluten.id],
        })
        .await
        .unwrap();

    let salade = plats
        .create(CreatePlatRequest {
            nom: "Salade de fruits".to_string(),
            image: None,
            ingredients: Some(json!(["fruits"])),
            date_disponibilite: date,
            categorie_id: dessert.id,
            allergene_ids: vec![],
        })
        .await
        .unwrap();

    let carottes = plats
        .create(CreatePlatRequest {
            nom: "Carottes râpées".to_string(),
            image: None,
            ingredients: None,
            date_disponibilite: date,
            categorie_id: entree.id,
            allergene_ids: vec![],
        })
        .await
        .unwrap();

    Fixture {
        entreprise_id: entreprise.id,
        user_id: user.id,
        token,
        gluten_id: gluten.id,
        lactose_id: lactose.id,
        tarte_id: tarte.id,
        salade_id: salade.id,
        carottes_id: carottes.id,
    }
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

#[tokio::test]
async fn test_root_returns_service_info() {
    let (_state, app) = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "cantine");
}

#[tokio::test]
async fn test_register_success() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({
            "nom": "Durand",
            "prenom": "Paul",
            "email": "paul.durand@example.com",
            "date_de_naissance": "1988-11-23",
            "telephone": "0605040302",
            "password": "secret",
            "codeEntreprise": "AB12C",
            "allergenes": [fixture.lactose_id]
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["user"]["email"], "paul.durand@example.com");
    assert_eq!(body["user"]["entreprise_id"], fixture.entreprise_id);
    assert_eq!(body["user"]["allergenes"][0]["nom"], "Lactose");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_unknown_code_creates_nothing() {
    let (state, app) = setup_test_app().await;
    seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({
            "nom": "Durand",
            "prenom": "Paul",
            "email": "paul.durand@example.com",
            "date_de_naissance": "1988-11-23",
            "telephone": "0605040302",
            "password": "secret",
            "codeEntreprise": "ZZZZZ"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid entreprise Code");

    let users = Utilisateur::find().all(&state.db).await.unwrap();
    assert_eq!(users.len(), 1); // only the fixture user
}

#[tokio::test]
async fn test_register_skips_unknown_allergene_ids() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({
            "nom": "Durand",
            "prenom": "Paul",
            "email": "paul.durand@example.com",
            "date_de_naissance": "1988-11-23",
            "telephone": "0605040302",
            "password": "secret",
            "codeEntreprise": "AB12C",
            "allergenes": [fixture.gluten_id, 9999]
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let allergenes = body["user"]["allergenes"].as_array().unwrap();
    assert_eq!(allergenes.len(), 1);
    assert_eq!(allergenes[0]["nom"], "Gluten");
}

#[tokio::test]
async fn test_login_success_and_bad_credentials() {
    let (state, app) = setup_test_app().await;
    seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({
            "email": "alice.martin@example.com",
            "password": TEST_PASSWORD
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["prenom"], "Alice");
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, body) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({
            "email": "alice.martin@example.com",
            "password": "wrong"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = send(
        &app,
        "POST",
        "/api/login",
        Some(json!({
            "email": "nobody@example.com",
            "password": TEST_PASSWORD
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_acknowledges() {
    let (_state, app) = setup_test_app().await;

    let (status, body) = send(&app, "POST", "/api/logout", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logout successful");
}

#[tokio::test]
async fn test_create_commande_requires_identity() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/commande",
        Some(json!({"plats": [fixture.tarte_id]})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        "POST",
        "/api/commande",
        Some(json!({"plats": [fixture.tarte_id]})),
        Some("not-a-jwt"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_commande_rejects_empty_plats() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/commande",
        Some(json!({"plats": []})),
        Some(&fixture.token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No plats provided");
    assert!(Commande::find().all(&state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_commande_rejects_unknown_plat_atomically() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/commande",
        Some(json!({"plats": [fixture.tarte_id, 9999]})),
        Some(&fixture.token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid plat ID: 9999");
    assert!(Commande::find().all(&state.db).await.unwrap().is_empty());
    assert!(CommandePlat::find().all(&state.db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_commande_success_with_duplicates() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/commande",
        Some(json!({
            "plats": [fixture.tarte_id, fixture.salade_id, fixture.tarte_id]
        })),
        Some(&fixture.token),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["etat"], "En cours");
    assert_eq!(body["quantite"], 5);
    assert_eq!(body["note"], "");
    assert_eq!(body["utilisateur"]["id"], fixture.user_id);
    assert!(body["utilisateur"].get("password").is_none());

    let plats = body["plats"].as_array().unwrap();
    assert_eq!(plats.len(), 3);
    assert_eq!(plats[0]["id"], fixture.tarte_id);
    assert_eq!(plats[1]["id"], fixture.salade_id);
    assert_eq!(plats[2]["id"], fixture.tarte_id);
}

#[tokio::test]
async fn test_commande_crud_round_trip() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (_, created) = send(
        &app,
        "POST",
        "/api/commande",
        Some(json!({"plats": [fixture.salade_id]})),
        Some(&fixture.token),
    )
    .await;
    let commande_id = created["id"].as_i64().unwrap();

    let (status, listing) = send(&app, "GET", "/api/commande", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let uri = format!("/api/commande/{}", commande_id);
    let (status, fetched) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"etat": "Livrée", "commentaire": "Parfait"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["etat"], "Livrée");
    assert_eq!(updated["commentaire"], "Parfait");
    assert_eq!(updated["quantite"], 5);

    let (status, _) = send(&app, "DELETE", &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_filtered_plats_requires_categories() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let uri = format!("/api/plat/filtered?userId={}", fixture.user_id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Categories must be an array");
}

#[tokio::test]
async fn test_filtered_plats_unknown_user_is_bad_request() {
    let (state, app) = setup_test_app().await;
    seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/plat/filtered?userId=9999&categories%5B%5D=Dessert",
        None,
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_filtered_plats_excludes_allergens_and_other_categories() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    // Alice is allergic to gluten; only the allergen-free dessert remains.
    let uri = format!(
        "/api/plat/filtered?userId={}&categories%5B%5D=Dessert",
        fixture.user_id
    );
    let (status, body) = send(&app, "GET", &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    let plats = body.as_array().unwrap();
    assert_eq!(plats.len(), 1);
    assert_eq!(plats[0]["id"], fixture.salade_id);
    // Listing projection strips relation back-references
    assert!(plats[0].get("categorie").is_none());
    assert!(plats[0].get("allergene").is_none());
}

#[tokio::test]
async fn test_plat_details() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let uri = format!("/api/plat/details/{}", fixture.carottes_id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nom"], "Carottes râpées");

    let (status, body) = send(&app, "GET", "/api/plat/details/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Plat not found");
}

#[tokio::test]
async fn test_plat_available() {
    let (state, app) = setup_test_app().await;
    seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(&app, "GET", "/api/plat/available", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Date is required");

    let (status, body) = send(
        &app,
        "GET",
        "/api/plat/available?date=not-a-date",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date format");

    let (status, body) = send(
        &app,
        "GET",
        "/api/plat/available?date=2024-06-10",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = send(
        &app,
        "GET",
        "/api/plat/available?date=2024-06-11",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_utilisateur_me() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "GET",
        "/api/utilisateur/me",
        None,
        Some(&fixture.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], fixture.user_id);
    assert_eq!(body["email"], "alice.martin@example.com");
    assert!(body.get("password").is_none());

    let (status, _) = send(&app, "GET", "/api/utilisateur/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_utilisateur_show_round_trip() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let uri = format!("/api/utilisateur/{}", fixture.user_id);
    let (status, body) = send(&app, "GET", &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nom"], "Martin");
    assert_eq!(body["prenom"], "Alice");
    assert_eq!(body["email"], "alice.martin@example.com");
    assert_eq!(body["telephone"], "0601020304");

    let (status, body) = send(&app, "GET", "/api/utilisateur/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[tokio::test]
async fn test_utilisateur_create_and_update() {
    let (state, app) = setup_test_app().await;
    let fixture = seed_fixture(&state.db, &state.config).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/utilisateur",
        Some(json!({
            "nom": "Petit",
            "prenom": "Jeanne",
            "email": "jeanne.petit@example.com",
            "password": "secret",
            "date_de_naissance": "1995-02-17",
            "telephone": "0699887766",
            "roles": ["ROLE_USER"],
            "entreprise_id": fixture.entreprise_id
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("password").is_none());
    let created_id = body["id"].as_i64().unwrap();

    // Unknown entreprise is rejected before any write
    let (status, body) = send(
        &app,
        "POST",
        "/api/utilisateur",
        Some(json!({
            "nom": "Petit",
            "prenom": "Jeanne",
            "email": "other@example.com",
            "password": "secret",
            "date_de_naissance": "1995-02-17",
            "telephone": "0699887766",
            "roles": ["ROLE_USER"],
            "entreprise_id": 9999
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid entreprise ID");

    let uri = format!("/api/utilisateur/{}", created_id);
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({
            "nom": "Petit",
            "prenom": "Jeanne",
            "email": "jeanne.petit@example.com",
            "date_de_naissance": "1995-02-17",
            "telephone": "0612345678",
            "roles": ["ROLE_USER", "ROLE_ADMIN"],
            "entreprise_id": fixture.entreprise_id
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["telephone"], "0612345678");
    assert_eq!(body["roles"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_email_maps_to_conflict() {
    let (state, app) = setup_test_app().await;
    seed_fixture(&state.db, &state.config).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/register",
        Some(json!({
            "nom": "Martin",
            "prenom": "Alice",
            "email": "alice.martin@example.com",
            "date_de_naissance": "1990-04-02",
            "telephone": "0601020304",
            "password": "secret",
            "codeEntreprise": "AB12C"
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}
